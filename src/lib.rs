pub mod bytes;

pub mod mp4;
pub use mp4::{AvccConfig, ContainerFormat};

pub mod avc;
pub use avc::NaluType;

pub mod streams;
pub use streams::{LocalSeekableStream, MemorySeekableStream, SeekableStream};

pub mod config;
pub use config::GalleryConfig;

pub mod store;
pub use store::{
    CatalogStore, Category, FsMediaStore, MediaStore, MemoryCatalog, NewVideo, Video, VideoSource,
};

pub mod thumbnails;
pub use thumbnails::UploadThumbnailExtractor;

pub mod remote;
pub use remote::{RemoteThumbnail, RemoteThumbnailResolver};

pub mod gallery;
pub use gallery::{CategoryVideos, Gallery};

pub mod errors;
pub use errors::{FailureKind, GalleryError, GalleryResult};

use std::path::Path;
use std::sync::Arc;

/// Generate the upload thumbnail for a local video file into the
/// configured thumbnail directory and return its file name.
pub async fn extract_upload_thumbnail<P: AsRef<Path>>(
    video_path: P,
    config: &GalleryConfig,
) -> GalleryResult<String> {
    let store = Arc::new(FsMediaStore::from_config(config));
    UploadThumbnailExtractor::new(config.clone(), store)
        .extract(video_path)
        .await
}

/// Fetch the thumbnail and title of a YouTube video into the configured
/// thumbnail directory.
pub async fn resolve_remote_thumbnail(
    url: &str,
    config: &GalleryConfig,
) -> GalleryResult<RemoteThumbnail> {
    let store = Arc::new(FsMediaStore::from_config(config));
    RemoteThumbnailResolver::new(config.clone(), store)?
        .resolve(url)
        .await
}
