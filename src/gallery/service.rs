use crate::config::GalleryConfig;
use crate::errors::{CatalogError, FailureKind, GalleryError, GalleryResult};
use crate::remote::RemoteThumbnailResolver;
use crate::store::{
    is_plain_filename, CatalogStore, Category, MediaStore, NewVideo, Video, VideoSource,
};
use crate::thumbnails::UploadThumbnailExtractor;
use chrono::NaiveDate;
use log::{info, warn};
use std::sync::Arc;

/// A category together with its videos
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryVideos {
    pub category: Category,
    pub videos: Vec<Video>,
}

/// Gallery operations over a catalog and a media store
pub struct Gallery<C: CatalogStore, M: MediaStore> {
    config: GalleryConfig,
    catalog: Arc<C>,
    media: Arc<M>,
    extractor: UploadThumbnailExtractor<M>,
    resolver: RemoteThumbnailResolver<M>,
}

impl<C: CatalogStore, M: MediaStore> Gallery<C, M> {
    pub fn new(config: GalleryConfig, catalog: Arc<C>, media: Arc<M>) -> GalleryResult<Self> {
        config.validate()?;
        let extractor = UploadThumbnailExtractor::new(config.clone(), Arc::clone(&media));
        let resolver = RemoteThumbnailResolver::new(config.clone(), Arc::clone(&media))?;
        Ok(Self {
            config,
            catalog,
            media,
            extractor,
            resolver,
        })
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    /// Create a category, or return the existing one with the same name.
    pub async fn add_category(&self, name: &str) -> GalleryResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::invalid("category name is required").into());
        }
        if let Some(existing) = self.catalog.find_category_by_name(name).await? {
            return Ok(existing);
        }
        match self.catalog.insert_category(name).await {
            Ok(category) => {
                info!("Created category {} '{}'", category.id, category.name);
                Ok(category)
            }
            // Lost a race against a concurrent insert of the same name
            Err(e) if e.kind() == FailureKind::InvalidInput => {
                match self.catalog.find_category_by_name(name).await? {
                    Some(existing) => Ok(existing),
                    None => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    pub async fn categories(&self) -> GalleryResult<Vec<Category>> {
        self.catalog.list_categories().await
    }

    /// Every category in creation order with its videos
    pub async fn videos_by_category(&self) -> GalleryResult<Vec<CategoryVideos>> {
        let mut groups = Vec::new();
        for category in self.catalog.list_categories().await? {
            let videos = self.catalog.list_videos_in_category(category.id).await?;
            groups.push(CategoryVideos { category, videos });
        }
        Ok(groups)
    }

    /// Videos grouped by UTC upload day, newest day first
    pub async fn videos_by_date(&self) -> GalleryResult<Vec<(NaiveDate, Vec<Video>)>> {
        let mut groups: Vec<(NaiveDate, Vec<Video>)> = Vec::new();
        for video in self.catalog.list_videos_newest_first().await? {
            let day = video.uploaded_at.date_naive();
            match groups.last_mut() {
                Some((last, videos)) if *last == day => videos.push(video),
                _ => groups.push((day, vec![video])),
            }
        }
        Ok(groups)
    }

    /// Resolve a YouTube link into a catalogued video
    pub async fn add_remote_video(&self, url: &str, category_id: i64) -> GalleryResult<Video> {
        self.require_category(category_id).await?;
        let remote = self.resolver.resolve(url).await?;

        let inserted = self
            .catalog
            .insert_video(NewVideo {
                title: remote.title,
                thumbnail: remote.filename.clone(),
                source: VideoSource::Remote {
                    url: url.trim().to_string(),
                },
                category_id,
            })
            .await;

        match inserted {
            Ok(video) => {
                info!("Added remote video {} ({})", video.id, remote.video_id);
                Ok(video)
            }
            Err(e) => {
                self.discard_thumbnail(&remote.filename).await;
                Err(e)
            }
        }
    }

    /// Store an uploaded file, generate its thumbnail and catalogue it.
    /// Nothing is kept when the thumbnail cannot be produced.
    pub async fn upload_video(
        &self,
        original_name: &str,
        bytes: &[u8],
        title: &str,
        category_id: i64,
    ) -> GalleryResult<Video> {
        if !self.config.is_allowed_extension(original_name) {
            return Err(
                CatalogError::invalid(format!("file type not allowed: {}", original_name)).into(),
            );
        }
        self.require_category(category_id).await?;

        let stored = self.media.save_upload(original_name, bytes).await?;
        match self.catalogue_upload(&stored, title, category_id).await {
            Ok(video) => Ok(video),
            Err(e) => {
                if let Err(cleanup) = self.media.remove_upload(&stored).await {
                    warn!("Could not remove upload {}: {}", stored, cleanup);
                }
                Err(e)
            }
        }
    }

    /// Catalogue a file that already sits in the upload store
    pub async fn add_uploaded_video(
        &self,
        stored_filename: &str,
        title: &str,
        category_id: i64,
    ) -> GalleryResult<Video> {
        if !is_plain_filename(stored_filename) {
            return Err(CatalogError::invalid(format!(
                "stored file name must not leave the upload store: {:?}",
                stored_filename
            ))
            .into());
        }
        self.require_category(category_id).await?;
        self.catalogue_upload(stored_filename, title, category_id).await
    }

    /// Thumbnail and record for a stored upload whose name and category
    /// were already checked
    async fn catalogue_upload(
        &self,
        stored_filename: &str,
        title: &str,
        category_id: i64,
    ) -> GalleryResult<Video> {
        let thumbnail = self
            .extractor
            .extract(self.media.upload_path(stored_filename))
            .await?;

        let title = match title.trim() {
            "" => self.config.default_upload_title.clone(),
            t => t.to_string(),
        };
        let inserted = self
            .catalog
            .insert_video(NewVideo {
                title,
                thumbnail: thumbnail.clone(),
                source: VideoSource::Uploaded {
                    video_file: stored_filename.to_string(),
                },
                category_id,
            })
            .await;

        match inserted {
            Ok(video) => {
                info!("Added uploaded video {} ({})", video.id, stored_filename);
                Ok(video)
            }
            Err(e) => {
                self.discard_thumbnail(&thumbnail).await;
                Err(e)
            }
        }
    }

    /// Delete a video record together with its stored files.
    /// Files already missing from the store do not block the deletion.
    pub async fn delete_video(&self, id: i64) -> GalleryResult<()> {
        let video = self
            .catalog
            .get_video(id)
            .await?
            .ok_or(CatalogError::not_found("video", id))?;

        self.discard_thumbnail(&video.thumbnail).await;
        if let Some(file) = video.video_file() {
            match self.media.remove_upload(file).await {
                Ok(true) => {}
                Ok(false) => warn!("Upload {} of video {} was already gone", file, id),
                Err(e) => warn!("Could not remove upload {}: {}", file, e),
            }
        }

        if !self.catalog.delete_video(id).await? {
            return Err(CatalogError::not_found("video", id).into());
        }
        info!("Deleted video {} '{}'", id, video.title);
        Ok(())
    }

    async fn require_category(&self, category_id: i64) -> GalleryResult<Category> {
        self.catalog
            .get_category(category_id)
            .await?
            .ok_or_else(|| GalleryError::from(CatalogError::not_found("category", category_id)))
    }

    async fn discard_thumbnail(&self, filename: &str) {
        match self.media.remove_thumbnail(filename).await {
            Ok(true) => {}
            Ok(false) => warn!("Thumbnail {} was already gone", filename),
            Err(e) => warn!("Could not remove thumbnail {}: {}", filename, e),
        }
    }
}
