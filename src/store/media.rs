use super::naming::{is_plain_filename, upload_filename};
use crate::config::GalleryConfig;
use crate::errors::{CatalogError, GalleryResult};
use async_trait::async_trait;
use log::{debug, warn};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Backing file store for thumbnails and uploaded videos
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Write a generated thumbnail. Fails if `filename` already exists.
    async fn save_thumbnail(&self, filename: &str, bytes: &[u8]) -> GalleryResult<PathBuf>;

    /// Remove a thumbnail; `Ok(false)` when it was already gone.
    async fn remove_thumbnail(&self, filename: &str) -> GalleryResult<bool>;

    /// Store uploaded video bytes under a fresh name derived from
    /// `original_name` and return that name.
    async fn save_upload(&self, original_name: &str, bytes: &[u8]) -> GalleryResult<String>;

    /// Remove an uploaded video; `Ok(false)` when it was already gone.
    async fn remove_upload(&self, filename: &str) -> GalleryResult<bool>;

    fn thumbnail_path(&self, filename: &str) -> PathBuf;

    fn upload_path(&self, filename: &str) -> PathBuf;
}

/// Directory-backed store. Writes land in a temp file inside the target
/// directory and are renamed into place without clobbering.
#[derive(Debug, Clone)]
pub struct FsMediaStore {
    thumbnail_dir: PathBuf,
    upload_dir: PathBuf,
    max_upload_bytes: u64,
}

impl FsMediaStore {
    pub fn new(
        thumbnail_dir: impl Into<PathBuf>,
        upload_dir: impl Into<PathBuf>,
        max_upload_bytes: u64,
    ) -> Self {
        Self {
            thumbnail_dir: thumbnail_dir.into(),
            upload_dir: upload_dir.into(),
            max_upload_bytes,
        }
    }

    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::new(
            config.thumbnail_dir.clone(),
            config.upload_dir.clone(),
            config.max_upload_bytes,
        )
    }

    pub fn thumbnail_dir(&self) -> &Path {
        &self.thumbnail_dir
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }
}

fn check_name(filename: &str) -> GalleryResult<()> {
    if is_plain_filename(filename) {
        Ok(())
    } else {
        Err(CatalogError::invalid(format!("invalid stored file name: {:?}", filename)).into())
    }
}

async fn write_new_file(dir: PathBuf, filename: String, bytes: Vec<u8>) -> GalleryResult<PathBuf> {
    let target = dir.join(&filename);
    let written = tokio::task::spawn_blocking(move || -> io::Result<PathBuf> {
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist_noclobber(&target).map_err(|e| e.error)?;
        Ok(target)
    })
    .await
    .map_err(io::Error::other)??;
    debug!("Wrote {}", written.display());
    Ok(written)
}

async fn remove_if_present(path: PathBuf) -> GalleryResult<bool> {
    match tokio::fs::remove_file(&path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{} already absent", path.display());
            Ok(false)
        }
        Err(e) => {
            warn!("Failed to remove {}: {}", path.display(), e);
            Err(e.into())
        }
    }
}

#[async_trait]
impl MediaStore for FsMediaStore {
    async fn save_thumbnail(&self, filename: &str, bytes: &[u8]) -> GalleryResult<PathBuf> {
        check_name(filename)?;
        write_new_file(
            self.thumbnail_dir.clone(),
            filename.to_string(),
            bytes.to_vec(),
        )
        .await
    }

    async fn remove_thumbnail(&self, filename: &str) -> GalleryResult<bool> {
        check_name(filename)?;
        remove_if_present(self.thumbnail_path(filename)).await
    }

    async fn save_upload(&self, original_name: &str, bytes: &[u8]) -> GalleryResult<String> {
        if bytes.len() as u64 > self.max_upload_bytes {
            return Err(CatalogError::invalid(format!(
                "upload of {} bytes exceeds the {} byte limit",
                bytes.len(),
                self.max_upload_bytes
            ))
            .into());
        }
        let filename = upload_filename(original_name).ok_or_else(|| {
            CatalogError::invalid(format!("invalid upload file name: {:?}", original_name))
        })?;
        write_new_file(self.upload_dir.clone(), filename.clone(), bytes.to_vec()).await?;
        Ok(filename)
    }

    async fn remove_upload(&self, filename: &str) -> GalleryResult<bool> {
        check_name(filename)?;
        remove_if_present(self.upload_path(filename)).await
    }

    fn thumbnail_path(&self, filename: &str) -> PathBuf {
        self.thumbnail_dir.join(filename)
    }

    fn upload_path(&self, filename: &str) -> PathBuf {
        self.upload_dir.join(filename)
    }
}
