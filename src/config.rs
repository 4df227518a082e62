use crate::errors::{ConfigError, GalleryResult};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;
pub const DEFAULT_MAX_REMOTE_IMAGE_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_THUMBNAIL_BASE_URL: &str = "https://img.youtube.com/vi";
pub const DEFAULT_OEMBED_URL: &str = "https://www.youtube.com/oembed";

/// Settings shared by the extractors, the stores and the gallery service
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    pub upload_dir: PathBuf,
    pub thumbnail_dir: PathBuf,
    pub max_upload_bytes: u64,
    /// Lower-case extensions accepted for uploads
    pub allowed_extensions: BTreeSet<String>,
    /// Playback position the upload thumbnail is taken from
    pub seek_offset_secs: f64,
    pub thumbnail_max_width: u32,
    pub thumbnail_max_height: u32,
    pub jpeg_quality: u8,
    pub http_timeout_secs: u64,
    /// Largest remote thumbnail body accepted from a candidate URL
    pub max_remote_image_bytes: u64,
    pub user_agent: String,
    pub thumbnail_base_url: String,
    pub oembed_url: String,
    pub fallback_title: String,
    pub default_upload_title: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            thumbnail_dir: PathBuf::from("thumbnails"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_extensions: ["mp4", "avi", "mov", "mkv", "webm", "flv"]
                .into_iter()
                .map(String::from)
                .collect(),
            seek_offset_secs: 1.0,
            thumbnail_max_width: 1280,
            thumbnail_max_height: 720,
            jpeg_quality: 85,
            http_timeout_secs: 30,
            max_remote_image_bytes: DEFAULT_MAX_REMOTE_IMAGE_BYTES,
            user_agent: concat!("vidgallery/", env!("CARGO_PKG_VERSION")).to_string(),
            thumbnail_base_url: DEFAULT_THUMBNAIL_BASE_URL.to_string(),
            oembed_url: DEFAULT_OEMBED_URL.to_string(),
            fallback_title: "YouTube Video".to_string(),
            default_upload_title: "Untitled Video".to_string(),
        }
    }
}

impl GalleryConfig {
    /// Parse a TOML document; absent keys keep their defaults.
    pub fn from_toml_str(content: &str) -> GalleryResult<Self> {
        let mut config: GalleryConfig = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("invalid config: {}", e)))?;
        config.allowed_extensions = config
            .allowed_extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> GalleryResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new(format!("reading {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> GalleryResult<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::new(format!(
                "jpeg_quality must be within 1..=100, got {}",
                self.jpeg_quality
            ))
            .into());
        }
        if !self.seek_offset_secs.is_finite() || self.seek_offset_secs < 0.0 {
            return Err(ConfigError::new("seek_offset_secs must be a non-negative number").into());
        }
        if self.http_timeout_secs == 0 {
            return Err(ConfigError::new("http_timeout_secs must be positive").into());
        }
        if self.max_remote_image_bytes == 0 {
            return Err(ConfigError::new("max_remote_image_bytes must be positive").into());
        }
        if self.thumbnail_max_width == 0 || self.thumbnail_max_height == 0 {
            return Err(ConfigError::new("thumbnail dimensions must be non-zero").into());
        }
        Ok(())
    }

    /// Create the upload and thumbnail directories if missing.
    pub fn ensure_dirs(&self) -> GalleryResult<()> {
        fs::create_dir_all(&self.upload_dir)?;
        fs::create_dir_all(&self.thumbnail_dir)?;
        Ok(())
    }

    /// Case-insensitive check of the final extension of `filename`
    pub fn is_allowed_extension(&self, filename: &str) -> bool {
        Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.allowed_extensions.contains(&ext.to_ascii_lowercase()))
            .unwrap_or(false)
    }
}
