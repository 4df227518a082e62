use crate::errors::{CatalogError, GalleryResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Where the playable content of a video lives
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VideoSource {
    /// File in the upload store
    Uploaded { video_file: String },
    /// Page on an external platform
    Remote { url: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Video {
    pub id: i64,
    pub title: String,
    pub thumbnail: String,
    pub source: VideoSource,
    pub category_id: i64,
    pub uploaded_at: DateTime<Utc>,
}

impl Video {
    pub fn is_remote(&self) -> bool {
        matches!(self.source, VideoSource::Remote { .. })
    }

    pub fn video_file(&self) -> Option<&str> {
        match &self.source {
            VideoSource::Uploaded { video_file } => Some(video_file),
            VideoSource::Remote { .. } => None,
        }
    }

    pub fn source_url(&self) -> Option<&str> {
        match &self.source {
            VideoSource::Remote { url } => Some(url),
            VideoSource::Uploaded { .. } => None,
        }
    }
}

/// Insert request for a video record
#[derive(Debug, Clone, PartialEq)]
pub struct NewVideo {
    pub title: String,
    pub thumbnail: String,
    pub source: VideoSource,
    pub category_id: i64,
}

/// Relational metadata store: categories own videos
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Insert a category; names are unique.
    async fn insert_category(&self, name: &str) -> GalleryResult<Category>;

    async fn find_category_by_name(&self, name: &str) -> GalleryResult<Option<Category>>;

    async fn get_category(&self, id: i64) -> GalleryResult<Option<Category>>;

    /// All categories in creation order
    async fn list_categories(&self) -> GalleryResult<Vec<Category>>;

    async fn insert_video(&self, video: NewVideo) -> GalleryResult<Video>;

    async fn get_video(&self, id: i64) -> GalleryResult<Option<Video>>;

    /// Videos of one category in insertion order
    async fn list_videos_in_category(&self, category_id: i64) -> GalleryResult<Vec<Video>>;

    /// Every video, newest upload first
    async fn list_videos_newest_first(&self) -> GalleryResult<Vec<Video>>;

    /// Delete a video record; `Ok(false)` when no such record exists.
    async fn delete_video(&self, id: i64) -> GalleryResult<bool>;
}

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Default)]
struct CatalogState {
    categories: Vec<Category>,
    videos: Vec<Video>,
    next_category_id: i64,
    next_video_id: i64,
}

/// In-process catalog guarded by a read-write lock
pub struct MemoryCatalog {
    state: RwLock<CatalogState>,
    clock: Clock,
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    /// Catalog whose creation and upload timestamps come from `clock`
    pub fn with_clock(clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        Self {
            state: RwLock::new(CatalogState {
                next_category_id: 1,
                next_video_id: 1,
                ..CatalogState::default()
            }),
            clock: Box::new(clock),
        }
    }
}

fn validate_new_video(video: &NewVideo) -> Result<(), CatalogError> {
    if video.thumbnail.trim().is_empty() {
        return Err(CatalogError::invalid("video thumbnail is required"));
    }
    let source_present = match &video.source {
        VideoSource::Uploaded { video_file } => !video_file.trim().is_empty(),
        VideoSource::Remote { url } => !url.trim().is_empty(),
    };
    if !source_present {
        return Err(CatalogError::invalid("video source is empty"));
    }
    Ok(())
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn insert_category(&self, name: &str) -> GalleryResult<Category> {
        let mut state = self.state.write();
        if state.categories.iter().any(|c| c.name == name) {
            return Err(CatalogError::invalid(format!("category '{}' already exists", name)).into());
        }
        let category = Category {
            id: state.next_category_id,
            name: name.to_string(),
            created_at: (self.clock)(),
        };
        state.next_category_id += 1;
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn find_category_by_name(&self, name: &str) -> GalleryResult<Option<Category>> {
        Ok(self
            .state
            .read()
            .categories
            .iter()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn get_category(&self, id: i64) -> GalleryResult<Option<Category>> {
        Ok(self
            .state
            .read()
            .categories
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn list_categories(&self) -> GalleryResult<Vec<Category>> {
        Ok(self.state.read().categories.clone())
    }

    async fn insert_video(&self, video: NewVideo) -> GalleryResult<Video> {
        validate_new_video(&video)?;
        let mut state = self.state.write();
        if !state.categories.iter().any(|c| c.id == video.category_id) {
            return Err(CatalogError::not_found("category", video.category_id).into());
        }
        let record = Video {
            id: state.next_video_id,
            title: video.title,
            thumbnail: video.thumbnail,
            source: video.source,
            category_id: video.category_id,
            uploaded_at: (self.clock)(),
        };
        state.next_video_id += 1;
        state.videos.push(record.clone());
        Ok(record)
    }

    async fn get_video(&self, id: i64) -> GalleryResult<Option<Video>> {
        Ok(self.state.read().videos.iter().find(|v| v.id == id).cloned())
    }

    async fn list_videos_in_category(&self, category_id: i64) -> GalleryResult<Vec<Video>> {
        Ok(self
            .state
            .read()
            .videos
            .iter()
            .filter(|v| v.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn list_videos_newest_first(&self) -> GalleryResult<Vec<Video>> {
        let mut videos = self.state.read().videos.clone();
        videos.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at).then(b.id.cmp(&a.id)));
        Ok(videos)
    }

    async fn delete_video(&self, id: i64) -> GalleryResult<bool> {
        let mut state = self.state.write();
        let before = state.videos.len();
        state.videos.retain(|v| v.id != id);
        Ok(state.videos.len() != before)
    }
}
