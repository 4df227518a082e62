use super::youtube::{candidate_thumbnail_urls, extract_video_id, watch_url};
use crate::config::GalleryConfig;
use crate::errors::{DecodeError, GalleryResult, RemoteError, SourceError};
use crate::store::{unique_filename, MediaStore};
use crate::thumbnails::encode_jpeg;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Thumbnail stored for a remote video
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteThumbnail {
    pub filename: String,
    pub title: String,
    pub video_id: String,
}

#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    title: Option<String>,
}

/// Outcome of walking the candidate list
enum FetchFailure {
    /// Every candidate failed at the transport or HTTP level
    Unavailable,
    /// At least one candidate answered 2xx with a body that is not an image
    NotAnImage(String),
}

pub struct RemoteThumbnailResolver<M: MediaStore> {
    config: GalleryConfig,
    client: Client,
    store: Arc<M>,
}

impl<M: MediaStore> RemoteThumbnailResolver<M> {
    pub fn new(config: GalleryConfig, store: Arc<M>) -> GalleryResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| RemoteError::new(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            store,
        })
    }

    /// Download the best available thumbnail for a YouTube `url`, store it
    /// and look up the video title. URLs that carry no video id fail before
    /// any request is made.
    pub async fn resolve(&self, url: &str) -> GalleryResult<RemoteThumbnail> {
        let video_id = extract_video_id(url)
            .ok_or_else(|| SourceError::new(format!("not a recognized YouTube URL: {}", url)))?;

        let (image, title) = tokio::join!(
            self.fetch_thumbnail_image(&video_id),
            self.lookup_title(&video_id)
        );
        let jpeg = image?;

        let filename = unique_filename(&format!("yt_{}", video_id), "jpg");
        self.store.save_thumbnail(&filename, &jpeg).await?;
        info!("Stored thumbnail {} for YouTube video {}", filename, video_id);

        Ok(RemoteThumbnail {
            filename,
            title,
            video_id,
        })
    }

    /// Try each candidate URL in quality order and return the first body
    /// that decodes as an image, re-encoded as JPEG.
    pub async fn fetch_thumbnail_image(&self, video_id: &str) -> GalleryResult<Vec<u8>> {
        let mut failure = FetchFailure::Unavailable;

        for candidate in candidate_thumbnail_urls(&self.config.thumbnail_base_url, video_id) {
            let body = match self.download(&candidate).await {
                Some(body) => body,
                None => continue,
            };

            match image::load_from_memory(&body) {
                Ok(decoded) => {
                    debug!(
                        "Accepted {} ({}x{})",
                        candidate,
                        decoded.width(),
                        decoded.height()
                    );
                    return encode_jpeg(&decoded.to_rgb8(), self.config.jpeg_quality);
                }
                Err(e) => {
                    warn!("Rejected {}: body is not an image ({})", candidate, e);
                    failure = FetchFailure::NotAnImage(candidate);
                }
            }
        }

        match failure {
            FetchFailure::NotAnImage(last) => Err(DecodeError::new(format!(
                "no usable thumbnail for {}; last 2xx body from {} was not an image",
                video_id, last
            ))
            .into()),
            FetchFailure::Unavailable => Err(RemoteError::new(format!(
                "no thumbnail candidate available for {}",
                video_id
            ))
            .into()),
        }
    }

    /// Successful body of `url`, or `None` after logging why it was skipped
    async fn download(&self, url: &str) -> Option<Vec<u8>> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Request to {} failed: {}", url, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Rejected {}: HTTP {}", url, status);
            return None;
        }

        let limit = self.config.max_remote_image_bytes;
        if let Some(declared) = response.content_length().filter(|len| *len > limit) {
            warn!("Rejected {}: {} byte body exceeds the {} byte limit", url, declared, limit);
            return None;
        }

        match response.bytes().await {
            // Chunked bodies carry no length up front
            Ok(bytes) if bytes.len() as u64 > limit => {
                warn!("Rejected {}: body exceeds the {} byte limit", url, limit);
                None
            }
            Ok(bytes) => Some(bytes.to_vec()),
            Err(e) => {
                warn!("Reading body of {} failed: {}", url, e);
                None
            }
        }
    }

    /// Title from the oEmbed endpoint, or the configured fallback
    pub async fn lookup_title(&self, video_id: &str) -> String {
        match self.fetch_oembed_title(video_id).await {
            Ok(Some(title)) => title,
            Ok(None) => self.config.fallback_title.clone(),
            Err(e) => {
                warn!("Title lookup for {} failed: {}", video_id, e);
                self.config.fallback_title.clone()
            }
        }
    }

    async fn fetch_oembed_title(&self, video_id: &str) -> Result<Option<String>, reqwest::Error> {
        let response = self
            .client
            .get(&self.config.oembed_url)
            .query(&[("url", watch_url(video_id).as_str()), ("format", "json")])
            .send()
            .await?
            .error_for_status()?;

        let body: OEmbedResponse = response.json().await?;
        Ok(body
            .title
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty()))
    }
}
