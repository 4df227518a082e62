use super::analyzer::analyze_video_track;
use super::decoder::decode_last_frame;
use super::types::FramePlan;
use super::utils::{encode_jpeg, resize_image};
use crate::config::GalleryConfig;
use crate::errors::{DecodeError, GalleryError, GalleryResult, SourceError};
use crate::mp4::{detect_format, find_and_read_moov_box};
use crate::store::{unique_filename, MediaStore};
use crate::streams::{LocalSeekableStream, SeekableStream};
use image::RgbImage;
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;

/// Grab the frame shown `secs` into an MP4-family H.264 video
pub async fn extract_frame_at<P: AsRef<Path>>(path: P, secs: f64) -> GalleryResult<RgbImage> {
    let path = path.as_ref();
    let mut stream = LocalSeekableStream::open(path).await.map_err(|e| {
        SourceError::new(format!("cannot open video {}: {}", path.display(), e))
    })?;
    extract_frame_from_stream(&mut stream, secs).await
}

/// Stream-generic core of [`extract_frame_at`]
pub async fn extract_frame_from_stream<S: SeekableStream + ?Sized>(
    stream: &mut S,
    secs: f64,
) -> GalleryResult<RgbImage> {
    let format = detect_format(stream).await?;
    debug!("{} container detected", format.name());

    let moov = find_and_read_moov_box(stream).await.map_err(unreadable)?;
    let file_len = stream.len().await.map_err(|e| unreadable(e.into()))?;
    let track = analyze_video_track(&moov, file_len)?;
    if !track.is_h264() {
        return Err(SourceError::new(format!(
            "unsupported video codec '{}'",
            String::from_utf8_lossy(&track.codec)
        ))
        .into());
    }

    let plan = track.plan_frame(secs)?;
    debug!(
        "Frame {} at {:.2} fps, decoding samples {}..={}",
        plan.target, plan.frame_rate, plan.start, plan.target
    );
    let samples = read_samples(stream, &plan, file_len).await?;

    let avcc = track.avcc.clone();
    tokio::task::spawn_blocking(move || decode_last_frame(avcc.as_ref(), &samples))
        .await
        .map_err(|e| DecodeError::new(format!("decoder task failed: {}", e)))?
}

/// Truncated files surface as I/O errors while reading the container
fn unreadable(err: GalleryError) -> GalleryError {
    match err {
        GalleryError::Other(e) => SourceError::new(format!("unreadable video: {}", e)).into(),
        other => other,
    }
}

async fn read_samples<S: SeekableStream + ?Sized>(
    stream: &mut S,
    plan: &FramePlan,
    file_len: u64,
) -> GalleryResult<Vec<Vec<u8>>> {
    let mut samples = Vec::with_capacity(plan.ranges.len());
    let mut total = 0u64;
    for range in &plan.ranges {
        total += range.size as u64;
        let in_file = range
            .offset
            .checked_add(range.size as u64)
            .is_some_and(|end| end <= file_len);
        // Samples never overlap, so together they fit in the file as well
        if !in_file || total > file_len {
            return Err(SourceError::new(format!(
                "sample {} ({} bytes at offset {}) lies beyond the {} byte file",
                range.sample_index, range.size, range.offset, file_len
            ))
            .into());
        }
        let data = stream
            .read_range(range.offset, range.size as usize)
            .await
            .map_err(|e| {
                SourceError::new(format!(
                    "sample {} at offset {} is unreadable: {}",
                    range.sample_index, range.offset, e
                ))
            })?;
        samples.push(data);
    }
    Ok(samples)
}

/// Produces the thumbnail for an uploaded video file
pub struct UploadThumbnailExtractor<M: MediaStore> {
    config: GalleryConfig,
    store: Arc<M>,
}

impl<M: MediaStore> UploadThumbnailExtractor<M> {
    pub fn new(config: GalleryConfig, store: Arc<M>) -> Self {
        Self { config, store }
    }

    /// Decode the frame at the configured offset, store it as JPEG and
    /// return the generated thumbnail file name. Nothing is written when any
    /// step fails.
    pub async fn extract<P: AsRef<Path>>(&self, video_path: P) -> GalleryResult<String> {
        let video_path = video_path.as_ref();
        let frame = extract_frame_at(video_path, self.config.seek_offset_secs).await?;
        let frame = resize_image(
            frame,
            self.config.thumbnail_max_width,
            self.config.thumbnail_max_height,
        );
        let jpeg = encode_jpeg(&frame, self.config.jpeg_quality)?;

        let filename = unique_filename("video", "jpg");
        self.store.save_thumbnail(&filename, &jpeg).await?;
        info!(
            "Generated thumbnail {} ({}x{}) for {}",
            filename,
            frame.width(),
            frame.height(),
            video_path.display()
        );
        Ok(filename)
    }

    /// Like [`extract`](Self::extract), with failures logged and collapsed
    /// into `None`.
    pub async fn generate_video_thumbnail<P: AsRef<Path>>(&self, video_path: P) -> Option<String> {
        let video_path = video_path.as_ref();
        match self.extract(video_path).await {
            Ok(filename) => Some(filename),
            Err(e) => {
                warn!("No thumbnail for {}: {}", video_path.display(), e);
                None
            }
        }
    }
}
