mod analyzer;
mod decoder;
mod types;
pub mod upload;
pub mod utils;

pub use types::{FramePlan, SampleRange, VideoTrackInfo};
pub use upload::{extract_frame_at, extract_frame_from_stream, UploadThumbnailExtractor};
pub use utils::{encode_jpeg, resize_image};
