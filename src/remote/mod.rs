pub mod resolver;
pub mod youtube;

pub use resolver::{RemoteThumbnail, RemoteThumbnailResolver};
pub use youtube::{candidate_thumbnail_urls, extract_video_id};
