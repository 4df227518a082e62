mod service;

pub use service::{CategoryVideos, Gallery};
