pub mod catalog;
pub mod media;
pub mod naming;

#[cfg(test)]
pub use catalog::MockCatalogStore;
pub use catalog::{CatalogStore, Category, MemoryCatalog, NewVideo, Video, VideoSource};
pub use media::{FsMediaStore, MediaStore};
pub use naming::{is_plain_filename, unique_filename, upload_filename};
