pub mod nalus;

pub use nalus::{split_annexb, split_length_prefixed, split_sample, write_annexb, NaluType};
