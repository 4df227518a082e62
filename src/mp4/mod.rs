pub mod r#box;
pub use r#box::{find_box, find_box_range, iter_boxes, require_box, require_path, BoxRef};
pub mod avcc;
pub use avcc::{extract_avcc_from_stsd, sample_entry_codec, AvccConfig};
pub mod ftyp;
pub use ftyp::{detect_format, ContainerFormat};
pub mod mdhd;
pub use mdhd::parse_mdhd;
pub mod moov_finder;
pub use moov_finder::{find_and_read_moov_box, find_moov_box, MoovBoxInfo};
pub mod stco;
pub use stco::parse_stco_or_co64;
pub mod stsc;
pub use stsc::{parse_stsc, SampleToChunkEntry};
pub mod stss;
pub use stss::parse_stss;
pub mod stsz;
pub use stsz::parse_stsz;
pub mod stts;
pub use stts::{parse_stts, sample_time, SttsEntry};
