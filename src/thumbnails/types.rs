use crate::mp4::{AvccConfig, SampleToChunkEntry, SttsEntry};

/// Sample tables of the first video track
#[derive(Debug)]
pub struct VideoTrackInfo {
    pub timescale: u32,
    pub duration: u64,
    pub codec: [u8; 4],
    pub sample_sizes: Vec<u32>,
    pub chunk_offsets: Vec<u64>,
    pub sample_to_chunk: Vec<SampleToChunkEntry>,
    pub stts_entries: Vec<SttsEntry>,
    /// 1-based sync sample numbers; `None` means every sample is a sync sample
    pub sync_samples: Option<Vec<u32>>,
    pub avcc: Option<AvccConfig>,
}

/// Byte location of one sample in the file
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRange {
    pub sample_index: u32,
    pub offset: u64,
    pub size: u32,
    pub timestamp: f64,
}

/// The run of samples that has to be decoded to reach a frame
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    /// Sample the picture is taken from
    pub target: u32,
    /// Sync sample decoding starts at
    pub start: u32,
    pub frame_rate: f64,
    pub ranges: Vec<SampleRange>,
}
