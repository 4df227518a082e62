use super::r#box::{require_box, table_entries};
use crate::errors::Mp4Error;

#[derive(Debug, Clone, PartialEq)]
pub struct SampleToChunkEntry {
    /// 1-based index of the first chunk this run applies to
    pub first_chunk: u32,
    pub samples_per_chunk: u32,
    pub sample_description_index: u32,
}

/// Parse stsc (sample to chunk) box
pub fn parse_stsc(stbl: &[u8]) -> Result<Vec<SampleToChunkEntry>, Mp4Error> {
    let stsc = require_box(stbl, "stsc")?;
    let (_, entries) = table_entries(stsc, "stsc", 0, 12)?;

    let parsed: Vec<SampleToChunkEntry> = entries
        .chunks_exact(12)
        .map(|e| SampleToChunkEntry {
            first_chunk: u32::from_be_bytes([e[0], e[1], e[2], e[3]]),
            samples_per_chunk: u32::from_be_bytes([e[4], e[5], e[6], e[7]]),
            sample_description_index: u32::from_be_bytes([e[8], e[9], e[10], e[11]]),
        })
        .collect();

    if parsed
        .iter()
        .any(|e| e.first_chunk == 0 || e.samples_per_chunk == 0)
    {
        return Err(Mp4Error::malformed("stsc entry with zero chunk or sample count"));
    }
    Ok(parsed)
}
