use super::r#box::{find_box, table_entries};
use crate::errors::Mp4Error;

/// Parse stss (sync samples) box. Returns 1-based sample numbers, or `None`
/// when the box is absent, which means every sample is a sync sample.
pub fn parse_stss(stbl: &[u8]) -> Result<Option<Vec<u32>>, Mp4Error> {
    let Some(stss) = find_box(stbl, "stss") else {
        return Ok(None);
    };
    let (_, entries) = table_entries(stss, "stss", 0, 4)?;
    Ok(Some(
        entries
            .chunks_exact(4)
            .map(|s| u32::from_be_bytes([s[0], s[1], s[2], s[3]]))
            .collect(),
    ))
}
