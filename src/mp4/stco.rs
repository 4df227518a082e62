use super::r#box::{find_box, table_entries};
use crate::errors::Mp4Error;

/// Parse chunk offsets from stco (32-bit) or co64 (64-bit)
pub fn parse_stco_or_co64(stbl: &[u8]) -> Result<Vec<u64>, Mp4Error> {
    if let Some(stco) = find_box(stbl, "stco") {
        let (_, entries) = table_entries(stco, "stco", 0, 4)?;
        return Ok(entries
            .chunks_exact(4)
            .map(|o| u32::from_be_bytes([o[0], o[1], o[2], o[3]]) as u64)
            .collect());
    }

    if let Some(co64) = find_box(stbl, "co64") {
        let (_, entries) = table_entries(co64, "co64", 0, 8)?;
        return Ok(entries
            .chunks_exact(8)
            .map(|o| u64::from_be_bytes([o[0], o[1], o[2], o[3], o[4], o[5], o[6], o[7]]))
            .collect());
    }

    Err(Mp4Error::MissingBox { name: "stco" })
}
