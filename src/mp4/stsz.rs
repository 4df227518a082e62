use super::r#box::require_box;
use crate::bytes::ByteCursor;
use crate::errors::Mp4Error;

/// Parse stsz (sample size) box; a non-zero default size expands to one
/// entry per sample.
pub fn parse_stsz(stbl: &[u8], max_media_bytes: u64) -> Result<Vec<u32>, Mp4Error> {
    let stsz = require_box(stbl, "stsz")?;
    let mut cursor = ByteCursor::new(stsz);
    let truncated = || Mp4Error::malformed("stsz box too small: expected at least 12 bytes");

    cursor.skip(4).ok_or_else(truncated)?;
    let sample_size = cursor.u32().ok_or_else(truncated)?;
    let sample_count = cursor.u32().ok_or_else(truncated)?;

    if sample_size != 0 {
        // A fixed size is not backed by a table, so the count has to fit the file
        let total = sample_size as u64 * sample_count as u64;
        if total > max_media_bytes {
            return Err(Mp4Error::malformed(format!(
                "stsz declares {} samples of {} bytes, more than the {} byte file holds",
                sample_count, sample_size, max_media_bytes
            )));
        }
        return Ok(vec![sample_size; sample_count as usize]);
    }

    let sizes = cursor
        .bytes((sample_count as usize).saturating_mul(4))
        .ok_or_else(|| {
            Mp4Error::malformed(format!(
                "stsz box too small for {} samples",
                sample_count
            ))
        })?;
    Ok(sizes
        .chunks_exact(4)
        .map(|s| u32::from_be_bytes([s[0], s[1], s[2], s[3]]))
        .collect())
}
