use super::r#box::{require_box, table_entries};
use crate::errors::Mp4Error;

/// One run of samples sharing the same duration
#[derive(Debug, Clone, PartialEq)]
pub struct SttsEntry {
    pub sample_count: u32,
    pub sample_delta: u32,
}

/// Parse stts (decoding time to sample) from an stbl payload
pub fn parse_stts(stbl: &[u8]) -> Result<Vec<SttsEntry>, Mp4Error> {
    let stts = require_box(stbl, "stts")?;
    let (_, entries) = table_entries(stts, "stts", 0, 8)?;

    Ok(entries
        .chunks_exact(8)
        .map(|e| SttsEntry {
            sample_count: u32::from_be_bytes([e[0], e[1], e[2], e[3]]),
            sample_delta: u32::from_be_bytes([e[4], e[5], e[6], e[7]]),
        })
        .collect())
}

/// Decode timestamp (seconds) of the sample with 0-based `index`
pub fn sample_time(timescale: u32, entries: &[SttsEntry], index: u32) -> Option<f64> {
    if timescale == 0 {
        return None;
    }
    let mut remaining = index as u64;
    let mut ticks = 0u64;
    for entry in entries {
        let count = entry.sample_count as u64;
        if remaining < count {
            ticks += remaining * entry.sample_delta as u64;
            return Some(ticks as f64 / timescale as f64);
        }
        ticks += count * entry.sample_delta as u64;
        remaining -= count;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stts_box(entries: &[(u32, u32)]) -> Vec<u8> {
        let mut payload = vec![0, 0, 0, 0];
        payload.extend_from_slice(&(entries.len() as u32).to_be_bytes());
        for (count, delta) in entries {
            payload.extend_from_slice(&count.to_be_bytes());
            payload.extend_from_slice(&delta.to_be_bytes());
        }
        let mut out = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
        out.extend_from_slice(b"stts");
        out.extend_from_slice(&payload);
        out
    }

    #[test]
    fn test_parse_stts_entries() {
        let stbl = stts_box(&[(10, 512), (2, 1024)]);
        let entries = parse_stts(&stbl).unwrap();
        assert_eq!(
            entries,
            vec![
                SttsEntry { sample_count: 10, sample_delta: 512 },
                SttsEntry { sample_count: 2, sample_delta: 1024 },
            ]
        );
    }

    #[test]
    fn test_sample_time_crosses_runs() {
        let entries = vec![
            SttsEntry { sample_count: 2, sample_delta: 100 },
            SttsEntry { sample_count: 2, sample_delta: 300 },
        ];
        assert_eq!(sample_time(1000, &entries, 0), Some(0.0));
        assert_eq!(sample_time(1000, &entries, 3), Some(0.5));
        assert_eq!(sample_time(1000, &entries, 4), None);
        assert_eq!(sample_time(0, &entries, 0), None);
    }
}
