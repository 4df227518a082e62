//! AVCDecoderConfigurationRecord (avcC) parsing, ISO/IEC 14496-15.

use super::r#box::iter_boxes;
use crate::bytes::ByteCursor;
use crate::errors::Mp4Error;

/// Size of a VisualSampleEntry before its child boxes, header included
const VISUAL_SAMPLE_ENTRY_LEN: usize = 8 + 78;

/// Parsed avcC record
#[derive(Debug, Clone, PartialEq)]
pub struct AvccConfig {
    pub profile: u8,
    pub level: u8,
    /// Byte width of the NALU length prefix in samples (1, 2 or 4)
    pub nalu_length_size: u8,
    pub sps: Vec<Vec<u8>>,
    pub pps: Vec<Vec<u8>>,
}

impl AvccConfig {
    /// Parse an avcC payload (box header excluded).
    pub fn parse(data: &[u8]) -> Result<Self, Mp4Error> {
        let mut cursor = ByteCursor::new(data);
        let eof = |what: &str| Mp4Error::malformed(format!("avcC truncated while reading {}", what));

        let _version = cursor.u8().ok_or_else(|| eof("version"))?;
        let profile = cursor.u8().ok_or_else(|| eof("profile"))?;
        let _compatibility = cursor.u8().ok_or_else(|| eof("compatibility"))?;
        let level = cursor.u8().ok_or_else(|| eof("level"))?;
        let nalu_length_size = (cursor.u8().ok_or_else(|| eof("length size"))? & 0x03) + 1;
        if nalu_length_size == 3 {
            return Err(Mp4Error::malformed("avcC declares a 3-byte NALU length"));
        }

        let num_sps = cursor.u8().ok_or_else(|| eof("SPS count"))? & 0x1F;
        let sps = read_parameter_sets(&mut cursor, num_sps as usize)
            .ok_or_else(|| eof("SPS"))?;
        let num_pps = cursor.u8().ok_or_else(|| eof("PPS count"))?;
        let pps = read_parameter_sets(&mut cursor, num_pps as usize)
            .ok_or_else(|| eof("PPS"))?;

        Ok(AvccConfig {
            profile,
            level,
            nalu_length_size,
            sps,
            pps,
        })
    }
}

fn read_parameter_sets(cursor: &mut ByteCursor<'_>, count: usize) -> Option<Vec<Vec<u8>>> {
    (0..count)
        .map(|_| {
            let len = cursor.u16()? as usize;
            cursor.bytes(len).map(<[u8]>::to_vec)
        })
        .collect()
}

/// Fourcc of the first sample entry in an stsd payload, e.g. `avc1`
pub fn sample_entry_codec(stsd: &[u8]) -> Option<[u8; 4]> {
    iter_boxes(stsd.get(8..)?).next().map(|entry| entry.name)
}

/// Find and parse the avcC box of the first avc1/avc3 sample entry
pub fn extract_avcc_from_stsd(stsd: &[u8]) -> Option<AvccConfig> {
    let entries = stsd.get(8..)?;
    iter_boxes(entries)
        .filter(|entry| &entry.name == b"avc1" || &entry.name == b"avc3")
        .find_map(|entry| {
            let children = entries.get(entry.start + VISUAL_SAMPLE_ENTRY_LEN..entry.end)?;
            iter_boxes(children)
                .find(|child| &child.name == b"avcC")
                .and_then(|child| AvccConfig::parse(child.payload(children)).ok())
        })
}
