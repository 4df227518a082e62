/// H.264 NAL unit types the frame decoder cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaluType {
    NonIdr,
    Idr,
    Sei,
    Sps,
    Pps,
    Aud,
    Other(u8),
}

impl NaluType {
    pub fn from_header_byte(b: u8) -> Self {
        match b & 0x1f {
            1 => NaluType::NonIdr,
            5 => NaluType::Idr,
            6 => NaluType::Sei,
            7 => NaluType::Sps,
            8 => NaluType::Pps,
            9 => NaluType::Aud,
            v => NaluType::Other(v),
        }
    }

    pub fn of(nalu: &[u8]) -> Option<Self> {
        nalu.first().map(|&b| Self::from_header_byte(b))
    }

    pub fn is_video(&self) -> bool {
        matches!(self, NaluType::NonIdr | NaluType::Idr)
    }

    pub fn is_parameter_set(&self) -> bool {
        matches!(self, NaluType::Sps | NaluType::Pps)
    }
}

/// Split a sample whose NAL units carry a big-endian length prefix of
/// `length_size` bytes. Returns `None` unless the prefixes tile the sample
/// exactly.
pub fn split_length_prefixed(sample: &[u8], length_size: usize) -> Option<Vec<&[u8]>> {
    if !matches!(length_size, 1 | 2 | 4) || sample.is_empty() {
        return None;
    }
    let mut nalus = Vec::new();
    let mut pos = 0usize;
    while pos < sample.len() {
        let prefix = sample.get(pos..pos + length_size)?;
        let len = prefix.iter().fold(0usize, |acc, &b| (acc << 8) | b as usize);
        pos += length_size;
        let nalu = sample.get(pos..pos.checked_add(len)?)?;
        if !nalu.is_empty() {
            nalus.push(nalu);
        }
        pos += len;
    }
    Some(nalus)
}

/// Split an Annex B bytestream on 3- and 4-byte start codes
pub fn split_annexb(stream: &[u8]) -> Vec<&[u8]> {
    let mut starts = Vec::new();
    let mut i = 0usize;
    while i + 3 <= stream.len() {
        if stream[i] == 0 && stream[i + 1] == 0 && stream[i + 2] == 1 {
            starts.push((i, i + 3));
            i += 3;
        } else {
            i += 1;
        }
    }

    let mut nalus = Vec::with_capacity(starts.len());
    for (n, &(_, payload_start)) in starts.iter().enumerate() {
        let mut end = starts.get(n + 1).map_or(stream.len(), |&(code, _)| code);
        // trailing zero of a 4-byte start code belongs to the next unit
        while end > payload_start && stream[end - 1] == 0 {
            end -= 1;
        }
        if end > payload_start {
            nalus.push(&stream[payload_start..end]);
        }
    }
    nalus
}

/// NAL units of an MP4 sample: length-prefixed first, Annex B as fallback
pub fn split_sample(sample: &[u8], length_size: usize) -> Vec<&[u8]> {
    split_length_prefixed(sample, length_size).unwrap_or_else(|| split_annexb(sample))
}

/// Append NAL units to `out` with 4-byte start codes
pub fn write_annexb<'a, I>(out: &mut Vec<u8>, nalus: I)
where
    I: IntoIterator<Item = &'a [u8]>,
{
    for nalu in nalus {
        out.extend_from_slice(&[0, 0, 0, 1]);
        out.extend_from_slice(nalu);
    }
}
