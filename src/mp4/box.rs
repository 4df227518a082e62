use crate::bytes::ByteCursor;
use crate::errors::Mp4Error;

/// Location of one box inside a parent payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxRef {
    pub name: [u8; 4],
    /// Offset of the size field
    pub start: usize,
    /// Offset of the first payload byte
    pub payload_start: usize,
    /// One past the last payload byte
    pub end: usize,
}

impl BoxRef {
    pub fn name_str(&self) -> &str {
        std::str::from_utf8(&self.name).unwrap_or("????")
    }

    pub fn payload<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.payload_start..self.end]
    }
}

/// Parse the box header found at `start`.
/// A size of 0 extends the box to the end of `data`; a size of 1 means a
/// 64-bit size follows the name.
pub fn parse_box_header(data: &[u8], start: usize) -> Option<BoxRef> {
    let mut cursor = ByteCursor::new(data.get(start..)?);
    let size32 = cursor.u32()?;
    let name: [u8; 4] = cursor.bytes(4)?.try_into().ok()?;

    let size = match size32 {
        0 => (data.len() - start) as u64,
        1 => cursor.u64()?,
        n => n as u64,
    };

    let header_len = cursor.position();
    if size < header_len as u64 || size > (data.len() - start) as u64 {
        return None;
    }

    Some(BoxRef {
        name,
        start,
        payload_start: start + header_len,
        end: start + size as usize,
    })
}

/// Iterator over sibling boxes; stops at the first malformed header
pub struct BoxIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Iterator for BoxIter<'a> {
    type Item = BoxRef;

    fn next(&mut self) -> Option<BoxRef> {
        if self.pos + 8 > self.data.len() {
            return None;
        }
        let found = parse_box_header(self.data, self.pos)?;
        self.pos = found.end;
        Some(found)
    }
}

pub fn iter_boxes(data: &[u8]) -> BoxIter<'_> {
    BoxIter { data, pos: 0 }
}

/// Find a box and return the start and end indices of its payload
pub fn find_box_range(data: &[u8], name: &str) -> Option<(usize, usize)> {
    iter_boxes(data)
        .find(|b| &b.name == name.as_bytes())
        .map(|b| (b.payload_start, b.end))
}

/// Find a box and return the contained slice
pub fn find_box<'a>(data: &'a [u8], name: &str) -> Option<&'a [u8]> {
    let (start, end) = find_box_range(data, name)?;
    Some(&data[start..end])
}

/// Like [`find_box`], but a missing box is an error.
pub fn require_box<'a>(data: &'a [u8], name: &'static str) -> Result<&'a [u8], Mp4Error> {
    find_box(data, name).ok_or(Mp4Error::MissingBox { name })
}

/// Walk a path of nested boxes, e.g. `["mdia", "minf", "stbl"]`.
pub fn require_path<'a>(data: &'a [u8], path: &[&'static str]) -> Result<&'a [u8], Mp4Error> {
    path.iter()
        .try_fold(data, |parent, name| require_box(parent, *name))
}

/// Entries of a full box table: skips version/flags, reads the u32 entry
/// count and checks that `count * entry_size` bytes follow.
pub fn table_entries<'a>(
    payload: &'a [u8],
    name: &str,
    header_extra: usize,
    entry_size: usize,
) -> Result<(u32, &'a [u8]), Mp4Error> {
    let mut cursor = ByteCursor::new(payload);
    cursor
        .skip(4 + header_extra)
        .ok_or_else(|| Mp4Error::malformed(format!("{} box too small", name)))?;
    let count = cursor
        .u32()
        .ok_or_else(|| Mp4Error::malformed(format!("{} box has no entry count", name)))?;
    let needed = (count as usize).saturating_mul(entry_size);
    let entries = cursor.bytes(needed).ok_or_else(|| {
        Mp4Error::malformed(format!(
            "{} box too small for {} entries: need {} bytes, have {}",
            name,
            count,
            needed,
            cursor.remaining()
        ))
    })?;
    Ok((count, entries))
}

/// Write a box header to a vector
pub fn write_box_header(output: &mut Vec<u8>, name: &str, size: u32) {
    output.extend_from_slice(&size.to_be_bytes());
    output.extend_from_slice(name.as_bytes());
}
