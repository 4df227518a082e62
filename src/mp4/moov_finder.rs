use crate::errors::{GalleryResult, Mp4Error};
use crate::streams::SeekableStream;
use log::debug;
use std::io::SeekFrom;

/// Upper bound on a moov payload we are willing to buffer (64 MiB)
const MAX_MOOV_SIZE: u64 = 64 * 1024 * 1024;

/// Result of finding a moov box
#[derive(Debug, Clone, PartialEq)]
pub struct MoovBoxInfo {
    pub position: u64,
    pub size: u64,
    pub header_size: u64,
}

/// Walk the top-level boxes of the file until moov is found.
/// Handles `moov` after `mdat` (non-faststart files) by skipping over box
/// payloads instead of reading them.
pub async fn find_moov_box<S: SeekableStream + ?Sized>(stream: &mut S) -> GalleryResult<MoovBoxInfo> {
    let file_size = stream.len().await?;
    let mut position = 0u64;

    while position + 8 <= file_size {
        stream.seek(SeekFrom::Start(position)).await?;
        let mut header = [0u8; 8];
        stream.read_exact(&mut header).await?;

        let size32 = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
        let (size, header_size) = match size32 {
            0 => (file_size - position, 8),
            1 => {
                let mut large = [0u8; 8];
                stream.read_exact(&mut large).await?;
                (u64::from_be_bytes(large), 16)
            }
            n => (n as u64, 8),
        };

        let end = position
            .checked_add(size)
            .filter(|end| size >= header_size && *end <= file_size);
        let Some(end) = end else {
            return Err(Mp4Error::malformed(format!(
                "top-level box '{}' at {} has invalid size {}",
                String::from_utf8_lossy(&header[4..8]),
                position,
                size
            ))
            .into());
        };

        if &header[4..8] == b"moov" {
            debug!("Found moov box at {} ({} bytes)", position, size);
            return Ok(MoovBoxInfo {
                position,
                size,
                header_size,
            });
        }

        position = end;
    }

    Err(Mp4Error::MissingBox { name: "moov" }.into())
}

/// Find moov box and read its payload data (header stripped)
pub async fn find_and_read_moov_box<S: SeekableStream + ?Sized>(stream: &mut S) -> GalleryResult<Vec<u8>> {
    let moov = find_moov_box(stream).await?;
    let payload_len = moov.size - moov.header_size;
    if payload_len > MAX_MOOV_SIZE {
        return Err(Mp4Error::malformed(format!("moov box too large: {} bytes", payload_len)).into());
    }
    Ok(stream
        .read_range(moov.position + moov.header_size, payload_len as usize)
        .await?)
}
