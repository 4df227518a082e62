use crate::errors::{GalleryResult, SourceError};
use crate::streams::SeekableStream;
use serde::Serialize;
use std::io::SeekFrom;

/// Container format detected from the file header
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ContainerFormat {
    MP4,
    M4V,
    ThreeGP,
    ThreeG2,
    MOV,
    Unknown(String),
}

impl ContainerFormat {
    pub fn name(&self) -> &str {
        match self {
            ContainerFormat::MP4 => "MP4",
            ContainerFormat::M4V => "M4V",
            ContainerFormat::ThreeGP => "3GP",
            ContainerFormat::ThreeG2 => "3G2",
            ContainerFormat::MOV => "MOV",
            ContainerFormat::Unknown(s) => s,
        }
    }

    pub fn is_mp4_family(&self) -> bool {
        !matches!(self, ContainerFormat::Unknown(_))
    }
}

/// Read the leading ftyp box and classify the container.
/// Files without an ftyp box (Matroska, AVI, FLV, MP3, ...) are not
/// supported and report a malformed source.
pub async fn detect_format<S: SeekableStream + ?Sized>(
    stream: &mut S,
) -> GalleryResult<ContainerFormat> {
    let mut header = [0u8; 12];
    stream.seek(SeekFrom::Start(0)).await?;
    stream.read_exact(&mut header).await.map_err(|e| {
        SourceError::new(format!("file too short to hold a container header: {}", e))
    })?;

    match &header[4..8] {
        b"ftyp" => Ok(parse_ftyp_brand(&header[8..12])),
        // QuickTime files predating ftyp start with a moov/mdat/wide box
        b"moov" | b"mdat" | b"wide" => Ok(ContainerFormat::MOV),
        _ => Err(SourceError::new(format!(
            "unsupported container: no ftyp box (leading bytes {:02X?})",
            &header[..8]
        ))
        .into()),
    }
}

/// Map an ftyp major brand to a container format
pub fn parse_ftyp_brand(major_brand: &[u8]) -> ContainerFormat {
    match major_brand {
        b"isom" | b"mp41" | b"mp42" | b"iso2" | b"iso4" | b"iso5" | b"iso6" | b"avc1" | b"dash" => {
            ContainerFormat::MP4
        }
        b"M4V " | b"M4VH" | b"M4VP" => ContainerFormat::M4V,
        b"3gp4" | b"3gp5" | b"3gp6" | b"3gp7" | b"3ge6" | b"3ge7" | b"3gg6" => {
            ContainerFormat::ThreeGP
        }
        b"3g2a" | b"3g2b" | b"3g2c" => ContainerFormat::ThreeG2,
        b"qt  " => ContainerFormat::MOV,
        other => ContainerFormat::Unknown(String::from_utf8_lossy(other).into_owned()),
    }
}
