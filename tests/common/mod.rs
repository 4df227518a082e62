#![allow(dead_code)]

use image::{DynamicImage, ImageOutputFormat, RgbImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use vidgallery::GalleryConfig;

/// First IDR picture of a small H.264 stream, NAL header included
const IDR_NALU: [u8; 89] = [
    0x65, 0x88, 0x84, 0x00, 0x2b, 0xff, 0xfe, 0xf5, 0x27, 0xf8, 0x14, 0xd5, 0x08, 0x44, 0x4b,
    0xe1, 0x6b, 0x61, 0xed, 0xd4, 0xb7, 0x49, 0x30, 0xd1, 0x70, 0xb1, 0x2d, 0xb3, 0xd0, 0x00,
    0x00, 0x03, 0x00, 0x00, 0x03, 0x00, 0x00, 0x18, 0xee, 0xec, 0x61, 0x1a, 0x66, 0xb1, 0x3e,
    0x51, 0xb0, 0xa0, 0x00, 0x00, 0x03, 0x00, 0x5e, 0x40, 0x17, 0xe0, 0x9a, 0x85, 0xa4, 0x3e,
    0x43, 0xb0, 0x35, 0x43, 0xc0, 0x50, 0xc7, 0x58, 0xa7, 0x10, 0x02, 0x04, 0x00, 0x00, 0x03,
    0x00, 0x00, 0x03, 0x00, 0x00, 0x03, 0x00, 0x00, 0x03, 0x00, 0x00, 0x03, 0x02, 0xdf,
];

const SPS: [u8; 28] = [
    0x67, 0x4d, 0x40, 0x1e, 0xec, 0xc0, 0x50, 0x17, 0xfc, 0xb8, 0x0b, 0x50, 0x10, 0x10, 0x14,
    0x00, 0x00, 0x03, 0x01, 0xf4, 0x00, 0x00, 0x5d, 0xa8, 0x3c, 0x58, 0xb6, 0x68,
];

const PPS: [u8; 5] = [0x68, 0xe9, 0x79, 0xcb, 0x20];

/// Media timescale of generated files; 512 ticks per frame is 30 fps
const TIMESCALE: u32 = 15360;
const FRAME_DELTA: u32 = 512;

/// Layout options for a generated MP4 file
#[derive(Debug, Clone, Copy)]
pub struct Mp4Layout {
    pub frames: u32,
    /// `moov` ahead of `mdat`
    pub faststart: bool,
}

impl Mp4Layout {
    pub fn frames(frames: u32) -> Self {
        Self {
            frames,
            faststart: false,
        }
    }
}

fn mp4_box(name: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
    out.extend_from_slice(name);
    out.extend_from_slice(payload);
    out
}

fn full_box(name: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut payload = vec![0u8; 4];
    payload.extend_from_slice(body);
    mp4_box(name, &payload)
}

fn table(name: &[u8; 4], entries: &[Vec<u32>]) -> Vec<u8> {
    let mut body = (entries.len() as u32).to_be_bytes().to_vec();
    for entry in entries {
        for value in entry {
            body.extend_from_slice(&value.to_be_bytes());
        }
    }
    full_box(name, &body)
}

/// One sample: the IDR slice behind a 4-byte length prefix
fn sample() -> Vec<u8> {
    let mut out = (IDR_NALU.len() as u32).to_be_bytes().to_vec();
    out.extend_from_slice(&IDR_NALU);
    out
}

fn avc1_entry() -> Vec<u8> {
    let mut avcc = vec![1, SPS[1], SPS[2], SPS[3], 0xff, 0xe1];
    avcc.extend_from_slice(&(SPS.len() as u16).to_be_bytes());
    avcc.extend_from_slice(&SPS);
    avcc.push(1);
    avcc.extend_from_slice(&(PPS.len() as u16).to_be_bytes());
    avcc.extend_from_slice(&PPS);

    let mut entry = vec![0u8; 6];
    entry.extend_from_slice(&1u16.to_be_bytes()); // data reference index
    entry.extend_from_slice(&[0u8; 16]);
    entry.extend_from_slice(&160u16.to_be_bytes());
    entry.extend_from_slice(&96u16.to_be_bytes());
    entry.extend_from_slice(&0x0048_0000u32.to_be_bytes());
    entry.extend_from_slice(&0x0048_0000u32.to_be_bytes());
    entry.extend_from_slice(&[0u8; 4]);
    entry.extend_from_slice(&1u16.to_be_bytes()); // frame count
    entry.extend_from_slice(&[0u8; 32]);
    entry.extend_from_slice(&0x0018u16.to_be_bytes());
    entry.extend_from_slice(&0xffffu16.to_be_bytes());
    entry.extend_from_slice(&mp4_box(b"avcC", &avcc));
    mp4_box(b"avc1", &entry)
}

fn moov(frames: u32, first_sample_offset: u32) -> Vec<u8> {
    let sample_len = sample().len() as u32;
    let duration = frames * FRAME_DELTA;

    let mut mvhd = vec![0u8; 8];
    mvhd.extend_from_slice(&TIMESCALE.to_be_bytes());
    mvhd.extend_from_slice(&duration.to_be_bytes());
    mvhd.resize(96, 0);

    let mut mdhd = vec![0u8; 8];
    mdhd.extend_from_slice(&TIMESCALE.to_be_bytes());
    mdhd.extend_from_slice(&duration.to_be_bytes());
    mdhd.extend_from_slice(&[0x55, 0xc4, 0, 0]);

    let mut hdlr = vec![0u8; 4];
    hdlr.extend_from_slice(b"vide");
    hdlr.extend_from_slice(&[0u8; 12]);
    hdlr.extend_from_slice(b"VideoHandler\0");

    let mut stsd = 1u32.to_be_bytes().to_vec();
    stsd.extend_from_slice(&avc1_entry());

    let mut stsz = 0u32.to_be_bytes().to_vec();
    stsz.extend_from_slice(&frames.to_be_bytes());
    for _ in 0..frames {
        stsz.extend_from_slice(&sample_len.to_be_bytes());
    }

    let stbl = [
        full_box(b"stsd", &stsd),
        table(b"stts", &[vec![frames, FRAME_DELTA]]),
        table(b"stss", &(1..=frames).map(|n| vec![n]).collect::<Vec<_>>()),
        table(b"stsc", &[vec![1, 1, 1]]),
        full_box(b"stsz", &stsz),
        table(
            b"stco",
            &(0..frames)
                .map(|i| vec![first_sample_offset + i * sample_len])
                .collect::<Vec<_>>(),
        ),
    ]
    .concat();

    let minf = mp4_box(b"minf", &mp4_box(b"stbl", &stbl));
    let mdia = mp4_box(
        b"mdia",
        &[full_box(b"mdhd", &mdhd), full_box(b"hdlr", &hdlr), minf].concat(),
    );
    let trak = mp4_box(b"trak", &mdia);
    mp4_box(b"moov", &[full_box(b"mvhd", &mvhd), trak].concat())
}

/// Build a playable single-track H.264 MP4 whose frames are all keyframes
pub fn build_mp4(layout: Mp4Layout) -> Vec<u8> {
    let ftyp = mp4_box(b"ftyp", b"isom\0\0\x02\0isomavc1");
    let mdat = mp4_box(b"mdat", &sample().repeat(layout.frames as usize));

    if layout.faststart {
        let moov_len = moov(layout.frames, 0).len();
        let first = (ftyp.len() + moov_len + 8) as u32;
        [ftyp, moov(layout.frames, first), mdat].concat()
    } else {
        let first = (ftyp.len() + 8) as u32;
        let moov = moov(layout.frames, first);
        [ftyp, mdat, moov].concat()
    }
}

pub fn write_mp4(dir: &Path, name: &str, layout: Mp4Layout) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_mp4(layout)).unwrap();
    path
}

/// Config whose stores live under `dir`, with both directories created
pub fn test_config(dir: &TempDir) -> GalleryConfig {
    let config = GalleryConfig {
        upload_dir: dir.path().join("uploads"),
        thumbnail_dir: dir.path().join("thumbnails"),
        http_timeout_secs: 1,
        ..GalleryConfig::default()
    };
    config.ensure_dirs().unwrap();
    config
}

/// Config that sends thumbnail and oEmbed requests to a mock server
pub fn remote_config(dir: &TempDir, server_uri: &str) -> GalleryConfig {
    GalleryConfig {
        thumbnail_base_url: format!("{}/vi", server_uri),
        oembed_url: format!("{}/oembed", server_uri),
        ..test_config(dir)
    }
}

pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| image::Rgb([x as u8, y as u8, 128]));
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut cursor, ImageOutputFormat::Png)
        .unwrap();
    cursor.into_inner()
}
