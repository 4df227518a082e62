use crate::avc::{split_sample, write_annexb, NaluType};
use crate::errors::{DecodeError, GalleryResult};
use crate::mp4::AvccConfig;
use image::RgbImage;
use log::{debug, warn};
use openh264::decoder::Decoder;
use openh264::formats::YUVSource;

/// Decode a run of H.264 samples that starts at a sync sample and return
/// the picture of its final sample, the target frame.
///
/// Earlier samples only prime the decoder, so their failures are logged and
/// skipped. A target that cannot be decoded is a `DecodeError` rather than a
/// stand-in picture from earlier in the run.
pub(crate) fn decode_last_frame(
    avcc: Option<&AvccConfig>,
    samples: &[Vec<u8>],
) -> GalleryResult<RgbImage> {
    let mut decoder = Decoder::new()
        .map_err(|e| DecodeError::new(format!("Failed to create decoder: {}", e)))?;

    if let Some(config) = avcc {
        initialize_decoder_with_parameter_sets(&mut decoder, config)?;
    }
    let length_size = avcc.map_or(4, |c| c.nalu_length_size as usize);

    let target = samples.len().saturating_sub(1);
    let mut last_frame = None;
    for (i, sample) in samples.iter().enumerate() {
        let nalus: Vec<&[u8]> = split_sample(sample, length_size)
            .into_iter()
            .filter(|nalu| NaluType::of(nalu) != Some(NaluType::Aud))
            .collect();
        if !nalus.iter().any(|nalu| NaluType::of(nalu).is_some_and(|t| t.is_video())) {
            if i == target {
                return Err(DecodeError::new("target sample carries no slice data").into());
            }
            warn!("Sample {} of the run carries no slice data", i);
            continue;
        }

        let mut frame_data = Vec::with_capacity(sample.len() + 4 * nalus.len());
        write_annexb(&mut frame_data, nalus);

        match decoder.decode(&frame_data) {
            Ok(Some(yuv)) => {
                let (width, height) = yuv.dimensions();
                let mut rgb = vec![0u8; yuv.rgb8_len()];
                yuv.write_rgb8(&mut rgb);
                last_frame = RgbImage::from_raw(width as u32, height as u32, rgb);
                debug!("Decoded sample {} of the run: {}x{}", i, width, height);
            }
            Ok(None) => debug!("Decoder buffered sample {} of the run", i),
            Err(e) if i == target => {
                return Err(DecodeError::new(format!("target sample failed to decode: {}", e)).into());
            }
            Err(e) => warn!("H.264 decoding failed on sample {} of the run: {}", i, e),
        }
    }

    last_frame.ok_or_else(|| DecodeError::new("decoder returned no frame").into())
}

fn initialize_decoder_with_parameter_sets(
    decoder: &mut Decoder,
    config: &AvccConfig,
) -> GalleryResult<()> {
    let mut parameter_sets = Vec::new();
    write_annexb(
        &mut parameter_sets,
        config.sps.iter().chain(config.pps.iter()).map(Vec::as_slice),
    );
    if parameter_sets.is_empty() {
        return Ok(());
    }
    decoder.decode(&parameter_sets).map_err(|e| {
        DecodeError::new(format!("Failed to initialize decoder with SPS/PPS: {}", e))
    })?;
    Ok(())
}
