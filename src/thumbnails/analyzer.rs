use super::types::{FramePlan, SampleRange, VideoTrackInfo};
use crate::errors::{GalleryResult, Mp4Error, SourceError};
use crate::mp4::{
    extract_avcc_from_stsd, iter_boxes, parse_mdhd, parse_stco_or_co64, parse_stsc, parse_stss,
    parse_stsz, parse_stts, require_box, require_path, sample_entry_codec, sample_time,
};

/// Analyze the first video track of a moov payload taken from a file of
/// `file_len` bytes
pub(crate) fn analyze_video_track(
    moov_payload: &[u8],
    file_len: u64,
) -> GalleryResult<VideoTrackInfo> {
    let trak = find_video_trak(moov_payload)
        .ok_or_else(|| SourceError::new("no video track in file"))?;

    let mdia = require_box(trak, "mdia")?;
    let (timescale, duration) = parse_mdhd(require_box(mdia, "mdhd")?)?;
    let stbl = require_path(mdia, &["minf", "stbl"])?;
    let stsd = require_box(stbl, "stsd")?;

    let codec = sample_entry_codec(stsd)
        .ok_or_else(|| Mp4Error::malformed("stsd box has no sample entry"))?;

    Ok(VideoTrackInfo {
        timescale,
        duration,
        codec,
        sample_sizes: parse_stsz(stbl, file_len)?,
        chunk_offsets: parse_stco_or_co64(stbl)?,
        sample_to_chunk: parse_stsc(stbl)?,
        stts_entries: parse_stts(stbl)?,
        sync_samples: parse_stss(stbl)?,
        avcc: extract_avcc_from_stsd(stsd),
    })
}

/// First trak whose handler is `vide`
fn find_video_trak(moov_payload: &[u8]) -> Option<&[u8]> {
    iter_boxes(moov_payload)
        .filter(|b| &b.name == b"trak")
        .map(|b| b.payload(moov_payload))
        .find(|trak| {
            require_path(trak, &["mdia", "hdlr"])
                .map(|hdlr| hdlr.get(8..12) == Some(&b"vide"[..]))
                .unwrap_or(false)
        })
}

impl VideoTrackInfo {
    pub fn sample_count(&self) -> u32 {
        self.sample_sizes.len() as u32
    }

    pub fn is_h264(&self) -> bool {
        &self.codec == b"avc1" || &self.codec == b"avc3"
    }

    pub fn duration_secs(&self) -> Option<f64> {
        (self.timescale > 0).then(|| self.duration as f64 / self.timescale as f64)
    }

    /// Nominal frame rate from the first stts run, falling back to the
    /// average over the track duration.
    pub fn frame_rate(&self) -> Option<f64> {
        if self.timescale > 0 {
            if let Some(first) = self.stts_entries.first().filter(|e| e.sample_delta > 0) {
                return Some(self.timescale as f64 / first.sample_delta as f64);
            }
        }
        self.duration_secs()
            .filter(|secs| *secs > 0.0)
            .map(|secs| self.sample_count() as f64 / secs)
    }

    /// Index of the frame shown `secs` into playback: `round(fps * secs)`
    pub fn frame_index_at(&self, secs: f64) -> Option<u32> {
        let index = (self.frame_rate()? * secs).round();
        (index.is_finite() && index >= 0.0 && index <= u32::MAX as f64).then_some(index as u32)
    }

    /// 0-based index of the last sync sample at or before `index`
    pub fn sync_sample_at_or_before(&self, index: u32) -> u32 {
        match &self.sync_samples {
            None => index,
            Some(syncs) => syncs
                .iter()
                .filter(|&&s| s >= 1 && s - 1 <= index)
                .max()
                .map_or(0, |s| s - 1),
        }
    }

    /// File offsets of the first `limit` samples
    pub fn sample_offsets(&self, limit: u32) -> Result<Vec<u64>, Mp4Error> {
        let limit = limit.min(self.sample_count()) as usize;
        let mut offsets = Vec::with_capacity(limit);
        let chunk_count = self.chunk_offsets.len() as u32;

        for (i, run) in self.sample_to_chunk.iter().enumerate() {
            let next_first = self
                .sample_to_chunk
                .get(i + 1)
                .map_or(chunk_count + 1, |next| next.first_chunk);
            if next_first < run.first_chunk {
                return Err(Mp4Error::malformed("stsc entries are not ascending"));
            }

            for chunk in run.first_chunk..next_first {
                let mut position = *self
                    .chunk_offsets
                    .get(chunk as usize - 1)
                    .ok_or_else(|| Mp4Error::malformed(format!("chunk {} has no offset", chunk)))?;
                for _ in 0..run.samples_per_chunk {
                    if offsets.len() == limit {
                        return Ok(offsets);
                    }
                    offsets.push(position);
                    position = position
                        .checked_add(self.sample_sizes[offsets.len() - 1] as u64)
                        .ok_or_else(|| {
                            Mp4Error::malformed(format!("chunk {} runs past the 64-bit offset range", chunk))
                        })?;
                }
            }
        }

        if offsets.len() < limit {
            return Err(Mp4Error::malformed(format!(
                "sample tables map only {} of {} samples to chunks",
                offsets.len(),
                limit
            )));
        }
        Ok(offsets)
    }

    /// Samples to decode for the frame at `secs`. Videos that end before the
    /// requested position are reported as a malformed source.
    pub fn plan_frame(&self, secs: f64) -> GalleryResult<FramePlan> {
        let count = self.sample_count();
        if count == 0 {
            return Err(SourceError::new("video track has no samples").into());
        }
        let frame_rate = self
            .frame_rate()
            .ok_or_else(|| SourceError::new("video frame rate unavailable"))?;
        let target = self
            .frame_index_at(secs)
            .ok_or_else(|| SourceError::new("seek offset outside the video"))?;
        if target >= count {
            return Err(SourceError::new(format!(
                "video has {} frames at {:.2} fps, shorter than the {:.2}s seek offset",
                count, frame_rate, secs
            ))
            .into());
        }

        let start = self.sync_sample_at_or_before(target);
        let offsets = self.sample_offsets(target + 1)?;
        let ranges = (start..=target)
            .map(|index| SampleRange {
                sample_index: index,
                offset: offsets[index as usize],
                size: self.sample_sizes[index as usize],
                timestamp: sample_time(self.timescale, &self.stts_entries, index).unwrap_or(0.0),
            })
            .collect();

        Ok(FramePlan {
            target,
            start,
            frame_rate,
            ranges,
        })
    }
}
