//! Soundtrack assembly: placing narration, fitting music, summing layers

use super::{secs_to_frames, AudioPcm, MIX_CHANNELS, MIX_SAMPLE_RATE};
use crate::{Error, Result};
use std::path::Path;

/// Loop `pcm` when shorter than `frames`, trim it when longer.
///
/// The result always holds exactly `frames` sample frames.
pub fn fit_to_frames(pcm: &AudioPcm, frames: usize) -> Result<AudioPcm> {
    if pcm.is_empty() || pcm.channels == 0 {
        return Err(Error::Decode("audio contains no samples".to_string()));
    }

    let len = frames * pcm.channels as usize;
    let samples = pcm.samples.iter().copied().cycle().take(len).collect();

    Ok(AudioPcm {
        sample_rate: pcm.sample_rate,
        channels: pcm.channels,
        samples,
    })
}

/// Add `src` into `dst` starting at `offset` frames, for at most `max_frames` frames.
///
/// Samples past the end of `dst` are dropped. Both buffers must share a channel count.
pub fn mix_into(dst: &mut AudioPcm, src: &AudioPcm, offset: usize, max_frames: Option<usize>) {
    if dst.channels != src.channels || dst.channels == 0 {
        return;
    }
    let channels = dst.channels as usize;
    let frames = max_frames.map_or(src.frames(), |m| m.min(src.frames()));
    let start = offset * channels;
    if start >= dst.samples.len() {
        return;
    }

    let end = (start + frames * channels).min(dst.samples.len());
    for (d, s) in dst.samples[start..end].iter_mut().zip(&src.samples) {
        *d += *s;
    }
}

/// Soundtrack spanning the whole timeline
#[derive(Debug, Clone)]
pub struct AudioTrack {
    mix: AudioPcm,
    layers: usize,
}

impl AudioTrack {
    /// Silent track of `duration_secs` at the mix format
    pub fn new(duration_secs: f64) -> Self {
        Self {
            mix: AudioPcm::silence(secs_to_frames(duration_secs, MIX_SAMPLE_RATE)),
            layers: 0,
        }
    }

    /// Number of sample frames in the track
    pub fn frames(&self) -> usize {
        self.mix.frames()
    }

    pub fn duration_secs(&self) -> f64 {
        self.mix.duration_secs()
    }

    /// Number of layers mixed in so far
    pub fn layers(&self) -> usize {
        self.layers
    }

    /// Place a clip-bound layer (narration) at `start_secs`, cut at `max_secs`
    pub fn place(&mut self, pcm: &AudioPcm, start_secs: f64, max_secs: f64) {
        let offset = secs_to_frames(start_secs, MIX_SAMPLE_RATE);
        let max_frames = secs_to_frames(max_secs, MIX_SAMPLE_RATE);
        mix_into(&mut self.mix, pcm, offset, Some(max_frames));
        self.layers += 1;
    }

    /// Loop or trim a layer (background music) to the whole track, scaled by `volume`
    pub fn add_fitted(&mut self, pcm: &AudioPcm, volume: f32) -> Result<()> {
        if pcm.channels != MIX_CHANNELS || pcm.sample_rate != MIX_SAMPLE_RATE {
            return Err(Error::Decode(format!(
                "expected {} Hz / {} channel audio, got {} Hz / {} channels",
                MIX_SAMPLE_RATE, MIX_CHANNELS, pcm.sample_rate, pcm.channels
            )));
        }
        let mut fitted = fit_to_frames(pcm, self.frames())?;
        fitted.scale(volume);
        mix_into(&mut self.mix, &fitted, 0, None);
        self.layers += 1;
        Ok(())
    }

    /// The clamped mix, or `None` if nothing was ever added
    pub fn finish(mut self) -> Option<AudioPcm> {
        if self.layers == 0 {
            return None;
        }
        for s in &mut self.mix.samples {
            *s = s.clamp(-1.0, 1.0);
        }
        Some(self.mix)
    }
}

/// Write samples as raw little-endian f32 for ffmpeg to read back
pub fn write_f32le(pcm: &AudioPcm, out_path: &Path) -> Result<()> {
    let mut bytes = Vec::with_capacity(pcm.samples.len() * 4);
    for &sample in &pcm.samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes)?;
    Ok(())
}
