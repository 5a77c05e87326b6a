//! Audio buffers, decoding and mixing for the final soundtrack

pub mod decode;
pub mod mix;

pub use decode::decode_audio;
pub use mix::{fit_to_frames, mix_into, AudioTrack};

/// Sample rate all audio is converted to before mixing
pub const MIX_SAMPLE_RATE: u32 = 48_000;

/// Channel count all audio is converted to before mixing
pub const MIX_CHANNELS: u16 = 2;

/// Interleaved f32 PCM
#[derive(Debug, Clone, PartialEq)]
pub struct AudioPcm {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<f32>,
}

impl AudioPcm {
    /// Silent buffer of `frames` sample frames at the mix format
    pub fn silence(frames: usize) -> Self {
        Self {
            sample_rate: MIX_SAMPLE_RATE,
            channels: MIX_CHANNELS,
            samples: vec![0.0; frames * MIX_CHANNELS as usize],
        }
    }

    /// Number of sample frames (one sample per channel)
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Multiply every sample by `gain`
    pub fn scale(&mut self, gain: f32) {
        for s in &mut self.samples {
            *s *= gain;
        }
    }
}

/// Number of sample frames covering `secs` seconds at `sample_rate`
pub fn secs_to_frames(secs: f64, sample_rate: u32) -> usize {
    (secs.max(0.0) * sample_rate as f64).round() as usize
}
