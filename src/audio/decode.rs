//! Audio decoding through an ffmpeg process

use super::{AudioPcm, MIX_CHANNELS, MIX_SAMPLE_RATE};
use crate::{Error, Result};
use std::path::Path;
use std::process::Command;

/// Decode any audio file ffmpeg understands to interleaved stereo f32 at the mix rate
pub fn decode_audio<P: AsRef<Path>>(path: P, ffmpeg: &str) -> Result<AudioPcm> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::Decode(format!(
            "audio file not found: {}",
            path.display()
        )));
    }

    let output = Command::new(ffmpeg)
        .args(["-v", "error", "-i"])
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            &MIX_CHANNELS.to_string(),
            "-ar",
            &MIX_SAMPLE_RATE.to_string(),
            "pipe:1",
        ])
        .output()
        .map_err(|e| Error::Ffmpeg(format!("Failed to run ffmpeg for audio decode: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Decode(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            stderr.trim()
        )));
    }

    Ok(AudioPcm {
        sample_rate: MIX_SAMPLE_RATE,
        channels: MIX_CHANNELS,
        samples: parse_f32le(&output.stdout)?,
    })
}

/// Parse little-endian f32 samples
pub fn parse_f32le(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(Error::Decode(
            "decoded audio byte length is not aligned to f32 samples".to_string(),
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}
