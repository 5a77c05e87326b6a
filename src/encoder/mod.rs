//! Video encoders

pub mod ffmpeg;

use crate::{Error, Result};
use std::path::PathBuf;

/// Raw video frame in RGBA format
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// RGBA pixel data (width * height * 4 bytes)
    pub data: Vec<u8>,
}

/// Raw PCM soundtrack muxed alongside the video
#[derive(Debug, Clone)]
pub struct AudioInput {
    /// Path to interleaved little-endian f32 samples
    pub path: PathBuf,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Video encoder trait
pub trait Encoder: Send {
    /// Encode a frame
    fn encode(&mut self, frame: &Frame) -> Result<()>;

    /// Flush remaining data and close the output file
    fn finish(self: Box<Self>) -> Result<()>;
}

/// Encoder configuration
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Frame rate (frames per second)
    pub fps: u32,
    /// Quality (0-100)
    pub quality: u8,
    /// Output container path
    pub output_path: PathBuf,
    /// Soundtrack; `None` writes a video-only file
    pub audio: Option<AudioInput>,
    /// Path to ffmpeg executable
    pub ffmpeg_path: Option<String>,
}

impl EncoderConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidInput(
                "encode width/height must be non-zero".to_string(),
            ));
        }
        if self.width % 2 != 0 || self.height % 2 != 0 {
            return Err(Error::InvalidInput(
                "encode width/height must be even (required for yuv420p output)".to_string(),
            ));
        }
        if self.fps == 0 {
            return Err(Error::InvalidInput("encode fps must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Map quality (0-100) to x264 CRF (51-0)
    pub fn crf(&self) -> u32 {
        ((100 - self.quality.min(100)) as u32 * 51) / 100
    }
}

/// Create the ffmpeg-backed H.264/AAC encoder
pub fn create_encoder(config: EncoderConfig) -> Result<Box<dyn Encoder>> {
    config.validate()?;
    Ok(Box::new(ffmpeg::FfmpegEncoder::new(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(width: u32, height: u32, fps: u32, quality: u8) -> EncoderConfig {
        EncoderConfig {
            width,
            height,
            fps,
            quality,
            output_path: PathBuf::from("out.mp4"),
            audio: None,
            ffmpeg_path: None,
        }
    }

    #[test]
    fn test_validation_catches_bad_values() {
        assert!(config(0, 10, 24, 50).validate().is_err());
        assert!(config(11, 10, 24, 50).validate().is_err());
        assert!(config(10, 10, 0, 50).validate().is_err());
        assert!(config(10, 10, 24, 50).validate().is_ok());
    }

    #[test]
    fn test_quality_to_crf() {
        assert_eq!(config(2, 2, 24, 100).crf(), 0);
        assert_eq!(config(2, 2, 24, 0).crf(), 51);
        assert_eq!(config(2, 2, 24, 75).crf(), 12);
        assert_eq!(config(2, 2, 24, 255).crf(), 0);
    }
}
