//! Common test utilities

#![allow(dead_code)]

use hound::{SampleFormat, WavSpec, WavWriter};
use image::{ImageBuffer, Rgba, RgbaImage};
use mp4::TrackType;
use std::path::Path;

/// Generate a test image with a solid color and a subtle gradient
pub fn generate_test_image(width: u32, height: u32, base_color: [u8; 4]) -> RgbaImage {
    let mut img = ImageBuffer::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let r = base_color[0].saturating_add((x % 50) as u8);
        let g = base_color[1].saturating_add((y % 50) as u8);
        let b = base_color[2];
        let a = base_color[3];
        *pixel = Rgba([r, g, b, a]);
    }

    img
}

/// Save a test image as JPEG
pub fn save_jpeg<P: AsRef<Path>>(img: &RgbaImage, path: P, quality: u8) -> std::io::Result<()> {
    let rgb_img: image::RgbImage = image::DynamicImage::ImageRgba8(img.clone()).to_rgb8();

    let file = std::fs::File::create(path)?;
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(file, quality);
    encoder
        .encode_image(&rgb_img)
        .map_err(std::io::Error::other)?;

    Ok(())
}

/// Save a test image as PNG
pub fn save_png<P: AsRef<Path>>(img: &RgbaImage, path: P) -> std::io::Result<()> {
    img.save(path).map_err(std::io::Error::other)
}

/// Write a mono 16-bit PCM WAV file containing a sine tone
pub fn write_sine_wav<P: AsRef<Path>>(path: P, secs: f64, freq: f64) -> hound::Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 44_100,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let frames = (secs * spec.sample_rate as f64).round() as u32;

    let mut writer = WavWriter::create(path, spec)?;
    for i in 0..frames {
        let t = i as f64 / spec.sample_rate as f64;
        let sample = 0.5 * (2.0 * std::f64::consts::PI * freq * t).sin() * i16::MAX as f64;
        writer.write_sample(sample as i16)?;
    }
    writer.finalize()
}

/// Whether ffmpeg with libx264 and aac is installed; prints a skip notice when not
pub fn ffmpeg_available() -> bool {
    match promptreel::available(None) {
        Ok(()) => true,
        Err(e) => {
            println!("Skipping: {}", e);
            false
        }
    }
}

/// Verify that a file exists and has non-zero size
pub fn verify_file_exists_with_size<P: AsRef<Path>>(path: P) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) => meta.len() > 0,
        Err(_) => false,
    }
}

/// What an exported MP4 contains
#[derive(Debug)]
pub struct Mp4Summary {
    pub width: u16,
    pub height: u16,
    pub video_secs: Option<f64>,
    pub audio_secs: Option<f64>,
}

/// Read track layout and durations of an MP4 file
pub fn inspect_mp4<P: AsRef<Path>>(path: P) -> Mp4Summary {
    let file = std::fs::File::open(path).unwrap();
    let reader = mp4::read_mp4(file).unwrap();

    let mut summary = Mp4Summary {
        width: 0,
        height: 0,
        video_secs: None,
        audio_secs: None,
    };

    for track in reader.tracks().values() {
        match track.track_type().unwrap() {
            TrackType::Video => {
                summary.width = track.width();
                summary.height = track.height();
                summary.video_secs = Some(track.duration().as_secs_f64());
            }
            TrackType::Audio => {
                summary.audio_secs = Some(track.duration().as_secs_f64());
            }
            _ => {}
        }
    }

    summary
}

/// Assert two durations agree within `tolerance` seconds
pub fn assert_secs_near(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {:.3}s (+/- {:.3}), got {:.3}s",
        expected,
        tolerance,
        actual
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::WavReader;
    use tempfile::TempDir;

    #[test]
    fn test_generate_test_image() {
        let img = generate_test_image(100, 100, [255, 0, 0, 255]);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 100);
    }

    #[test]
    fn test_write_sine_wav() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tone.wav");
        write_sine_wav(&path, 1.0, 440.0).unwrap();

        let reader = WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.spec().sample_rate, 44_100);
        assert_eq!(reader.len(), 44_100);
    }
}
