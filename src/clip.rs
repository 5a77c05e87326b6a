//! Scene clips: a still frame with camera motion and fades over time

use crate::image_loader::{self, crop_center};
use crate::{CameraEffect, Result};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Length of the fade-in and fade-out, in seconds
pub const FADE_SECS: f64 = 0.5;

/// Zoom factor reached at the end of a zoom clip
pub const MAX_ZOOM: f64 = 1.2;

/// Horizontal shift reached at the end of a pan clip, as a fraction of frame width
pub const MAX_PAN: f64 = 0.1;

/// A time-bounded clip built from one still frame
#[derive(Debug, Clone)]
pub struct SceneClip {
    still: RgbaImage,
    duration: f64,
    camera: CameraEffect,
    narration: Option<PathBuf>,
}

impl SceneClip {
    pub fn new(still: RgbaImage, duration: f64, camera: CameraEffect) -> Self {
        if duration <= 2.0 * FADE_SECS {
            warn!(
                "Scene duration {:.2}s is not longer than both fades ({:.1}s each); fades will overlap",
                duration, FADE_SECS
            );
        }
        Self {
            still,
            duration,
            camera,
            narration: None,
        }
    }

    /// Load the still frame from disk
    pub fn load<P: AsRef<Path>>(path: P, duration: f64, camera: CameraEffect) -> Result<Self> {
        let still = image_loader::load_still(path)?;
        Ok(Self::new(still, duration, camera))
    }

    /// Attach a narration audio file to this clip
    pub fn with_narration(mut self, path: impl Into<PathBuf>) -> Self {
        self.narration = Some(path.into());
        self
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn camera(&self) -> CameraEffect {
        self.camera
    }

    pub fn narration(&self) -> Option<&Path> {
        self.narration.as_deref()
    }

    pub fn width(&self) -> u32 {
        self.still.width()
    }

    pub fn height(&self) -> u32 {
        self.still.height()
    }

    /// Render the frame shown at clip-local time `t` seconds
    pub fn frame_at(&self, t: f64) -> RgbaImage {
        let mut frame = match self.camera {
            CameraEffect::Zoom => zoom(&self.still, t, self.duration),
            CameraEffect::Pan => pan(&self.still, t, self.duration),
            CameraEffect::Static => self.still.clone(),
        };
        apply_fade(&mut frame, fade_factor(t, self.duration));
        frame
    }
}

fn progress(t: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 0.0;
    }
    (t / duration).clamp(0.0, 1.0)
}

/// Zoom factor at time `t`: 1.0 at the start, `MAX_ZOOM` at the end
pub fn zoom_factor(t: f64, duration: f64) -> f64 {
    1.0 + progress(t, duration) * (MAX_ZOOM - 1.0)
}

/// Size of the centered crop window for a zoom factor (never larger than the frame)
pub fn zoom_crop_size(width: u32, height: u32, factor: f64) -> (u32, u32) {
    let factor = factor.max(1.0);
    // Nudge before truncating so exact ratios like 1920 / 1.2 do not lose a pixel
    let w = ((width as f64 / factor + 1e-9) as u32).clamp(1, width);
    let h = ((height as f64 / factor + 1e-9) as u32).clamp(1, height);
    (w, h)
}

/// Crop a centered window shrinking with the zoom factor and scale it back up
pub fn zoom(frame: &RgbaImage, t: f64, duration: f64) -> RgbaImage {
    let (w, h) = frame.dimensions();
    let (cw, ch) = zoom_crop_size(w, h, zoom_factor(t, duration));
    if (cw, ch) == (w, h) {
        return frame.clone();
    }
    let cropped = crop_center(frame, cw, ch);
    imageops::resize(&cropped, w, h, FilterType::Lanczos3)
}

/// Horizontal pan shift in pixels at time `t`
pub fn pan_shift(t: f64, duration: f64, width: u32) -> u32 {
    (progress(t, duration) * width as f64 * MAX_PAN) as u32
}

/// Rotate every row left by the pan shift; columns wrap around so nothing is lost
pub fn pan(frame: &RgbaImage, t: f64, duration: f64) -> RgbaImage {
    let width = frame.width();
    let shift = pan_shift(t, duration, width) % width.max(1);
    let mut out = frame.clone();
    if shift > 0 {
        let row_len = width as usize * 4;
        for row in out.chunks_exact_mut(row_len) {
            row.rotate_left(shift as usize * 4);
        }
    }
    out
}

/// Brightness multiplier of the fade envelope at time `t`
pub fn fade_factor(t: f64, duration: f64) -> f64 {
    let fade_in = (t / FADE_SECS).clamp(0.0, 1.0);
    let fade_out = ((duration - t) / FADE_SECS).clamp(0.0, 1.0);
    fade_in * fade_out
}

/// Scale RGB toward black by `factor`
pub fn apply_fade(frame: &mut RgbaImage, factor: f64) {
    if factor >= 1.0 {
        return;
    }
    let factor = factor.max(0.0) as f32;
    for pixel in frame.pixels_mut() {
        for c in pixel.0.iter_mut().take(3) {
            *c = (*c as f32 * factor).round() as u8;
        }
    }
}
