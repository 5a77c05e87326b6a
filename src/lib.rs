//! promptreel - Procedural slideshow video generation
//!
//! Turns a list of text prompts into a short video:
//! - each prompt becomes a colored still frame with outlined captions
//! - frames get a background effect and a camera motion with fades
//! - optional narration and looped background music are mixed in
//! - the timeline is exported through an external ffmpeg process

pub mod assembler;
pub mod audio;
pub mod clip;
pub mod effects;
pub mod encoder;
pub mod error;
pub mod font;
pub mod generator;
pub mod image_loader;
pub mod narration;
pub mod scene_image;
pub mod text;

pub use assembler::assemble;
pub use clip::SceneClip;
pub use error::{Error, Result};
pub use generator::{GeneratorConfig, VideoGenerator, VideoRequest};
pub use narration::{Narrator, VoiceSettings};

/// Output frame rate of exported videos
pub const DEFAULT_FPS: u32 = 24;

/// RGB color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Opaque RGBA pixel of this color
    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 255])
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Background filter applied to a still frame before captions are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualEffect {
    #[default]
    None,
    Blur,
    Gradient,
    Vignette,
}

impl VisualEffect {
    /// Parse an effect name. Unknown names map to `None`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "blur" => VisualEffect::Blur,
            "gradient" => VisualEffect::Gradient,
            "vignette" => VisualEffect::Vignette,
            _ => VisualEffect::None,
        }
    }
}

/// Time-varying transform applied to every output frame of a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraEffect {
    #[default]
    Zoom,
    Pan,
    Static,
}

impl CameraEffect {
    /// Parse a camera effect name. Unknown names map to `Static`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "zoom" => CameraEffect::Zoom,
            "pan" => CameraEffect::Pan,
            _ => CameraEffect::Static,
        }
    }
}

/// Dimensions of rendered frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Ratio of this frame's shorter side to the 1080 px reference height.
    ///
    /// Effect radii and font sizes are tuned for 1920x1080 and multiplied by this.
    pub fn scale(&self) -> f32 {
        self.width.min(self.height) as f32 / 1080.0
    }

    /// Check the size can be encoded as yuv420p
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidInput(
                "frame width/height must be non-zero".to_string(),
            ));
        }
        if self.width % 2 != 0 || self.height % 2 != 0 {
            return Err(Error::InvalidInput(format!(
                "frame size {}x{} must be even",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

impl Default for FrameSize {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

/// Check if ffmpeg with H.264 and AAC encoders is available on the current system
pub fn available(ffmpeg_path: Option<&str>) -> Result<()> {
    encoder::ffmpeg::check_available(ffmpeg_path)
}
