//! Still frame synthesis from a prompt

use crate::effects;
use crate::font::Typeface;
use crate::text::{draw_text_with_outline, TextStyle};
use crate::{Color, FrameSize, VisualEffect};
use image::RgbaImage;

/// Title font size at 1080p
const TITLE_SIZE: f32 = 70.0;

/// Overlay font size at 1080p
const OVERLAY_SIZE: f32 = 55.0;

/// Vertical anchor of the "Scene N" title, as a fraction of the frame height (350 / 1080)
const TITLE_ANCHOR_Y: f32 = 350.0 / 1080.0;

/// Derive a stable base color from the prompt text.
///
/// Each channel comes from a different multiple of the same 64-bit FNV-1a hash
/// and lands in `[50, 249]`.
pub fn prompt_color(prompt: &str) -> Color {
    let h = fnv1a64(prompt.as_bytes());
    let channel = |k: u64| (h.wrapping_mul(k) % 200 + 50) as u8;
    Color::new(channel(1), channel(2), channel(3))
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for &b in bytes {
        h ^= u64::from(b);
        h = h.wrapping_mul(0x100000001b3);
    }
    h
}

/// Renders the still frame of one scene
pub struct SceneImageRenderer {
    size: FrameSize,
    font: Typeface,
}

impl SceneImageRenderer {
    pub fn new(size: FrameSize, font: Typeface) -> Self {
        Self { size, font }
    }

    pub fn size(&self) -> FrameSize {
        self.size
    }

    pub fn font(&self) -> &Typeface {
        &self.font
    }

    /// Render scene `index` (0-based): colored background, effect, title and optional overlay
    pub fn render(
        &self,
        prompt: &str,
        index: usize,
        overlay: Option<&str>,
        effect: VisualEffect,
    ) -> RgbaImage {
        let base = prompt_color(prompt);
        let canvas = RgbaImage::from_pixel(self.size.width, self.size.height, base.to_rgba());
        let mut img = effects::apply(&canvas, effect, base);

        let scale = self.size.scale();
        let center_x = (self.size.width / 2) as i32;

        let title = format!("Scene {}", index + 1);
        let title_y = (self.size.height as f32 * TITLE_ANCHOR_Y).round() as i32;
        draw_text_with_outline(
            &mut img,
            &title,
            (center_x, title_y),
            &self.font,
            &self.caption_style(TITLE_SIZE * scale),
        );

        if let Some(text) = overlay.filter(|t| !t.is_empty()) {
            draw_text_with_outline(
                &mut img,
                text,
                (center_x, (self.size.height / 2) as i32),
                &self.font,
                &self.caption_style(OVERLAY_SIZE * scale),
            );
        }

        img
    }

    fn caption_style(&self, size: f32) -> TextStyle {
        let mut style = TextStyle::caption(size.max(1.0));
        // Keep the halo proportional on reduced frame sizes
        style.outline_width = ((style.outline_width as f32 * self.size.scale()).round() as u32).max(1);
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv1a_reference_values() {
        assert_eq!(fnv1a64(b""), 0xcbf29ce484222325);
        assert_eq!(fnv1a64(b"a"), 0xaf63dc4c8601ec8c);
    }

    #[test]
    fn test_prompt_color_is_stable() {
        let a = prompt_color("A serene mountain landscape at sunrise");
        let b = prompt_color("A serene mountain landscape at sunrise");
        assert_eq!(a, b);
    }

    #[test]
    fn test_prompt_color_channel_range() {
        for prompt in ["", "A", "B", "neon city", "日本語のプロンプト", "a much longer prompt text"] {
            let c = prompt_color(prompt);
            for v in [c.r, c.g, c.b] {
                assert!((50..=249).contains(&v), "{} out of range for {:?}", v, prompt);
            }
        }
    }

    #[test]
    fn test_prompt_color_differs_between_prompts() {
        assert_ne!(prompt_color("A"), prompt_color("B"));
    }

    #[test]
    fn test_render_dimensions_and_background() {
        let renderer = SceneImageRenderer::new(FrameSize::new(320, 180), Typeface::Builtin);
        let img = renderer.render("A", 0, None, VisualEffect::None);
        assert_eq!(img.dimensions(), (320, 180));

        let base = prompt_color("A");
        assert_eq!(img.get_pixel(2, 2), &base.to_rgba());
        assert_eq!(img.get_pixel(317, 177), &base.to_rgba());
    }

    #[test]
    fn test_render_draws_title() {
        let renderer = SceneImageRenderer::new(FrameSize::new(320, 180), Typeface::Builtin);
        let plain = RgbaImage::from_pixel(320, 180, prompt_color("A").to_rgba());
        let img = renderer.render("A", 0, None, VisualEffect::None);

        // Title row around y = 58 differs from the plain background
        let changed = (0..320).any(|x| img.get_pixel(x, 58) != plain.get_pixel(x, 58));
        assert!(changed);
        // Overlay row is untouched without an overlay
        let changed = (0..320).any(|x| img.get_pixel(x, 90) != plain.get_pixel(x, 90));
        assert!(!changed);
    }

    #[test]
    fn test_render_draws_overlay() {
        let renderer = SceneImageRenderer::new(FrameSize::new(320, 180), Typeface::Builtin);
        let without = renderer.render("A", 0, None, VisualEffect::None);
        let with = renderer.render("A", 0, Some("HELLO"), VisualEffect::None);
        let changed = (0..320).any(|x| with.get_pixel(x, 90) != without.get_pixel(x, 90));
        assert!(changed);
    }

    #[test]
    fn test_empty_overlay_is_ignored() {
        let renderer = SceneImageRenderer::new(FrameSize::new(320, 180), Typeface::Builtin);
        let without = renderer.render("A", 0, None, VisualEffect::None);
        let empty = renderer.render("A", 0, Some(""), VisualEffect::None);
        assert_eq!(without, empty);
    }
}
