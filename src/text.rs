//! Outlined, centered text drawing

use crate::font::Typeface;
use crate::Color;
use image::{GrayImage, RgbaImage};

/// Default outline thickness in pixels
pub const DEFAULT_OUTLINE_WIDTH: u32 = 4;

/// Text placement and styling
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    pub fill: Color,
    pub outline: Color,
    pub outline_width: u32,
}

impl TextStyle {
    /// White text with a black outline of the default width
    pub fn caption(size: f32) -> Self {
        Self {
            size,
            fill: Color::WHITE,
            outline: Color::BLACK,
            outline_width: DEFAULT_OUTLINE_WIDTH,
        }
    }
}

/// Draw `text` centered on `anchor` with an outline halo.
///
/// The outline is stamped at every offset within `[-w, w]` on both axes, then
/// the fill is drawn on top at the true origin. Returns the top-left origin used.
pub fn draw_text_with_outline(
    img: &mut RgbaImage,
    text: &str,
    anchor: (i32, i32),
    font: &Typeface,
    style: &TextStyle,
) -> (i32, i32) {
    let mask = font.rasterize(text, style.size);
    let origin = centered_origin(anchor, mask.width(), mask.height());

    let w = style.outline_width as i32;
    for dx in -w..=w {
        for dy in -w..=w {
            stamp(img, &mask, (origin.0 + dx, origin.1 + dy), style.outline);
        }
    }
    stamp(img, &mask, origin, style.fill);

    origin
}

/// Top-left origin that centers a `width` x `height` box on `anchor`
pub fn centered_origin(anchor: (i32, i32), width: u32, height: u32) -> (i32, i32) {
    (
        anchor.0 - (width / 2) as i32,
        anchor.1 - (height / 2) as i32,
    )
}

/// Blend `color` into `img` through the coverage mask placed at `origin`
fn stamp(img: &mut RgbaImage, mask: &GrayImage, origin: (i32, i32), color: Color) {
    let (iw, ih) = (img.width() as i32, img.height() as i32);
    let rgb = [color.r as u16, color.g as u16, color.b as u16];

    for (mx, my, m) in mask.enumerate_pixels() {
        let a = m.0[0] as u16;
        if a == 0 {
            continue;
        }
        let x = origin.0 + mx as i32;
        let y = origin.1 + my as i32;
        if x < 0 || y < 0 || x >= iw || y >= ih {
            continue;
        }

        let dst = img.get_pixel_mut(x as u32, y as u32);
        let inv = 255 - a;
        for (c, src) in dst.0.iter_mut().take(3).zip(rgb) {
            *c = ((src * a + *c as u16 * inv + 127) / 255) as u8;
        }
        dst.0[3] = 255;
    }
}
