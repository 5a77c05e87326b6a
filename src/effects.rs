//! Background filters applied to a still frame before captions are drawn

use crate::{Color, FrameSize, VisualEffect};
use image::imageops;
use image::{GrayImage, Luma, RgbaImage};

/// Gaussian sigma of the blur effect at 1080p
const BLUR_SIGMA: f32 = 15.0;

/// Gaussian sigma applied to the vignette mask at 1080p
const VIGNETTE_SIGMA: f32 = 100.0;

/// Number of concentric rectangles in the vignette mask
const VIGNETTE_STEPS: u32 = 255;

/// Weight of the gradient layer when blended over the source
const GRADIENT_BLEND: f32 = 0.7;

/// Apply a visual effect to a frame filled with `base`
pub fn apply(img: &RgbaImage, effect: VisualEffect, base: Color) -> RgbaImage {
    let scale = FrameSize::new(img.width(), img.height()).scale();
    match effect {
        VisualEffect::None => img.clone(),
        VisualEffect::Blur => blur(img, BLUR_SIGMA * scale),
        VisualEffect::Gradient => gradient(img, base),
        VisualEffect::Vignette => vignette(img, VIGNETTE_SIGMA * scale),
    }
}

/// Gaussian blur
pub fn blur(img: &RgbaImage, sigma: f32) -> RgbaImage {
    if sigma <= 0.0 {
        return img.clone();
    }
    imageops::fast_blur(img, sigma)
}

/// Vertical luminance ramp of `base` (full at the top, half at the bottom)
/// blended over the source at 70%.
pub fn gradient(img: &RgbaImage, base: Color) -> RgbaImage {
    let height = img.height();
    let base = [base.r, base.g, base.b];
    let mut out = img.clone();

    for (y, row) in out.enumerate_rows_mut() {
        let progress = y as f32 / height as f32;
        let shade = base.map(|c| (c as f32 * (1.0 - progress * 0.5)) as u8);
        for (_, _, pixel) in row {
            for (c, g) in pixel.0.iter_mut().take(3).zip(shade) {
                *c = blend_channel(*c, g, GRADIENT_BLEND);
            }
        }
    }

    out
}

/// Darken the edges: the source is composited over black through a blurred
/// radial mask built from inset rectangles.
pub fn vignette(img: &RgbaImage, sigma: f32) -> RgbaImage {
    let mask = blur_mask(&vignette_mask(img.width(), img.height()), sigma);
    let mut out = img.clone();

    for (pixel, m) in out.pixels_mut().zip(mask.pixels()) {
        let alpha = m.0[0] as u16;
        for c in pixel.0.iter_mut().take(3) {
            *c = mul_div255(*c as u16, alpha) as u8;
        }
    }

    out
}

/// Unblurred vignette mask: inset `i` is filled with brightness `i`.
///
/// Each pixel takes its distance to the nearest edge, so the mask is symmetric
/// under left/right and top/bottom mirroring and all four border lines are 0.
pub fn vignette_mask(width: u32, height: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    let max_inset = width.min(height).saturating_sub(1) / 2;
    let steps = VIGNETTE_STEPS.min(max_inset + 1);

    for (x, y, pixel) in mask.enumerate_pixels_mut() {
        // Distance to the nearest edge decides which rectangle last painted this pixel
        let edge = x.min(y).min(width - 1 - x).min(height - 1 - y);
        let value = edge.min(steps - 1);
        *pixel = Luma([value as u8]);
    }

    mask
}

fn blur_mask(mask: &GrayImage, sigma: f32) -> GrayImage {
    if sigma <= 0.0 {
        return mask.clone();
    }
    imageops::fast_blur(mask, sigma)
}

fn blend_channel(src: u8, over: u8, weight: f32) -> u8 {
    let v = src as f32 * (1.0 - weight) + over as f32 * weight;
    v.round().clamp(0.0, 255.0) as u8
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(w: u32, h: u32, c: Color) -> RgbaImage {
        RgbaImage::from_pixel(w, h, c.to_rgba())
    }

    #[test]
    fn test_none_is_passthrough() {
        let base = Color::new(120, 80, 200);
        let img = solid(64, 36, base);
        assert_eq!(apply(&img, VisualEffect::None, base), img);
    }

    #[test]
    fn test_gradient_top_and_bottom() {
        let base = Color::new(200, 100, 50);
        let img = solid(16, 100, base);
        let out = gradient(&img, base);

        // Top row blends base with itself
        assert_eq!(out.get_pixel(0, 0), &Rgba([200, 100, 50, 255]));

        // Bottom row: 0.3 * base + 0.7 * (base * ~0.505)
        let bottom = out.get_pixel(0, 99);
        assert!(bottom[0] < 140 && bottom[0] > 120, "got {:?}", bottom);
        assert_eq!(bottom[3], 255);

        // Monotonic darkening down the frame
        let mut prev = 255u8;
        for y in 0..100 {
            let v = out.get_pixel(8, y)[0];
            assert!(v <= prev);
            prev = v;
        }
    }

    #[test]
    fn test_vignette_mask_edges_dark_center_bright() {
        let mask = vignette_mask(600, 600);
        assert_eq!(mask.get_pixel(0, 0)[0], 0);
        assert_eq!(mask.get_pixel(10, 300)[0], 10);
        assert_eq!(mask.get_pixel(300, 300)[0], 254);
    }

    #[test]
    fn test_vignette_mask_is_symmetric() {
        let (w, h) = (41, 24);
        let mask = vignette_mask(w, h);
        for y in 0..h {
            for x in 0..w {
                let v = mask.get_pixel(x, y)[0];
                assert_eq!(v, mask.get_pixel(w - 1 - x, y)[0], "({}, {})", x, y);
                assert_eq!(v, mask.get_pixel(x, h - 1 - y)[0], "({}, {})", x, y);
            }
        }
        assert_eq!(mask.get_pixel(w - 1, 12)[0], 0);
        assert_eq!(mask.get_pixel(20, h - 1)[0], 0);
    }

    #[test]
    fn test_vignette_mask_small_frame() {
        let mask = vignette_mask(20, 10);
        assert_eq!(mask.get_pixel(0, 5)[0], 0);
        assert_eq!(mask.get_pixel(10, 5)[0], 4);
    }

    #[test]
    fn test_vignette_darkens_edges() {
        let base = Color::new(200, 200, 200);
        let img = solid(192, 108, base);
        let out = apply(&img, VisualEffect::Vignette, base);

        let corner = out.get_pixel(0, 0)[0];
        let center = out.get_pixel(96, 54)[0];
        assert!(corner < center, "corner {} center {}", corner, center);
        assert!(center <= 200);
    }

    #[test]
    fn test_blur_keeps_solid_color() {
        let base = Color::new(90, 60, 30);
        let img = solid(64, 36, base);
        let out = apply(&img, VisualEffect::Blur, base);
        let center = out.get_pixel(32, 18);
        assert!((center[0] as i32 - 90).abs() <= 1);
        assert!((center[1] as i32 - 60).abs() <= 1);
    }

    #[test]
    fn test_effects_are_deterministic() {
        let base = Color::new(70, 140, 210);
        let img = solid(96, 54, base);
        for effect in [
            VisualEffect::Blur,
            VisualEffect::Gradient,
            VisualEffect::Vignette,
        ] {
            assert_eq!(apply(&img, effect, base), apply(&img, effect, base));
        }
    }
}
