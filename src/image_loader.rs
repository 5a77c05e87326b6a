//! Image loading utilities

use crate::Result;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageReader, RgbaImage};
use std::path::Path;

/// Load a still frame from a file path as RGBA
pub fn load_still<P: AsRef<Path>>(path: P) -> Result<RgbaImage> {
    let img = ImageReader::open(path.as_ref())?.decode()?;
    Ok(from_dynamic_image(img))
}

/// Convert any decoded image to RGBA
pub fn from_dynamic_image(img: DynamicImage) -> RgbaImage {
    match img {
        DynamicImage::ImageRgba8(rgba) => rgba,
        other => other.to_rgba8(),
    }
}

/// Resize the image to exactly the given dimensions (Lanczos3)
pub fn resize(img: &RgbaImage, target_width: u32, target_height: u32) -> RgbaImage {
    if img.width() == target_width && img.height() == target_height {
        return img.clone();
    }
    imageops::resize(img, target_width, target_height, FilterType::Lanczos3)
}

/// Copy out a centered window of the given size, clamped to the image bounds
pub fn crop_center(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let width = width.clamp(1, img.width());
    let height = height.clamp(1, img.height());
    let left = (img.width() - width) / 2;
    let top = (img.height() - height) / 2;
    imageops::crop_imm(img, left, top, width, height).to_image()
}
