//! Font resolution and text rasterization
//!
//! Candidate font files are tried in order; the first one `fontdue` can parse
//! wins. When none is usable a built-in 5x7 bitmap face is used instead, so
//! resolving a typeface never fails.

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use fontdue::{Font, FontSettings};
use image::{GrayImage, Luma};
use std::path::Path;
use tracing::{debug, warn};

/// Font files tried when no explicit candidates are configured
pub const DEFAULT_FONT_CANDIDATES: &[&str] = &[
    "arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/usr/share/fonts/truetype/msttcorefonts/Arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
];

/// Glyph cell of the built-in face, in font units
const BUILTIN_GLYPH_WIDTH: u32 = 5;
const BUILTIN_GLYPH_HEIGHT: u32 = 7;
const BUILTIN_ADVANCE: u32 = 6;
const BUILTIN_LINE_HEIGHT: u32 = 9;

/// A resolved typeface
pub enum Typeface {
    /// TrueType/OpenType face parsed by fontdue
    Outline(Box<Font>),
    /// Minimal bitmap face used when no font file is available
    Builtin,
}

impl std::fmt::Debug for Typeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Typeface::Outline(_) => f.write_str("Typeface::Outline"),
            Typeface::Builtin => f.write_str("Typeface::Builtin"),
        }
    }
}

impl Typeface {
    /// Resolve the first loadable candidate, falling back to the built-in face
    pub fn resolve<P: AsRef<Path>>(candidates: &[P]) -> Self {
        for candidate in candidates {
            let path = candidate.as_ref();
            match Self::from_path(path) {
                Ok(face) => {
                    debug!("Using font {}", path.display());
                    return face;
                }
                Err(e) => debug!("Font candidate {} unusable: {}", path.display(), e),
            }
        }

        warn!("No usable font found, falling back to built-in bitmap font");
        Typeface::Builtin
    }

    /// Load a font file
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
        let font = Font::from_bytes(bytes, FontSettings::default())?;
        Ok(Typeface::Outline(Box::new(font)))
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Typeface::Builtin)
    }

    /// Rasterize `text` at `px` pixels into a coverage mask cropped to its ink bounds.
    ///
    /// Lines are split on `\n` and left-aligned. Text with no ink yields a 1x1 empty mask.
    pub fn rasterize(&self, text: &str, px: f32) -> GrayImage {
        match self {
            Typeface::Outline(font) => rasterize_outline(font, text, px),
            Typeface::Builtin => rasterize_builtin(text, px),
        }
    }
}

fn rasterize_outline(font: &Font, text: &str, px: f32) -> GrayImage {
    let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
    layout.reset(&LayoutSettings {
        wrap_hard_breaks: true,
        ..LayoutSettings::default()
    });
    layout.append(&[font], &TextStyle::new(text, px, 0));

    let glyphs: Vec<_> = layout
        .glyphs()
        .iter()
        .filter(|g| g.width > 0 && g.height > 0)
        .collect();

    if glyphs.is_empty() {
        return GrayImage::new(1, 1);
    }

    let min_x = glyphs.iter().map(|g| g.x.round() as i32).min().unwrap_or(0);
    let min_y = glyphs.iter().map(|g| g.y.round() as i32).min().unwrap_or(0);
    let max_x = glyphs
        .iter()
        .map(|g| g.x.round() as i32 + g.width as i32)
        .max()
        .unwrap_or(1);
    let max_y = glyphs
        .iter()
        .map(|g| g.y.round() as i32 + g.height as i32)
        .max()
        .unwrap_or(1);

    let mut mask = GrayImage::new((max_x - min_x).max(1) as u32, (max_y - min_y).max(1) as u32);

    for glyph in glyphs {
        let (_, bitmap) = font.rasterize_config(glyph.key);
        let ox = glyph.x.round() as i32 - min_x;
        let oy = glyph.y.round() as i32 - min_y;
        for gy in 0..glyph.height {
            for gx in 0..glyph.width {
                let coverage = bitmap[gy * glyph.width + gx];
                if coverage == 0 {
                    continue;
                }
                let x = (ox + gx as i32) as u32;
                let y = (oy + gy as i32) as u32;
                if x < mask.width() && y < mask.height() {
                    let dst = mask.get_pixel_mut(x, y);
                    dst.0[0] = dst.0[0].max(coverage);
                }
            }
        }
    }

    mask
}

fn rasterize_builtin(text: &str, px: f32) -> GrayImage {
    let cell = ((px / (BUILTIN_LINE_HEIGHT as f32 - 1.0)).round() as u32).max(1);
    let lines: Vec<&str> = text.split('\n').collect();
    let columns = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;

    if columns == 0 {
        return GrayImage::new(1, 1);
    }

    let width = ((columns - 1) * BUILTIN_ADVANCE + BUILTIN_GLYPH_WIDTH) * cell;
    let height =
        ((lines.len() as u32 - 1) * BUILTIN_LINE_HEIGHT + BUILTIN_GLYPH_HEIGHT) * cell;
    let mut mask = GrayImage::new(width, height);

    for (row, line) in lines.iter().enumerate() {
        for (col, ch) in line.chars().enumerate() {
            let glyph = builtin_glyph(ch);
            let gx0 = col as u32 * BUILTIN_ADVANCE * cell;
            let gy0 = row as u32 * BUILTIN_LINE_HEIGHT * cell;
            for (gy, bits) in glyph.iter().enumerate() {
                for gx in 0..BUILTIN_GLYPH_WIDTH {
                    if bits & (1 << (BUILTIN_GLYPH_WIDTH - 1 - gx)) == 0 {
                        continue;
                    }
                    for dy in 0..cell {
                        for dx in 0..cell {
                            mask.put_pixel(
                                gx0 + gx * cell + dx,
                                gy0 + gy as u32 * cell + dy,
                                Luma([255]),
                            );
                        }
                    }
                }
            }
        }
    }

    crop_to_ink(&mask)
}

fn crop_to_ink(mask: &GrayImage) -> GrayImage {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, p) in mask.enumerate_pixels() {
        if p.0[0] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }

    match bounds {
        Some((x0, y0, x1, y1)) => {
            image::imageops::crop_imm(mask, x0, y0, x1 - x0 + 1, y1 - y0 + 1).to_image()
        }
        None => GrayImage::new(1, 1),
    }
}

/// 5x7 rows, most significant of the low five bits is the leftmost column
fn builtin_glyph(ch: char) -> [u8; 7] {
    match ch.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        ' ' => [0x00; 7],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '\'' => [0x04, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        ';' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x04, 0x08],
        '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
        ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
        '/' => [0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x00],
        '&' => [0x0C, 0x12, 0x14, 0x08, 0x15, 0x12, 0x0D],
        _ => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
    }
}
