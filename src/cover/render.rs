use std::fmt;
use std::path::Path;
use std::sync::Arc;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::catalog::Audio;

use super::palette::color_for;

/// Side length of rasterized placeholder images, in pixels.
pub const RASTER_SIZE: u32 = 128;

/// A drawable placeholder: the artist initial on a colored disc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverBadge {
    pub initial: char,
    pub color: [u8; 3],
}

#[derive(Debug, PartialEq, Eq)]
pub enum CoverArtError {
    /// The artist name was empty after trimming; there is no initial
    /// to draw. Callers are expected to keep artist metadata non-empty.
    EmptyArtist,
}

impl fmt::Display for CoverArtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverArtError::EmptyArtist => write!(f, "artist name is empty"),
        }
    }
}

impl std::error::Error for CoverArtError {}

/// Build the badge for a track from its artist name.
pub fn badge_from_audio(audio: &Audio) -> Result<CoverBadge, CoverArtError> {
    badge_for_artist(&audio.artist)
}

/// Build a badge for an artist name: uppercase first character plus
/// the deterministic palette color of the trimmed name.
pub fn badge_for_artist(artist: &str) -> Result<CoverBadge, CoverArtError> {
    let trimmed = artist.trim();
    let first = trimmed.chars().next().ok_or(CoverArtError::EmptyArtist)?;
    let initial = first.to_uppercase().next().unwrap_or(first);

    Ok(CoverBadge {
        initial,
        color: color_for(trimmed),
    })
}

/// Cover art as consumed by the UI and the remote-control surface:
/// either ready pixels or a badge that can be rasterized on demand.
#[derive(Clone)]
pub enum CoverArt {
    Raster(Arc<RgbaImage>),
    Badge(CoverBadge),
}

impl CoverArt {
    /// Raster form of the art. Ready pixels are returned as-is, with
    /// no pixel data copied; badges are drawn at `RASTER_SIZE`.
    pub fn to_raster(&self) -> Arc<RgbaImage> {
        match self {
            CoverArt::Raster(img) => Arc::clone(img),
            CoverArt::Badge(badge) => Arc::new(render_badge(badge, RASTER_SIZE)),
        }
    }

    /// Write the raster form to `path` as PNG.
    pub fn export_png(&self, path: &Path) -> Result<(), image::ImageError> {
        self.to_raster().save_with_format(path, ImageFormat::Png)
    }
}

/// Draw a badge: an anti-aliased disc of the badge color with the
/// initial centered on it. Corners stay transparent.
pub fn render_badge(badge: &CoverBadge, size: u32) -> RgbaImage {
    let mut img = RgbaImage::new(size, size);
    let radius = size as f32 / 2.0;
    let [r, g, b] = badge.color;

    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - radius;
            let dy = y as f32 + 0.5 - radius;
            let dist = (dx * dx + dy * dy).sqrt();
            let alpha = (radius - dist + 0.5).clamp(0.0, 1.0);
            if alpha > 0.0 {
                img.put_pixel(x, y, Rgba([r, g, b, (alpha * 255.0) as u8]));
            }
        }
    }

    draw_initial(&mut img, badge.initial, size);
    img
}

fn draw_initial(img: &mut RgbaImage, initial: char, size: u32) {
    let rows = glyph(initial).unwrap_or(GLYPH_FALLBACK);

    // 5x7 glyph cells scaled to roughly a third of the disc.
    let scale = (size / 16).max(1);
    let glyph_w = 5 * scale;
    let glyph_h = 7 * scale;
    let x0 = size.saturating_sub(glyph_w) / 2;
    let y0 = size.saturating_sub(glyph_h) / 2;

    for (row, bits) in rows.iter().enumerate() {
        for col in 0..5u32 {
            if bits & (0x10 >> col) == 0 {
                continue;
            }
            for py in 0..scale {
                for px in 0..scale {
                    let x = x0 + col * scale + px;
                    let y = y0 + row as u32 * scale + py;
                    if x < size && y < size {
                        img.put_pixel(x, y, Rgba([0xff, 0xff, 0xff, 0xff]));
                    }
                }
            }
        }
    }
}

const GLYPH_FALLBACK: [u8; 7] = [0x0e, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04];

/// 5x7 bitmap rows for the characters a badge can carry. Initials
/// outside the table render as the fallback question mark; the UI
/// still shows the real character as text.
fn glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c {
        'A' => [0x0e, 0x11, 0x11, 0x1f, 0x11, 0x11, 0x11],
        'B' => [0x1e, 0x11, 0x11, 0x1e, 0x11, 0x11, 0x1e],
        'C' => [0x0e, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0e],
        'D' => [0x1c, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1c],
        'E' => [0x1f, 0x10, 0x10, 0x1e, 0x10, 0x10, 0x1f],
        'F' => [0x1f, 0x10, 0x10, 0x1e, 0x10, 0x10, 0x10],
        'G' => [0x0e, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0f],
        'H' => [0x11, 0x11, 0x11, 0x1f, 0x11, 0x11, 0x11],
        'I' => [0x0e, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0e],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0c],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1f],
        'M' => [0x11, 0x1b, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11],
        'O' => [0x0e, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0e],
        'P' => [0x1e, 0x11, 0x11, 0x1e, 0x10, 0x10, 0x10],
        'Q' => [0x0e, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0d],
        'R' => [0x1e, 0x11, 0x11, 0x1e, 0x14, 0x12, 0x11],
        'S' => [0x0f, 0x10, 0x10, 0x0e, 0x01, 0x01, 0x1e],
        'T' => [0x1f, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0e],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0a, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0a],
        'X' => [0x11, 0x11, 0x0a, 0x04, 0x0a, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0a, 0x04, 0x04, 0x04],
        'Z' => [0x1f, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1f],
        '0' => [0x0e, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0e],
        '1' => [0x04, 0x0c, 0x04, 0x04, 0x04, 0x04, 0x0e],
        '2' => [0x0e, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1f],
        '3' => [0x1f, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0e],
        '4' => [0x02, 0x06, 0x0a, 0x12, 0x1f, 0x02, 0x02],
        '5' => [0x1f, 0x10, 0x1e, 0x01, 0x01, 0x11, 0x0e],
        '6' => [0x06, 0x08, 0x10, 0x1e, 0x11, 0x11, 0x0e],
        '7' => [0x1f, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0e, 0x11, 0x11, 0x0e, 0x11, 0x11, 0x0e],
        '9' => [0x0e, 0x11, 0x11, 0x0f, 0x01, 0x02, 0x0c],
        _ => return None,
    };
    Some(rows)
}
