//! Turns corrected glyph bitplanes into images.
//!
//! Glyphs are stored rotated: the stored width runs down the screen and the
//! stored height runs across it. A glyph canvas is therefore `height` pixels wide
//! and `width` pixels tall. Stored row `r` becomes screen column `r`, and bit `b`
//! of that row (MSB first) lands at screen row `width - b - 1`.

use image::{Rgba, RgbaImage};

use crate::{FontError, Result};

/// Ink of the on/off glyph image.
pub const IMAGE_ON: Rgba<u8> = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);
/// Background of the on/off glyph image.
pub const IMAGE_OFF: Rgba<u8> = Rgba([0x00, 0x00, 0x00, 0xFF]);
/// Ink of the glyph mask; the background stays fully transparent.
pub const MASK_INK: Rgba<u8> = Rgba([0x00, 0x00, 0x00, 0xFF]);

/// Borrowed view on a glyph bitplane with its stored dimensions.
#[derive(Debug, Clone, Copy)]
pub struct GlyphBitmap<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> GlyphBitmap<'a> {
    pub fn new(data: &'a [u8], width: usize, height: usize) -> Self {
        Self { data, width, height }
    }

    /// Screen size of the glyph as (width, height).
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.height as u32, self.width as u32)
    }

    /// Bytes per stored row.
    pub fn row_bytes(&self) -> usize {
        self.width.div_ceil(8)
    }

    /// Calls `f(x, y, ink)` for every stored bit that lands on the canvas.
    pub fn for_each_pixel(&self, mut f: impl FnMut(u32, u32, bool)) {
        let row_bytes = self.row_bytes();
        if row_bytes == 0 || self.height == 0 {
            return;
        }
        for (i, byte) in self.data.iter().enumerate() {
            let row = i / row_bytes;
            if row >= self.height {
                break;
            }
            for bit in 0..8 {
                let b = (i % row_bytes) * 8 + bit;
                if b >= self.width {
                    break;
                }
                let ink = (byte >> (7 - bit)) & 1 == 1;
                f(row as u32, (self.width - b - 1) as u32, ink);
            }
        }
    }

    /// Transparent canvas of the glyph's screen size.
    pub fn blank(&self) -> RgbaImage {
        let (w, h) = self.canvas_size();
        RgbaImage::new(w, h)
    }

    /// White ink on black background.
    pub fn to_image(&self) -> RgbaImage {
        let mut img = self.blank();
        self.for_each_pixel(|x, y, ink| {
            img.put_pixel(x, y, if ink { IMAGE_ON } else { IMAGE_OFF });
        });
        img
    }

    /// Opaque ink, transparent background.
    pub fn to_mask(&self) -> RgbaImage {
        let mut img = self.blank();
        self.for_each_pixel(|x, y, ink| {
            if ink {
                img.put_pixel(x, y, MASK_INK);
            }
        });
        img
    }
}

/// Parses `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
pub fn parse_hex_color(value: &str) -> Result<Rgba<u8>> {
    let hex = value.trim().trim_start_matches('#');
    let invalid = || FontError::InvalidHexColor { value: value.to_string() };
    if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let mut rgba = [0xFF; 4];
    for (i, channel) in rgba.iter_mut().enumerate().take(hex.len() / 2) {
        *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
    }
    Ok(Rgba(rgba))
}
