//! Decoded characters and glyph bitplane extraction.

use std::io::{Read, Seek, SeekFrom};

use image::RgbaImage;
use once_cell::unsync::OnceCell;

use crate::metadata::CharacterMeta;
use crate::raster::GlyphBitmap;
use crate::{FontError, Result, read_block};

/// Unpacks the glyph dimensions from a bitmap size word.
///
/// The low 9 bits of the magnitude hold the height, the bits above them the width
/// in units of 8 pixels. The sign carries no known meaning and is dropped.
pub fn decode_bitmap_size(bitmap_size: i16) -> (usize, usize) {
    let packed = bitmap_size as i32;
    let width = (packed >> 9).unsigned_abs() as usize * 8;
    let height = (packed.unsigned_abs() & 0x1FF) as usize;
    (width, height)
}

/// Swaps every byte pair in place, padding odd buffers with a zero byte first.
///
/// Glyph data is stored as big endian words while the rest of the file is little endian.
pub fn swap_byte_pairs(data: &mut Vec<u8>) {
    if data.len() % 2 != 0 {
        data.push(0);
    }
    for pair in data.chunks_exact_mut(2) {
        pair.swap(0, 1);
    }
}

#[derive(Debug, Clone)]
pub struct Character {
    /// Character code
    pub value: u32,
    pub is_space: bool,
    pub blanks_left: u16,
    pub cell_width: u16,
    pub bitmap_size: i16,
    pub glyph_offset: u16,
    pub reserved: u16,

    glyph: Vec<u8>,
    image: OnceCell<RgbaImage>,
    mask: OnceCell<RgbaImage>,
}

impl Character {
    /// Creates a character without glyph data.
    pub fn from_meta(value: u32, meta: &CharacterMeta) -> Self {
        Self::with_glyph(value, meta, Vec::new())
    }

    /// Creates a character from already corrected glyph bytes.
    pub fn with_glyph(value: u32, meta: &CharacterMeta, glyph: Vec<u8>) -> Self {
        Self {
            value,
            is_space: meta.spacing,
            blanks_left: meta.blanks_left,
            cell_width: meta.cell_width,
            bitmap_size: meta.bitmap_size,
            glyph_offset: meta.glyph_offset,
            reserved: meta.reserved,
            glyph,
            image: OnceCell::new(),
            mask: OnceCell::new(),
        }
    }

    /// Reads the glyph of a non-spacing character.
    ///
    /// `table_end` is the end of the metadata table and `stream_len` the total
    /// length of the input. Spacing characters never touch the reader.
    pub fn extract<R: Read + Seek>(reader: &mut R, value: u32, meta: &CharacterMeta, table_end: u64, stream_len: u64) -> Result<Self> {
        if meta.spacing {
            return Ok(Self::from_meta(value, meta));
        }

        let (width, height) = decode_bitmap_size(meta.bitmap_size);
        if width == 0 || height == 0 {
            return Err(FontError::InvalidGlyphDimensions {
                character: value,
                width,
                height,
                bitmap_size: meta.bitmap_size as u16,
            });
        }

        let offset = meta.glyph_address(table_end);
        if offset > stream_len {
            return Err(FontError::Seek {
                character: value,
                offset,
                length: stream_len,
            });
        }
        reader.seek(SeekFrom::Start(offset))?;

        let expected = width * height / 8;
        let mut glyph = read_block(reader, expected)?;
        if glyph.len() < expected {
            return Err(FontError::TruncatedGlyph {
                character: value,
                offset,
                expected,
                actual: glyph.len(),
            });
        }
        swap_byte_pairs(&mut glyph);

        Ok(Self::with_glyph(value, meta, glyph))
    }

    /// Metadata the character was decoded from.
    pub fn meta(&self) -> CharacterMeta {
        CharacterMeta {
            blanks_left: self.blanks_left,
            spacing: self.is_space,
            glyph_offset: self.glyph_offset,
            bitmap_size: self.bitmap_size,
            cell_width: self.cell_width,
            reserved: self.reserved,
        }
    }

    /// Glyph width as stored.
    pub fn width(&self) -> usize {
        decode_bitmap_size(self.bitmap_size).0
    }

    /// Glyph height as stored.
    pub fn height(&self) -> usize {
        decode_bitmap_size(self.bitmap_size).1
    }

    /// Byte order corrected bitplane, empty for spacing characters.
    pub fn raw_glyph(&self) -> &[u8] {
        &self.glyph
    }

    fn bitmap(&self) -> GlyphBitmap<'_> {
        GlyphBitmap::new(&self.glyph, self.width(), self.height())
    }

    /// On/off rendering of the glyph, computed on first use.
    pub fn image(&self) -> &RgbaImage {
        self.image.get_or_init(|| {
            if self.is_space {
                self.bitmap().blank()
            } else {
                self.bitmap().to_image()
            }
        })
    }

    /// Ink opaque, everything else transparent. Computed on first use.
    pub fn mask(&self) -> &RgbaImage {
        self.mask.get_or_init(|| {
            if self.is_space {
                self.bitmap().blank()
            } else {
                self.bitmap().to_mask()
            }
        })
    }
}
