use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use image::{Pixel, Rgba, RgbaImage};

use crate::glyph::Character;
use crate::header::{ExtraHeader, FontHeader, FontHeaders};
use crate::metadata::{MetaDialect, MetadataTable, WIDTH_TABLE_SIZE};
use crate::{FontError, Result};

/// A decoded font: headers plus every character slot of the metadata table.
#[derive(Debug, Clone)]
pub struct Font {
    pub extra_header: Option<ExtraHeader>,
    pub header: FontHeader,
    pub dialect: MetaDialect,
    pub width_table: [u8; WIDTH_TABLE_SIZE],
    /// File offset of the first metadata record
    pub table_start: u64,
    /// File offset of the glyph data region
    pub table_end: u64,
    pub characters: BTreeMap<u32, Character>,
}

impl Font {
    /// Decodes a font from a seekable stream.
    ///
    /// All glyph bytes are copied out, the reader is not needed afterwards.
    pub fn load<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let stream_len = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;

        let headers = FontHeaders::read(reader)?;
        let dialect = headers.dialect();
        log::debug!("headers occupy {} bytes, {} records follow", headers.size(), dialect);
        let table = MetadataTable::read(reader, dialect, headers.header.last_character)?;
        log::debug!(
            "{} metadata table ${:04X}..${:04X}, {} records",
            dialect,
            table.start,
            table.end,
            table.entries.len()
        );

        let mut characters = BTreeMap::new();
        for (code, meta) in table.entries.iter().enumerate() {
            let value = code as u32;
            let ch = Character::extract(reader, value, meta, table.end, stream_len)?;
            characters.insert(value, ch);
        }

        let font = Self {
            extra_header: headers.extra,
            header: headers.header,
            dialect,
            width_table: table.width_table,
            table_start: table.start,
            table_end: table.end,
            characters,
        };
        log::info!(
            "loaded {} font {:?}: {} slots, {} glyphs",
            font.dialect,
            font.header.font_name(),
            font.characters.len(),
            font.glyph_count()
        );
        Ok(font)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::load(&mut Cursor::new(bytes))
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| FontError::open_file(path, e.to_string()))?;
        Self::load(&mut BufReader::new(file))
    }

    pub fn character(&self, ch: char) -> Option<&Character> {
        self.characters.get(&(ch as u32))
    }

    /// File offset of the metadata record of character `code`.
    pub fn record_address(&self, code: u32) -> u64 {
        self.table_start + code as u64 * self.dialect.record_size() as u64
    }

    /// Number of characters that carry glyph data.
    pub fn glyph_count(&self) -> usize {
        self.characters.values().filter(|c| !c.is_space).count()
    }

    /// Sum of the cell widths of all known characters in `text`.
    pub fn text_width(&self, text: &str) -> u32 {
        text.chars().filter_map(|ch| self.character(ch)).map(|c| c.cell_width as u32).sum()
    }

    /// Draws one line of text with its baseline at `origin`.
    ///
    /// Unknown characters are skipped without advancing the cursor. Glyph pixels
    /// outside of `canvas` are clipped.
    pub fn draw_string(&self, canvas: &mut RgbaImage, origin: (i64, i64), color: Rgba<u8>, text: &str) {
        let max_height = self.header.max_height();
        let distance_above = self.header.distance_above as i64;
        let (mut offset, baseline) = origin;

        for ch in text.chars() {
            let Some(c) = self.character(ch) else {
                continue;
            };
            let mask = c.mask();
            let glyph_height = mask.height() as i64;
            let top = baseline - (glyph_height - (max_height - c.blanks_left as i64)) - distance_above;
            blend_mask(canvas, mask, offset, top, color);
            offset += c.cell_width as i64;
        }
    }

    /// Renders `text` onto a new transparent canvas, one line per `\n`.
    pub fn render(&self, color: Rgba<u8>, text: &str) -> RgbaImage {
        let lines: Vec<&str> = text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)).collect();
        let line_spacing = self.header.line_spacing as i64;
        let width = lines.iter().map(|l| self.text_width(l)).max().unwrap_or(0);
        let height = lines.len() as u32 * self.header.line_spacing as u32;

        let mut canvas = RgbaImage::new(width, height);
        for (i, line) in lines.iter().enumerate() {
            let baseline = self.header.distance_above as i64 + i as i64 * line_spacing;
            self.draw_string(&mut canvas, (0, baseline), color, line);
        }
        canvas
    }
}

fn blend_mask(canvas: &mut RgbaImage, mask: &RgbaImage, left: i64, top: i64, color: Rgba<u8>) {
    let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);
    for (mx, my, m) in mask.enumerate_pixels() {
        if m[3] == 0 {
            continue;
        }
        let x = left + mx as i64;
        let y = top + my as i64;
        if x < 0 || y < 0 || x >= cw || y >= ch {
            continue;
        }
        let mut ink = color;
        ink[3] = ((color[3] as u16 * m[3] as u16) / 0xFF) as u8;
        canvas.get_pixel_mut(x as u32, y as u32).blend(&ink);
    }
}
