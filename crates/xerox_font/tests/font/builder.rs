use xerox_font::MetaDialect;
use xerox_font::header::{EXTRA_HEADER_SIZE, FONT_HEADER_SIZE};
use xerox_font::metadata::{SPACING_FLAG, WIDTH_TABLE_SIZE, record_count};

pub const ABOVE: u16 = 6;
pub const BELOW: u16 = 2;
pub const LINE_SPACING: u16 = 10;
pub const SPACE_WIDTH: u16 = 5;

/// Packed bitmap size word for a glyph of `width` x `height` stored pixels.
pub fn bitmap_size(width: usize, height: usize) -> i16 {
    (((width / 8) << 9) | height) as i16
}

pub struct TestGlyph {
    pub code: u8,
    pub blanks: u16,
    pub cell_width: u16,
    pub width: usize,
    pub height: usize,
    /// Byte order corrected bitplane, swapped back when written.
    pub data: Vec<u8>,
}

/// Writes synthetic font files in either dialect.
pub struct FontBuilder {
    dialect: MetaDialect,
    extra_format: Option<u8>,
    last_character: u16,
    reserved: u16,
    glyphs: Vec<TestGlyph>,
}

impl FontBuilder {
    pub fn new(dialect: MetaDialect) -> Self {
        Self {
            dialect,
            extra_format: None,
            last_character: 127,
            reserved: 0,
            glyphs: Vec::new(),
        }
    }

    /// Prepends an extra header with the given format byte.
    pub fn extra_header(mut self, format: u8) -> Self {
        self.extra_format = Some(format);
        self
    }

    pub fn last_character(mut self, last_character: u16) -> Self {
        self.last_character = last_character;
        self
    }

    /// Value of the extra word of 5-word records.
    pub fn reserved(mut self, reserved: u16) -> Self {
        self.reserved = reserved;
        self
    }

    /// 8x8 glyph with blanks 0 and cell width 10.
    pub fn square(self, code: u8, data: [u8; 8]) -> Self {
        self.glyph(TestGlyph {
            code,
            blanks: 0,
            cell_width: 10,
            width: 8,
            height: 8,
            data: data.to_vec(),
        })
    }

    /// Glyph data is laid out in the order glyphs are added.
    pub fn glyph(mut self, glyph: TestGlyph) -> Self {
        self.glyphs.push(glyph);
        self
    }

    /// Offset of the glyph data region in the built file.
    pub fn table_end(&self) -> usize {
        let extra = if self.extra_format.is_some() { EXTRA_HEADER_SIZE } else { 0 };
        extra + FONT_HEADER_SIZE + WIDTH_TABLE_SIZE + record_count(self.last_character) * self.dialect.record_size()
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = Vec::new();

        if let Some(format) = self.extra_format {
            let mut extra = vec![0u8; EXTRA_HEADER_SIZE];
            extra[0] = format;
            extra[1] = b'P';
            data.extend(extra);
        }

        let mut header = vec![0u8; FONT_HEADER_SIZE];
        header[0] = b'P';
        header[1] = b'P';
        put_u16(&mut header, 2, 8); // pixel height
        put_u16(&mut header, 4, LINE_SPACING);
        put_u16(&mut header, 6, 8); // fixed width
        put_u16(&mut header, 8, BELOW);
        put_u16(&mut header, 10, ABOVE);
        put_u16(&mut header, 16, self.last_character);
        let discriminator = match self.dialect {
            MetaDialect::Xerox9700 => 0x0208,
            MetaDialect::FiveWord => 0,
        };
        put_u16(&mut header, 18, discriminator);
        header[24..30].copy_from_slice(b"XTEST\0");
        header[30..32].copy_from_slice(b"01");
        header[34..36].copy_from_slice(b"A1");
        header[36..46].copy_from_slice(b"TESTLIB\0\0\0");
        data.extend(header);

        let mut width_table = [0u8; WIDTH_TABLE_SIZE];
        width_table[b' ' as usize] = SPACE_WIDTH as u8;
        for g in &self.glyphs {
            width_table[g.code as usize] = g.cell_width as u8;
        }
        data.extend(width_table);

        let mut glyph_data = Vec::new();
        let mut offsets = vec![None; record_count(self.last_character)];
        for g in &self.glyphs {
            offsets[g.code as usize] = Some(glyph_data.len() / 2);
            let mut bytes = g.data.clone();
            if bytes.len() % 2 != 0 {
                bytes.push(0);
            }
            for pair in bytes.chunks_exact_mut(2) {
                pair.swap(0, 1);
            }
            glyph_data.extend(bytes);
        }

        for (code, offset) in offsets.iter().enumerate() {
            let (blanks, glyph_offset, size, cell_width) = match (offset, self.glyphs.iter().find(|g| g.code as usize == code)) {
                (Some(offset), Some(g)) => (g.blanks, *offset as u16, bitmap_size(g.width, g.height), g.cell_width),
                _ if code == b' ' as usize => (SPACING_FLAG, 0, 0, SPACE_WIDTH),
                _ => (SPACING_FLAG, 0, 0, 0),
            };
            data.extend(blanks.to_le_bytes());
            data.extend(glyph_offset.to_le_bytes());
            data.extend(size.to_le_bytes());
            if self.dialect == MetaDialect::FiveWord {
                data.extend(self.reserved.to_le_bytes());
            }
            data.extend(cell_width.to_le_bytes());
        }

        data.extend(glyph_data);
        data
    }
}

fn put_u16(data: &mut [u8], offset: usize, value: u16) {
    data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

/// Single ink pixel in the top left corner of the rendered glyph.
pub const TOP_LEFT: [u8; 8] = [0x01, 0, 0, 0, 0, 0, 0, 0];

/// Single ink pixel in the bottom left corner of the rendered glyph.
pub const BOTTOM_LEFT: [u8; 8] = [0x80, 0, 0, 0, 0, 0, 0, 0];

pub const FULL: [u8; 8] = [0xFF; 8];
