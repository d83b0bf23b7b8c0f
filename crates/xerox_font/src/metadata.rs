//! Character width table and per-character metadata records.
//!
//! Two record layouts exist. 9700 fonts use four words per character, fonts
//! written by some save tools use five. Both are normalized into
//! [`CharacterMeta`] so the rest of the crate never looks at the raw layout.

use std::fmt;
use std::io::{Cursor, Read, Seek};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::HeaderSection;
use crate::header::read_section;
use crate::{FontError, Result, read_block};

/// Size of the character width table that follows the font header.
pub const WIDTH_TABLE_SIZE: usize = 256;

/// Metadata tables always hold a multiple of this many records.
pub const TABLE_GRANULE: usize = 128;

/// Bit 15 of the blanks word marks a character without glyph data.
pub const SPACING_FLAG: u16 = 0x8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaDialect {
    /// Four word records used on the 9700 printer family
    Xerox9700,
    /// Five word records written by some font save tools
    FiveWord,
}

impl MetaDialect {
    /// Size of one metadata record in bytes.
    pub fn record_size(self) -> usize {
        match self {
            MetaDialect::Xerox9700 => 8,
            MetaDialect::FiveWord => 10,
        }
    }
}

impl fmt::Display for MetaDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaDialect::Xerox9700 => write!(f, "9700"),
            MetaDialect::FiveWord => write!(f, "5Word"),
        }
    }
}

/// Number of metadata records stored for a font whose last character is `last_character`.
pub fn record_count(last_character: u16) -> usize {
    (last_character as usize).div_ceil(TABLE_GRANULE).max(1) * TABLE_GRANULE
}

/// Normalized metadata of one character slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharacterMeta {
    pub blanks_left: u16,
    /// No glyph data, the slot only advances the cursor.
    pub spacing: bool,
    /// Offset in 16 bit units from the end of the metadata table.
    pub glyph_offset: u16,
    /// Packed glyph dimensions, see [`crate::glyph::decode_bitmap_size`].
    pub bitmap_size: i16,
    pub cell_width: u16,
    /// Extra word of 5-word records. Meaning unresolved, zero for 9700 records.
    pub reserved: u16,
}

impl CharacterMeta {
    /// Splits the packed blanks word into blank count and spacing flag.
    pub fn unpack_blanks(raw: u16) -> (u16, bool) {
        (raw & !SPACING_FLAG, raw & SPACING_FLAG != 0)
    }

    /// Absolute file offset of the glyph data, given the end of the metadata table.
    pub fn glyph_address(&self, table_end: u64) -> u64 {
        table_end + self.glyph_offset as u64 * 2
    }
}

impl fmt::Display for CharacterMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BlanksLeft:   ${:04X} {:3}", self.blanks_left, self.blanks_left)?;
        writeln!(f, "Spacing:      {}", self.spacing)?;
        writeln!(f, "GlyphOffset:  ${:04X} {:4}", self.glyph_offset, self.glyph_offset)?;
        writeln!(f, "BitmapSize:   ${:04X} {:4}", self.bitmap_size as u16, self.bitmap_size)?;
        writeln!(f, "CellWidth:    ${:04X} {:3}", self.cell_width, self.cell_width)
    }
}

/// 9700 record: blanks, glyph offset, bitmap size, cell width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meta9700 {
    pub blanks: u16,
    pub glyph_offset: u16,
    pub bitmap_size: i16,
    pub cell_width: u16,
}

/// 5-word record: like [`Meta9700`] with an unresolved word before the cell width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meta5Word {
    pub blanks: u16,
    pub glyph_offset: u16,
    pub bitmap_size: i16,
    pub reserved: u16,
    pub cell_width: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawCharacterMeta {
    Xerox9700(Meta9700),
    FiveWord(Meta5Word),
}

impl RawCharacterMeta {
    pub fn read<R: Read>(reader: &mut R, dialect: MetaDialect) -> std::io::Result<Self> {
        let blanks = reader.read_u16::<LittleEndian>()?;
        let glyph_offset = reader.read_u16::<LittleEndian>()?;
        let bitmap_size = reader.read_i16::<LittleEndian>()?;
        Ok(match dialect {
            MetaDialect::Xerox9700 => RawCharacterMeta::Xerox9700(Meta9700 {
                blanks,
                glyph_offset,
                bitmap_size,
                cell_width: reader.read_u16::<LittleEndian>()?,
            }),
            MetaDialect::FiveWord => {
                let reserved = reader.read_u16::<LittleEndian>()?;
                RawCharacterMeta::FiveWord(Meta5Word {
                    blanks,
                    glyph_offset,
                    bitmap_size,
                    reserved,
                    cell_width: reader.read_u16::<LittleEndian>()?,
                })
            }
        })
    }

    pub fn normalize(&self) -> CharacterMeta {
        match *self {
            RawCharacterMeta::Xerox9700(m) => {
                let (blanks_left, spacing) = CharacterMeta::unpack_blanks(m.blanks);
                CharacterMeta {
                    blanks_left,
                    spacing,
                    glyph_offset: m.glyph_offset,
                    bitmap_size: m.bitmap_size,
                    cell_width: m.cell_width,
                    reserved: 0,
                }
            }
            RawCharacterMeta::FiveWord(m) => {
                let (blanks_left, spacing) = CharacterMeta::unpack_blanks(m.blanks);
                CharacterMeta {
                    blanks_left,
                    spacing,
                    glyph_offset: m.glyph_offset,
                    bitmap_size: m.bitmap_size,
                    cell_width: m.cell_width,
                    reserved: m.reserved,
                }
            }
        }
    }
}

/// Width table plus the decoded metadata records.
#[derive(Debug, Clone)]
pub struct MetadataTable {
    pub dialect: MetaDialect,
    pub width_table: [u8; WIDTH_TABLE_SIZE],
    /// File offset of the first record.
    pub start: u64,
    /// File offset behind the last record, origin of all glyph offsets.
    pub end: u64,
    pub entries: Vec<CharacterMeta>,
}

impl MetadataTable {
    /// Reads the width table and `record_count(last_character)` records.
    ///
    /// The reader must be positioned directly behind the font header and is left
    /// at the end of the metadata table.
    pub fn read<R: Read + Seek>(reader: &mut R, dialect: MetaDialect, last_character: u16) -> Result<Self> {
        let data = read_section(reader, HeaderSection::WidthTable, WIDTH_TABLE_SIZE)?;
        let mut width_table = [0; WIDTH_TABLE_SIZE];
        width_table.copy_from_slice(&data);

        let count = record_count(last_character);
        let record_size = dialect.record_size();
        let start = reader.stream_position()?;
        log::debug!("reading {count} {dialect} metadata records at ${start:04X}");

        let mut entries = Vec::with_capacity(count);
        for index in 0..count {
            let record = read_block(reader, record_size)?;
            if record.len() < record_size {
                return Err(FontError::TruncatedMetadata {
                    index,
                    offset: start + (index * record_size) as u64,
                });
            }
            let raw = RawCharacterMeta::read(&mut Cursor::new(record), dialect)?;
            entries.push(raw.normalize());
        }

        let end = reader.stream_position()?;
        Ok(Self {
            dialect,
            width_table,
            start,
            end,
            entries,
        })
    }
}
