//! Font preamble: the optional 128 byte extra header and the 256 byte font header.
//!
//! Fonts saved by newer tooling start with an extra header whose first byte
//! identifies the font format. Older fonts start directly with the font header,
//! whose first byte is the orientation. The two byte ranges never overlap, so the
//! first byte of the file is enough to tell which layout follows.

use std::collections::HashMap;
use std::fmt;
use std::io::{Cursor, Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::HeaderSection;
use crate::metadata::MetaDialect;
use crate::{FontError, Result, read_block};

/// Size of the optional extra header in bytes.
pub const EXTRA_HEADER_SIZE: usize = 128;

/// Size of the font header in bytes.
pub const FONT_HEADER_SIZE: usize = 256;

lazy_static::lazy_static! {
    static ref FONT_FORMATS: HashMap<u8, (MetaDialect, &'static str)> = HashMap::from([
        (0xA8, (MetaDialect::FiveWord, "5Word Portrait")),
        (0xD0, (MetaDialect::FiveWord, "5Word Landscape")),
        (0x2F, (MetaDialect::FiveWord, "5Word Landscape")),
        (0x58, (MetaDialect::FiveWord, "5Word Inverted Portrait")),
        (0xF8, (MetaDialect::FiveWord, "5Word Inverted Landscape")),
        (0xE6, (MetaDialect::FiveWord, "5Word Unknown")),
        (0x20, (MetaDialect::Xerox9700, "9700 Portrait")),
        (0x98, (MetaDialect::Xerox9700, "9700 Portrait")),
        (0x48, (MetaDialect::Xerox9700, "9700 Landscape")),
        (0x80, (MetaDialect::Xerox9700, "9700 Inverted Portrait")),
        (0x70, (MetaDialect::Xerox9700, "9700 Inverted Landscape")),
    ]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Portrait,
    Landscape,
    InvertedPortrait,
    InvertedLandscape,
    Unknown(u8),
}

impl Orientation {
    pub const PORTRAIT: u8 = 0x50;
    pub const LANDSCAPE: u8 = 0x4C;
    pub const INVERTED_PORTRAIT: u8 = 0x49;
    pub const INVERTED_LANDSCAPE: u8 = 0x4A;

    pub fn from_byte(byte: u8) -> Self {
        match byte {
            Self::PORTRAIT => Orientation::Portrait,
            Self::LANDSCAPE => Orientation::Landscape,
            Self::INVERTED_PORTRAIT => Orientation::InvertedPortrait,
            Self::INVERTED_LANDSCAPE => Orientation::InvertedLandscape,
            b => Orientation::Unknown(b),
        }
    }

    /// True if `byte` is one of the four orientation codes a font header starts with.
    pub fn is_orientation_byte(byte: u8) -> bool {
        !matches!(Self::from_byte(byte), Orientation::Unknown(_))
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Portrait => write!(f, "Portrait"),
            Orientation::Landscape => write!(f, "Landscape"),
            Orientation::InvertedPortrait => write!(f, "Inverted Portrait"),
            Orientation::InvertedLandscape => write!(f, "Inverted Landscape"),
            Orientation::Unknown(_) => write!(f, "Unknown"),
        }
    }
}

/// Format code stored in the first byte of the extra header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontFormat(u8);

impl FontFormat {
    /// Returns `None` for codes outside the known format table.
    pub fn from_byte(byte: u8) -> Option<Self> {
        FONT_FORMATS.contains_key(&byte).then_some(FontFormat(byte))
    }

    pub fn code(self) -> u8 {
        self.0
    }

    pub fn dialect(self) -> MetaDialect {
        FONT_FORMATS.get(&self.0).map_or(MetaDialect::Xerox9700, |(dialect, _)| *dialect)
    }

    pub fn name(self) -> &'static str {
        FONT_FORMATS.get(&self.0).map_or("Unknown", |(_, name)| *name)
    }
}

impl fmt::Display for FontFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Header written in front of the font header by newer font tools.
///
/// Only the format byte is interpreted. The remaining ranges are kept verbatim
/// so they can be shown in reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraHeader {
    pub format: FontFormat,
    /// `F` for fixed, `P` for proportional
    pub font_type: u8,
    pub unknown_c: [u8; 16],
    pub font_name_a: [u8; 6],
    pub font_name_b: [u8; 6],
    pub unknown_a: [u8; 4],
    pub unknown_b: [u8; 12],
    pub end: u8,
}

impl ExtraHeader {
    fn parse(format: FontFormat, data: &[u8]) -> Result<Self> {
        let mut br = Cursor::new(data);
        br.read_u8()?; // format code, already resolved
        let font_type = br.read_u8()?;
        let mut unknown_c = [0; 16];
        br.read_exact(&mut unknown_c)?;
        let mut font_name_a = [0; 6];
        br.read_exact(&mut font_name_a)?;
        let mut font_name_b = [0; 6];
        br.read_exact(&mut font_name_b)?;
        let mut unknown_a = [0; 4];
        br.read_exact(&mut unknown_a)?;
        let mut unknown_b = [0; 12];
        br.read_exact(&mut unknown_b)?;
        br.set_position(EXTRA_HEADER_SIZE as u64 - 1);
        let end = br.read_u8()?;

        Ok(Self {
            format,
            font_type,
            unknown_c,
            font_name_a,
            font_name_b,
            unknown_a,
            unknown_b,
            end,
        })
    }
}

impl fmt::Display for ExtraHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FontFormat: ${:02X} {}", self.format.code(), self.format)?;
        writeln!(f, "FontType:   {}   ${:02X}", printable(self.font_type), self.font_type)?;
        writeln!(f, "UnknownC:   ${}", hex(&self.unknown_c))?;
        writeln!(f, "FontNameA:  {:?}", padded_text(&self.font_name_a))?;
        writeln!(f, "FontNameB:  {:?}", padded_text(&self.font_name_b))?;
        writeln!(f, "UnknownA:   ${}", hex(&self.unknown_a))?;
        writeln!(f, "UnknownB:   ${}", hex(&self.unknown_b))?;
        writeln!(f, "End:        {}   ${:X}", printable(self.end), self.end)
    }
}

/// The font header present in every font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontHeader {
    pub orientation: Orientation,
    /// `F` for fixed, `P` for proportional
    pub font_type: u8,
    pub pixel_height: u16,
    pub line_spacing: u16,
    pub fixed_width: u16,
    pub distance_below: u16,
    pub distance_above: u16,
    pub distance_leading: u16,
    pub unknown_d: u16,
    pub last_character: u16,
    /// Non-zero in 9700 fonts, zero in 5-word fonts.
    pub bitmap_size: u16,
    pub unknown_e: u16,
    /// Filled by 5-word fonts instead of `bitmap_size`, meaning unresolved.
    pub unknown_5word: u16,
    pub font_name: [u8; 6],
    pub revision: [u8; 2],
    pub unknown_f: [u8; 2],
    pub version: [u8; 2],
    pub library: [u8; 10],
}

impl FontHeader {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut br = Cursor::new(data);
        let orientation = Orientation::from_byte(br.read_u8()?);
        let font_type = br.read_u8()?;
        let pixel_height = br.read_u16::<LittleEndian>()?;
        let line_spacing = br.read_u16::<LittleEndian>()?;
        let fixed_width = br.read_u16::<LittleEndian>()?;
        let distance_below = br.read_u16::<LittleEndian>()?;
        let distance_above = br.read_u16::<LittleEndian>()?;
        let distance_leading = br.read_u16::<LittleEndian>()?;
        let unknown_d = br.read_u16::<LittleEndian>()?;
        let last_character = br.read_u16::<LittleEndian>()?;
        let bitmap_size = br.read_u16::<LittleEndian>()?;
        let unknown_e = br.read_u16::<LittleEndian>()?;
        let unknown_5word = br.read_u16::<LittleEndian>()?;
        let mut font_name = [0; 6];
        br.read_exact(&mut font_name)?;
        let mut revision = [0; 2];
        br.read_exact(&mut revision)?;
        let mut unknown_f = [0; 2];
        br.read_exact(&mut unknown_f)?;
        let mut version = [0; 2];
        br.read_exact(&mut version)?;
        let mut library = [0; 10];
        br.read_exact(&mut library)?;
        // remaining 210 bytes are unused

        Ok(Self {
            orientation,
            font_type,
            pixel_height,
            line_spacing,
            fixed_width,
            distance_below,
            distance_above,
            distance_leading,
            unknown_d,
            last_character,
            bitmap_size,
            unknown_e,
            unknown_5word,
            font_name,
            revision,
            unknown_f,
            version,
            library,
        })
    }

    /// Dialect implied by the header alone, used when there is no extra header.
    pub fn dialect(&self) -> MetaDialect {
        if self.bitmap_size == 0 { MetaDialect::FiveWord } else { MetaDialect::Xerox9700 }
    }

    pub fn font_name(&self) -> String {
        padded_text(&self.font_name)
    }

    pub fn revision(&self) -> String {
        padded_text(&self.revision)
    }

    pub fn version(&self) -> String {
        padded_text(&self.version)
    }

    pub fn library(&self) -> String {
        padded_text(&self.library)
    }

    pub fn font_type_name(&self) -> String {
        match self.font_type {
            b'P' => "Proportional".to_string(),
            b'F' => "Fixed".to_string(),
            t => char::from(t).to_string(),
        }
    }

    /// Ascent plus descent.
    pub fn max_height(&self) -> i64 {
        self.distance_above as i64 + self.distance_below as i64
    }
}

impl fmt::Display for FontHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FontName:        {:?}", self.font_name())?;
        writeln!(f, "Revision:        {:?}", self.revision())?;
        writeln!(f, "Version:         {:?}", self.version())?;
        writeln!(f, "Library:         {:?}", self.library())?;
        writeln!(f, "Orientation:     {}", self.orientation)?;
        writeln!(f, "FontType:        {}   ${:02X}", printable(self.font_type), self.font_type)?;
        let fields = [
            ("PixelHeight:", self.pixel_height),
            ("LineSpacing:", self.line_spacing),
            ("FixedWidth:", self.fixed_width),
            ("DistanceBelow:", self.distance_below),
            ("DistanceAbove:", self.distance_above),
            ("DistanceLeading:", self.distance_leading),
            ("LastCharacter:", self.last_character),
        ];
        for (label, value) in fields {
            writeln!(f, "{label:<16} {value:<3} ${value:04X}")?;
        }
        Ok(())
    }
}

/// Everything in front of the width table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontHeaders {
    pub extra: Option<ExtraHeader>,
    pub header: FontHeader,
}

impl FontHeaders {
    /// Reads the extra header (if present) and the font header.
    ///
    /// On success the reader is positioned directly behind the font header.
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let start = reader.stream_position()?;
        let probe = read_block(reader, 1)?;
        let Some(&first) = probe.first() else {
            return Err(FontError::TruncatedHeader {
                section: HeaderSection::FontHeader,
                offset: start,
                expected: FONT_HEADER_SIZE,
                actual: 0,
            });
        };
        reader.seek(SeekFrom::Start(start))?;

        let extra = if Orientation::is_orientation_byte(first) {
            None
        } else {
            let Some(format) = FontFormat::from_byte(first) else {
                return Err(FontError::UnknownFormat { byte: first });
            };
            let data = read_section(reader, HeaderSection::ExtraHeader, EXTRA_HEADER_SIZE)?;
            let extra = ExtraHeader::parse(format, &data)?;
            log::debug!("extra header present, format ${:02X} ({})", format.code(), format);
            Some(extra)
        };

        let data = read_section(reader, HeaderSection::FontHeader, FONT_HEADER_SIZE)?;
        let header = FontHeader::parse(&data)?;
        if let Orientation::Unknown(b) = header.orientation {
            log::warn!("font header has unknown orientation byte ${b:02X}");
        }
        log::debug!(
            "font header: {:?} {}x{} last character {}",
            header.font_name(),
            header.fixed_width,
            header.pixel_height,
            header.last_character
        );

        Ok(Self { extra, header })
    }

    /// Metadata dialect: the extra header's format code wins over the font header discriminator.
    pub fn dialect(&self) -> MetaDialect {
        match &self.extra {
            Some(extra) => extra.format.dialect(),
            None => self.header.dialect(),
        }
    }

    /// Number of bytes the headers occupy in the file.
    pub fn size(&self) -> usize {
        if self.extra.is_some() { EXTRA_HEADER_SIZE + FONT_HEADER_SIZE } else { FONT_HEADER_SIZE }
    }
}

pub(crate) fn read_section<R: Read + Seek>(reader: &mut R, section: HeaderSection, len: usize) -> Result<Vec<u8>> {
    let offset = reader.stream_position()?;
    let data = read_block(reader, len)?;
    if data.len() < len {
        return Err(FontError::TruncatedHeader {
            section,
            offset,
            expected: len,
            actual: data.len(),
        });
    }
    Ok(data)
}

/// Null padded text field, trimmed.
pub(crate) fn padded_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim_matches(|c: char| c == '\0' || c.is_whitespace()).to_string()
}

fn printable(byte: u8) -> char {
    if byte.is_ascii_graphic() { char::from(byte) } else { '.' }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}
