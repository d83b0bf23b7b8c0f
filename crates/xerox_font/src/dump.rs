//! Inspection output: JSON metadata, layout report, glyph dumps and PNG export.

use std::fs;
use std::io::Write;
use std::path::Path;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::bdf::glyph_name;
use crate::header::{EXTRA_HEADER_SIZE, FONT_HEADER_SIZE};
use crate::raster::GlyphBitmap;
use crate::{Font, FontError, MetaDialect, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderSummary {
    /// Name of the extra header format, if the font has one
    pub format: Option<String>,
    pub dialect: String,
    pub orientation: String,
    pub font_type: String,
    pub pixel_height: u16,
    pub line_spacing: u16,
    pub fixed_width: u16,
    pub distance_below: u16,
    pub distance_above: u16,
    pub distance_leading: u16,
    pub last_character: u16,
    pub bitmap_size: u16,
    pub unknown_5word: u16,
    pub font_name: String,
    pub revision: String,
    pub version: String,
    pub library: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSummary {
    pub value: u32,
    pub is_space: bool,
    pub blanks_left: u16,
    pub cell_width: u16,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSummary {
    pub header: HeaderSummary,
    pub characters: Vec<CharacterSummary>,
}

impl FontSummary {
    pub fn new(font: &Font) -> Self {
        let h = &font.header;
        let header = HeaderSummary {
            format: font.extra_header.as_ref().map(|e| e.format.name().to_string()),
            dialect: font.dialect.to_string(),
            orientation: h.orientation.to_string(),
            font_type: h.font_type_name(),
            pixel_height: h.pixel_height,
            line_spacing: h.line_spacing,
            fixed_width: h.fixed_width,
            distance_below: h.distance_below,
            distance_above: h.distance_above,
            distance_leading: h.distance_leading,
            last_character: h.last_character,
            bitmap_size: h.bitmap_size,
            unknown_5word: h.unknown_5word,
            font_name: h.font_name(),
            revision: h.revision(),
            version: h.version(),
            library: h.library(),
        };
        let characters = font
            .characters
            .values()
            .map(|c| CharacterSummary {
                value: c.value,
                is_space: c.is_space,
                blanks_left: c.blanks_left,
                cell_width: c.cell_width,
                width: c.width(),
                height: c.height(),
            })
            .collect();
        Self { header, characters }
    }
}

pub fn metadata_json(font: &Font) -> Result<String> {
    Ok(serde_json::to_string_pretty(&FontSummary::new(font))?)
}

/// Writes font metadata to `path`: `.json` as JSON summary, `.txt` as layout report.
pub fn write_metadata(font: &Font, path: &Path) -> Result<()> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_ascii_lowercase();
    match extension.as_str() {
        "json" => fs::write(path, metadata_json(font)?)?,
        "txt" => {
            let mut out = Vec::new();
            write_layout_report(font, &mut out, false)?;
            fs::write(path, out)?;
        }
        _ => return Err(FontError::UnknownMetadataFormat { extension }),
    }
    Ok(())
}

/// Human readable dump of the headers and of every metadata record with its file addresses.
pub fn write_layout_report<W: Write>(font: &Font, out: &mut W, ignore_spaces: bool) -> Result<()> {
    if font.extra_header.is_some() {
        writeln!(out, "exHeader: {EXTRA_HEADER_SIZE}")?;
    }
    writeln!(out, "header: {FONT_HEADER_SIZE}")?;
    writeln!(out)?;

    if let Some(extra) = &font.extra_header {
        writeln!(out, "= Extra header")?;
        writeln!(out, "{extra}")?;
    }
    writeln!(out, "= Standard header")?;
    writeln!(out, "{}", font.header)?;

    writeln!(out, "type: {}", font.dialect)?;
    writeln!(out, "meta len: {}", font.characters.len())?;
    writeln!(out, "first glyph at offset ${:04X}", font.table_end)?;
    writeln!(out)?;

    for c in font.characters.values() {
        if ignore_spaces && c.is_space {
            continue;
        }
        let shown = char::from_u32(c.value).filter(|ch| !ch.is_control()).unwrap_or('.');
        writeln!(out, "[${:04X}] ${:02x} {:?}", font.record_address(c.value), c.value, shown)?;
        let meta = c.meta();
        write!(out, "{meta}")?;
        if font.dialect == MetaDialect::FiveWord {
            writeln!(out, "Reserved:     ${:04X} {:4}", c.reserved, c.reserved as i16)?;
        }
        if !c.is_space {
            writeln!(out, "glyph addr:   ${:04X}", meta.glyph_address(font.table_end))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// One line per width table entry: `NNN [$XX] value`.
pub fn write_width_table<W: Write>(font: &Font, out: &mut W) -> Result<()> {
    for (i, value) in font.width_table.iter().enumerate() {
        writeln!(out, "{i:03} [${i:02X}] {value}")?;
    }
    Ok(())
}

/// Raw glyph bytes in binary, one stored row per line.
pub fn write_glyph_ascii<W: Write>(font: &Font, out: &mut W) -> Result<()> {
    for c in font.characters.values().filter(|c| !c.is_space) {
        writeln!(
            out,
            "\nCharacter 0x{:02X} [{:3}] ({}, {}) {{{}}} {}",
            c.value,
            c.value,
            c.width(),
            c.height(),
            c.raw_glyph().len(),
            glyph_name(c.value)
        )?;
        let row_bytes = GlyphBitmap::new(c.raw_glyph(), c.width(), c.height()).row_bytes().max(1);
        for row in c.raw_glyph().chunks(row_bytes) {
            let bits: Vec<String> = row.iter().map(|b| format!("{b:08b}")).collect();
            writeln!(out, "{}", bits.join(" "))?;
        }
    }
    Ok(())
}

pub fn save_png(img: &RgbaImage, path: &Path) -> Result<()> {
    img.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// File name used for the image of character `code`.
pub fn glyph_file_name(code: u32) -> String {
    format!("{code:03}_0x{code:02X}.png")
}

/// Saves the on/off image of every glyph into `dir`, returns the number of files written.
pub fn save_glyph_images(font: &Font, dir: &Path) -> Result<usize> {
    fs::create_dir_all(dir)?;
    let mut written = 0;
    for c in font.characters.values().filter(|c| !c.is_space) {
        let path = dir.join(glyph_file_name(c.value));
        log::debug!("writing {}", path.display());
        save_png(c.image(), &path)?;
        written += 1;
    }
    Ok(written)
}
