//! Decoder for Xerox 9700 and 5-word raster printer fonts.
//!
//! A font file is a fixed preamble (optional extra header, font header and
//! width table), a table of per character metadata records and the glyph
//! bitplanes. [`Font::load`] decodes all of it; the [`bdf`] and [`dump`]
//! modules turn a decoded font into BDF, JSON, text reports and PNG images.

use std::io::Read;

pub mod bdf;
pub mod dump;

mod error;
pub use error::*;

pub mod header;
pub use header::{ExtraHeader, FontFormat, FontHeader, FontHeaders, Orientation};

pub mod metadata;
pub use metadata::{CharacterMeta, MetaDialect, MetadataTable};

pub mod glyph;
pub use glyph::Character;

pub mod raster;
pub use raster::{GlyphBitmap, parse_hex_color};

mod font;
pub use font::Font;

/// Reads up to `len` bytes. A short result means the stream ended early.
pub(crate) fn read_block<R: Read>(reader: &mut R, len: usize) -> std::io::Result<Vec<u8>> {
    let mut data = Vec::with_capacity(len);
    reader.by_ref().take(len as u64).read_to_end(&mut data)?;
    Ok(data)
}
