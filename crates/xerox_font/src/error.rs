//! Unified error types for xerox_font

use std::path::PathBuf;
use thiserror::Error;

/// Section of the file preamble that was being read when a header read failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSection {
    ExtraHeader,
    FontHeader,
    WidthTable,
}

impl std::fmt::Display for HeaderSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeaderSection::ExtraHeader => write!(f, "extra header"),
            HeaderSection::FontHeader => write!(f, "font header"),
            HeaderSection::WidthTable => write!(f, "width table"),
        }
    }
}

/// Main error type for font loading and export
#[derive(Debug, Error)]
pub enum FontError {
    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open file '{path}': {message}")]
    OpenFile { path: PathBuf, message: String },

    // === Loading Errors ===
    #[error("Unknown font format: first byte ${byte:02X} is neither an orientation nor a known format code")]
    UnknownFormat { byte: u8 },

    #[error("Truncated {section} at offset ${offset:04X}: expected {expected} bytes, got {actual}")]
    TruncatedHeader {
        section: HeaderSection,
        offset: u64,
        expected: usize,
        actual: usize,
    },

    #[error("Truncated metadata table: record {index} at offset ${offset:04X} is incomplete")]
    TruncatedMetadata { index: usize, offset: u64 },

    #[error("Truncated glyph for character {character} at offset ${offset:04X}: expected {expected} bytes, got {actual}")]
    TruncatedGlyph {
        character: u32,
        offset: u64,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid glyph dimensions for character {character}: {width}x{height} (bitmap size ${bitmap_size:04X})")]
    InvalidGlyphDimensions {
        character: u32,
        width: usize,
        height: usize,
        bitmap_size: u16,
    },

    #[error("Glyph offset ${offset:04X} for character {character} lies beyond the end of the data ({length} bytes)")]
    Seek { character: u32, offset: u64, length: u64 },

    // === Export Errors ===
    #[error("Unknown metadata file format: {extension}")]
    UnknownMetadataFormat { extension: String },

    #[error("Invalid hex color: {value}")]
    InvalidHexColor { value: String },

    // === External Errors ===
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for xerox_font operations
pub type Result<T> = std::result::Result<T, FontError>;

impl FontError {
    /// Create an open file error
    pub fn open_file(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::OpenFile {
            path: path.into(),
            message: msg.into(),
        }
    }
}
