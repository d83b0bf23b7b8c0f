//! BDF 2.2 export.

use std::borrow::Cow;
use std::io::Write;

use crate::glyph::Character;
use crate::header::FontHeader;
use crate::{Font, Result};

pub const DEFAULT_POINT_SIZE: u32 = 10;

/// Resolution written to `SIZE` and used for `SWIDTH`.
pub const RESOLUTION: u32 = 300;

/// PostScript glyph names for codes 0-255 (Windows-1252 layout above 127).
pub static POSTSCRIPT_NAMES: [&str; 256] = [
    "U0", "controlSTX", "controlSOT", "controlETX", "controlEOT", "controlENQ", "controlACK", "controlBEL",
    "controlBS", "controlHT", "controlLF", "controlVT", "controlFF", "controlCR", "controlSO", "controlSI",
    "controlDLE", "controlDC1", "controlDC2", "controlDC3", "controlDC4", "controlNAK", "controlSYN", "controlETB",
    "controlCAN", "controlEM", "controlSUB", "controlESC", "controlFS", "controlGS", "controlRS", "controlUS",
    "space", "exclam", "quotedbl", "numbersign", "dollar", "percent", "ampersand", "quotesingle",
    "parenleft", "parenright", "asterisk", "plus", "comma", "hyphen", "period", "slash",
    "zero", "one", "two", "three", "four", "five", "six", "seven",
    "eight", "nine", "colon", "semicolon", "less", "equal", "greater", "question",
    "at", "A", "B", "C", "D", "E", "F", "G",
    "H", "I", "J", "K", "L", "M", "N", "O",
    "P", "Q", "R", "S", "T", "U", "V", "W",
    "X", "Y", "Z", "bracketleft", "backslash", "bracketright", "asciicircum", "underscore",
    "grave", "a", "b", "c", "d", "e", "f", "g",
    "h", "i", "j", "k", "l", "m", "n", "o",
    "p", "q", "r", "s", "t", "u", "v", "w",
    "x", "y", "z", "braceleft", "bar", "braceright", "asciitilde", "controlDEL",
    "Euro", "U81", "quotesinglbase", "florin", "quotedblbase", "ellipsis", "dagger", "daggerdbl",
    "circumflex", "perthousand", "Scaron", "guilsinglleft", "OE", "U8D", "Zcaron", "U8F",
    "U90", "quoteleft", "quoteright", "quotedblleft", "quotedblright", "bullet", "endash", "emdash",
    "tilde", "trademark", "scaron", "guilsinglright", "oe", "U9D", "zcaron", "Ydieresis",
    "nbspace", "exclamdown", "cent", "sterling", "currency", "yen", "brokenbar", "section",
    "dieresis", "copyright", "ordfeminine", "guillemotleft", "logicalnot", "sfthyphen", "registered", "macron",
    "degree", "plusminus", "twosuperior", "threesuperior", "acute", "mu", "paragraph", "middot",
    "cedilla", "onesuperior", "ordmasculine", "guillemotright", "onequarter", "onehalf", "threequarters", "questiondown",
    "Agrave", "Aacute", "Acircumflex", "Atilde", "Adieresis", "Aring", "AE", "Ccedilla",
    "Egrave", "Eacute", "Ecircumflex", "Edieresis", "Igrave", "Iacute", "Icircumflex", "Idieresis",
    "Eth", "Ntilde", "Ograve", "Oacute", "Ocircumflex", "Otilde", "Odieresis", "multiply",
    "Oslash", "Ugrave", "Uacute", "Ucircumflex", "Udieresis", "Yacute", "Thorn", "germandbls",
    "agrave", "aacute", "acircumflex", "atilde", "adieresis", "aring", "ae", "ccedilla",
    "egrave", "eacute", "ecircumflex", "edieresis", "igrave", "iacute", "icircumflex", "idieresis",
    "eth", "ntilde", "ograve", "oacute", "ocircumflex", "otilde", "odieresis", "divide",
    "oslash", "ugrave", "uacute", "ucircumflex", "udieresis", "yacute", "thorn", "ydieresis",
];

/// Glyph name for a character code, `U<hex>` beyond the name table.
pub fn glyph_name(code: u32) -> Cow<'static, str> {
    match POSTSCRIPT_NAMES.get(code as usize) {
        Some(name) => Cow::Borrowed(*name),
        None => Cow::Owned(format!("U{code:X}")),
    }
}

fn is_exported(c: &Character) -> bool {
    !c.is_space && c.value != ' ' as u32
}

/// Writes `font` as BDF 2.2.
pub fn write_bdf<W: Write>(font: &Font, point_size: u32, out: &mut W) -> Result<()> {
    let header = &font.header;
    let name: Vec<String> = [header.font_name(), header.revision(), header.version(), header.library()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();

    writeln!(out, "STARTFONT 2.2")?;
    writeln!(out, "FONT {}", name.join(" "))?;
    writeln!(out, "SIZE {point_size} {RESOLUTION} {RESOLUTION}")?;
    writeln!(
        out,
        "FONTBOUNDINGBOX {} {} 0 {}",
        header.fixed_width,
        header.pixel_height,
        -(header.distance_below as i32)
    )?;
    writeln!(out, "STARTPROPERTIES 2")?;
    writeln!(out, "FONT_ASCENT {}", header.distance_above)?;
    writeln!(out, "FONT_DESCENT {}", header.distance_below)?;
    writeln!(out, "ENDPROPERTIES")?;

    let glyphs: Vec<&Character> = font.characters.values().filter(|c| is_exported(c)).collect();
    writeln!(out, "CHARS {}", glyphs.len())?;
    for c in glyphs {
        write_char(out, c, header)?;
    }

    writeln!(out, "ENDFONT")?;
    Ok(())
}

/// Convenience wrapper around [`write_bdf`].
pub fn to_bdf_string(font: &Font, point_size: u32) -> Result<String> {
    let mut out = Vec::new();
    write_bdf(font, point_size, &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// The bitmap box is the glyph's screen canvas, so rotated glyphs export with
/// swapped width and height.
fn write_char<W: Write>(out: &mut W, c: &Character, header: &FontHeader) -> Result<()> {
    let mask = c.mask();
    let (width, height) = mask.dimensions();
    writeln!(out, "STARTCHAR {}", glyph_name(c.value))?;
    writeln!(out, "ENCODING {}", c.value)?;
    writeln!(out, "BBX {} {} 0 {}", width, height, c.blanks_left as i32 - header.distance_below as i32)?;
    writeln!(out, "SWIDTH {RESOLUTION} 0")?;
    writeln!(out, "DWIDTH {} 0", c.cell_width)?;
    writeln!(out, "BITMAP")?;

    let row_bytes = (width as usize).div_ceil(8).max(1);
    let mut exported = 0;
    for y in 0..height {
        let mut line = String::with_capacity(row_bytes * 2);
        for byte in 0..row_bytes {
            let mut value = 0u8;
            for bit in 0..8 {
                let x = (byte * 8 + bit) as u32;
                let ink = mask.get_pixel_checked(x, y).is_some_and(|p| p[3] != 0);
                exported += ink as usize;
                value = (value << 1) | ink as u8;
            }
            line.push_str(&format!("{value:02X}"));
        }
        writeln!(out, "{line}")?;
    }

    let total = mask.pixels().filter(|p| p[3] != 0).count();
    if exported != total {
        log::warn!("character {}: {} of {} ink pixels lie outside the bitmap box", c.value, total - exported, total);
    }

    writeln!(out, "ENDCHAR")?;
    Ok(())
}
