use xerox_font::{Font, FontError, MetaDialect, Orientation};

use super::{BOTTOM_LEFT, FULL, FontBuilder, SPACE_WIDTH, TestGlyph};

#[test]
fn test_load_9700() {
    let _ = env_logger::builder().is_test(true).try_init();
    let builder = FontBuilder::new(MetaDialect::Xerox9700).square(b'A', FULL).square(b'B', BOTTOM_LEFT);
    let font = Font::from_bytes(&builder.build()).unwrap();

    assert!(font.extra_header.is_none());
    assert_eq!(font.dialect, MetaDialect::Xerox9700);
    assert_eq!(font.header.orientation, Orientation::Portrait);
    assert_eq!(font.header.font_name(), "XTEST");
    assert_eq!(font.header.library(), "TESTLIB");
    assert_eq!(font.table_end, builder.table_end() as u64);

    assert_eq!(font.characters.len(), 128);
    for c in font.characters.values() {
        assert_eq!(c.is_space, c.raw_glyph().is_empty(), "character {}", c.value);
    }
    assert_eq!(font.glyph_count(), 2);

    let a = font.character('A').unwrap();
    assert_eq!((a.width(), a.height()), (8, 8));
    assert_eq!(a.cell_width, 10);
    assert_eq!(a.raw_glyph(), &FULL);
    assert_eq!(font.character('B').unwrap().raw_glyph(), &BOTTOM_LEFT);

    let space = font.character(' ').unwrap();
    assert!(space.is_space);
    assert_eq!(space.cell_width, SPACE_WIDTH);
    assert_eq!(font.width_table[b'A' as usize], 10);
}

#[test]
fn test_load_five_word() {
    let builder = FontBuilder::new(MetaDialect::FiveWord).reserved(0x1234).square(b'x', FULL);
    let font = Font::from_bytes(&builder.build()).unwrap();

    assert_eq!(font.dialect, MetaDialect::FiveWord);
    assert_eq!(font.characters.len(), 128);
    let x = font.character('x').unwrap();
    assert_eq!(x.reserved, 0x1234);
    assert_eq!(x.cell_width, 10);
    assert_eq!(x.raw_glyph(), &FULL);
}

#[test]
fn test_extra_header_selects_dialect() {
    let builder = FontBuilder::new(MetaDialect::FiveWord).extra_header(0xA8).square(b'A', FULL);
    let font = Font::from_bytes(&builder.build()).unwrap();

    let extra = font.extra_header.as_ref().unwrap();
    assert_eq!(extra.format.code(), 0xA8);
    assert_eq!(extra.format.name(), "5Word Portrait");
    assert_eq!(font.dialect, MetaDialect::FiveWord);
    assert_eq!(font.table_start, (128 + 256 + 256) as u64);
    assert_eq!(font.character('A').unwrap().raw_glyph(), &FULL);
}

#[test]
fn test_record_count_rounds_up() {
    let font = Font::from_bytes(&FontBuilder::new(MetaDialect::Xerox9700).last_character(200).build()).unwrap();
    assert_eq!(font.characters.len(), 256);
    assert_eq!(font.glyph_count(), 0);
}

#[test]
fn test_odd_glyph_is_padded() {
    let glyph = TestGlyph {
        code: b'i',
        blanks: 1,
        cell_width: 4,
        width: 8,
        height: 3,
        data: vec![0x80, 0x40, 0x00],
    };
    let font = Font::from_bytes(&FontBuilder::new(MetaDialect::Xerox9700).glyph(glyph).build()).unwrap();
    let i = font.character('i').unwrap();
    assert_eq!(i.blanks_left, 1);
    assert_eq!(i.raw_glyph(), &[0x80, 0x40, 0x00, 0x00]);
    assert_eq!(i.mask().dimensions(), (3, 8));
}

#[test]
fn test_unknown_format() {
    let mut data = FontBuilder::new(MetaDialect::Xerox9700).build();
    data[0] = 0x01;
    assert!(matches!(Font::from_bytes(&data), Err(FontError::UnknownFormat { byte: 0x01 })));
}

#[test]
fn test_truncated_metadata() {
    let mut data = FontBuilder::new(MetaDialect::Xerox9700).build();
    data.truncate(512 + 8 * 10 + 3);
    assert!(matches!(Font::from_bytes(&data), Err(FontError::TruncatedMetadata { index: 10, offset: 592 })));
}

#[test]
fn test_truncated_glyph() {
    let builder = FontBuilder::new(MetaDialect::Xerox9700).square(b'A', FULL);
    let mut data = builder.build();
    data.truncate(builder.table_end() + 4);
    match Font::from_bytes(&data) {
        Err(FontError::TruncatedGlyph {
            character,
            expected,
            actual,
            ..
        }) => {
            assert_eq!(character, 'A' as u32);
            assert_eq!(expected, 8);
            assert_eq!(actual, 4);
        }
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn test_glyph_offset_beyond_end() {
    // B is stored first, so A's data starts 8 bytes into the glyph region
    let builder = FontBuilder::new(MetaDialect::Xerox9700).square(b'B', FULL).square(b'A', FULL);
    let mut data = builder.build();
    data.truncate(builder.table_end() + 4);
    assert!(matches!(Font::from_bytes(&data), Err(FontError::Seek { character: 65, .. })));
}

#[test]
fn test_invalid_dimensions() {
    let glyph = TestGlyph {
        code: b'Z',
        blanks: 0,
        cell_width: 4,
        width: 0,
        height: 8,
        data: vec![0; 2],
    };
    let data = FontBuilder::new(MetaDialect::Xerox9700).glyph(glyph).build();
    assert!(matches!(
        Font::from_bytes(&data),
        Err(FontError::InvalidGlyphDimensions {
            character: 90,
            width: 0,
            height: 8,
            ..
        })
    ));
}

#[test]
fn test_missing_file() {
    let result = Font::load_file(std::path::Path::new("does/not/exist.fnt"));
    assert!(matches!(result, Err(FontError::OpenFile { .. })));
}
