//! Shared fixtures for the integration tests

#![allow(dead_code)]

use ember_text::{
    Font, GlyphInfo, GlyphRect, GlyphTable, GlyphVertex, RecordedDraw, RecordingSink, TextureInfo,
};

pub type TestFont = Font<GlyphTable, RecordingSink>;

pub const SIZE: f32 = 10.0;
pub const LINE_HEIGHT: f32 = 20.0;
pub const DESCENDER: f32 = -4.0;

/// Glyph whose quad spans its advance horizontally and `descender..height`
/// vertically, with the outline variant 100 texels further down the atlas
pub fn glyph(c: char, advance: f32, height: f32, descender: f32) -> GlyphInfo {
    let size = GlyphRect::new(0.0, height, advance, descender);
    GlyphInfo {
        codepoint: c,
        advance,
        height,
        descender,
        size,
        tex_coords: size,
        shadow_tex_coords: GlyphRect::new(0.0, 100.0, advance, 100.0 + height),
    }
}

pub fn table() -> GlyphTable {
    let mut table = GlyphTable::new(SIZE, LINE_HEIGHT, DESCENDER)
        .with_outline_width(1.0)
        .with_texture(TextureInfo {
            id: 7,
            width: 256,
            height: 256,
        });
    table.insert(glyph('A', 10.0, 8.0, 0.0));
    table.insert(glyph('B', 12.0, 8.0, -2.0));
    table.insert(glyph('C', 11.0, 8.0, 0.0));
    table.insert(glyph('D', 9.0, 8.0, 0.0));
    table.insert(glyph('T', 9.0, 9.0, 0.0));
    table.insert(glyph('X', 10.0, 8.0, 0.0));
    table
}

pub fn font() -> TestFont {
    Font::new(table(), RecordingSink::default())
}

pub fn draws(font: &TestFont) -> Vec<RecordedDraw> {
    font.sink().draws().cloned().collect()
}

/// Top-left corner (`x0`, `y0`) of quad `index`
pub fn quad_origin(vertices: &[GlyphVertex], index: usize) -> [f32; 2] {
    vertices[index * 4 + 1].position
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}
