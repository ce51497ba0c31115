//! Tabular and world-space printing

mod common;

use common::{draws, font, quad_origin, DESCENDER};
use ember_text::{
    color_code, split_table_columns, BatchKind, Color, PrintOptions, SinkEvent, TextError,
    COLOR_CODE,
};
use pretty_assertions::assert_eq;

#[test]
fn test_table_columns_start_at_cumulative_widths() {
    let mut font = font();
    let first_column_width = font.text_width("A\nC");
    font.print_table(0.0, 0.0, 1.0, PrintOptions::empty(), "A\tB\nC\tD");

    let draws = draws(&font);
    assert_eq!(draws.len(), 2);
    assert_eq!(first_column_width, 11.0);

    // Column 0 holds A and C, column 1 holds B and D
    assert_eq!(draws[0].vertices.len(), 2 * 4);
    assert_eq!(quad_origin(&draws[0].vertices, 0)[0], 0.0);
    assert_eq!(quad_origin(&draws[1].vertices, 0)[0], first_column_width);
    assert_eq!(quad_origin(&draws[1].vertices, 1)[0], first_column_width);

    // Columns are printed on the baseline
    assert_eq!(quad_origin(&draws[1].vertices, 0)[1], DESCENDER + 8.0);
}

#[test]
fn test_table_alignment_applies_to_whole_block() {
    let mut font = font();
    // Total width 10 + 12
    font.print_table(100.0, 0.0, 1.0, PrintOptions::RIGHT, "A\tB");

    let draws = draws(&font);
    assert_eq!(quad_origin(&draws[0].vertices, 0)[0], 78.0);
    assert_eq!(quad_origin(&draws[1].vertices, 0)[0], 88.0);
}

#[test]
fn test_table_top_anchor_skips_initial_descender_move() {
    let mut font = font();
    font.print_table(0.0, 0.0, 1.0, PrintOptions::TOP, "A\tT");

    let draws = draws(&font);
    // Block height 9 ('T'), then the per-column baseline move
    assert_eq!(quad_origin(&draws[0].vertices, 0)[1], -9.0 + DESCENDER + 8.0);
}

#[test]
fn test_table_keeps_column_colors() {
    let mut font = font();
    let text = [COLOR_CODE, 255, 0, 0, b'A', b'\t', b'B', b'\n', b'C'];
    font.print_table(0.0, 0.0, 1.0, PrintOptions::empty(), text);

    let red = Color::rgba(1.0, 0.0, 0.0, 0.95);
    for draw in draws(&font) {
        assert_eq!(draw.flat_color, Some(red));
    }
    assert_eq!(font.text_color(), Color::DEFAULT_TEXT);
}

#[test]
fn test_split_table_columns_with_font_default() {
    let font = font();
    let columns = split_table_columns(b"A\tB\nC\tD", color_code(font.text_color()));
    assert_eq!(columns, vec![b"A\nC".to_vec(), b"B\nD".to_vec()]);
}

#[test]
fn test_print_world_wraps_session_in_transform() {
    let mut font = font();
    font.print_world([1.0, 2.0, 3.0], 1.0, "A").unwrap();

    let events = &font.sink().events;
    assert_eq!(events.len(), 6);
    assert_eq!(events[0], SinkEvent::Transform(Some([1.0, 2.0, 3.0])));
    assert!(matches!(events[1], SinkEvent::Bind(_)));
    assert_eq!(events[5], SinkEvent::Transform(None));

    let draws = draws(&font);
    assert_eq!(draws[0].kind, BatchKind::Outline);
    assert!(!draws[1].immediate);
    // Centered horizontally, descender anchored at the origin
    assert_eq!(quad_origin(&draws[1].vertices, 0), [-5.0, 8.0]);
}

#[test]
fn test_print_world_needs_closed_session() {
    let mut font = font();
    font.begin(false, true).unwrap();
    assert!(matches!(
        font.print_world([0.0; 3], 1.0, "A"),
        Err(TextError::SessionAlreadyOpen)
    ));
    font.end().unwrap();
    assert!(font.sink().events.is_empty());
}
