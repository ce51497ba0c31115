//! Text measurement
//!
//! All measurements are in glyph-local units; callers multiply by the print
//! scale. Directive bytes never contribute to any metric.

use crate::escape::{decode_char, skip_color_codes, COLOR_CODE, COLOR_RESET, CR, LF};
use crate::provider::{pen_advance, GlyphProvider};

/// Vertical extent of a piece of text
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextHeight {
    /// Tallest glyph of the first line
    pub height: f32,
    /// Lowest descender of the last line, pushed down by one line height per
    /// additional line
    pub descender: f32,
    /// Number of lines
    pub line_count: usize,
}

/// Position just past the line break starting at `pos`
fn skip_line_break(text: &[u8], pos: usize) -> usize {
    if text[pos] == CR && text.get(pos + 1) == Some(&LF) {
        pos + 2
    } else {
        pos + 1
    }
}

/// Advance width of a single character
pub fn char_width<P: GlyphProvider + ?Sized>(provider: &mut P, c: char) -> f32 {
    provider.glyph(c).advance
}

/// Width of the widest line, kerning included
pub fn text_width<P: GlyphProvider + ?Sized>(provider: &mut P, text: &[u8]) -> f32 {
    let mut line_width = 0.0f32;
    let mut max_width = 0.0f32;
    let mut prev: Option<char> = None;

    let mut pos = 0;
    while pos < text.len() {
        match text[pos] {
            COLOR_CODE => pos = skip_color_codes(text, pos),
            COLOR_RESET => pos += 1,
            CR | LF => {
                pos = skip_line_break(text, pos);
                if let Some(last) = prev.take() {
                    line_width += provider.glyph(last).advance;
                }
                max_width = max_width.max(line_width);
                line_width = 0.0;
            }
            _ => {
                let c = decode_char(text, &mut pos);
                if let Some(last) = prev {
                    line_width += pen_advance(provider, last, c);
                }
                prev = Some(c);
            }
        }
    }

    if let Some(last) = prev {
        line_width += provider.glyph(last).advance;
    }

    max_width.max(line_width)
}

/// Height, descender and line count of `text`.
///
/// Only glyphs on the first line raise `height`, while `descender` follows
/// the last line. Alignment code depends on this exact asymmetry.
pub fn text_height<P: GlyphProvider + ?Sized>(provider: &mut P, text: &[u8]) -> TextHeight {
    if text.is_empty() {
        return TextHeight::default();
    }

    let line_height = provider.line_height();
    let line_descender = line_height + provider.descender();

    let mut height = 0.0f32;
    let mut descender = line_descender;
    let mut line_count = 1usize;

    let mut pos = 0;
    while pos < text.len() {
        match text[pos] {
            COLOR_CODE => pos = skip_color_codes(text, pos),
            COLOR_RESET => pos += 1,
            CR | LF => {
                pos = skip_line_break(text, pos);
                line_count += 1;
                descender = line_descender;
            }
            _ => {
                let glyph = provider.glyph(decode_char(text, &mut pos));
                descender = descender.min(glyph.descender);
                if line_count == 1 {
                    height = height.max(glyph.height);
                }
            }
        }
    }

    descender -= (line_count - 1) as f32 * line_height;

    TextHeight {
        height,
        descender,
        line_count,
    }
}

/// Number of lines in `text`; zero for empty text
pub fn line_count(text: &[u8]) -> usize {
    if text.is_empty() {
        return 0;
    }

    let mut lines = 1;
    let mut pos = 0;
    while pos < text.len() {
        match text[pos] {
            COLOR_CODE => pos = skip_color_codes(text, pos),
            CR | LF => {
                pos = skip_line_break(text, pos);
                lines += 1;
            }
            _ => pos += 1,
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{GlyphInfo, GlyphTable};

    fn glyph(c: char, advance: f32, height: f32, descender: f32) -> GlyphInfo {
        GlyphInfo {
            codepoint: c,
            advance,
            height,
            descender,
            ..Default::default()
        }
    }

    fn table() -> GlyphTable {
        let mut table = GlyphTable::new(16.0, 1.5, -0.25);
        table.insert(glyph('A', 10.0, 0.7, 0.0));
        table.insert(glyph('B', 12.0, 0.7, 0.0));
        table.insert(glyph('g', 8.0, 0.5, -0.3));
        table.insert(glyph('T', 9.0, 0.9, 0.0));
        table
    }

    #[test]
    fn test_width_sums_advances() {
        let mut table = table();
        assert_eq!(text_width(&mut table, b"AB"), 22.0);
        assert_eq!(text_width(&mut table, b""), 0.0);
    }

    #[test]
    fn test_width_applies_kerning_between_pairs() {
        let mut table = table();
        table.set_kerning('A', 'B', -2.0);
        assert_eq!(text_width(&mut table, b"AB"), 20.0);
        // No kerning across a line break
        assert_eq!(text_width(&mut table, b"A\nB"), 12.0);
    }

    #[test]
    fn test_width_takes_widest_line() {
        let mut table = table();
        assert_eq!(text_width(&mut table, b"A\r\nBBB\nAB"), 36.0);
        assert_eq!(text_width(&mut table, b"AB\n"), 22.0);
    }

    #[test]
    fn test_width_ignores_directives() {
        let mut table = table();
        let text = [COLOR_CODE, b'A', b'A', b'A', b'A', COLOR_RESET, b'B'];
        assert_eq!(text_width(&mut table, &text), 22.0);
    }

    #[test]
    fn test_line_count() {
        assert_eq!(line_count(b""), 0);
        assert_eq!(line_count(b"single"), 1);
        assert_eq!(line_count(b"a\nb\r\nc\rd"), 4);
        assert_eq!(line_count(&[COLOR_CODE, b'\n', b'\n', b'\n', b'x']), 1);
    }

    #[test]
    fn test_height_counts_only_first_line() {
        let mut table = table();
        let single = text_height(&mut table, b"AB");
        let multi = text_height(&mut table, b"AB\nT");

        assert_eq!(multi.line_count, 2);
        // 'T' is taller but sits on the second line, so it is not counted
        assert_eq!(multi.height, single.height);
        assert_eq!(multi.height, 0.7);
    }

    #[test]
    fn test_height_descender_follows_last_line() {
        let mut table = table();

        let first_line_g = text_height(&mut table, b"g\nA");
        assert_eq!(first_line_g.descender, 0.0 - 1.5);

        let last_line_g = text_height(&mut table, b"A\ng");
        assert_eq!(last_line_g.descender, -0.3 - 1.5);

        let empty = text_height(&mut table, b"");
        assert_eq!(empty, TextHeight::default());
    }
}
