//! Inline directive scanning
//!
//! Text handed to the engine is a byte string, UTF-8 apart from two inline
//! directives:
//!
//! - `COLOR_CODE r g b`: set the text color to the three raw bytes
//! - `COLOR_RESET`: go back to the color active when the print call started
//!
//! Color bytes may take any value, so the scanner works on bytes and only
//! decodes UTF-8 for printable characters. `\r`, `\n` and `\r\n` are line
//! breaks.

use crate::color::Color;

/// Indicator byte of a color-set directive (followed by 3 color bytes)
pub const COLOR_CODE: u8 = 0x01;
/// Indicator byte of a color-reset directive
pub const COLOR_RESET: u8 = 0x08;
/// Width of a color-set directive in bytes
pub const COLOR_CODE_LEN: usize = 4;

pub(crate) const CR: u8 = 0x0d;
pub(crate) const LF: u8 = 0x0a;

/// Encode `color` as a color-set directive
pub fn color_code(color: Color) -> [u8; COLOR_CODE_LEN] {
    let [r, g, b] = color.to_rgb_bytes();
    [COLOR_CODE, r, g, b]
}

/// Remove all color-set directives, keeping every other byte
pub fn strip_color_codes(text: &[u8]) -> Vec<u8> {
    let mut plain = Vec::with_capacity(text.len());
    let mut pos = 0;
    while pos < text.len() {
        if text[pos] == COLOR_CODE {
            pos += COLOR_CODE_LEN;
        } else {
            plain.push(text[pos]);
            pos += 1;
        }
    }
    plain
}

/// Skip a run of color-set directives without reading their colors.
///
/// Returns the position of the first byte after the run, clamped to the end
/// of `text`.
pub fn skip_color_codes(text: &[u8], mut pos: usize) -> usize {
    while pos < text.len() && text[pos] == COLOR_CODE {
        pos += COLOR_CODE_LEN;
    }
    pos.min(text.len())
}

/// Decode the character starting at `pos` and advance past it.
///
/// Malformed or truncated sequences yield U+FFFD and advance by one byte so
/// scanning always makes progress.
pub fn decode_char(text: &[u8], pos: &mut usize) -> char {
    let Some(rest) = text.get(*pos..).filter(|rest| !rest.is_empty()) else {
        return char::REPLACEMENT_CHARACTER;
    };

    let width = match rest[0] {
        0x00..=0x7f => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => 0,
    };

    if width == 0 || rest.len() < width {
        *pos += 1;
        return char::REPLACEMENT_CHARACTER;
    }

    match std::str::from_utf8(&rest[..width]) {
        Ok(s) => {
            *pos += width;
            s.chars().next().unwrap_or(char::REPLACEMENT_CHARACTER)
        }
        Err(_) => {
            *pos += 1;
            char::REPLACEMENT_CHARACTER
        }
    }
}

/// What a run of directives and line breaks did before the next printable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectiveRun {
    /// A color-set or color-reset directive was consumed
    pub color_changed: bool,
    /// Number of line breaks consumed (`\r\n` counts once)
    pub skipped_lines: u32,
}

/// Cursor over directive-bearing text
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    text: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a [u8]) -> Self {
        Self { text, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Consume directives and line breaks up to the next printable character.
    ///
    /// `color` receives color-set values (alpha untouched) and is set to
    /// `base` on a reset. Returns `None` once the end of the text is reached,
    /// which is the only termination check callers need.
    pub fn skip_directives(&mut self, color: &mut Color, base: Color) -> Option<DirectiveRun> {
        let text = self.text;
        let mut run = DirectiveRun::default();

        while self.pos < text.len() {
            match text[self.pos] {
                COLOR_CODE => {
                    if let Some(rgb) = text.get(self.pos + 1..self.pos + COLOR_CODE_LEN) {
                        *color = Color::from_rgb_bytes([rgb[0], rgb[1], rgb[2]], color.a);
                        run.color_changed = true;
                    }
                    self.pos = (self.pos + COLOR_CODE_LEN).min(text.len());
                }
                COLOR_RESET => {
                    self.pos += 1;
                    *color = base;
                    run.color_changed = true;
                }
                CR => {
                    run.skipped_lines += 1;
                    self.pos += 1;
                    if text.get(self.pos) == Some(&LF) {
                        self.pos += 1;
                    }
                }
                LF => {
                    run.skipped_lines += 1;
                    self.pos += 1;
                }
                _ => return Some(run),
            }
        }

        None
    }

    /// Decode the printable character under the cursor
    pub fn next_char(&mut self) -> char {
        decode_char(self.text, &mut self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_ends_immediately() {
        let mut color = Color::WHITE;
        let mut scanner = Scanner::new(b"");
        assert_eq!(scanner.skip_directives(&mut color, Color::BLACK), None);
        assert_eq!(color, Color::WHITE);
    }

    #[test]
    fn test_color_code_sets_rgb_and_keeps_alpha() {
        let mut color = Color::rgba(1.0, 1.0, 1.0, 0.5);
        let mut scanner = Scanner::new(&[COLOR_CODE, 255, 0, 0, b'X']);

        let run = scanner.skip_directives(&mut color, Color::WHITE);
        assert_eq!(
            run,
            Some(DirectiveRun {
                color_changed: true,
                skipped_lines: 0
            })
        );
        assert_eq!(color, Color::rgba(1.0, 0.0, 0.0, 0.5));
        assert_eq!(scanner.next_char(), 'X');
    }

    #[test]
    fn test_reset_restores_base() {
        let base = Color::rgb(0.2, 0.4, 0.6);
        let mut color = Color::WHITE;
        let mut scanner = Scanner::new(&[COLOR_CODE, 0, 255, 0, COLOR_RESET, b'a']);

        let run = scanner.skip_directives(&mut color, base).unwrap();
        assert!(run.color_changed);
        assert_eq!(color, base);
    }

    #[test]
    fn test_line_breaks_are_counted_once_per_break() {
        let mut color = Color::WHITE;
        let mut scanner = Scanner::new(b"\r\n\n\rX");

        let run = scanner.skip_directives(&mut color, Color::WHITE).unwrap();
        assert_eq!(run.skipped_lines, 3);
        assert!(!run.color_changed);
        assert_eq!(scanner.next_char(), 'X');
    }

    #[test]
    fn test_truncated_color_code_consumes_to_end() {
        let mut color = Color::WHITE;
        let mut scanner = Scanner::new(&[b'a', COLOR_CODE, 12]);

        assert!(scanner.skip_directives(&mut color, Color::WHITE).is_some());
        assert_eq!(scanner.next_char(), 'a');
        assert_eq!(scanner.skip_directives(&mut color, Color::WHITE), None);
        assert!(scanner.is_at_end());
        assert_eq!(color, Color::WHITE);
    }

    #[test]
    fn test_skip_color_codes_clamps() {
        let text = [COLOR_CODE, 1, 2, 3, COLOR_CODE, 4, b'z'];
        assert_eq!(skip_color_codes(&text, 0), text.len());
        assert_eq!(skip_color_codes(b"abc", 1), 1);
    }

    #[test]
    fn test_decode_multibyte_and_invalid() {
        let text = "é€😀".as_bytes();
        let mut pos = 0;
        assert_eq!(decode_char(text, &mut pos), 'é');
        assert_eq!(decode_char(text, &mut pos), '€');
        assert_eq!(decode_char(text, &mut pos), '😀');
        assert_eq!(pos, text.len());

        let mut pos = 0;
        assert_eq!(decode_char(&[0xff, b'a'], &mut pos), char::REPLACEMENT_CHARACTER);
        assert_eq!(pos, 1);
        assert_eq!(decode_char(&[0xe2, 0x82], &mut 0), char::REPLACEMENT_CHARACTER);
    }

    #[test]
    fn test_strip_color_codes() {
        let text = [b'a', COLOR_CODE, 200, 201, 202, b'b', COLOR_RESET, b'c'];
        assert_eq!(strip_color_codes(&text), vec![b'a', b'b', COLOR_RESET, b'c']);
    }

    #[test]
    fn test_color_code_round_trip() {
        let code = color_code(Color::RED);
        assert_eq!(code, [COLOR_CODE, 255, 0, 0]);
    }
}
