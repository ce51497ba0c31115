//! Splitting text into self-describing lines
//!
//! Line-oriented consumers such as a scrolling console store and draw each
//! line on its own. A color opened on one line has to carry over to the
//! following lines, so every new line starts with the innermost color
//! directive that is still open.

use smallvec::SmallVec;

use crate::escape::{COLOR_CODE, COLOR_CODE_LEN, COLOR_RESET, CR, LF};

type Directive = [u8; COLOR_CODE_LEN];

/// Split `text` at every line break.
///
/// Directive bytes stay inline. A color-set pushes onto a stack of open
/// colors and a reset pops it; each line after a break is prefixed with the
/// top of that stack. A color-set cut short by the end of the input is
/// dropped.
pub fn split_into_lines(text: &[u8]) -> Vec<Vec<u8>> {
    let mut lines: Vec<Vec<u8>> = Vec::new();
    if text.is_empty() {
        return lines;
    }

    let mut open_colors: SmallVec<[Directive; 4]> = SmallVec::new();
    let mut line = Vec::new();

    let mut pos = 0;
    while pos < text.len() {
        match text[pos] {
            COLOR_CODE => {
                let Some(code) = text.get(pos..pos + COLOR_CODE_LEN) else {
                    break;
                };
                let code = [code[0], code[1], code[2], code[3]];
                line.extend_from_slice(&code);
                open_colors.push(code);
                pos += COLOR_CODE_LEN;
            }
            COLOR_RESET => {
                open_colors.pop();
                line.push(COLOR_RESET);
                pos += 1;
            }
            c @ (CR | LF) => {
                pos += 1;
                if c == CR && text.get(pos) == Some(&LF) {
                    pos += 1;
                }
                lines.push(std::mem::take(&mut line));
                if let Some(code) = open_colors.last() {
                    line.extend_from_slice(code);
                }
            }
            c => {
                line.push(c);
                pos += 1;
            }
        }
    }

    lines.push(line);
    lines
}
