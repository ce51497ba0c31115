//! Print entry points and alignment
//!
//! [`PrintOptions`] select how the print position is interpreted
//! (horizontal alignment, vertical anchor, coordinate space) and which
//! decoration is drawn. Every print captures the current colors as its base
//! colors and restores them when it finishes, so directives inside the text
//! never leak into later prints.

use std::fmt;

use bitflags::bitflags;

use crate::escape::{color_code, COLOR_CODE, COLOR_CODE_LEN, CR, LF};
use crate::font::Font;
use crate::provider::GlyphProvider;
use crate::renderer::RenderStyle;
use crate::session::BatchSink;
use crate::Result;

bitflags! {
    /// Print option flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PrintOptions: u32 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const CENTER = 1 << 2;

        const BASELINE = 1 << 3;
        const DESCENDER = 1 << 4;
        const VCENTER = 1 << 5;
        const TOP = 1 << 6;
        const ASCENDER = 1 << 7;
        const BOTTOM = 1 << 8;

        /// Snap the start position to whole units
        const NEAREST = 1 << 9;
        const OUTLINE = 1 << 10;
        const SHADOW = 1 << 11;

        /// Position and scale are fractions of the viewport
        const NORM = 1 << 12;
        /// Scale is a multiple of the font size
        const SCALE = 1 << 13;
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical anchor point for text positioning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    /// Y coordinate is the text baseline
    #[default]
    Baseline,
    /// Y coordinate is the lowest descender of the font
    Descender,
    /// Y coordinate is the vertical center of the text
    Center,
    /// Y coordinate is the top of the first line
    Top,
    /// Y coordinate is the font's ascender line
    Ascender,
    /// Y coordinate is the bottom of the last line
    Bottom,
}

impl PrintOptions {
    /// Horizontal alignment; center wins over right
    pub fn alignment(self) -> TextAlignment {
        if self.contains(Self::CENTER) {
            TextAlignment::Center
        } else if self.contains(Self::RIGHT) {
            TextAlignment::Right
        } else {
            TextAlignment::Left
        }
    }

    /// Vertical anchor, first matching flag in baseline, descender, center,
    /// top, ascender, bottom order
    pub fn anchor(self) -> TextAnchor {
        if self.contains(Self::BASELINE) {
            TextAnchor::Baseline
        } else if self.contains(Self::DESCENDER) {
            TextAnchor::Descender
        } else if self.contains(Self::VCENTER) {
            TextAnchor::Center
        } else if self.contains(Self::TOP) {
            TextAnchor::Top
        } else if self.contains(Self::ASCENDER) {
            TextAnchor::Ascender
        } else if self.contains(Self::BOTTOM) {
            TextAnchor::Bottom
        } else {
            TextAnchor::Baseline
        }
    }

    /// Decoration; outline wins over shadow
    pub fn style(self) -> RenderStyle {
        if self.contains(Self::OUTLINE) {
            RenderStyle::Outline
        } else if self.contains(Self::SHADOW) {
            RenderStyle::Shadow
        } else {
            RenderStyle::Plain
        }
    }
}

/// Extent of a block of text used to anchor it vertically
#[derive(Debug, Clone, Copy)]
struct BlockExtent {
    height: f32,
    descender: f32,
}

impl TextAnchor {
    /// Vertical offset putting the anchor point of a block at y
    fn offset(
        self,
        size_y: f32,
        font_descender: f32,
        block: impl FnOnce() -> BlockExtent,
    ) -> f32 {
        match self {
            TextAnchor::Baseline => 0.0,
            TextAnchor::Descender => -size_y * font_descender,
            TextAnchor::Center => {
                let block = block();
                -size_y * 0.5 * block.height - size_y * 0.5 * block.descender
            }
            TextAnchor::Top => -size_y * block().height,
            TextAnchor::Ascender => -size_y * font_descender - size_y,
            TextAnchor::Bottom => -size_y * block().descender,
        }
    }
}

impl TextAlignment {
    fn offset(self, size_x: f32, width: impl FnOnce() -> f32) -> f32 {
        match self {
            TextAlignment::Left => 0.0,
            TextAlignment::Center => -size_x * 0.5 * width(),
            TextAlignment::Right => -size_x * width(),
        }
    }
}

/// Split tab-separated text into one byte string per column.
///
/// Every column gets a line break per row so rows stay aligned, and color
/// directives are repeated where a column would otherwise start a row in a
/// stale color. `default_color` is the directive assumed before any color
/// appears in the text.
pub fn split_table_columns(text: &[u8], default_color: [u8; COLOR_CODE_LEN]) -> Vec<Vec<u8>> {
    let mut columns: Vec<Vec<u8>> = vec![Vec::new()];
    let mut column_colors = vec![default_color];
    let mut current_color = default_color;
    let mut col = 0usize;
    let mut row = 0usize;

    let mut pos = 0;
    while pos < text.len() {
        match text[pos] {
            COLOR_CODE => {
                for slot in current_color.iter_mut() {
                    let Some(&byte) = text.get(pos) else { break };
                    columns[col].push(byte);
                    *slot = byte;
                    pos += 1;
                }
                column_colors[col] = current_color;
                continue;
            }
            b'\t' => {
                col += 1;
                if col >= columns.len() {
                    columns.push(vec![LF; row]);
                    column_colors.push(default_color);
                }
                if column_colors[col] != current_color {
                    columns[col].extend_from_slice(&current_color);
                    column_colors[col] = current_color;
                }
            }
            CR | LF => {
                if text[pos] == CR && text.get(pos + 1) == Some(&LF) {
                    pos += 1;
                }
                for column in columns.iter_mut() {
                    column.push(LF);
                }
                if column_colors[0] != current_color {
                    columns[0].extend_from_slice(&current_color);
                    column_colors[0] = current_color;
                }
                col = 0;
                row += 1;
            }
            byte => columns[col].push(byte),
        }
        pos += 1;
    }

    columns
}

impl<P: GlyphProvider, S: BatchSink> Font<P, S> {
    /// Effective (x, y) scale of a print
    fn print_scale(&self, scale: f32, options: PrintOptions) -> (f32, f32) {
        let scale = if options.contains(PrintOptions::SCALE) {
            scale * self.provider.size()
        } else {
            scale
        };
        if options.contains(PrintOptions::NORM) {
            (scale * self.viewport.pixel_x, scale * self.viewport.pixel_y)
        } else {
            (scale, scale)
        }
    }

    /// Print `text` at (`x`, `y`).
    ///
    /// Inside an open session the quads are appended to it; otherwise a
    /// session is opened and submitted around this one call.
    pub fn print(
        &mut self,
        x: f32,
        y: f32,
        scale: f32,
        options: PrintOptions,
        text: impl AsRef<[u8]>,
    ) {
        let text = text.as_ref();
        let (size_x, size_y) = self.print_scale(scale, options);

        let mut x = x + options
            .alignment()
            .offset(size_x, || self.text_width(text));

        let font_descender = self.provider.descender();
        let mut y = y + size_y * font_descender;
        y += options.anchor().offset(size_y, font_descender, || {
            let extent = self.text_height(text);
            BlockExtent {
                height: extent.height,
                descender: extent.descender,
            }
        });

        if options.contains(PrintOptions::NEAREST) {
            x = x.trunc();
            y = y.trunc();
        }

        self.print_at(x, y, size_x, size_y, options.style(), text);
    }

    /// Render at an already aligned pen position
    fn print_at(
        &mut self,
        x: f32,
        y: f32,
        size_x: f32,
        size_y: f32,
        style: RenderStyle,
        text: &[u8],
    ) {
        let base_text = self.text_color;
        let base_outline = self.outline_color;
        self.base_text_color = base_text;
        self.base_outline_color = base_outline;

        // Only plain prints may inherit the sink color
        let own_session = self.session.is_none();
        if own_session {
            self.open_session(!style.is_decorated(), false);
        }

        self.render_string(x, y, size_x, size_y, text, style);

        if own_session {
            if let Some(session) = self.session {
                self.close_session(session);
            }
        }

        self.set_colors(Some(base_text), Some(base_outline));
    }

    /// Print formatted text, e.g. `font.print_fmt(x, y, 1.0, opts, format_args!("{fps} fps"))`
    pub fn print_fmt(
        &mut self,
        x: f32,
        y: f32,
        scale: f32,
        options: PrintOptions,
        args: fmt::Arguments<'_>,
    ) {
        match args.as_str() {
            Some(text) => self.print(x, y, scale, options, text),
            None => self.print(x, y, scale, options, args.to_string()),
        }
    }

    /// Print tab-separated columns.
    ///
    /// Each column is as wide as its widest cell. The block as a whole is
    /// aligned by `options`; the columns are then laid out left to right
    /// from the aligned start.
    pub fn print_table(
        &mut self,
        x: f32,
        y: f32,
        scale: f32,
        options: PrintOptions,
        text: impl AsRef<[u8]>,
    ) {
        let columns = split_table_columns(text.as_ref(), color_code(self.text_color));
        let (size_x, size_y) = self.print_scale(scale, options);

        let mut widths = Vec::with_capacity(columns.len());
        let mut total_width = 0.0f32;
        let mut max_height = 0.0f32;
        let mut min_descender = 0.0f32;
        for column in &columns {
            let width = self.text_width(column);
            let extent = self.text_height(column);
            widths.push(width);
            total_width += width;
            max_height = max_height.max(extent.height);
            min_descender = min_descender.min(extent.descender);
        }

        let mut x = x + options.alignment().offset(size_x, || total_width);
        let font_descender = self.provider.descender();
        let y = y + options.anchor().offset(size_y, font_descender, || BlockExtent {
            height: max_height,
            descender: min_descender,
        });

        let column_options =
            (options | PrintOptions::BASELINE) - (PrintOptions::RIGHT | PrintOptions::CENTER);
        for (column, width) in columns.iter().zip(widths) {
            self.print(x, y, scale, column_options, column);
            x += size_x * width;
        }
    }

    /// Print `text` centered over a world-space position.
    ///
    /// Opens its own session with the sink transformed to `position`, so it
    /// fails if a session is already open.
    pub fn print_world(
        &mut self,
        position: [f32; 3],
        size: f32,
        text: impl AsRef<[u8]>,
    ) -> Result<()> {
        self.begin(false, false)?;
        self.sink.set_transform(Some(position));
        self.print(
            0.0,
            0.0,
            size,
            PrintOptions::DESCENDER | PrintOptions::CENTER | PrintOptions::OUTLINE,
            text,
        );
        let result = self.end();
        self.sink.set_transform(None);
        result
    }
}
