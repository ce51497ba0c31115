//! Glyph quad generation
//!
//! Walks directive-bearing text and appends one quad per printable character
//! to the font's text batch. Decorated styles add a second quad per
//! character to the outline batch, sampling the glyph's shadow region of the
//! atlas. Color directives switch strips as they are met; line breaks move
//! the pen back to the start of the line and down.

use crate::batch::quad;
use crate::escape::Scanner;
use crate::font::Font;
use crate::provider::{pen_advance, GlyphProvider, GlyphRect};
use crate::session::BatchSink;

/// Fraction of the scale a drop shadow is offset by
const SHADOW_OFFSET: f32 = 0.1;

/// Decoration drawn behind each glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderStyle {
    /// Glyph fill only
    #[default]
    Plain,
    /// Blurred copy offset to the lower right
    Shadow,
    /// Copy grown by the outline width on every side
    Outline,
}

impl RenderStyle {
    pub fn is_decorated(self) -> bool {
        self != RenderStyle::Plain
    }
}

/// Pen geometry for one render call
#[derive(Debug, Clone, Copy)]
struct Pen {
    scale_x: f32,
    scale_y: f32,
    /// Outline growth per side
    grow_x: f32,
    grow_y: f32,
    /// Shadow displacement
    shift_x: f32,
    shift_y: f32,
}

impl Pen {
    fn new(scale_x: f32, scale_y: f32, size: f32, outline_width: f32) -> Self {
        let size = if size > 0.0 { size } else { 1.0 };
        Self {
            scale_x,
            scale_y,
            grow_x: scale_x / size * outline_width,
            grow_y: scale_y / size * outline_width,
            shift_x: SHADOW_OFFSET * scale_x,
            shift_y: SHADOW_OFFSET * scale_y,
        }
    }

    /// Shadow quad: shifted right and down, grown horizontally and shrunk
    /// toward the glyph's vertical center
    fn shadow_rect(&self, rect: GlyphRect) -> GlyphRect {
        GlyphRect::new(
            rect.x0 + self.shift_x - self.grow_x,
            rect.y0 - self.shift_y + self.grow_y,
            rect.x1 + self.shift_x + self.grow_x,
            rect.y1 - self.shift_y - self.grow_y,
        )
    }

    fn outline_rect(&self, rect: GlyphRect) -> GlyphRect {
        GlyphRect::new(
            rect.x0 - self.grow_x,
            rect.y0 + self.grow_y,
            rect.x1 + self.grow_x,
            rect.y1 - self.grow_y,
        )
    }
}

impl<P: GlyphProvider, S: BatchSink> Font<P, S> {
    /// Append the quads of `text` to the open session, pen starting at
    /// (`x`, `y`).
    ///
    /// Must be called with a session open. Reset directives go back to the
    /// base colors captured by the calling print.
    pub(crate) fn render_string(
        &mut self,
        x: f32,
        y: f32,
        scale_x: f32,
        scale_y: f32,
        text: &[u8],
        style: RenderStyle,
    ) {
        let pen = Pen::new(
            scale_x,
            scale_y,
            self.provider.size(),
            self.provider.outline_width(),
        );
        let line_step = scale_y * self.provider.line_height();
        let base_color = self.base_text_color;

        self.text_batch.reserve_quads(text.len());
        if style.is_decorated() {
            self.outline_batch.reserve_quads(text.len());
        }

        let start_x = x;
        let (mut x, mut y) = (x, y);
        let mut color = self.text_color;
        let mut prev: Option<char> = None;

        let mut scanner = Scanner::new(text);
        while let Some(run) = scanner.skip_directives(&mut color, base_color) {
            let c = scanner.next_char();

            if run.color_changed {
                if self.auto_outline_color {
                    self.set_colors(Some(color), None);
                } else {
                    self.set_text_color(Some(color));
                }
            }

            if run.skipped_lines > 0 {
                x = start_x;
                y -= run.skipped_lines as f32 * line_step;
            } else if let Some(last) = prev {
                x += scale_x * pen_advance(&mut self.provider, last, c);
            }
            prev = Some(c);

            let glyph = self.provider.glyph(c);
            let rect = GlyphRect::new(
                x + pen.scale_x * glyph.size.x0,
                y + pen.scale_y * glyph.size.y0,
                x + pen.scale_x * glyph.size.x1,
                y + pen.scale_y * glyph.size.y1,
            );

            match style {
                RenderStyle::Plain => {}
                RenderStyle::Shadow => self
                    .outline_batch
                    .push_quad(quad(pen.shadow_rect(rect), glyph.shadow_tex_coords)),
                RenderStyle::Outline => self
                    .outline_batch
                    .push_quad(quad(pen.outline_rect(rect), glyph.shadow_tex_coords)),
            }
            self.text_batch.push_quad(quad(rect, glyph.tex_coords));
        }
    }
}
