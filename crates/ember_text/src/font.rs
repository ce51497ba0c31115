//! Font instance
//!
//! A [`Font`] owns one glyph provider, the sink its batches are submitted
//! to, the two vertex batches and the text/outline color state. Fonts are
//! plain values: the loader that builds them decides how many exist and when
//! they are replaced. Methods take `&mut self` and never lock; wrap the font
//! in a [`SharedFont`](crate::SharedFont) to use it from several threads.

use crate::batch::VertexBatch;
use crate::color::{choose_outline_color, Color};
use crate::lines::split_into_lines;
use crate::metrics::{self, TextHeight};
use crate::provider::GlyphProvider;
use crate::session::{BatchSink, SessionState};

/// Size of one screen pixel in normalized (0..1) coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub pixel_x: f32,
    pub pixel_y: f32,
}

impl Viewport {
    /// Viewport of `width` x `height` pixels
    pub fn from_size(width: u32, height: u32) -> Self {
        Self {
            pixel_x: 1.0 / width.max(1) as f32,
            pixel_y: 1.0 / height.max(1) as f32,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pixel_x: 1.0,
            pixel_y: 1.0,
        }
    }
}

/// A font: glyph source, color state and batched glyph geometry
pub struct Font<P: GlyphProvider, S: BatchSink> {
    pub(crate) provider: P,
    pub(crate) sink: S,
    pub(crate) viewport: Viewport,

    pub(crate) text_color: Color,
    pub(crate) outline_color: Color,
    /// Colors captured at the start of the current print call; a reset
    /// directive goes back to these
    pub(crate) base_text_color: Color,
    pub(crate) base_outline_color: Color,
    pub(crate) auto_outline_color: bool,

    pub(crate) session: Option<SessionState>,
    pub(crate) text_batch: VertexBatch,
    pub(crate) outline_batch: VertexBatch,
}

impl<P: GlyphProvider, S: BatchSink> Font<P, S> {
    /// Create a font drawing glyphs from `provider` into `sink`
    pub fn new(provider: P, sink: S) -> Self {
        let text_color = Color::DEFAULT_TEXT;
        let outline_color = Color::DARK_OUTLINE;
        Self {
            provider,
            sink,
            viewport: Viewport::default(),
            text_color,
            outline_color,
            base_text_color: text_color,
            base_outline_color: outline_color,
            auto_outline_color: true,
            session: None,
            text_batch: VertexBatch::new(text_color),
            outline_batch: VertexBatch::new(outline_color),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Split the font back into its provider and sink
    pub fn into_parts(self) -> (P, S) {
        (self.provider, self.sink)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Set the pixel size used by normalized-coordinate prints
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Nominal pixel size of the font
    pub fn size(&self) -> f32 {
        self.provider.size()
    }

    pub fn line_height(&self) -> f32 {
        self.provider.line_height()
    }

    pub fn descender(&self) -> f32 {
        self.provider.descender()
    }

    pub fn outline_width(&self) -> f32 {
        self.provider.outline_width()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Colors
    // ─────────────────────────────────────────────────────────────────────

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn outline_color(&self) -> Color {
        self.outline_color
    }

    pub fn auto_outline_color(&self) -> bool {
        self.auto_outline_color
    }

    /// When enabled, every in-text color change also picks a contrasting
    /// outline color
    pub fn set_auto_outline_color(&mut self, enable: bool) {
        self.auto_outline_color = enable;
    }

    /// Set the text color; `None` restores the default text color
    pub fn set_text_color(&mut self, color: Option<Color>) {
        let color = color.unwrap_or(Color::DEFAULT_TEXT);
        if self.session.is_some() {
            self.text_batch.set_color(color);
        }
        self.text_color = color;
    }

    /// Set the outline color; `None` picks one contrasting the text color
    pub fn set_outline_color(&mut self, color: Option<Color>) {
        let color = color.unwrap_or_else(|| choose_outline_color(self.text_color));
        if self.session.is_some() {
            self.outline_batch.set_color(color);
        }
        self.outline_color = color;
    }

    /// Set text then outline color, so an automatic outline follows the new
    /// text color
    pub fn set_colors(&mut self, text: Option<Color>, outline: Option<Color>) {
        self.set_text_color(text);
        self.set_outline_color(outline);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Measurement
    // ─────────────────────────────────────────────────────────────────────

    pub fn char_width(&mut self, c: char) -> f32 {
        metrics::char_width(&mut self.provider, c)
    }

    /// Width of the widest line of `text`, in glyph-local units
    pub fn text_width(&mut self, text: impl AsRef<[u8]>) -> f32 {
        metrics::text_width(&mut self.provider, text.as_ref())
    }

    pub fn text_height(&mut self, text: impl AsRef<[u8]>) -> TextHeight {
        metrics::text_height(&mut self.provider, text.as_ref())
    }

    pub fn line_count(&self, text: impl AsRef<[u8]>) -> usize {
        metrics::line_count(text.as_ref())
    }

    pub fn split_into_lines(&self, text: impl AsRef<[u8]>) -> Vec<Vec<u8>> {
        split_into_lines(text.as_ref())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Batches
    // ─────────────────────────────────────────────────────────────────────

    /// Glyph fill geometry of the open session
    pub fn text_batch(&self) -> &VertexBatch {
        &self.text_batch
    }

    /// Outline/shadow geometry of the open session
    pub fn outline_batch(&self) -> &VertexBatch {
        &self.outline_batch
    }
}
