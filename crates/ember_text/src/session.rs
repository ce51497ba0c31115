//! Batch sessions and submission
//!
//! Glyph geometry is collected between [`Font::begin`] and [`Font::end`] and
//! handed to a [`BatchSink`] in one go. The sink is whatever owns the actual
//! draw calls; the engine never talks to a graphics API itself.

use crate::batch::{ColorStrip, GlyphVertex, VertexBatch};
use crate::color::Color;
use crate::font::Font;
use crate::provider::{GlyphProvider, TextureInfo};
use crate::{Result, TextError};

/// Which of a font's two batches a draw belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchKind {
    /// Outline or shadow quads, drawn first
    Outline,
    /// Glyph fill quads
    Text,
}

/// How a submitted batch is colored
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StripColors<'a> {
    /// Every quad uses this color
    Flat(Color),
    /// Consecutive runs of quads, one color each
    Strips(&'a [ColorStrip]),
}

/// One batch submitted to a sink
#[derive(Debug, Clone, Copy)]
pub struct DrawBatch<'a> {
    pub kind: BatchKind,
    pub vertices: &'a [GlyphVertex],
    pub colors: StripColors<'a>,
    /// The session was opened for a single immediate print
    pub immediate: bool,
}

impl<'a> DrawBatch<'a> {
    fn from_batch(kind: BatchKind, batch: &'a VertexBatch, immediate: bool) -> Self {
        let colors = match batch.drawn_strips() {
            [] => StripColors::Flat(batch.current_color().unwrap_or_default()),
            [single] => StripColors::Flat(single.color),
            strips => StripColors::Strips(strips),
        };
        Self {
            kind,
            vertices: batch.vertices(),
            colors,
            immediate,
        }
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / crate::batch::QUAD_VERTICES
    }
}

/// Receiver of finished glyph batches
pub trait BatchSink {
    /// Bind the glyph atlas for the draws that follow
    fn bind_texture(&mut self, texture: TextureInfo);

    fn draw(&mut self, batch: DrawBatch<'_>);

    fn unbind_texture(&mut self);

    /// Place following draws at a world-space origin (`None` returns to
    /// screen space)
    fn set_transform(&mut self, _origin: Option<[f32; 3]>) {}
}

/// State of an open session
#[derive(Debug, Clone, Copy)]
pub(crate) struct SessionState {
    pub immediate: bool,
}

/// Unbinds the texture when dropped
struct TextureBinding<'a, S: BatchSink> {
    sink: &'a mut S,
}

impl<'a, S: BatchSink> TextureBinding<'a, S> {
    fn bind(sink: &'a mut S, texture: TextureInfo) -> Self {
        sink.bind_texture(texture);
        Self { sink }
    }

    fn draw(&mut self, batch: DrawBatch<'_>) {
        self.sink.draw(batch);
    }
}

impl<S: BatchSink> Drop for TextureBinding<'_, S> {
    fn drop(&mut self) {
        self.sink.unbind_texture();
    }
}

impl<P: GlyphProvider, S: BatchSink> Font<P, S> {
    /// A session is open and collecting geometry
    pub fn in_session(&self) -> bool {
        self.session.is_some()
    }

    /// Open a session.
    ///
    /// Re-enables the automatic outline color and, with `reset_colors`,
    /// returns to the default text color and a matching outline. Fails if a
    /// session is already open; the open session is left untouched.
    pub fn begin(&mut self, immediate: bool, reset_colors: bool) -> Result<()> {
        if self.session.is_some() {
            tracing::error!("font session opened twice without end()");
            return Err(TextError::SessionAlreadyOpen);
        }
        self.open_session(immediate, reset_colors);
        Ok(())
    }

    /// Close the open session and submit what it collected.
    ///
    /// An empty session submits nothing. Otherwise the provider gets a chance
    /// to upload its atlas, the atlas is bound, the outline batch (when
    /// non-empty) is drawn, then the text batch, and the atlas is unbound.
    pub fn end(&mut self) -> Result<()> {
        let Some(session) = self.session else {
            tracing::error!("font session closed without begin()");
            return Err(TextError::SessionNotOpen);
        };
        self.close_session(session);
        Ok(())
    }

    pub(crate) fn open_session(&mut self, immediate: bool, reset_colors: bool) {
        self.auto_outline_color = true;
        if reset_colors {
            self.set_colors(None, None);
        }
        self.session = Some(SessionState { immediate });
        self.text_batch.reset(self.text_color);
        self.outline_batch.reset(self.outline_color);
    }

    pub(crate) fn close_session(&mut self, session: SessionState) {
        self.session = None;
        if self.text_batch.is_empty() {
            return;
        }

        self.provider.update_texture();
        let texture = self.provider.texture();

        tracing::trace!(
            quads = self.text_batch.quad_count(),
            outline_quads = self.outline_batch.quad_count(),
            immediate = session.immediate,
            "submitting glyph batches"
        );

        let mut binding = TextureBinding::bind(&mut self.sink, texture);
        if !self.outline_batch.is_empty() {
            binding.draw(DrawBatch::from_batch(
                BatchKind::Outline,
                &self.outline_batch,
                session.immediate,
            ));
        }
        binding.draw(DrawBatch::from_batch(
            BatchKind::Text,
            &self.text_batch,
            session.immediate,
        ));
    }
}

/// A submitted draw, owned
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub kind: BatchKind,
    pub vertices: Vec<GlyphVertex>,
    /// `None` for a flat-colored batch
    pub strips: Option<Vec<ColorStrip>>,
    pub flat_color: Option<Color>,
    pub immediate: bool,
}

/// Everything a [`RecordingSink`] was asked to do, in order
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Bind(TextureInfo),
    Draw(RecordedDraw),
    Unbind,
    Transform(Option<[f32; 3]>),
}

/// Sink that keeps every call for later inspection.
///
/// Useful headless, for layout snapshots and in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
}

impl RecordingSink {
    pub fn draws(&self) -> impl Iterator<Item = &RecordedDraw> {
        self.events.iter().filter_map(|event| match event {
            SinkEvent::Draw(draw) => Some(draw),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl BatchSink for RecordingSink {
    fn bind_texture(&mut self, texture: TextureInfo) {
        self.events.push(SinkEvent::Bind(texture));
    }

    fn draw(&mut self, batch: DrawBatch<'_>) {
        let (strips, flat_color) = match batch.colors {
            StripColors::Flat(color) => (None, Some(color)),
            StripColors::Strips(strips) => (Some(strips.to_vec()), None),
        };
        self.events.push(SinkEvent::Draw(RecordedDraw {
            kind: batch.kind,
            vertices: batch.vertices.to_vec(),
            strips,
            flat_color,
            immediate: batch.immediate,
        }));
    }

    fn unbind_texture(&mut self) {
        self.events.push(SinkEvent::Unbind);
    }

    fn set_transform(&mut self, origin: Option<[f32; 3]>) {
        self.events.push(SinkEvent::Transform(origin));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::quad;
    use crate::provider::{GlyphRect, GlyphTable};

    fn font() -> Font<GlyphTable, RecordingSink> {
        Font::new(GlyphTable::new(16.0, 1.25, -0.25), RecordingSink::default())
    }

    fn push_dummy_quad(font: &mut Font<GlyphTable, RecordingSink>) {
        let rect = GlyphRect::new(0.0, 0.0, 1.0, 1.0);
        font.text_batch.push_quad(quad(rect, rect));
    }

    #[test]
    fn test_begin_twice_fails() {
        let mut font = font();
        font.begin(false, true).unwrap();
        assert!(matches!(
            font.begin(false, true),
            Err(TextError::SessionAlreadyOpen)
        ));
        assert!(font.in_session());
        font.end().unwrap();
    }

    #[test]
    fn test_end_without_begin_fails() {
        let mut font = font();
        assert!(matches!(font.end(), Err(TextError::SessionNotOpen)));
    }

    #[test]
    fn test_empty_session_submits_nothing() {
        let mut font = font();
        font.begin(false, true).unwrap();
        font.end().unwrap();
        assert!(font.sink().events.is_empty());
    }

    #[test]
    fn test_begin_resets_colors_and_auto_outline() {
        let mut font = font();
        font.set_colors(Some(Color::BLACK), Some(Color::RED));
        font.set_auto_outline_color(false);

        font.begin(true, true).unwrap();
        assert!(font.auto_outline_color());
        assert_eq!(font.text_color(), Color::DEFAULT_TEXT);
        assert_eq!(font.outline_color(), Color::DARK_OUTLINE);
        font.end().unwrap();

        font.set_colors(Some(Color::BLACK), Some(Color::RED));
        font.begin(true, false).unwrap();
        assert_eq!(font.text_color(), Color::BLACK);
        assert_eq!(font.text_batch().current_color(), Some(Color::BLACK));
        assert_eq!(font.outline_batch().current_color(), Some(Color::RED));
        font.end().unwrap();
    }

    #[test]
    fn test_submission_order() {
        let mut font = font();
        font.begin(true, true).unwrap();
        push_dummy_quad(&mut font);
        font.end().unwrap();

        let events = &font.sink().events;
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], SinkEvent::Bind(_)));
        match &events[1] {
            SinkEvent::Draw(draw) => {
                assert_eq!(draw.kind, BatchKind::Text);
                assert_eq!(draw.flat_color, Some(Color::DEFAULT_TEXT));
                assert!(draw.immediate);
            }
            other => panic!("expected draw, got {other:?}"),
        }
        assert_eq!(events[2], SinkEvent::Unbind);
    }

    #[test]
    fn test_color_change_in_session_submits_strips() {
        let mut font = font();
        font.begin(false, true).unwrap();
        push_dummy_quad(&mut font);
        font.set_text_color(Some(Color::RED));
        push_dummy_quad(&mut font);
        font.set_text_color(Some(Color::BLUE));
        font.end().unwrap();

        let draw = font.sink().draws().next().unwrap();
        let strips = draw.strips.as_ref().unwrap();
        assert_eq!(strips.len(), 2);
        assert_eq!(strips[1].color, Color::RED);
        assert!(!draw.immediate);
    }
}
