//! Thread-safe font handle
//!
//! [`SharedFont`] serializes every call on one font behind a reentrant
//! lock. A [`SharedSession`] keeps the lock for the whole begin/end span, so
//! a batch collected by one thread is never interleaved with prints from
//! another. The owning thread can keep calling the handle while its session
//! is open.

use std::cell::{RefCell, RefMut};
use std::fmt;
use std::sync::Arc;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

use crate::color::Color;
use crate::font::{Font, Viewport};
use crate::layout::PrintOptions;
use crate::metrics::TextHeight;
use crate::provider::GlyphProvider;
use crate::session::BatchSink;
use crate::Result;

/// Cloneable, lockable handle to a [`Font`]
pub struct SharedFont<P: GlyphProvider, S: BatchSink> {
    inner: Arc<ReentrantMutex<RefCell<Font<P, S>>>>,
}

impl<P: GlyphProvider, S: BatchSink> Clone for SharedFont<P, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: GlyphProvider, S: BatchSink> fmt::Debug for SharedFont<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedFont")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish()
    }
}

impl<P: GlyphProvider, S: BatchSink> Font<P, S> {
    /// Move this font behind a [`SharedFont`]
    pub fn into_shared(self) -> SharedFont<P, S> {
        SharedFont::new(self)
    }
}

impl<P: GlyphProvider, S: BatchSink> SharedFont<P, S> {
    pub fn new(font: Font<P, S>) -> Self {
        Self {
            inner: Arc::new(ReentrantMutex::new(RefCell::new(font))),
        }
    }

    /// Run `f` with exclusive access to the font.
    ///
    /// `f` must not call back into this handle, and neither may the
    /// provider or sink callbacks it triggers. The font is already borrowed
    /// for the duration of the call and a nested borrow panics.
    pub fn with<R>(&self, f: impl FnOnce(&mut Font<P, S>) -> R) -> R {
        let guard = self.inner.lock();
        let mut font = guard.borrow_mut();
        f(&mut font)
    }

    /// Open a session held until the returned guard is ended or dropped.
    ///
    /// This is the only way to begin a session on a shared font: the lock
    /// is taken here and released when the session ends, so other threads
    /// block on this font while the session is alive.
    pub fn session(
        &self,
        immediate: bool,
        reset_colors: bool,
    ) -> Result<SharedSession<'_, P, S>> {
        let guard = self.inner.lock();
        guard.borrow_mut().begin(immediate, reset_colors)?;
        Ok(SharedSession { guard, open: true })
    }

    pub fn print(
        &self,
        x: f32,
        y: f32,
        scale: f32,
        options: PrintOptions,
        text: impl AsRef<[u8]>,
    ) {
        self.with(|font| font.print(x, y, scale, options, text));
    }

    pub fn print_table(
        &self,
        x: f32,
        y: f32,
        scale: f32,
        options: PrintOptions,
        text: impl AsRef<[u8]>,
    ) {
        self.with(|font| font.print_table(x, y, scale, options, text));
    }

    pub fn print_fmt(
        &self,
        x: f32,
        y: f32,
        scale: f32,
        options: PrintOptions,
        args: fmt::Arguments<'_>,
    ) {
        self.with(|font| font.print_fmt(x, y, scale, options, args));
    }

    pub fn print_world(
        &self,
        position: [f32; 3],
        size: f32,
        text: impl AsRef<[u8]>,
    ) -> Result<()> {
        self.with(|font| font.print_world(position, size, text))
    }

    pub fn set_text_color(&self, color: Option<Color>) {
        self.with(|font| font.set_text_color(color));
    }

    pub fn set_outline_color(&self, color: Option<Color>) {
        self.with(|font| font.set_outline_color(color));
    }

    pub fn set_colors(&self, text: Option<Color>, outline: Option<Color>) {
        self.with(|font| font.set_colors(text, outline));
    }

    pub fn set_auto_outline_color(&self, enable: bool) {
        self.with(|font| font.set_auto_outline_color(enable));
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.with(|font| font.set_viewport(viewport));
    }

    pub fn text_width(&self, text: impl AsRef<[u8]>) -> f32 {
        self.with(|font| font.text_width(text))
    }

    pub fn text_height(&self, text: impl AsRef<[u8]>) -> TextHeight {
        self.with(|font| font.text_height(text))
    }

    pub fn line_count(&self, text: impl AsRef<[u8]>) -> usize {
        self.with(|font| font.line_count(text))
    }

    pub fn size(&self) -> f32 {
        self.with(|font| font.size())
    }

    pub fn line_height(&self) -> f32 {
        self.with(|font| font.line_height())
    }
}

/// An open session on a [`SharedFont`], holding its lock.
///
/// Dropping the guard ends the session and submits its batches.
pub struct SharedSession<'a, P: GlyphProvider, S: BatchSink> {
    guard: ReentrantMutexGuard<'a, RefCell<Font<P, S>>>,
    open: bool,
}

impl<P: GlyphProvider, S: BatchSink> SharedSession<'_, P, S> {
    /// Borrow the font to print into the session.
    ///
    /// Release the borrow before calling the [`SharedFont`] handle again on
    /// this thread. The lock nests but the borrow does not, so a handle call
    /// made while the returned `RefMut` is alive panics.
    pub fn font(&self) -> RefMut<'_, Font<P, S>> {
        self.guard.borrow_mut()
    }

    /// End the session now, reporting a failed end
    pub fn end(mut self) -> Result<()> {
        self.finish()
    }

    fn finish(&mut self) -> Result<()> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        self.guard.borrow_mut().end()
    }
}

impl<P: GlyphProvider, S: BatchSink> Drop for SharedSession<'_, P, S> {
    fn drop(&mut self) {
        if let Err(err) = self.finish() {
            tracing::warn!(error = %err, "failed to end shared font session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{GlyphInfo, GlyphRect, GlyphTable};
    use crate::session::RecordingSink;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    fn shared() -> SharedFont<GlyphTable, RecordingSink> {
        let mut table = GlyphTable::new(16.0, 1.25, -0.25);
        table.insert(GlyphInfo {
            codepoint: 'A',
            advance: 10.0,
            size: GlyphRect::new(0.0, 1.0, 1.0, 0.0),
            ..Default::default()
        });
        Font::new(table, RecordingSink::default()).into_shared()
    }

    fn draw_count(font: &SharedFont<GlyphTable, RecordingSink>) -> usize {
        font.with(|font| font.sink().draws().count())
    }

    #[test]
    fn test_nested_calls_on_owning_thread() {
        let font = shared();
        let session = font.session(false, true).unwrap();

        // Same thread re-enters the lock while the session holds it
        font.set_text_color(Some(Color::RED));
        font.print(0.0, 0.0, 1.0, PrintOptions::empty(), "AA");
        session.font().print(0.0, 0.0, 1.0, PrintOptions::empty(), "A");
        assert_eq!(draw_count(&font), 0);

        session.end().unwrap();
        assert_eq!(draw_count(&font), 1);
        font.with(|font| {
            let draw = font.sink().draws().next().unwrap();
            assert_eq!(draw.vertices.len(), 3 * 4);
        });
    }

    #[test]
    fn test_dropping_session_submits() {
        let font = shared();
        {
            let session = font.session(true, true).unwrap();
            session.font().print(0.0, 0.0, 1.0, PrintOptions::empty(), "A");
        }
        assert_eq!(draw_count(&font), 1);
        assert!(!font.with(|font| font.in_session()));
    }

    #[test]
    fn test_second_session_fails() {
        let font = shared();
        let _session = font.session(false, true).unwrap();
        assert!(font.session(false, true).is_err());
    }

    #[test]
    fn test_concurrent_prints_are_serialized() {
        let font = shared();
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let font = font.clone();
                thread::spawn(move || {
                    for _ in 0..8 {
                        font.print(0.0, 0.0, 1.0, PrintOptions::OUTLINE, "AA");
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        // Each immediate print submits an outline and a text batch
        assert_eq!(draw_count(&font), 4 * 8 * 2);
    }

    #[test]
    fn test_session_blocks_other_threads_until_end() {
        let font = shared();
        let session = font.session(false, true).unwrap();
        session.font().print(0.0, 0.0, 1.0, PrintOptions::empty(), "A");

        let (started_tx, started_rx) = mpsc::channel();
        let worker = {
            let font = font.clone();
            thread::spawn(move || {
                started_tx.send(()).unwrap();
                font.print(0.0, 0.0, 1.0, PrintOptions::empty(), "AA");
            })
        };
        started_rx.recv().unwrap();
        thread::sleep(Duration::from_millis(20));

        // The other thread waits on the lock instead of joining this batch
        assert_eq!(session.font().text_batch().quad_count(), 1);
        session.end().unwrap();
        worker.join().unwrap();

        font.with(|font| {
            let quads: Vec<usize> = font
                .sink()
                .draws()
                .map(|draw| draw.vertices.len() / 4)
                .collect();
            assert_eq!(quads, vec![1, 2]);
            let immediate: Vec<bool> = font.sink().draws().map(|draw| draw.immediate).collect();
            assert_eq!(immediate, vec![false, true]);
        });
    }

    #[test]
    #[should_panic(expected = "already borrowed")]
    fn test_handle_call_while_font_borrowed_panics() {
        let font = shared();
        let session = font.session(false, true).unwrap();
        let _font = session.font();
        font.set_text_color(None);
    }
}
