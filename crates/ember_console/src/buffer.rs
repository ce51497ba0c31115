//! Console line storage
//!
//! Log messages arrive from any thread. Each message is kept whole in the raw
//! history and split into display lines that expire after the configured
//! message time. Drawing copies the visible lines out under the lock and
//! prints them after releasing it, since printing may log and log messages
//! come straight back into [`ConsoleBuffer::record_log_message`].

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ember_text::{
    split_into_lines, BatchSink, ConsoleSettings, GlyphProvider, PrintOptions, SharedFont,
};
use parking_lot::Mutex;
use tracing::Level;

use crate::positions::MessagePositions;

/// Padding between the console box and its text, in pixels
pub const BORDER_PX: f32 = 7.0;

/// One log message as received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// Message bytes, inline color directives included
    pub text: Vec<u8>,
    pub section: String,
    pub level: Level,
    /// Sequence number, unique per console
    pub id: u64,
}

/// A display line waiting to expire
#[derive(Debug, Clone)]
struct InfoLine {
    text: Vec<u8>,
    expires: Instant,
}

#[derive(Debug)]
struct ConsoleState {
    raw: VecDeque<RawLine>,
    /// Raw lines not yet handed out
    new_lines: usize,
    next_id: u64,
    lines: VecDeque<InfoLine>,
    max_lines: usize,
    positions: MessagePositions,
}

/// Scrolling log console
#[derive(Debug)]
pub struct ConsoleBuffer {
    settings: ConsoleSettings,
    lifetime: Duration,
    /// Print scale of the console text
    font_size: f32,
    enabled: bool,
    state: Mutex<ConsoleState>,
}

impl ConsoleBuffer {
    /// Create a console drawing its text at `font_size`
    pub fn new(settings: ConsoleSettings, font_size: f32) -> Self {
        let [_, _, width, height] = settings.geometry;
        let enabled = width != 0.0 && height != 0.0;
        if !enabled {
            tracing::debug!("info console disabled by zero-sized geometry");
        }

        Self {
            lifetime: Duration::from_secs(settings.message_time_secs),
            font_size,
            enabled,
            state: Mutex::new(ConsoleState {
                raw: VecDeque::new(),
                new_lines: 0,
                next_id: 0,
                lines: VecDeque::new(),
                max_lines: 1,
                positions: MessagePositions::default(),
            }),
            settings,
        }
    }

    pub fn settings(&self) -> &ConsoleSettings {
        &self.settings
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a message received now
    pub fn record_log_message(&self, level: Level, section: &str, text: impl AsRef<[u8]>) {
        self.record_log_message_at(level, section, text, Instant::now());
    }

    /// Record a message, its display lines expiring relative to `now`.
    ///
    /// `text` is raw bytes so color directives can carry any RGB value.
    pub fn record_log_message_at(
        &self,
        level: Level,
        section: &str,
        text: impl AsRef<[u8]>,
        now: Instant,
    ) {
        let text = text.as_ref();
        let mut state = self.state.lock();
        let max_raw = self.settings.max_raw_lines.max(1);

        while state.raw.len() >= max_raw {
            state.raw.pop_front();
        }
        if state.new_lines < max_raw {
            state.new_lines += 1;
        }

        let id = state.next_id;
        state.next_id += 1;
        state.raw.push_back(RawLine {
            text: text.to_vec(),
            section: section.to_string(),
            level,
            id,
        });

        // Lines are only appended here; eviction waits for `update`
        let expires = now + self.lifetime;
        for line in split_into_lines(text) {
            state.lines.push_back(InfoLine {
                text: line,
                expires,
            });
        }
    }

    /// Drop expired lines and lines that no longer fit the console box
    pub fn update<P: GlyphProvider, S: BatchSink>(&self, font: &SharedFont<P, S>, now: Instant) {
        let (line_height, pixel_y) =
            font.with(|font| (font.line_height(), font.viewport().pixel_y));
        self.update_with(line_height, pixel_y, now);
    }

    fn update_with(&self, line_height: f32, pixel_y: f32, now: Instant) {
        let mut state = self.state.lock();

        let expired = state
            .lines
            .iter()
            .take_while(|line| line.expires <= now)
            .count();
        state.lines.drain(..expired);

        let view_height = 1.0 / pixel_y;
        let max_height = self.settings.geometry[3] * view_height - 2.0 * BORDER_PX;
        let row_height = self.font_size * line_height;
        state.max_lines = if row_height > 0.0 {
            (max_height / row_height).floor().max(0.0) as usize
        } else {
            1
        };

        let overflow = state.lines.len().saturating_sub(state.max_lines);
        if overflow > 0 {
            tracing::trace!(overflow, "console lines scrolled out");
        }
        state.lines.drain(..overflow);
    }

    /// Copy of the lines currently shown, oldest first
    pub fn visible_lines(&self) -> Vec<Vec<u8>> {
        let state = self.state.lock();
        state
            .lines
            .iter()
            .take(state.max_lines)
            .map(|line| line.text.clone())
            .collect()
    }

    /// Full raw history plus the number of lines added since the last take
    pub fn take_raw_lines(&self) -> (Vec<RawLine>, usize) {
        let mut state = self.state.lock();
        let new_lines = std::mem::take(&mut state.new_lines);
        (state.raw.iter().cloned().collect(), new_lines)
    }

    /// Raw lines added since the last take, oldest first
    pub fn take_new_raw_lines(&self) -> Vec<RawLine> {
        let mut state = self.state.lock();
        let new_lines = std::mem::take(&mut state.new_lines);
        let start = state.raw.len().saturating_sub(new_lines);
        state.raw.iter().skip(start).cloned().collect()
    }

    /// Remember where the latest positional message happened
    pub fn last_message_position(&self, position: [f32; 3]) {
        self.state.lock().positions.push(position);
    }

    /// Cycle through recent message positions, `default` when there are none
    pub fn next_message_position(&self, default: [f32; 3]) -> [f32; 3] {
        self.state.lock().positions.advance().unwrap_or(default)
    }

    /// Print the visible lines top-down inside the console box.
    ///
    /// Prints happen after the console lock is released, so anything the
    /// font logs while drawing can be recorded again.
    pub fn draw<P: GlyphProvider, S: BatchSink>(
        &self,
        font: &SharedFont<P, S>,
    ) -> ember_text::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let lines = self.visible_lines();
        if lines.is_empty() {
            return Ok(());
        }

        let viewport = font.with(|font| font.viewport());
        let row_height = self.font_size * font.line_height() * viewport.pixel_y;
        let [x, y, _, _] = self.settings.geometry;
        let cur_x = x + BORDER_PX * viewport.pixel_x;
        let mut cur_y = y - BORDER_PX * viewport.pixel_y;

        let mut options = PrintOptions::NORM;
        if self.settings.outlined {
            options |= PrintOptions::OUTLINE;
        }

        let session = font.session(false, true)?;
        for line in &lines {
            cur_y -= row_height;
            session.font().print(cur_x, cur_y, self.font_size, options, line);
        }
        session.end()
    }
}
