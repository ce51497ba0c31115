//! `tracing` layer feeding the console
//!
//! Install [`ConsoleLayer`] next to the usual formatting layer and every
//! event at or above its level shows up in the console, the event target
//! serving as the section.

use std::fmt::{self, Write as _};
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::buffer::ConsoleBuffer;

/// Forwards log events to a [`ConsoleBuffer`]
#[derive(Debug, Clone)]
pub struct ConsoleLayer {
    console: Arc<ConsoleBuffer>,
    max_level: Level,
}

impl ConsoleLayer {
    /// Forward events of `INFO` and above
    pub fn new(console: Arc<ConsoleBuffer>) -> Self {
        Self {
            console,
            max_level: Level::INFO,
        }
    }

    /// Forward only events at `level` or more severe
    pub fn with_max_level(mut self, level: Level) -> Self {
        self.max_level = level;
        self
    }
}

/// Collects the `message` field first, then `key=value` for the rest
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if *metadata.level() > self.max_level {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        visitor.message.push_str(&visitor.fields);

        self.console.record_log_message(
            *metadata.level(),
            metadata.target(),
            visitor.message.as_bytes(),
        );
    }
}
