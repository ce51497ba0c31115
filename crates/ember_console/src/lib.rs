//! On-screen log console for the Ember engine
//!
//! Keeps recent log messages as self-contained display lines (color
//! directives carried across line breaks) and draws them through a
//! [`SharedFont`](ember_text::SharedFont). Messages can be recorded directly
//! or captured from `tracing` with [`ConsoleLayer`].

pub mod buffer;
pub mod layer;
pub mod positions;

pub use buffer::{ConsoleBuffer, RawLine, BORDER_PX};
pub use layer::ConsoleLayer;
pub use positions::{MessagePositions, MAX_POSITIONS};
