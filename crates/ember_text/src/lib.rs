//! Batched glyph layout for the Ember engine
//!
//! This crate provides:
//! - Inline color directives and line breaks embedded in text
//! - Text measurement (width, height, descender, line count)
//! - Glyph quad generation with plain, shadow and outline styles
//! - Aligned, tabular and world-space print entry points
//! - Batch sessions submitted to a pluggable [`BatchSink`]
//! - An opt-in thread-safe font handle ([`SharedFont`])
//!
//! Glyph rasterization and atlas management live behind [`GlyphProvider`];
//! graphics API calls live behind [`BatchSink`].

pub mod batch;
pub mod color;
pub mod config;
pub mod escape;
pub mod font;
pub mod layout;
pub mod lines;
pub mod metrics;
pub mod provider;
pub mod renderer;
pub mod session;
pub mod shared;

pub use batch::{ColorStrip, GlyphVertex, VertexBatch};
pub use color::{choose_outline_color, Color};
pub use config::{ConsoleSettings, FontFaceConfig, FontSettings, TextSettings};
pub use escape::{color_code, strip_color_codes, COLOR_CODE, COLOR_RESET};
pub use font::{Font, Viewport};
pub use layout::{split_table_columns, PrintOptions, TextAlignment, TextAnchor};
pub use lines::split_into_lines;
pub use metrics::TextHeight;
pub use provider::{GlyphInfo, GlyphProvider, GlyphRect, GlyphTable, TextureInfo};
pub use renderer::RenderStyle;
pub use session::{
    BatchKind, BatchSink, DrawBatch, RecordedDraw, RecordingSink, SinkEvent, StripColors,
};
pub use shared::{SharedFont, SharedSession};

use thiserror::Error;

/// Text engine errors
#[derive(Error, Debug)]
pub enum TextError {
    #[error("A font session is already open")]
    SessionAlreadyOpen,

    #[error("No font session is open")]
    SessionNotOpen,

    #[error("Invalid text settings: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Failed to serialize text settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to read text settings: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TextError>;
