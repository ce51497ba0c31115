//! Text settings (`[font]` and `[console]` tables of a TOML file)
//!
//! Every key is optional; missing keys take the engine defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Top-level text settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TextSettings {
    #[serde(default)]
    pub font: FontSettings,
    #[serde(default)]
    pub console: ConsoleSettings,
}

impl TextSettings {
    /// Parse settings from TOML source
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded text settings");
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Parameters of one font face as handed to the atlas loader
#[derive(Debug, Clone, PartialEq)]
pub struct FontFaceConfig {
    pub file: String,
    /// Nominal pixel size
    pub size: u32,
    /// Outline width in pixels
    pub outline_width: u32,
    /// Strength of the blurred outline
    pub outline_weight: f32,
}

/// Main and small font faces
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FontSettings {
    #[serde(default = "default_font_file")]
    pub font_file: String,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default = "default_outline_width")]
    pub outline_width: u32,
    #[serde(default = "default_outline_weight")]
    pub outline_weight: f32,

    #[serde(default = "default_font_file")]
    pub small_font_file: String,
    #[serde(default = "default_small_font_size")]
    pub small_font_size: u32,
    #[serde(default = "default_small_outline_width")]
    pub small_outline_width: u32,
    #[serde(default = "default_small_outline_weight")]
    pub small_outline_weight: f32,
}

fn default_font_file() -> String {
    "fonts/FreeSansBold.otf".to_string()
}

fn default_font_size() -> u32 {
    23
}

fn default_outline_width() -> u32 {
    3
}

fn default_outline_weight() -> f32 {
    25.0
}

fn default_small_font_size() -> u32 {
    14
}

fn default_small_outline_width() -> u32 {
    2
}

fn default_small_outline_weight() -> f32 {
    10.0
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            font_file: default_font_file(),
            font_size: default_font_size(),
            outline_width: default_outline_width(),
            outline_weight: default_outline_weight(),
            small_font_file: default_font_file(),
            small_font_size: default_small_font_size(),
            small_outline_width: default_small_outline_width(),
            small_outline_weight: default_small_outline_weight(),
        }
    }
}

impl FontSettings {
    pub fn main_face(&self) -> FontFaceConfig {
        FontFaceConfig {
            file: self.font_file.clone(),
            size: self.font_size,
            outline_width: self.outline_width,
            outline_weight: self.outline_weight,
        }
    }

    pub fn small_face(&self) -> FontFaceConfig {
        FontFaceConfig {
            file: self.small_font_file.clone(),
            size: self.small_font_size,
            outline_width: self.small_outline_width,
            outline_weight: self.small_outline_weight,
        }
    }
}

/// On-screen log console
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConsoleSettings {
    /// Seconds a message stays visible
    #[serde(default = "default_message_time")]
    pub message_time_secs: u64,
    /// Console box `[x, y, width, height]` in normalized screen coordinates,
    /// `y` being the top edge
    #[serde(default = "default_geometry")]
    pub geometry: [f32; 4],
    /// Raw lines kept for consumers that read the full history
    #[serde(default = "default_max_raw_lines")]
    pub max_raw_lines: usize,
    /// Draw the console text outlined
    #[serde(default = "default_true")]
    pub outlined: bool,
}

fn default_message_time() -> u64 {
    10
}

fn default_geometry() -> [f32; 4] {
    [0.26, 0.96, 0.41, 0.205]
}

fn default_max_raw_lines() -> usize {
    1024
}

fn default_true() -> bool {
    true
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            message_time_secs: default_message_time(),
            geometry: default_geometry(),
            max_raw_lines: default_max_raw_lines(),
            outlined: default_true(),
        }
    }
}
