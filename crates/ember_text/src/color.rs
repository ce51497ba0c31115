//! Text and outline colors
//!
//! Colors are RGBA in linear 0..1 space. Inline color directives only ever
//! carry RGB, so alpha survives every in-text color change.

/// RGBA color (linear space)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

    /// Default text color, slightly translucent white
    pub const DEFAULT_TEXT: Color = Color::rgba(1.0, 1.0, 1.0, 0.95);
    /// Outline used behind bright text
    pub const DARK_OUTLINE: Color = Color::rgba(0.05, 0.05, 0.05, 0.95);
    /// Outline used behind dark text
    pub const LIGHT_OUTLINE: Color = Color::rgba(0.95, 0.95, 0.95, 0.8);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build a color from raw directive bytes, keeping `alpha`
    pub fn from_rgb_bytes(rgb: [u8; 3], alpha: f32) -> Self {
        Self {
            r: f32::from(rgb[0]) / 255.0,
            g: f32::from(rgb[1]) / 255.0,
            b: f32::from(rgb[2]) / 255.0,
            a: alpha,
        }
    }

    /// Quantize RGB back to directive bytes
    pub fn to_rgb_bytes(&self) -> [u8; 3] {
        // Truncation mirrors how directive bytes are produced from float colors.
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Gamma-weighted relative luminance, offset by 0.05 so ratios stay finite
    pub fn luminance(&self) -> f32 {
        0.05 + 0.2126 * self.r.powf(2.2) + 0.7152 * self.g.powf(2.2) + 0.0722 * self.b.powf(2.2)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::DEFAULT_TEXT
    }
}

/// Pick an outline color that stays legible against `text`.
///
/// When the contrast ratio between `text` and the dark outline exceeds 5 the
/// dark outline is used, otherwise the light one.
pub fn choose_outline_color(text: Color) -> Color {
    let luminance = text.luminance();
    let dark = Color::DARK_OUTLINE.luminance();

    let max = luminance.max(dark);
    let min = luminance.min(dark);

    if max / min > 5.0 {
        Color::DARK_OUTLINE
    } else {
        Color::LIGHT_OUTLINE
    }
}
