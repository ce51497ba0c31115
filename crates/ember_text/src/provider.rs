//! Glyph provider interface
//!
//! The engine never rasterizes or owns glyph bitmaps. Everything it needs
//! about a glyph comes from a [`GlyphProvider`], usually backed by a glyph
//! atlas that may grow or be reallocated between calls. Glyphs are therefore
//! returned by value and looked up again whenever they are needed.

use rustc_hash::FxHashMap;

use crate::config::FontFaceConfig;

/// Axis-aligned rectangle given by its two corners
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlyphRect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl GlyphRect {
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// Metrics and atlas placement of one glyph
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlyphInfo {
    /// Character this glyph represents
    pub codepoint: char,
    /// Horizontal advance to the next pen position (never negative)
    pub advance: f32,
    /// Distance the glyph rises above the baseline
    pub height: f32,
    /// Distance the glyph extends below the baseline (negative)
    pub descender: f32,
    /// Quad in glyph-local units, relative to the pen position
    pub size: GlyphRect,
    /// Texel rectangle of the glyph fill in the atlas
    pub tex_coords: GlyphRect,
    /// Texel rectangle of the blurred/outlined variant used by shadows and outlines
    pub shadow_tex_coords: GlyphRect,
}

/// Atlas texture handle plus its size in texels.
///
/// Texture coordinates in [`GlyphInfo`] are absolute texels because the atlas
/// can be resized; the sink divides by `width`/`height` when sampling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextureInfo {
    pub id: u64,
    pub width: u32,
    pub height: u32,
}

/// Source of glyph metrics, kerning and the atlas texture
pub trait GlyphProvider {
    /// Resolve a glyph; unmapped code points yield a fallback glyph.
    fn glyph(&mut self, c: char) -> GlyphInfo;

    /// Pair adjustment applied on top of the left glyph's advance.
    fn kerning(&mut self, left: char, right: char) -> f32;

    /// Baseline-to-baseline distance in glyph-local units
    fn line_height(&self) -> f32;

    /// Font-wide descender, negative
    fn descender(&self) -> f32;

    /// Outline width in pixels of the rasterized atlas
    fn outline_width(&self) -> f32;

    /// Nominal pixel size the atlas was rasterized at
    fn size(&self) -> f32;

    /// Current atlas texture
    fn texture(&self) -> TextureInfo;

    /// Upload pending atlas changes before drawing. Default: nothing to upload.
    fn update_texture(&mut self) {}
}

/// Pen advance from `left` to `right`, looked up fresh from the provider
pub(crate) fn pen_advance<P: GlyphProvider + ?Sized>(
    provider: &mut P,
    left: char,
    right: char,
) -> f32 {
    provider.glyph(left).advance + provider.kerning(left, right)
}

/// A fixed glyph table for pre-baked bitmap atlases
///
/// Unknown characters resolve to the fallback glyph (U+FFFD by default).
#[derive(Debug, Clone)]
pub struct GlyphTable {
    glyphs: FxHashMap<char, GlyphInfo>,
    kerning: FxHashMap<(char, char), f32>,
    fallback: GlyphInfo,
    line_height: f32,
    descender: f32,
    outline_width: f32,
    size: f32,
    texture: TextureInfo,
}

impl GlyphTable {
    /// Create an empty table for an atlas rasterized at `size` pixels
    pub fn new(size: f32, line_height: f32, descender: f32) -> Self {
        Self {
            glyphs: FxHashMap::default(),
            kerning: FxHashMap::default(),
            fallback: GlyphInfo {
                codepoint: char::REPLACEMENT_CHARACTER,
                ..GlyphInfo::default()
            },
            line_height,
            descender,
            outline_width: 0.0,
            size,
            texture: TextureInfo::default(),
        }
    }

    /// Create an empty table for an atlas baked from `face`
    pub fn for_face(face: &FontFaceConfig, line_height: f32, descender: f32) -> Self {
        Self::new(face.size as f32, line_height, descender)
            .with_outline_width(face.outline_width as f32)
    }

    pub fn with_outline_width(mut self, outline_width: f32) -> Self {
        self.outline_width = outline_width;
        self
    }

    pub fn with_texture(mut self, texture: TextureInfo) -> Self {
        self.texture = texture;
        self
    }

    /// Replace the glyph returned for unmapped characters
    pub fn with_fallback(mut self, fallback: GlyphInfo) -> Self {
        self.fallback = fallback;
        self
    }

    /// Add or replace a glyph
    pub fn insert(&mut self, glyph: GlyphInfo) {
        self.glyphs.insert(glyph.codepoint, glyph);
    }

    /// Set the kerning adjustment for an ordered pair
    pub fn set_kerning(&mut self, left: char, right: char, amount: f32) {
        self.kerning.insert((left, right), amount);
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl GlyphProvider for GlyphTable {
    fn glyph(&mut self, c: char) -> GlyphInfo {
        self.glyphs.get(&c).copied().unwrap_or(self.fallback)
    }

    fn kerning(&mut self, left: char, right: char) -> f32 {
        self.kerning.get(&(left, right)).copied().unwrap_or(0.0)
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn descender(&self) -> f32 {
        self.descender
    }

    fn outline_width(&self) -> f32 {
        self.outline_width
    }

    fn size(&self) -> f32 {
        self.size
    }

    fn texture(&self) -> TextureInfo {
        self.texture
    }
}
