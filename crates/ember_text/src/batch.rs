//! Glyph vertex batches
//!
//! A batch is a flat list of quads plus the color strips that tell the sink
//! which color each run of quads is drawn with. Vertex data uses
//! `#[repr(C)]` + `bytemuck::Pod` so a batch can be copied into a GPU buffer
//! as-is.

use crate::color::Color;
use crate::provider::GlyphRect;

/// Vertices per glyph quad
pub const QUAD_VERTICES: usize = 4;

/// A glyph quad corner (matches the shader vertex layout)
///
/// Memory layout:
/// - position: `vec2<f32>`  (8 bytes) - screen position
/// - tex_coord: `vec2<f32>` (8 bytes) - atlas texel coordinate
///   Total: 16 bytes
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlyphVertex {
    pub position: [f32; 2],
    pub tex_coord: [f32; 2],
}

impl GlyphVertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            tex_coord: [u, v],
        }
    }
}

/// Build the four corners of a quad covering `rect`, sampling `tex`
pub fn quad(rect: GlyphRect, tex: GlyphRect) -> [GlyphVertex; QUAD_VERTICES] {
    [
        GlyphVertex::new(rect.x0, rect.y1, tex.x0, tex.y1),
        GlyphVertex::new(rect.x0, rect.y0, tex.x0, tex.y0),
        GlyphVertex::new(rect.x1, rect.y0, tex.x1, tex.y0),
        GlyphVertex::new(rect.x1, rect.y1, tex.x1, tex.y1),
    ]
}

/// A run of consecutive quads drawn with one color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStrip {
    pub color: Color,
    /// Number of quads in the run
    pub quads: usize,
}

/// Growable quad list with color strips
#[derive(Debug, Clone)]
pub struct VertexBatch {
    vertices: Vec<GlyphVertex>,
    strips: Vec<ColorStrip>,
}

impl VertexBatch {
    /// Create an empty batch whose first strip uses `color`
    pub fn new(color: Color) -> Self {
        Self {
            vertices: Vec::new(),
            strips: vec![ColorStrip { color, quads: 0 }],
        }
    }

    /// Drop all geometry and start over with a single strip of `color`
    pub fn reset(&mut self, color: Color) {
        self.vertices.clear();
        self.strips.clear();
        self.strips.push(ColorStrip { color, quads: 0 });
    }

    /// Make room for `quads` more quads
    pub fn reserve_quads(&mut self, quads: usize) {
        self.vertices.reserve(quads * QUAD_VERTICES);
    }

    /// Switch the color used for following quads.
    ///
    /// A new strip only starts when the color differs and the open strip
    /// already holds geometry. An empty open strip is recolored instead, or
    /// dropped when the strip before it already has the new color.
    pub fn set_color(&mut self, color: Color) {
        let Some(&open) = self.strips.last() else {
            self.strips.push(ColorStrip { color, quads: 0 });
            return;
        };
        if open.color == color {
            return;
        }

        let len = self.strips.len();
        if open.quads > 0 {
            self.strips.push(ColorStrip { color, quads: 0 });
        } else if len > 1 && self.strips[len - 2].color == color {
            self.strips.pop();
        } else {
            self.strips[len - 1].color = color;
        }
    }

    pub fn push_quad(&mut self, corners: [GlyphVertex; QUAD_VERTICES]) {
        self.vertices.extend_from_slice(&corners);
        match self.strips.last_mut() {
            Some(open) => open.quads += 1,
            None => self.strips.push(ColorStrip {
                color: Color::default(),
                quads: 1,
            }),
        }
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / QUAD_VERTICES
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[GlyphVertex] {
        &self.vertices
    }

    pub fn strips(&self) -> &[ColorStrip] {
        &self.strips
    }

    /// Strips that cover geometry.
    ///
    /// Only the open strip can be empty, so this drops at most the last one.
    pub fn drawn_strips(&self) -> &[ColorStrip] {
        match self.strips.split_last() {
            Some((open, rest)) if open.quads == 0 => rest,
            _ => &self.strips,
        }
    }

    /// Color of the open strip
    pub fn current_color(&self) -> Option<Color> {
        self.strips.last().map(|strip| strip.color)
    }

    /// Raw vertex bytes for GPU upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

impl Default for VertexBatch {
    fn default() -> Self {
        Self::new(Color::default())
    }
}
