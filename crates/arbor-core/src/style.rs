//! Read-only lookups supplied by the toolkit's style and rendering layers.

use geom::Expanse;

/// Default visual parameters from the style cascade. The cascade itself is
/// out of scope; the engine consumes only this read-only snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    /// Default separation between container children.
    pub separation: f32,
    /// Thickness reserved for a visible scrollbar.
    pub scrollbar_thickness: f32,
    /// Default minimum size for nodes that do not set their own.
    pub min_size: Expanse,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            separation: 4.0,
            scrollbar_thickness: 12.0,
            min_size: Expanse::ZERO,
        }
    }
}

/// Font metrics from the rendering backend, needed by leaf nodes that size
/// themselves around text.
pub trait FontMetrics: Send {
    /// Height of one line of text.
    fn line_height(&self) -> f32;
    /// Advance width of a character.
    fn advance(&self, c: char) -> f32;
}

/// Fixed-advance metrics, sufficient for tests and simple backends.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMetrics {
    /// Advance of every character.
    pub advance: f32,
    /// Line height.
    pub line_height: f32,
}

impl FontMetrics for MonospaceMetrics {
    fn line_height(&self) -> f32 {
        self.line_height
    }

    fn advance(&self, _c: char) -> f32 {
        self.advance
    }
}
