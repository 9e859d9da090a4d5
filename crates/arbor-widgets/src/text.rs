use arbor_core::{FontMetrics, NodeId, Result, Tree, Widget};
use geom::Expanse;

/// A text leaf. Sizing only: it asks the rendering backend's font metrics
/// for line height and advance widths and reports the resulting block size.
/// Shaping and wrapping live elsewhere.
pub struct Text {
    /// The text content.
    text: String,
    /// Metrics lookup from the rendering backend.
    metrics: Box<dyn FontMetrics>,
}

impl Text {
    /// Build a text leaf over a metrics lookup.
    pub fn new(text: impl Into<String>, metrics: impl FontMetrics + 'static) -> Self {
        Self {
            text: text.into(),
            metrics: Box::new(metrics),
        }
    }

    /// The current content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the content. A property setter is a cache-busting entry
    /// point: the new text changes the desired size, so measurement is
    /// explicitly invalidated.
    pub fn set_text(tree: &mut Tree, id: NodeId, text: impl Into<String>) -> Result<()> {
        tree.widget_mut::<Self>(id)?.text = text.into();
        tree.invalidate_measure(id)
    }
}

impl Widget for Text {
    fn measure(&mut self, _tree: &mut Tree, _id: NodeId, _available: Expanse) -> Result<Expanse> {
        let mut width = 0.0f32;
        let mut lines = 0usize;
        for line in self.text.lines() {
            lines += 1;
            width = width.max(line.chars().map(|c| self.metrics.advance(c)).sum());
        }
        Ok(Expanse::new(
            width,
            self.metrics.line_height() * lines as f32,
        ))
    }
}
