//! Widgets and helpers for tests. Kept as a public module so downstream
//! crates can drive the engine in their own tests.

use geom::Expanse;

use crate::{
    error::Result,
    id::NodeId,
    tree::Tree,
    widget::{Widget, arrange_children_fill},
};

/// A widget with entirely default behavior: children get the full rect, and
/// the desired size is the maximum over children.
#[derive(Debug, Default)]
pub struct TFill;

impl Widget for TFill {}

/// A leaf with a fixed desired size.
#[derive(Debug)]
pub struct TFixed {
    /// Desired width.
    pub w: f32,
    /// Desired height.
    pub h: f32,
}

impl TFixed {
    /// Build a fixed-size leaf.
    pub fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }
}

impl Widget for TFixed {
    fn measure(&mut self, _tree: &mut Tree, _id: NodeId, _available: Expanse) -> Result<Expanse> {
        Ok(Expanse::new(self.w, self.h))
    }
}

/// A fixed-size widget that counts how often its sizing logic actually
/// runs, for cache and idempotence assertions.
#[derive(Debug)]
pub struct TProbe {
    /// Desired size to report.
    pub size: Expanse,
    /// Number of measure invocations that reached the widget.
    pub measures: u32,
    /// Number of arrange invocations that reached the widget.
    pub arranges: u32,
}

impl TProbe {
    /// Build a probe reporting the given desired size.
    pub fn new(size: Expanse) -> Self {
        Self {
            size,
            measures: 0,
            arranges: 0,
        }
    }
}

impl Widget for TProbe {
    fn measure(&mut self, _tree: &mut Tree, _id: NodeId, _available: Expanse) -> Result<Expanse> {
        self.measures += 1;
        Ok(self.size)
    }

    fn arrange(&mut self, tree: &mut Tree, id: NodeId, size: Expanse) -> Result<Expanse> {
        self.arranges += 1;
        arrange_children_fill(tree, id, size)?;
        Ok(size)
    }
}
