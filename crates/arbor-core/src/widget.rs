//! The widget capability trait.

use std::any::type_name;

use geom::{Expanse, Rect};

use crate::{error::Result, id::NodeId, state::NodeName, tree::Tree};

/// Widgets supply the per-type half of the layout contract: a desired size
/// given an available size, and child rect assignment given a final size.
/// Orchestration - caching, invalidation, pass ordering - lives in the tree,
/// outside any single implementation.
pub trait Widget: std::any::Any + Send {
    /// Compute the content's desired size for the given available size. The
    /// available size may be infinite on either axis. The default takes the
    /// component-wise maximum over visible children.
    ///
    /// May be called several times per pass for a node; repeat calls with
    /// the same input must be cheap and consistent.
    fn measure(&mut self, tree: &mut Tree, id: NodeId, available: Expanse) -> Result<Expanse> {
        measure_children_max(tree, id, available)
    }

    /// Assign rects to children given the node's final content size, and
    /// return the space actually used. The default hands every visible child
    /// the full content rect.
    fn arrange(&mut self, tree: &mut Tree, id: NodeId, size: Expanse) -> Result<Expanse> {
        arrange_children_fill(tree, id, size)?;
        Ok(size)
    }

    /// Name used in tracing output and debugging.
    fn name(&self) -> NodeName {
        let name = type_name::<Self>();
        let short = name.rsplit("::").next().unwrap_or(name);
        NodeName::convert(short)
    }
}

/// Convert widgets into boxed trait objects.
impl<W> From<W> for Box<dyn Widget>
where
    W: Widget + 'static,
{
    fn from(widget: W) -> Self {
        Box::new(widget)
    }
}

/// Measure every visible child against `available` and return the
/// component-wise maximum of their desired sizes.
pub fn measure_children_max(tree: &mut Tree, id: NodeId, available: Expanse) -> Result<Expanse> {
    let mut min = Expanse::ZERO;
    for child in tree.visible_children(id)? {
        tree.measure(child, available)?;
        min = min.max(tree.desired_size(child)?);
    }
    Ok(min)
}

/// Arrange every visible child into the full content rect.
pub fn arrange_children_fill(tree: &mut Tree, id: NodeId, size: Expanse) -> Result<()> {
    for child in tree.visible_children(id)? {
        tree.arrange(child, Rect::from_parts(geom::Point::zero(), size))?;
    }
    Ok(())
}
