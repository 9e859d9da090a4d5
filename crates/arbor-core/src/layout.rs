//! The two-pass measure/arrange protocol.
//!
//! Orchestration only: caching, invalidation interplay, and pass ordering.
//! The per-type sizing logic lives behind [`crate::Widget`]. Both entry
//! points are idempotent - repeat calls with identical inputs and no
//! intervening invalidation return from the cache without re-running widget
//! logic.

use geom::{Expanse, Rect};
use tracing::trace;

use crate::{
    error::{Error, Result},
    id::NodeId,
    sizing::Alignment,
    tree::Tree,
};

/// Resolve a node's desired size for `available`, caching the result.
pub(crate) fn measure(tree: &mut Tree, id: NodeId, available: Expanse) -> Result<()> {
    let node = tree.node(id)?;
    if node.cache.measure_valid && node.cache.previous_measure == Some(available) {
        return Ok(());
    }
    trace!(node = %node.name(), w = available.w, h = available.h, "measure");

    let desired = measure_core(tree, id, available)?;
    if !(desired.w.is_finite() && desired.h.is_finite() && desired.w >= 0.0 && desired.h >= 0.0) {
        return Err(Error::Layout(format!(
            "invalid desired size {desired:?} for node {id:?}"
        )));
    }

    let node = tree.node_mut(id)?;
    node.cache.measure_valid = true;
    node.cache.previous_measure = Some(available);
    let prev = node.cache.desired;
    node.cache.desired = desired;
    let parent = node.parent;

    // A changed desired size can change the parent's, unless the parent is
    // mid-measure and will pick the new value up directly.
    if prev != desired
        && let Some(parent) = parent
        && !tree.node(parent)?.measuring
    {
        tree.invalidate_measure(parent)?;
    }
    Ok(())
}

/// The fixed half of measurement: visibility, margins, size constraints and
/// clamping around the widget's own sizing logic.
fn measure_core(tree: &mut Tree, id: NodeId, available: Expanse) -> Result<Expanse> {
    let (visible, sizing) = {
        let node = tree.node(id)?;
        (node.visible, node.sizing)
    };
    if !visible {
        return Ok(Expanse::ZERO);
    }

    let without_margin = sizing.margin.deflate(available);
    let constrained = sizing.clamp(without_margin);

    tree.node_mut(id)?.measuring = true;
    let measured = tree.with_widget(id, |tree, widget| widget.measure(tree, id, constrained));
    if let Ok(node) = tree.node_mut(id) {
        node.measuring = false;
    }
    let measured = measured?;

    let floored = measured.max(tree.style().min_size);
    let clamped = sizing.clamp(floored);
    let with_margin = sizing.margin.inflate(clamped);
    Ok(with_margin.min(available).non_negative())
}

/// Arrange a node into `rect`, caching the result. Re-measures first if the
/// measurement is stale, so arrangement never consumes a stale desired
/// size.
pub(crate) fn arrange(tree: &mut Tree, id: NodeId, rect: Rect) -> Result<()> {
    // Display regions can transiently go degenerate during resize storms;
    // clamp rather than error.
    let rect = rect.non_negative();

    let node = tree.node(id)?;
    if !node.cache.measure_valid {
        let available = node.cache.previous_measure.unwrap_or_else(|| rect.expanse());
        measure(tree, id, available)?;
    }

    let node = tree.node(id)?;
    if node.cache.arrange_valid && node.cache.previous_arrange == Some(rect) {
        return Ok(());
    }
    trace!(node = %node.name(), ?rect, "arrange");

    arrange_core(tree, id, rect)?;

    let node = tree.node_mut(id)?;
    node.cache.arrange_valid = true;
    node.cache.previous_arrange = Some(rect);
    Ok(())
}

/// The fixed half of arrangement: margins, alignment shrinking, constraint
/// application and origin placement around the widget's child-rect logic.
fn arrange_core(tree: &mut Tree, id: NodeId, rect: Rect) -> Result<()> {
    let (visible, sizing, desired) = {
        let node = tree.node(id)?;
        (node.visible, node.sizing, node.cache.desired)
    };
    if !visible {
        return Ok(());
    }

    let without_margins = sizing.margin.deflate_rect(rect);
    let avail = without_margins.expanse();
    let mut size = avail;

    // A non-stretching node shrinks to its desired size on that axis; the
    // desired size includes the margin, which the rect no longer does.
    if sizing.horizontal != Alignment::Stretch {
        size.w = size.w.min(desired.w - sizing.margin.horizontal());
    }
    if sizing.vertical != Alignment::Stretch {
        size.h = size.h.min(desired.h - sizing.margin.vertical());
    }
    let size = sizing.clamp(size.non_negative());

    let used = tree.with_widget(id, |tree, widget| widget.arrange(tree, id, size))?;
    let size = used.min(size).non_negative();

    let mut origin = without_margins.tl;
    match sizing.horizontal {
        Alignment::Begin => {}
        Alignment::Stretch | Alignment::Center => origin.x += (avail.w - size.w) / 2.0,
        Alignment::End => origin.x += avail.w - size.w,
    }
    match sizing.vertical {
        Alignment::Begin => {}
        Alignment::Stretch | Alignment::Center => origin.y += (avail.h - size.h) / 2.0,
        Alignment::End => origin.y += avail.h - size.h,
    }

    tree.node_mut(id)?.cache.rect = Rect::from_parts(origin, size);
    Ok(())
}
