use geom::{Expanse, Point, Rect};
use slotmap::SlotMap;
use tracing::{debug, trace};

use crate::{
    attached::{Attached, PropertyId, PropertyValue},
    error::{Error, Result},
    id::NodeId,
    layout,
    node::Node,
    sizing::Sizing,
    style::Style,
    widget::Widget,
};

/// A node rect in device pixels. Produced only at the rendering/hit-testing
/// boundary; cached layout values stay in logical units so rounding error
/// never compounds across scale changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge in device pixels.
    pub x: i32,
    /// Top edge in device pixels.
    pub y: i32,
    /// Width in device pixels.
    pub w: i32,
    /// Height in device pixels.
    pub h: i32,
}

/// The node tree: arena storage, the measure/arrange driver, invalidation,
/// and the attached-property table.
///
/// Single-threaded by design; the tree is owned and mutated only by the
/// thread driving the frame loop.
pub struct Tree {
    /// Node storage arena.
    pub(crate) nodes: SlotMap<NodeId, Node>,
    /// Root node ID.
    root: NodeId,
    /// Device pixels per logical unit, inherited from the root.
    scale: f32,
    /// Style defaults consumed by containers.
    style: Style,
    /// Attached properties for the anchor resolver.
    attached: Attached,
    /// Nodes whose arrange was invalidated without a measure invalidation.
    /// Drained by the frame driver after the root pass.
    pub(crate) arrange_queue: Vec<NodeId>,
    /// Set while a layout pass runs; structural mutation is rejected.
    pub(crate) in_layout: bool,
}

impl Tree {
    /// Build a tree around a root widget.
    pub fn new(root_widget: impl Into<Box<dyn Widget>>) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(root_widget.into()));
        Self {
            nodes,
            root,
            scale: 1.0,
            style: Style::default(),
            attached: Attached::default(),
            arrange_queue: Vec::new(),
            in_layout: false,
        }
    }

    /// Replace the style defaults.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The style defaults.
    pub fn style(&self) -> Style {
        self.style
    }

    /// Device pixels per logical unit.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Change the UI scale. Every cached measurement is in logical units, so
    /// only text-like widgets that measure in pixels actually change; the
    /// whole tree is re-measured regardless.
    pub fn set_scale(&mut self, scale: f32) -> Result<()> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(Error::Invalid(format!("ui scale {scale}")));
        }
        self.scale = scale;
        self.invalidate_measure(self.root)
    }

    /// Borrow a node.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Borrow a node mutably.
    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))
    }

    /// True if the node handle resolves to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Total number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Create a node for `widget` and append it to `parent`'s children.
    pub fn attach(&mut self, parent: NodeId, widget: impl Into<Box<dyn Widget>>) -> Result<NodeId> {
        let index = self.node(parent)?.children.len();
        self.attach_at(parent, index, widget)
    }

    /// Create a node for `widget` and insert it into `parent`'s children at
    /// `index`. Insertion order is layout order.
    pub fn attach_at(
        &mut self,
        parent: NodeId,
        index: usize,
        widget: impl Into<Box<dyn Widget>>,
    ) -> Result<NodeId> {
        if self.in_layout {
            return Err(Error::LayoutInProgress);
        }
        let id = self.mount_at(parent, index, widget.into())?;
        self.invalidate_measure(parent)?;
        Ok(id)
    }

    /// Remove a node and its whole subtree from the tree, discarding caches
    /// and attached-property entries.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if self.in_layout {
            return Err(Error::LayoutInProgress);
        }
        if id == self.root {
            return Err(Error::Invalid("cannot remove the root node".into()));
        }
        let parent = self.node(id)?.parent;
        self.unmount(id)?;
        if let Some(parent) = parent {
            self.invalidate_measure(parent)?;
        }
        Ok(())
    }

    /// Pass-safe attach: link a new node without touching validity flags.
    /// For use by containers mutating their own subtree from inside their
    /// own arrange (virtualized mounting); everyone else wants [`attach`].
    ///
    /// [`attach`]: Self::attach
    pub fn mount(&mut self, parent: NodeId, widget: Box<dyn Widget>) -> Result<NodeId> {
        let index = self.node(parent)?.children.len();
        self.mount_at(parent, index, widget)
    }

    /// Pass-safe variant of [`attach_at`]; see [`mount`].
    ///
    /// [`attach_at`]: Self::attach_at
    /// [`mount`]: Self::mount
    pub fn mount_at(
        &mut self,
        parent: NodeId,
        index: usize,
        widget: Box<dyn Widget>,
    ) -> Result<NodeId> {
        if !self.contains(parent) {
            return Err(Error::NodeNotFound(parent));
        }
        let mut node = Node::new(widget);
        node.parent = Some(parent);
        let id = self.nodes.insert(node);
        let siblings = &mut self.node_mut(parent)?.children;
        let index = index.min(siblings.len());
        siblings.insert(index, id);
        trace!(node = %self.nodes[id].name, ?id, "mount");
        Ok(id)
    }

    /// Pass-safe removal of a node and its subtree; the counterpart of
    /// [`mount`].
    ///
    /// [`mount`]: Self::mount
    pub fn unmount(&mut self, id: NodeId) -> Result<()> {
        let node = self.node(id)?;
        trace!(node = %node.name, ?id, "unmount");
        let parent = node.parent;
        if let Some(parent) = parent
            && let Some(p) = self.nodes.get_mut(parent)
        {
            p.children.retain(|c| *c != id);
        }
        self.drop_subtree(id);
        Ok(())
    }

    /// Drop a node and its descendants from the arena, along with their
    /// attached-property entries.
    fn drop_subtree(&mut self, id: NodeId) {
        let Some(node) = self.nodes.remove(id) else {
            return;
        };
        self.attached.remove_node(id);
        for child in node.children {
            self.drop_subtree(child);
        }
    }

    /// The node's children in layout order.
    pub fn children(&self, id: NodeId) -> Result<Vec<NodeId>> {
        Ok(self.node(id)?.children.clone())
    }

    /// The node's visible children in layout order. Invisible nodes occupy
    /// no slot in any layout algorithm.
    pub fn visible_children(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let node = self.node(id)?;
        Ok(node
            .children
            .iter()
            .copied()
            .filter(|c| self.nodes.get(*c).is_some_and(|n| n.visible))
            .collect())
    }

    /// Show or hide a node. Hidden nodes contribute no size and occupy no
    /// slot, so the change invalidates measurement up the tree.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<()> {
        if self.node(id)?.visible == visible {
            return Ok(());
        }
        self.node_mut(id)?.visible = visible;
        self.invalidate_measure(id)
    }

    /// Replace a node's sizing policy.
    pub fn set_sizing(&mut self, id: NodeId, sizing: Sizing) -> Result<()> {
        self.node_mut(id)?.sizing = sizing;
        self.invalidate_measure(id)
    }

    /// Update a node's sizing policy in place.
    pub fn update_sizing(&mut self, id: NodeId, f: impl FnOnce(&mut Sizing)) -> Result<()> {
        f(&mut self.node_mut(id)?.sizing);
        self.invalidate_measure(id)
    }

    /// Set the stretch ratio used when multiple expanding siblings compete
    /// for space. Rejected synchronously unless finite and positive.
    pub fn set_stretch_ratio(&mut self, id: NodeId, ratio: f32) -> Result<()> {
        if !(ratio.is_finite() && ratio > 0.0) {
            return Err(Error::Invalid(format!("stretch ratio {ratio}")));
        }
        self.node_mut(id)?.sizing.set_stretch_ratio_unchecked(ratio);
        // The ratio only affects how the parent divides space.
        if let Some(parent) = self.node(id)?.parent {
            self.invalidate_arrange(parent)?;
        }
        Ok(())
    }

    /// The cached desired size from the node's last measure.
    pub fn desired_size(&self, id: NodeId) -> Result<Expanse> {
        Ok(self.node(id)?.cache.desired)
    }

    /// The node's arranged rect, relative to its parent's content area.
    pub fn rect(&self, id: NodeId) -> Result<Rect> {
        Ok(self.node(id)?.cache.rect)
    }

    /// The node's origin in root coordinates, computed by walking the parent
    /// chain.
    pub fn global_position(&self, id: NodeId) -> Result<Point> {
        let mut offset = self.node(id)?.cache.rect.tl;
        let mut cursor = self.node(id)?.parent;
        while let Some(id) = cursor {
            let node = self.node(id)?;
            offset = offset + node.cache.rect.tl;
            cursor = node.parent;
        }
        Ok(offset)
    }

    /// The node's rect in device pixels, in root coordinates. Rounding
    /// happens here and only here.
    pub fn pixel_rect(&self, id: NodeId) -> Result<PixelRect> {
        let origin = self.global_position(id)?;
        let rect = self.node(id)?.cache.rect;
        Ok(PixelRect {
            x: (origin.x * self.scale).round() as i32,
            y: (origin.y * self.scale).round() as i32,
            w: (rect.w * self.scale).round() as i32,
            h: (rect.h * self.scale).round() as i32,
        })
    }

    /// Mark a node's measurement stale. Arrangement is implied stale too,
    /// and every ancestor up to the root is invalidated the same way: a
    /// child's size change can change an ancestor's desired size. The walk
    /// is explicit and synchronous so propagation order is deterministic.
    pub fn invalidate_measure(&mut self, id: NodeId) -> Result<()> {
        let mut cursor = Some(id);
        while let Some(id) = cursor {
            let node = self.node_mut(id)?;
            if !node.cache.measure_valid {
                // Already stale, so its ancestors are too.
                break;
            }
            node.cache.measure_valid = false;
            node.cache.arrange_valid = false;
            cursor = node.parent;
        }
        Ok(())
    }

    /// Mark a node's arrangement stale without forcing re-measurement. Does
    /// not propagate to ancestors; descendants re-arrange as the new rects
    /// reach them.
    pub fn invalidate_arrange(&mut self, id: NodeId) -> Result<()> {
        let node = self.node_mut(id)?;
        if !node.cache.arrange_valid {
            return Ok(());
        }
        node.cache.arrange_valid = false;
        self.arrange_queue.push(id);
        Ok(())
    }

    /// Set an attached property and invalidate the arrangement of the
    /// parent, which is the only consumer of these values.
    pub fn set_attached(
        &mut self,
        id: NodeId,
        property: PropertyId,
        value: PropertyValue,
    ) -> Result<()> {
        if !self.contains(id) {
            return Err(Error::NodeNotFound(id));
        }
        self.attached.set(id, property, value);
        if let Some(parent) = self.node(id)?.parent {
            self.invalidate_arrange(parent)?;
        }
        Ok(())
    }

    /// The attached-property table.
    pub fn attached(&self) -> &Attached {
        &self.attached
    }

    /// Measure a node: resolve its desired size for `available`, consulting
    /// the cache first. See [`crate::Widget::measure`] for the per-type
    /// half.
    pub fn measure(&mut self, id: NodeId, available: Expanse) -> Result<()> {
        layout::measure(self, id, available)
    }

    /// Arrange a node into `rect` (parent-relative), consulting the cache
    /// first and re-measuring if needed. Negative sizes are clamped to zero.
    pub fn arrange(&mut self, id: NodeId, rect: Rect) -> Result<()> {
        layout::arrange(self, id, rect)
    }

    /// Drive one frame of layout: a full measure pass over the dirty
    /// subtree, then a full arrange pass, then re-arrangement of any nodes
    /// that were arrange-invalidated out of band.
    pub fn layout(&mut self, size: Expanse) -> Result<()> {
        if self.in_layout {
            return Err(Error::LayoutInProgress);
        }
        debug!(w = size.w, h = size.h, "layout pass");
        self.in_layout = true;
        let mut this = scopeguard::guard(self, |tree| tree.in_layout = false);
        this.layout_inner(size)
    }

    /// The body of [`layout`], wrapped so the pass flag always resets.
    ///
    /// [`layout`]: Self::layout
    fn layout_inner(&mut self, size: Expanse) -> Result<()> {
        let root = self.root;
        layout::measure(self, root, size)?;
        layout::arrange(self, root, size.rect())?;
        while let Some(id) = self.arrange_queue.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if node.cache.arrange_valid {
                continue;
            }
            let Some(prev) = node.cache.previous_arrange else {
                continue;
            };
            layout::arrange(self, id, prev)?;
        }
        Ok(())
    }

    /// Run a closure against a node's widget. The widget is checked out of
    /// its slot for the duration, so a re-entrant call on the same node is
    /// detected rather than aliasing.
    pub(crate) fn with_widget<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut Self, &mut dyn Widget) -> Result<R>,
    ) -> Result<R> {
        let mut widget = self
            .node_mut(id)?
            .widget
            .take()
            .ok_or(Error::Reentrant(id))?;
        let result = f(self, widget.as_mut());
        if let Some(node) = self.nodes.get_mut(id) {
            node.widget = Some(widget);
        }
        result
    }

    /// Borrow a node's widget as a concrete type.
    pub fn widget<W: Widget>(&self, id: NodeId) -> Result<&W> {
        let node = self.node(id)?;
        let widget = node.widget.as_deref().ok_or(Error::Reentrant(id))?;
        (widget as &dyn std::any::Any)
            .downcast_ref::<W>()
            .ok_or_else(|| Error::Invalid(format!("node {id:?} is not a {}", std::any::type_name::<W>())))
    }

    /// Borrow a node's widget mutably as a concrete type. Layout-relevant
    /// mutations must be followed by an explicit invalidation call.
    pub fn widget_mut<W: Widget>(&mut self, id: NodeId) -> Result<&mut W> {
        let node = self.node_mut(id)?;
        let widget = node.widget.as_deref_mut().ok_or(Error::Reentrant(id))?;
        (widget as &mut dyn std::any::Any)
            .downcast_mut::<W>()
            .ok_or_else(|| Error::Invalid(format!("node {id:?} is not a {}", std::any::type_name::<W>())))
    }
}
