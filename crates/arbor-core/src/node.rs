use geom::{Expanse, Rect};

use crate::{id::NodeId, sizing::Sizing, state::NodeName, widget::Widget};

/// Cached layout results for a node. Created empty on attach, populated
/// lazily by the next pass, discarded when the node leaves the tree.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct LayoutCache {
    /// Output of the last measure pass. Non-negative on both axes.
    pub(crate) desired: Expanse,
    /// Is `desired` current?
    pub(crate) measure_valid: bool,
    /// Is `rect` current?
    pub(crate) arrange_valid: bool,
    /// The available size handed to the last measure.
    pub(crate) previous_measure: Option<Expanse>,
    /// The rect handed to the last arrange.
    pub(crate) previous_arrange: Option<Rect>,
    /// Output of the last arrange pass, relative to the parent's content
    /// area.
    pub(crate) rect: Rect,
}

/// Core node data stored in the arena.
pub struct Node {
    /// Widget behavior. `None` only while the engine has the widget checked
    /// out for a call; re-entry into the same node is detected through the
    /// empty slot.
    pub(crate) widget: Option<Box<dyn Widget>>,

    /// Parent in the arena tree. Non-owning; used for invalidation walks and
    /// coordinate transforms.
    pub(crate) parent: Option<NodeId>,
    /// Children in layout order. Insertion order is the primary layout and
    /// tie-break order.
    pub(crate) children: Vec<NodeId>,

    /// Per-axis sizing policy.
    pub(crate) sizing: Sizing,
    /// Invisible nodes contribute no size and occupy no slot anywhere.
    pub(crate) visible: bool,
    /// Debug name, taken from the widget on attach.
    pub(crate) name: NodeName,

    /// Cached measure/arrange results.
    pub(crate) cache: LayoutCache,
    /// Set while this node's own measure logic runs, so a child reporting a
    /// changed desired size does not invalidate the measurement in progress.
    pub(crate) measuring: bool,
}

impl Node {
    /// Build a fresh node around a widget.
    pub(crate) fn new(widget: Box<dyn Widget>) -> Self {
        let name = widget.name();
        Self {
            widget: Some(widget),
            parent: None,
            children: Vec::new(),
            sizing: Sizing::default(),
            visible: true,
            name,
            cache: LayoutCache::default(),
            measuring: false,
        }
    }

    /// The node's debug name.
    pub fn name(&self) -> &NodeName {
        &self.name
    }

    /// The node's parent, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The node's children in layout order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The node's sizing policy.
    pub fn sizing(&self) -> &Sizing {
        &self.sizing
    }

    /// Is this node visible?
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// The cached desired size from the last measure pass.
    pub fn desired_size(&self) -> Expanse {
        self.cache.desired
    }

    /// The arranged rect from the last arrange pass, relative to the
    /// parent's content area.
    pub fn rect(&self) -> Rect {
        self.cache.rect
    }

    /// Is the cached desired size current?
    pub fn measure_valid(&self) -> bool {
        self.cache.measure_valid
    }

    /// Is the cached rect current?
    pub fn arrange_valid(&self) -> bool {
        self.cache.arrange_valid
    }
}
