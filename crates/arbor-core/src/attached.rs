//! Sparse attached-property table.
//!
//! Anchor and margin values are only meaningful to the anchor container, so
//! nodes do not carry fields for them. They live here instead, keyed by
//! `(node, property)`, and are removed when the node leaves the tree.

use std::collections::HashMap;

use crate::id::NodeId;

/// Which way a node grows when its anchor/margin-implied size is smaller
/// than its desired size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrowDirection {
    /// Expand forward from the start edge.
    #[default]
    End,
    /// Expand backward from the end edge.
    Begin,
    /// Expand symmetrically.
    Both,
}

/// Identifier for an attached property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyId {
    /// Left anchor fraction of the parent's width.
    AnchorLeft,
    /// Top anchor fraction of the parent's height.
    AnchorTop,
    /// Right anchor fraction of the parent's width.
    AnchorRight,
    /// Bottom anchor fraction of the parent's height.
    AnchorBottom,
    /// Offset added after the left anchor.
    MarginLeft,
    /// Offset added after the top anchor.
    MarginTop,
    /// Offset added after the right anchor.
    MarginRight,
    /// Offset added after the bottom anchor.
    MarginBottom,
    /// Horizontal grow direction.
    GrowHorizontal,
    /// Vertical grow direction.
    GrowVertical,
}

/// An attached property value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    /// A scalar value (anchors, margins).
    Float(f32),
    /// A grow direction.
    Grow(GrowDirection),
}

/// The attached-property table. Owned by the tree so that entry lifecycle
/// tracks node lifecycle.
#[derive(Debug, Default)]
pub struct Attached {
    /// Sparse storage, keyed by node and property.
    entries: HashMap<(NodeId, PropertyId), PropertyValue>,
}

impl Attached {
    /// Store a value for a node.
    pub fn set(&mut self, node: NodeId, property: PropertyId, value: PropertyValue) {
        self.entries.insert((node, property), value);
    }

    /// Look up a value for a node.
    pub fn get(&self, node: NodeId, property: PropertyId) -> Option<PropertyValue> {
        self.entries.get(&(node, property)).copied()
    }

    /// Look up a scalar value, defaulting when absent or of the wrong kind.
    pub fn float_or(&self, node: NodeId, property: PropertyId, default: f32) -> f32 {
        match self.get(node, property) {
            Some(PropertyValue::Float(v)) => v,
            _ => default,
        }
    }

    /// Look up a grow direction, defaulting when absent.
    pub fn grow_or(
        &self,
        node: NodeId,
        property: PropertyId,
        default: GrowDirection,
    ) -> GrowDirection {
        match self.get(node, property) {
            Some(PropertyValue::Grow(v)) => v,
            _ => default,
        }
    }

    /// Drop every entry belonging to a node. Called when the node is removed
    /// from the tree.
    pub(crate) fn remove_node(&mut self, node: NodeId) {
        self.entries.retain(|(n, _), _| *n != node);
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    #[test]
    fn set_get_remove() {
        let mut keys: SlotMap<NodeId, ()> = SlotMap::with_key();
        let a = keys.insert(());
        let b = keys.insert(());

        let mut table = Attached::default();
        table.set(a, PropertyId::AnchorLeft, PropertyValue::Float(0.5));
        table.set(a, PropertyId::GrowHorizontal, PropertyValue::Grow(GrowDirection::Both));
        table.set(b, PropertyId::AnchorLeft, PropertyValue::Float(1.0));

        assert_eq!(table.float_or(a, PropertyId::AnchorLeft, 0.0), 0.5);
        assert_eq!(table.float_or(a, PropertyId::AnchorRight, 0.0), 0.0);
        assert_eq!(
            table.grow_or(a, PropertyId::GrowHorizontal, GrowDirection::End),
            GrowDirection::Both
        );

        table.remove_node(a);
        assert_eq!(table.float_or(a, PropertyId::AnchorLeft, 0.0), 0.0);
        assert_eq!(table.float_or(b, PropertyId::AnchorLeft, 0.0), 1.0);
        assert_eq!(table.len(), 1);
    }
}
