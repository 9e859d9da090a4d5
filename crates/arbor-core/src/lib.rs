//! Core of a retained-mode, tree-structured layout engine.
//!
//! Nodes live in an arena keyed by [`NodeId`]. Each node carries a
//! [`Widget`] that supplies its sizing policy; the engine supplies
//! everything else - the two-pass measure/arrange protocol, result caching,
//! and invalidation propagation. A mutation marks caches dirty and walks
//! ancestors; once per frame [`Tree::layout`] re-resolves exactly the dirty
//! portion of the tree.

/// Sparse attached-property table.
mod attached;
/// Error and result types.
pub mod error;
/// Node identifiers.
mod id;
/// Measure/arrange orchestration.
mod layout;
/// Arena node storage.
mod node;
/// Per-axis sizing policy.
mod sizing;
/// Node names.
mod state;
/// Stretch-space distribution.
pub mod stretch;
/// Style and metrics lookups.
mod style;
/// The node tree.
mod tree;
/// Test widgets and helpers.
pub mod tutils;
/// The widget capability trait.
mod widget;

pub use attached::{Attached, GrowDirection, PropertyId, PropertyValue};
pub use error::{Error, Result};
pub use id::NodeId;
pub use node::Node;
pub use sizing::{Alignment, Sizing};
pub use state::NodeName;
pub use style::{FontMetrics, MonospaceMetrics, Style};
pub use tree::{PixelRect, Tree};
pub use widget::{Widget, arrange_children_fill, measure_children_max};
