//! Error and result types for the layout engine.

use thiserror::Error;

use crate::id::NodeId;

/// Result type for layout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// Layout failure.
    #[error("layout: {0}")]
    Layout(String),

    /// Geometry failure.
    #[error("geometry: {0}")]
    Geometry(String),

    /// Invalid configuration, rejected at the point of assignment.
    #[error("invalid: {0}")]
    Invalid(String),

    /// The node handle does not resolve to a live node.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// A widget call re-entered a node whose widget is already checked out.
    #[error("re-entrant widget call on node {0:?}")]
    Reentrant(NodeId),

    /// Structural mutation attempted while a layout pass is running.
    #[error("tree structure may not change during a layout pass")]
    LayoutInProgress,
}
