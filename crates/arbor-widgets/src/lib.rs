//! Container widgets for the layout engine.
//!
//! Each container supplies only its sizing policy - desired size given
//! available size, and child rect assignment given final size. Caching,
//! invalidation and pass ordering live in `arbor-core`.

/// Anchor-margin absolute positioning.
mod anchor;
/// Fixed-column grid.
mod grid;
/// Virtualized scrolling list.
mod list;
/// Screen-edge-aware popup placement.
mod popup;
/// Scroll viewport.
mod scroll;
/// Sequential box container.
mod stack;
/// Text leaf.
mod text;
/// Wrapping container.
mod wrap;

pub use anchor::{AnchorLayout, AnchorPreset};
pub use grid::Grid;
pub use list::{ItemSource, VirtualList};
pub use popup::{Popup, resolve_position};
pub use scroll::{ScrollBarState, ScrollView};
pub use stack::Stack;
pub use text::Text;
pub use wrap::Wrap;
