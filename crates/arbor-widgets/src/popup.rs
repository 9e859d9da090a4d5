use arbor_core::{NodeId, Result, Tree, Widget};
use geom::{Expanse, Point, Rect};

/// Clamp a requested popup rect into the root surface.
///
/// If the right edge overflows, an alternate anchor (a secondary reference
/// point the popup right-aligns to, e.g. the other side of a context-menu
/// cursor) is tried first when it has room; otherwise the rect translates
/// left just enough to fit. The bottom edge gets the same treatment with a
/// flip-upward alternate. The left/top edges are clamped only on axes where
/// no alternate anchor was used, so the clamp never fights the placement
/// just chosen.
pub fn resolve_position(desired: Rect, alt: Option<Point>, root: Expanse) -> Point {
    let size = desired.expanse();
    let mut x = desired.tl.x;
    let mut y = desired.tl.y;
    let mut alt_used_x = false;
    let mut alt_used_y = false;

    if x + size.w > root.w {
        match alt {
            Some(alt) if alt.x - size.w >= 0.0 => {
                x = alt.x - size.w;
                alt_used_x = true;
            }
            _ => x = root.w - size.w,
        }
    }
    if y + size.h > root.h {
        match alt {
            Some(alt) if alt.y - size.h >= 0.0 => {
                y = alt.y - size.h;
                alt_used_y = true;
            }
            _ => y = root.h - size.h,
        }
    }

    if !alt_used_x {
        x = x.max(0.0);
    }
    if !alt_used_y {
        y = y.max(0.0);
    }
    Point::new(x, y)
}

/// An overlay that places its child at a requested origin, kept inside its
/// own bounds by [`resolve_position`]. Typically arranged to cover the root
/// surface.
pub struct Popup {
    /// Requested top-left of the child.
    origin: Point,
    /// Alternate anchor for edge-overflow fallback.
    alt: Option<Point>,
}

impl Popup {
    /// Build a popup requesting the given origin.
    pub fn at(origin: Point) -> Self {
        Self { origin, alt: None }
    }

    /// Provide an alternate anchor point for overflow fallback.
    pub fn with_alt(mut self, alt: Point) -> Self {
        self.alt = Some(alt);
        self
    }

    /// Move the popup. Placement is an arrange-only concern.
    pub fn set_origin(tree: &mut Tree, id: NodeId, origin: Point) -> Result<()> {
        tree.widget_mut::<Self>(id)?.origin = origin;
        tree.invalidate_arrange(id)
    }
}

impl Widget for Popup {
    fn measure(&mut self, tree: &mut Tree, id: NodeId, _available: Expanse) -> Result<Expanse> {
        // The popup surface takes no space of its own; content measures
        // unconstrained.
        for child in tree.visible_children(id)? {
            tree.measure(child, Expanse::INFINITE)?;
        }
        Ok(Expanse::ZERO)
    }

    fn arrange(&mut self, tree: &mut Tree, id: NodeId, size: Expanse) -> Result<Expanse> {
        for child in tree.visible_children(id)? {
            let desired = tree.desired_size(child)?;
            let origin = resolve_position(Rect::from_parts(self.origin, desired), self.alt, size);
            tree.arrange(child, Rect::from_parts(origin, desired))?;
        }
        Ok(size)
    }
}
