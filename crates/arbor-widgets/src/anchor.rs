use arbor_core::{
    Error, GrowDirection, NodeId, PropertyId, PropertyValue, Result, Tree, Widget,
};
use geom::{Expanse, Point, Rect};

/// Common anchor configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorPreset {
    /// Pin to the top-left corner.
    TopLeft,
    /// Pin to the top-right corner.
    TopRight,
    /// Pin to the bottom-left corner.
    BottomLeft,
    /// Pin to the bottom-right corner.
    BottomRight,
    /// Pin to the center.
    Center,
    /// Span the full top edge.
    TopWide,
    /// Span the full bottom edge.
    BottomWide,
    /// Span the full left edge.
    LeftWide,
    /// Span the full right edge.
    RightWide,
    /// Cover the whole parent.
    Wide,
}

impl AnchorPreset {
    /// The (left, top, right, bottom) anchor fractions for this preset.
    fn fractions(self) -> (f32, f32, f32, f32) {
        match self {
            Self::TopLeft => (0.0, 0.0, 0.0, 0.0),
            Self::TopRight => (1.0, 0.0, 1.0, 0.0),
            Self::BottomLeft => (0.0, 1.0, 0.0, 1.0),
            Self::BottomRight => (1.0, 1.0, 1.0, 1.0),
            Self::Center => (0.5, 0.5, 0.5, 0.5),
            Self::TopWide => (0.0, 0.0, 1.0, 0.0),
            Self::BottomWide => (0.0, 1.0, 1.0, 1.0),
            Self::LeftWide => (0.0, 0.0, 0.0, 1.0),
            Self::RightWide => (1.0, 0.0, 1.0, 1.0),
            Self::Wide => (0.0, 0.0, 1.0, 1.0),
        }
    }
}

/// A container positioning each child independently by fractional anchors
/// plus pixel margins, instead of sibling-relative flow. Anchor values live
/// in the tree's attached-property table; they only mean something to this
/// container, so unrelated node kinds carry no fields for them.
#[derive(Debug, Default)]
pub struct AnchorLayout;

impl AnchorLayout {
    /// Build an anchor container.
    pub fn new() -> Self {
        Self
    }

    /// Set one scalar anchor or margin property, rejecting non-finite
    /// values.
    fn set_float(tree: &mut Tree, id: NodeId, property: PropertyId, v: f32) -> Result<()> {
        if !v.is_finite() {
            return Err(Error::Invalid(format!("{property:?} value {v}")));
        }
        tree.set_attached(id, property, PropertyValue::Float(v))
    }

    /// Set the left anchor fraction of a child.
    pub fn set_anchor_left(tree: &mut Tree, id: NodeId, v: f32) -> Result<()> {
        Self::set_float(tree, id, PropertyId::AnchorLeft, v)
    }

    /// Set the top anchor fraction of a child.
    pub fn set_anchor_top(tree: &mut Tree, id: NodeId, v: f32) -> Result<()> {
        Self::set_float(tree, id, PropertyId::AnchorTop, v)
    }

    /// Set the right anchor fraction of a child.
    pub fn set_anchor_right(tree: &mut Tree, id: NodeId, v: f32) -> Result<()> {
        Self::set_float(tree, id, PropertyId::AnchorRight, v)
    }

    /// Set the bottom anchor fraction of a child.
    pub fn set_anchor_bottom(tree: &mut Tree, id: NodeId, v: f32) -> Result<()> {
        Self::set_float(tree, id, PropertyId::AnchorBottom, v)
    }

    /// Set the left margin of a child.
    pub fn set_margin_left(tree: &mut Tree, id: NodeId, v: f32) -> Result<()> {
        Self::set_float(tree, id, PropertyId::MarginLeft, v)
    }

    /// Set the top margin of a child.
    pub fn set_margin_top(tree: &mut Tree, id: NodeId, v: f32) -> Result<()> {
        Self::set_float(tree, id, PropertyId::MarginTop, v)
    }

    /// Set the right margin of a child.
    pub fn set_margin_right(tree: &mut Tree, id: NodeId, v: f32) -> Result<()> {
        Self::set_float(tree, id, PropertyId::MarginRight, v)
    }

    /// Set the bottom margin of a child.
    pub fn set_margin_bottom(tree: &mut Tree, id: NodeId, v: f32) -> Result<()> {
        Self::set_float(tree, id, PropertyId::MarginBottom, v)
    }

    /// Set how a child grows horizontally when undersized.
    pub fn set_grow_horizontal(tree: &mut Tree, id: NodeId, v: GrowDirection) -> Result<()> {
        tree.set_attached(id, PropertyId::GrowHorizontal, PropertyValue::Grow(v))
    }

    /// Set how a child grows vertically when undersized.
    pub fn set_grow_vertical(tree: &mut Tree, id: NodeId, v: GrowDirection) -> Result<()> {
        tree.set_attached(id, PropertyId::GrowVertical, PropertyValue::Grow(v))
    }

    /// Apply all four anchor fractions from a preset.
    pub fn set_anchor_preset(tree: &mut Tree, id: NodeId, preset: AnchorPreset) -> Result<()> {
        let (left, top, right, bottom) = preset.fractions();
        Self::set_anchor_left(tree, id, left)?;
        Self::set_anchor_top(tree, id, top)?;
        Self::set_anchor_right(tree, id, right)?;
        Self::set_anchor_bottom(tree, id, bottom)
    }

    /// Shift all four margins so the child lands at an absolute offset from
    /// the parent origin, keeping its current size.
    pub fn set_position(tree: &mut Tree, id: NodeId, position: Point) -> Result<()> {
        let diff = position - tree.rect(id)?.tl;
        let at = tree.attached();
        let left = at.float_or(id, PropertyId::MarginLeft, 0.0) + diff.x;
        let top = at.float_or(id, PropertyId::MarginTop, 0.0) + diff.y;
        let right = at.float_or(id, PropertyId::MarginRight, 0.0) + diff.x;
        let bottom = at.float_or(id, PropertyId::MarginBottom, 0.0) + diff.y;
        Self::set_margin_left(tree, id, left)?;
        Self::set_margin_top(tree, id, top)?;
        Self::set_margin_right(tree, id, right)?;
        Self::set_margin_bottom(tree, id, bottom)
    }

    /// Compute the target rect for one child within a parent of the given
    /// size: each edge is `anchor x extent + margin`, then undersized
    /// results grow per the child's grow direction.
    fn child_rect(tree: &Tree, child: NodeId, parent: Expanse) -> Result<Rect> {
        let at = tree.attached();
        let left = at.float_or(child, PropertyId::AnchorLeft, 0.0) * parent.w
            + at.float_or(child, PropertyId::MarginLeft, 0.0);
        let top = at.float_or(child, PropertyId::AnchorTop, 0.0) * parent.h
            + at.float_or(child, PropertyId::MarginTop, 0.0);
        let right = at.float_or(child, PropertyId::AnchorRight, 0.0) * parent.w
            + at.float_or(child, PropertyId::MarginRight, 0.0);
        let bottom = at.float_or(child, PropertyId::AnchorBottom, 0.0) * parent.h
            + at.float_or(child, PropertyId::MarginBottom, 0.0);

        let grow_h = at.grow_or(child, PropertyId::GrowHorizontal, GrowDirection::End);
        let grow_v = at.grow_or(child, PropertyId::GrowVertical, GrowDirection::End);
        let desired = tree.desired_size(child)?;

        let (x, w) = grow_axis(grow_h, desired.w, left, right - left);
        let (y, h) = grow_axis(grow_v, desired.h, top, bottom - top);
        Ok(Rect::new(x, y, w, h))
    }
}

/// Resolve one axis: keep the wanted extent unless it falls short of the
/// desired minimum, in which case grow in the configured direction.
fn grow_axis(direction: GrowDirection, min_size: f32, pos: f32, size: f32) -> (f32, f32) {
    let overflow = min_size - size;
    if overflow <= 0.0 {
        return (pos, size.max(0.0));
    }
    let pos = match direction {
        GrowDirection::End => pos,
        GrowDirection::Begin => pos - overflow,
        GrowDirection::Both => pos - overflow / 2.0,
    };
    (pos, min_size)
}

impl Widget for AnchorLayout {
    fn measure(&mut self, tree: &mut Tree, id: NodeId, _available: Expanse) -> Result<Expanse> {
        // Children measure against unbounded space; the container itself
        // reports no intrinsic size. Anchored children do not push their
        // parent.
        for child in tree.visible_children(id)? {
            tree.measure(child, Expanse::INFINITE)?;
        }
        Ok(Expanse::ZERO)
    }

    fn arrange(&mut self, tree: &mut Tree, id: NodeId, size: Expanse) -> Result<Expanse> {
        for child in tree.visible_children(id)? {
            let rect = Self::child_rect(tree, child, size)?;
            tree.arrange(child, rect)?;
        }
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use arbor_core::tutils::TFixed;

    use super::*;

    /// Build a 400x300 anchor container with one 50x40 child.
    fn anchored() -> Result<(Tree, NodeId)> {
        let mut tree = Tree::new(AnchorLayout::new());
        let child = tree.attach(tree.root(), TFixed::new(50.0, 40.0))?;
        Ok((tree, child))
    }

    #[test]
    fn full_anchors_cover_the_parent() -> Result<()> {
        let (mut tree, child) = anchored()?;
        AnchorLayout::set_anchor_preset(&mut tree, child, AnchorPreset::Wide)?;
        tree.layout(Expanse::new(400.0, 300.0))?;
        assert_eq!(tree.rect(child)?, Rect::new(0.0, 0.0, 400.0, 300.0));
        Ok(())
    }

    #[test]
    fn negative_right_margin_shrinks_without_moving_left() -> Result<()> {
        let (mut tree, child) = anchored()?;
        AnchorLayout::set_anchor_preset(&mut tree, child, AnchorPreset::Wide)?;
        AnchorLayout::set_margin_right(&mut tree, child, -50.0)?;
        tree.layout(Expanse::new(400.0, 300.0))?;
        assert_eq!(tree.rect(child)?, Rect::new(0.0, 0.0, 350.0, 300.0));
        Ok(())
    }

    #[test]
    fn point_anchor_grows_to_desired_size() -> Result<()> {
        let (mut tree, child) = anchored()?;
        AnchorLayout::set_anchor_preset(&mut tree, child, AnchorPreset::TopLeft)?;
        tree.layout(Expanse::new(400.0, 300.0))?;
        // Zero-area target, grow direction End: expands right and down.
        assert_eq!(tree.rect(child)?, Rect::new(0.0, 0.0, 50.0, 40.0));
        Ok(())
    }

    #[test]
    fn grow_begin_expands_backward() -> Result<()> {
        let (mut tree, child) = anchored()?;
        AnchorLayout::set_anchor_preset(&mut tree, child, AnchorPreset::BottomRight)?;
        AnchorLayout::set_grow_horizontal(&mut tree, child, GrowDirection::Begin)?;
        AnchorLayout::set_grow_vertical(&mut tree, child, GrowDirection::Begin)?;
        tree.layout(Expanse::new(400.0, 300.0))?;
        assert_eq!(tree.rect(child)?, Rect::new(350.0, 260.0, 50.0, 40.0));
        Ok(())
    }

    #[test]
    fn grow_both_expands_symmetrically() -> Result<()> {
        let (mut tree, child) = anchored()?;
        AnchorLayout::set_anchor_preset(&mut tree, child, AnchorPreset::Center)?;
        AnchorLayout::set_grow_horizontal(&mut tree, child, GrowDirection::Both)?;
        AnchorLayout::set_grow_vertical(&mut tree, child, GrowDirection::Both)?;
        tree.layout(Expanse::new(400.0, 300.0))?;
        assert_eq!(tree.rect(child)?, Rect::new(175.0, 130.0, 50.0, 40.0));
        Ok(())
    }

    #[test]
    fn margins_offset_the_anchor() -> Result<()> {
        let (mut tree, child) = anchored()?;
        AnchorLayout::set_anchor_preset(&mut tree, child, AnchorPreset::TopLeft)?;
        AnchorLayout::set_margin_left(&mut tree, child, 15.0)?;
        AnchorLayout::set_margin_top(&mut tree, child, 10.0)?;
        AnchorLayout::set_margin_right(&mut tree, child, 15.0)?;
        AnchorLayout::set_margin_bottom(&mut tree, child, 10.0)?;
        tree.layout(Expanse::new(400.0, 300.0))?;
        assert_eq!(tree.rect(child)?.tl, Point::new(15.0, 10.0));
        Ok(())
    }

    #[test]
    fn set_position_rewrites_margins() -> Result<()> {
        let (mut tree, child) = anchored()?;
        AnchorLayout::set_anchor_preset(&mut tree, child, AnchorPreset::TopLeft)?;
        tree.layout(Expanse::new(400.0, 300.0))?;

        AnchorLayout::set_position(&mut tree, child, Point::new(60.0, 70.0))?;
        tree.layout(Expanse::new(400.0, 300.0))?;
        let rect = tree.rect(child)?;
        assert_eq!(rect.tl, Point::new(60.0, 70.0));
        assert_eq!(rect.expanse(), Expanse::new(50.0, 40.0));
        Ok(())
    }

    #[test]
    fn property_change_invalidates_container_arrange() -> Result<()> {
        let (mut tree, child) = anchored()?;
        tree.layout(Expanse::new(400.0, 300.0))?;
        assert!(tree.node(tree.root())?.arrange_valid());
        AnchorLayout::set_anchor_left(&mut tree, child, 0.25)?;
        assert!(!tree.node(tree.root())?.arrange_valid());
        // Measurement is untouched; anchors are arrange-only inputs.
        assert!(tree.node(tree.root())?.measure_valid());
        Ok(())
    }

    #[test]
    fn non_finite_values_are_rejected() -> Result<()> {
        let (mut tree, child) = anchored()?;
        assert!(matches!(
            AnchorLayout::set_anchor_left(&mut tree, child, f32::NAN),
            Err(Error::Invalid(_))
        ));
        assert!(matches!(
            AnchorLayout::set_margin_top(&mut tree, child, f32::INFINITY),
            Err(Error::Invalid(_))
        ));
        Ok(())
    }
}
