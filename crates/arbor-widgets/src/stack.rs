use arbor_core::{
    NodeId, Result, Sizing, Tree, Widget,
    stretch::{self, Align, StretchChild},
};
use geom::{Axis, Expanse, Point, Rect};

/// A sequential container: children are laid out along one axis in
/// insertion order, separated by a constant gap. Children flagged to expand
/// on that axis divide the leftover space by stretch ratio; the rest take
/// their desired size.
pub struct Stack {
    /// The layout axis.
    axis: Axis,
    /// Gap between consecutive children. `None` takes the style default.
    separation: Option<f32>,
    /// Where unused extent goes when no child stretches.
    align: Align,
}

impl Stack {
    /// Build a stack along the given axis.
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            separation: None,
            align: Align::Begin,
        }
    }

    /// A left-to-right stack.
    pub fn horizontal() -> Self {
        Self::new(Axis::Horizontal)
    }

    /// A top-to-bottom stack.
    pub fn vertical() -> Self {
        Self::new(Axis::Vertical)
    }

    /// Override the separation constant.
    pub fn separation(mut self, separation: f32) -> Self {
        self.separation = Some(separation.max(0.0));
        self
    }

    /// Set the disposal of unused extent when nothing stretches.
    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// The effective separation, falling back to the style default.
    fn effective_separation(&self, tree: &Tree) -> f32 {
        self.separation.unwrap_or(tree.style().separation)
    }
}

/// Does the policy expand on the given axis?
pub(crate) fn expands(sizing: &Sizing, axis: Axis) -> bool {
    match axis {
        Axis::Horizontal => sizing.expand_horizontal,
        Axis::Vertical => sizing.expand_vertical,
    }
}

/// Build a point from a main-axis and cross-axis coordinate.
pub(crate) fn axis_point(axis: Axis, main: f32, cross: f32) -> Point {
    match axis {
        Axis::Horizontal => Point::new(main, cross),
        Axis::Vertical => Point::new(cross, main),
    }
}

impl Widget for Stack {
    fn measure(&mut self, tree: &mut Tree, id: NodeId, available: Expanse) -> Result<Expanse> {
        let separation = self.effective_separation(tree);
        let children = tree.visible_children(id)?;

        // Children report their natural size along the stacking axis; the
        // cross axis stays constrained.
        let child_available = available.with_along(self.axis, f32::INFINITY);
        let mut main = 0.0f32;
        let mut cross = 0.0f32;
        for child in &children {
            tree.measure(*child, child_available)?;
            let desired = tree.desired_size(*child)?;
            main += desired.along(self.axis);
            cross = cross.max(desired.along(self.axis.cross()));
        }
        if children.len() > 1 {
            main += separation * (children.len() - 1) as f32;
        }
        Ok(Expanse::from_axes(self.axis, main, cross))
    }

    fn arrange(&mut self, tree: &mut Tree, id: NodeId, size: Expanse) -> Result<Expanse> {
        let separation = self.effective_separation(tree);
        let children = tree.visible_children(id)?;

        let mut entries = Vec::with_capacity(children.len());
        for child in &children {
            let node = tree.node(*child)?;
            entries.push(StretchChild {
                desired: node.desired_size().along(self.axis),
                ratio: node.sizing().stretch_ratio(),
                stretch: expands(node.sizing(), self.axis),
            });
        }

        let slots = stretch::distribute(size.along(self.axis), separation, &entries, self.align);
        let cross = size.along(self.axis.cross());
        for (child, slot) in children.iter().zip(slots) {
            let rect = Rect::from_parts(
                axis_point(self.axis, slot.offset, 0.0),
                Expanse::from_axes(self.axis, slot.size, cross),
            );
            tree.arrange(*child, rect)?;
        }
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use arbor_core::tutils::TFixed;

    use super::*;

    #[test]
    fn fixed_children_in_order() -> Result<()> {
        let mut tree = Tree::new(Stack::vertical().separation(2.0));
        let root = tree.root();
        let a = tree.attach(root, TFixed::new(10.0, 20.0))?;
        let b = tree.attach(root, TFixed::new(10.0, 30.0))?;
        tree.layout(Expanse::new(100.0, 100.0))?;

        assert_eq!(tree.rect(a)?, Rect::new(0.0, 0.0, 100.0, 20.0));
        assert_eq!(tree.rect(b)?, Rect::new(0.0, 22.0, 100.0, 30.0));
        Ok(())
    }

    #[test]
    fn desired_size_sums_along_axis() -> Result<()> {
        let mut tree = Tree::new(Stack::vertical().separation(2.0));
        let root = tree.root();
        tree.attach(root, TFixed::new(10.0, 20.0))?;
        tree.attach(root, TFixed::new(40.0, 30.0))?;
        tree.layout(Expanse::new(100.0, 100.0))?;

        assert_eq!(tree.desired_size(root)?, Expanse::new(40.0, 52.0));
        Ok(())
    }

    #[test]
    fn expanding_children_share_leftover() -> Result<()> {
        let mut tree = Tree::new(Stack::horizontal().separation(0.0));
        let root = tree.root();
        let fixed = tree.attach(root, TFixed::new(30.0, 10.0))?;
        let grow_a = tree.attach(root, TFixed::new(0.0, 10.0))?;
        let grow_b = tree.attach(root, TFixed::new(0.0, 10.0))?;
        tree.update_sizing(grow_a, |s| s.expand_horizontal = true)?;
        tree.update_sizing(grow_b, |s| s.expand_horizontal = true)?;
        tree.set_stretch_ratio(grow_b, 3.0)?;
        tree.layout(Expanse::new(110.0, 50.0))?;

        assert_eq!(tree.rect(fixed)?.w, 30.0);
        assert_eq!(tree.rect(grow_a)?.w, 20.0);
        assert_eq!(tree.rect(grow_b)?.w, 60.0);
        assert_eq!(tree.rect(grow_b)?.tl.x, 50.0);
        Ok(())
    }

    #[test]
    fn starved_stretcher_keeps_its_desired_size() -> Result<()> {
        // Three equal stretchers in 300 units, one wanting 200: it gets 200
        // and the others split the rest evenly.
        let mut tree = Tree::new(Stack::horizontal().separation(0.0));
        let root = tree.root();
        let a = tree.attach(root, TFixed::new(200.0, 10.0))?;
        let b = tree.attach(root, TFixed::new(0.0, 10.0))?;
        let c = tree.attach(root, TFixed::new(0.0, 10.0))?;
        for id in [a, b, c] {
            tree.update_sizing(id, |s| s.expand_horizontal = true)?;
        }
        tree.layout(Expanse::new(300.0, 50.0))?;

        assert_eq!(tree.rect(a)?.w, 200.0);
        assert_eq!(tree.rect(b)?.w, 50.0);
        assert_eq!(tree.rect(c)?.w, 50.0);
        Ok(())
    }

    #[test]
    fn alignment_disposes_leftover() -> Result<()> {
        let mut tree = Tree::new(Stack::vertical().separation(0.0).align(Align::End));
        let root = tree.root();
        let a = tree.attach(root, TFixed::new(10.0, 10.0))?;
        tree.layout(Expanse::new(100.0, 100.0))?;
        assert_eq!(tree.rect(a)?.tl.y, 90.0);
        Ok(())
    }

    #[test]
    fn hidden_children_occupy_no_slot() -> Result<()> {
        let mut tree = Tree::new(Stack::vertical().separation(5.0));
        let root = tree.root();
        let a = tree.attach(root, TFixed::new(10.0, 10.0))?;
        let b = tree.attach(root, TFixed::new(10.0, 10.0))?;
        let c = tree.attach(root, TFixed::new(10.0, 10.0))?;
        tree.set_visible(b, false)?;
        tree.layout(Expanse::new(100.0, 100.0))?;

        assert_eq!(tree.rect(a)?.tl.y, 0.0);
        // c sits directly after a: the hidden node contributes no size and
        // no separation slot.
        assert_eq!(tree.rect(c)?.tl.y, 15.0);
        assert_eq!(tree.desired_size(root)?.h, 25.0);
        Ok(())
    }
}
