use arbor_core::{
    NodeId, Result, Tree, Widget,
    stretch::{self, Align, StretchChild},
};
use geom::{Axis, EPSILON, Expanse, Rect};

use crate::stack::{axis_point, expands};

/// A wrapping container: children are laid out along one axis and wrap to a
/// new row when the next child would overflow the available extent. Each row
/// distributes its extent with the same stretch algorithm as [`crate::Stack`];
/// a row's cross extent is the largest child cross size within it.
pub struct Wrap {
    /// The main layout axis; rows accumulate along the cross axis.
    axis: Axis,
    /// Gap between children within a row and between rows. `None` takes the
    /// style default.
    separation: Option<f32>,
    /// Disposal of a row's unused extent when nothing in it stretches.
    align: Align,
}

impl Wrap {
    /// Build a wrapping container along the given axis.
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            separation: None,
            align: Align::Begin,
        }
    }

    /// Wrap left-to-right into rows.
    pub fn rows() -> Self {
        Self::new(Axis::Horizontal)
    }

    /// Wrap top-to-bottom into columns.
    pub fn columns() -> Self {
        Self::new(Axis::Vertical)
    }

    /// Override the separation constant.
    pub fn separation(mut self, separation: f32) -> Self {
        self.separation = Some(separation.max(0.0));
        self
    }

    /// Set the disposal of unused row extent when nothing stretches.
    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// The effective separation, falling back to the style default.
    fn effective_separation(&self, tree: &Tree) -> f32 {
        self.separation.unwrap_or(tree.style().separation)
    }

    /// Bucket visible children into rows for the given main-axis extent. A
    /// new row starts whenever adding the next child plus separation would
    /// overflow, within epsilon tolerance.
    fn bucket(
        &self,
        tree: &Tree,
        children: &[NodeId],
        extent: f32,
        separation: f32,
    ) -> Result<Vec<Vec<NodeId>>> {
        let mut rows: Vec<Vec<NodeId>> = Vec::new();
        let mut running = 0.0f32;
        for child in children {
            let main = tree.desired_size(*child)?.along(self.axis);
            let next = if rows.last().is_some_and(|r| !r.is_empty()) {
                running + separation + main
            } else {
                main
            };
            if rows.is_empty() || next > extent + EPSILON {
                rows.push(vec![*child]);
                running = main;
            } else {
                rows.last_mut().expect("just checked").push(*child);
                running = next;
            }
        }
        Ok(rows)
    }

    /// The cross extent of a row: the maximum child cross size within it.
    fn row_cross(&self, tree: &Tree, row: &[NodeId]) -> Result<f32> {
        let mut cross = 0.0f32;
        for child in row {
            cross = cross.max(tree.desired_size(*child)?.along(self.axis.cross()));
        }
        Ok(cross)
    }
}

impl Widget for Wrap {
    fn measure(&mut self, tree: &mut Tree, id: NodeId, available: Expanse) -> Result<Expanse> {
        let separation = self.effective_separation(tree);
        let children = tree.visible_children(id)?;

        for child in &children {
            tree.measure(*child, Expanse::INFINITE)?;
        }

        let rows = self.bucket(tree, &children, available.along(self.axis), separation)?;
        let mut main = 0.0f32;
        let mut cross = 0.0f32;
        for row in &rows {
            let mut row_main = 0.0f32;
            for child in row {
                row_main += tree.desired_size(*child)?.along(self.axis);
            }
            if row.len() > 1 {
                row_main += separation * (row.len() - 1) as f32;
            }
            main = main.max(row_main);
            cross += self.row_cross(tree, row)?;
        }
        if rows.len() > 1 {
            cross += separation * (rows.len() - 1) as f32;
        }
        Ok(Expanse::from_axes(self.axis, main, cross))
    }

    fn arrange(&mut self, tree: &mut Tree, id: NodeId, size: Expanse) -> Result<Expanse> {
        let separation = self.effective_separation(tree);
        let children = tree.visible_children(id)?;
        let extent = size.along(self.axis);

        let rows = self.bucket(tree, &children, extent, separation)?;
        let mut cross_offset = 0.0f32;
        for row in &rows {
            let cross = self.row_cross(tree, row)?;
            let mut entries = Vec::with_capacity(row.len());
            for child in row {
                let node = tree.node(*child)?;
                entries.push(StretchChild {
                    desired: node.desired_size().along(self.axis),
                    ratio: node.sizing().stretch_ratio(),
                    stretch: expands(node.sizing(), self.axis),
                });
            }
            let slots = stretch::distribute(extent, separation, &entries, self.align);
            for (child, slot) in row.iter().zip(slots) {
                let rect = Rect::from_parts(
                    axis_point(self.axis, slot.offset, cross_offset),
                    Expanse::from_axes(self.axis, slot.size, cross),
                );
                tree.arrange(*child, rect)?;
            }
            cross_offset += cross + separation;
        }
        Ok(size)
    }
}
