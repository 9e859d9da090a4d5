use arbor_core::{
    Error, NodeId, Result, Tree, Widget,
    stretch::{self, Align, StretchChild},
};
use geom::{Expanse, Rect};

/// A fixed-column grid. Children fill cells in insertion order, left to
/// right then top to bottom. Each column is as wide as its widest cell and
/// each row as tall as its tallest; leftover space is divided among
/// expand-flagged columns and rows with the stretch algorithm.
pub struct Grid {
    /// Number of columns. Always at least one.
    columns: usize,
    /// Gap between columns and rows. `None` takes the style default.
    separation: Option<f32>,
}

impl Grid {
    /// Build a grid. A zero column count is a configuration error, rejected
    /// here rather than tolerated by layout.
    pub fn new(columns: usize) -> Result<Self> {
        if columns == 0 {
            return Err(Error::Invalid("grid requires at least one column".into()));
        }
        Ok(Self {
            columns,
            separation: None,
        })
    }

    /// Override the separation constant.
    pub fn separation(mut self, separation: f32) -> Self {
        self.separation = Some(separation.max(0.0));
        self
    }

    /// Change the column count of a mounted grid. Zero is rejected
    /// synchronously.
    pub fn set_columns(tree: &mut Tree, id: NodeId, columns: usize) -> Result<()> {
        if columns == 0 {
            return Err(Error::Invalid("grid requires at least one column".into()));
        }
        tree.widget_mut::<Self>(id)?.columns = columns;
        tree.invalidate_measure(id)
    }

    /// The effective separation, falling back to the style default.
    fn effective_separation(&self, tree: &Tree) -> f32 {
        self.separation.unwrap_or(tree.style().separation)
    }

    /// Per-column widths and per-row heights, as the max desired size over
    /// the cells in each, plus the expand flag for each track.
    #[allow(clippy::type_complexity, reason = "internal tuple of parallel tracks")]
    fn tracks(
        &self,
        tree: &Tree,
        children: &[NodeId],
    ) -> Result<(Vec<(f32, bool)>, Vec<(f32, bool)>)> {
        let rows = children.len().div_ceil(self.columns);
        let mut cols = vec![(0.0f32, false); self.columns];
        let mut rows_v = vec![(0.0f32, false); rows];
        for (i, child) in children.iter().enumerate() {
            let node = tree.node(*child)?;
            let desired = node.desired_size();
            let (col, row) = (i % self.columns, i / self.columns);
            cols[col].0 = cols[col].0.max(desired.w);
            cols[col].1 |= node.sizing().expand_horizontal;
            rows_v[row].0 = rows_v[row].0.max(desired.h);
            rows_v[row].1 |= node.sizing().expand_vertical;
        }
        Ok((cols, rows_v))
    }
}

/// Sum track extents plus separation between them.
fn track_total(tracks: &[(f32, bool)], separation: f32) -> f32 {
    let sum: f32 = tracks.iter().map(|t| t.0).sum();
    if tracks.len() > 1 {
        sum + separation * (tracks.len() - 1) as f32
    } else {
        sum
    }
}

/// Distribute an extent over tracks: expanding tracks stretch, the rest are
/// fixed at their content size.
fn track_slots(tracks: &[(f32, bool)], extent: f32, separation: f32) -> Vec<stretch::Slot> {
    let entries: Vec<StretchChild> = tracks
        .iter()
        .map(|&(desired, expand)| StretchChild {
            desired,
            ratio: 1.0,
            stretch: expand,
        })
        .collect();
    stretch::distribute(extent, separation, &entries, Align::Begin)
}

impl Widget for Grid {
    fn measure(&mut self, tree: &mut Tree, id: NodeId, _available: Expanse) -> Result<Expanse> {
        let separation = self.effective_separation(tree);
        let children = tree.visible_children(id)?;
        for child in &children {
            tree.measure(*child, Expanse::INFINITE)?;
        }
        let (cols, rows) = self.tracks(tree, &children)?;
        Ok(Expanse::new(
            track_total(&cols, separation),
            track_total(&rows, separation),
        ))
    }

    fn arrange(&mut self, tree: &mut Tree, id: NodeId, size: Expanse) -> Result<Expanse> {
        let separation = self.effective_separation(tree);
        let children = tree.visible_children(id)?;
        let (cols, rows) = self.tracks(tree, &children)?;
        let col_slots = track_slots(&cols, size.w, separation);
        let row_slots = track_slots(&rows, size.h, separation);

        for (i, child) in children.iter().enumerate() {
            let col = &col_slots[i % self.columns];
            let row = &row_slots[i / self.columns];
            tree.arrange(
                *child,
                Rect::new(col.offset, row.offset, col.size, row.size),
            )?;
        }
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use arbor_core::tutils::TFixed;

    use super::*;

    #[test]
    fn zero_columns_rejected() {
        assert!(matches!(Grid::new(0), Err(Error::Invalid(_))));

        let mut tree = Tree::new(Grid::new(2).expect("two columns"));
        let root = tree.root();
        assert!(matches!(
            Grid::set_columns(&mut tree, root, 0),
            Err(Error::Invalid(_))
        ));
    }

    #[test]
    fn cells_fill_in_order() -> Result<()> {
        let mut tree = Tree::new(Grid::new(2)?.separation(0.0));
        let root = tree.root();
        let a = tree.attach(root, TFixed::new(30.0, 10.0))?;
        let b = tree.attach(root, TFixed::new(20.0, 15.0))?;
        let c = tree.attach(root, TFixed::new(10.0, 20.0))?;
        tree.layout(Expanse::new(200.0, 200.0))?;

        // Columns are 30 and 20 wide; rows are 15 and 20 tall.
        assert_eq!(tree.desired_size(root)?, Expanse::new(50.0, 35.0));
        assert_eq!(tree.rect(a)?, Rect::new(0.0, 0.0, 30.0, 15.0));
        assert_eq!(tree.rect(b)?, Rect::new(30.0, 0.0, 20.0, 15.0));
        assert_eq!(tree.rect(c)?, Rect::new(0.0, 15.0, 30.0, 20.0));
        Ok(())
    }

    #[test]
    fn expanding_column_takes_leftover() -> Result<()> {
        let mut tree = Tree::new(Grid::new(2)?.separation(0.0));
        let root = tree.root();
        let a = tree.attach(root, TFixed::new(30.0, 10.0))?;
        let b = tree.attach(root, TFixed::new(20.0, 10.0))?;
        tree.update_sizing(b, |s| s.expand_horizontal = true)?;
        tree.layout(Expanse::new(100.0, 100.0))?;

        assert_eq!(tree.rect(a)?.w, 30.0);
        assert_eq!(tree.rect(b)?, Rect::new(30.0, 0.0, 70.0, 10.0));
        Ok(())
    }

    #[test]
    fn separation_between_tracks() -> Result<()> {
        let mut tree = Tree::new(Grid::new(2)?.separation(5.0));
        let root = tree.root();
        for _ in 0..4 {
            tree.attach(root, TFixed::new(10.0, 10.0))?;
        }
        tree.layout(Expanse::new(200.0, 200.0))?;
        assert_eq!(tree.desired_size(root)?, Expanse::new(25.0, 25.0));
        let last = tree.children(root)?[3];
        assert_eq!(tree.rect(last)?.tl, geom::Point::new(15.0, 15.0));
        Ok(())
    }
}
