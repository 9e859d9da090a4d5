use std::ops::Range;

use arbor_core::{NodeId, Result, Tree, Widget};
use geom::{Expanse, Rect};
use tracing::trace;

/// Supplier of list items: how many there are, how tall each one is at a
/// given width, and a widget for any index that scrolls into view.
pub trait ItemSource: Send {
    /// Number of items in the full set.
    fn len(&self) -> usize;

    /// True if the source holds no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The vertical extent of item `index` when laid out at `width`. Must
    /// be cheap; it is consulted for every item whose offset needs
    /// recomputing, not only visible ones.
    fn extent(&self, index: usize, width: f32) -> f32;

    /// Build the widget for item `index`. Called only when the item enters
    /// the visible window.
    fn make(&mut self, index: usize) -> Box<dyn Widget>;
}

/// A vertically scrolling list over a large item set. A cumulative-offset
/// index (`offsets[i]` = top of item `i` in unscrolled content space) is
/// maintained incrementally from the first changed index, and only the
/// items intersecting the viewport are mounted as live children, so
/// construction cost tracks the window size rather than the item count.
pub struct VirtualList {
    /// The item supplier.
    source: Box<dyn ItemSource>,
    /// Monotonically non-decreasing offsets; entry `i` is the top of item
    /// `i`, entry `len` the total content extent.
    offsets: Vec<f32>,
    /// First index whose offset needs recomputing, if any.
    dirty_from: Option<usize>,
    /// Width the offsets were computed at.
    width: f32,
    /// Start of the visible window (inclusive), carried across frames so
    /// range updates ride the previous value instead of searching from
    /// scratch.
    start: usize,
    /// End of the visible window (exclusive).
    end: usize,
    /// Mounted items, in index order.
    mounted: Vec<(usize, NodeId)>,
    /// Scroll offset in content coordinates.
    offset: f32,
    /// Viewport extent from the last arrange.
    viewport: f32,
}

impl VirtualList {
    /// Build a list over an item source.
    pub fn new(source: impl ItemSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            offsets: vec![0.0],
            dirty_from: Some(0),
            width: f32::NAN,
            start: 0,
            end: 0,
            mounted: Vec::new(),
            offset: 0.0,
            viewport: 0.0,
        }
    }

    /// The currently materialized index range. Collaborators use this to
    /// know which logical items are live.
    pub fn visible_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Total content extent.
    pub fn content_extent(&self) -> f32 {
        *self.offsets.last().unwrap_or(&0.0)
    }

    /// The current scroll offset.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Scroll to an absolute content offset.
    pub fn scroll_to(tree: &mut Tree, id: NodeId, offset: f32) -> Result<()> {
        let list = tree.widget_mut::<Self>(id)?;
        let limit = (list.content_extent() - list.viewport).max(0.0);
        let clamped = offset.clamp(0.0, limit);
        if clamped == list.offset {
            return Ok(());
        }
        list.offset = clamped;
        tree.invalidate_arrange(id)
    }

    /// Scroll by a relative amount.
    pub fn scroll_by(tree: &mut Tree, id: NodeId, delta: f32) -> Result<()> {
        let current = tree.widget::<Self>(id)?.offset;
        Self::scroll_to(tree, id, current + delta)
    }

    /// Note that one item's size changed: offsets are recomputed from that
    /// item forward and the visible window re-derived on the next pass.
    pub fn item_changed(tree: &mut Tree, id: NodeId, index: usize) -> Result<()> {
        let list = tree.widget_mut::<Self>(id)?;
        list.dirty_from = Some(list.dirty_from.map_or(index, |d| d.min(index)));
        tree.invalidate_measure(id)
    }

    /// Note that the item set changed shape (insertions, removals): the
    /// whole index is recomputed on the next pass.
    pub fn items_changed(tree: &mut Tree, id: NodeId) -> Result<()> {
        let list = tree.widget_mut::<Self>(id)?;
        list.dirty_from = Some(0);
        tree.invalidate_measure(id)
    }

    /// Bring the offsets index up to date for the given width. Incremental:
    /// recomputation starts at the first dirty index, not from scratch.
    fn reindex(&mut self, width: f32) {
        let n = self.source.len();
        if self.offsets.len() != n + 1 {
            self.offsets.resize(n + 1, 0.0);
            self.dirty_from = Some(0);
        }
        // Bitwise compare: NaN marks "never indexed" and must not equal
        // itself.
        if width.to_bits() != self.width.to_bits() {
            self.width = width;
            self.dirty_from = Some(0);
        }
        let Some(from) = self.dirty_from.map(|d| d.min(n)) else {
            return;
        };
        self.offsets[0] = 0.0;
        for i in from..n {
            self.offsets[i + 1] = self.offsets[i] + self.source.extent(i, width).max(0.0);
        }
        self.dirty_from = None;
    }

    /// Re-derive the visible window `[start, end)` by advancing or
    /// retreating the previous bounds against the scroll offset and the
    /// viewport's trailing edge. Scroll offsets move continuously, so this
    /// is amortized O(1) per frame.
    fn update_range(&mut self, viewport: f32) {
        let n = self.source.len();
        if n == 0 || viewport <= 0.0 {
            self.start = 0;
            self.end = 0;
            return;
        }
        let top = self.offset;
        let bottom = self.offset + viewport;

        let mut start = self.start.min(n - 1);
        while start + 1 < n && self.offsets[start + 1] <= top {
            start += 1;
        }
        while start > 0 && self.offsets[start] > top {
            start -= 1;
        }

        let mut end = self.end.clamp(start + 1, n);
        while end < n && self.offsets[end] < bottom {
            end += 1;
        }
        while end > start + 1 && self.offsets[end - 1] >= bottom {
            end -= 1;
        }

        self.start = start;
        self.end = end;
    }

    /// Reconcile mounted children with the visible window: unmount items
    /// that left it, mount items that entered it.
    fn remount(&mut self, tree: &mut Tree, id: NodeId) -> Result<()> {
        let (start, end) = (self.start, self.end);
        let mut kept = Vec::with_capacity(end - start);
        for (index, node) in std::mem::take(&mut self.mounted) {
            if index >= start && index < end && tree.contains(node) {
                kept.push((index, node));
            } else {
                tree.unmount(node)?;
            }
        }
        for index in start..end {
            match kept.iter().find(|(i, _)| *i == index) {
                Some(entry) => self.mounted.push(*entry),
                None => {
                    let node = tree.mount(id, self.source.make(index))?;
                    self.mounted.push((index, node));
                }
            }
        }
        trace!(start, end, mounted = self.mounted.len(), "list window");
        Ok(())
    }
}

impl Widget for VirtualList {
    fn measure(&mut self, _tree: &mut Tree, _id: NodeId, available: Expanse) -> Result<Expanse> {
        self.reindex(available.w);
        // The list stretches to whatever width it is given; its intrinsic
        // size is the content extent.
        Ok(Expanse::new(0.0, self.content_extent()))
    }

    fn arrange(&mut self, tree: &mut Tree, id: NodeId, size: Expanse) -> Result<Expanse> {
        self.reindex(size.w);
        self.viewport = size.h;
        self.offset = self
            .offset
            .clamp(0.0, (self.content_extent() - size.h).max(0.0));

        self.update_range(size.h);
        self.remount(tree, id)?;

        for (index, node) in self.mounted.clone() {
            let top = self.offsets[index];
            let extent = self.offsets[index + 1] - top;
            tree.arrange(node, Rect::new(0.0, top - self.offset, size.w, extent))?;
        }
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use arbor_core::tutils::TFixed;

    use super::*;

    /// An item source over a shared vector of heights.
    struct Heights {
        /// Shared per-item heights.
        items: Arc<Mutex<Vec<f32>>>,
        /// Number of widgets built, to verify mounting is windowed.
        built: Arc<Mutex<usize>>,
    }

    impl Heights {
        /// Build a source and a handle to its heights.
        fn new(heights: Vec<f32>) -> (Self, Arc<Mutex<Vec<f32>>>, Arc<Mutex<usize>>) {
            let items = Arc::new(Mutex::new(heights));
            let built = Arc::new(Mutex::new(0));
            (
                Self {
                    items: Arc::clone(&items),
                    built: Arc::clone(&built),
                },
                items,
                built,
            )
        }
    }

    impl ItemSource for Heights {
        fn len(&self) -> usize {
            self.items.lock().expect("poisoned").len()
        }

        fn extent(&self, index: usize, _width: f32) -> f32 {
            self.items.lock().expect("poisoned")[index]
        }

        fn make(&mut self, index: usize) -> Box<dyn Widget> {
            *self.built.lock().expect("poisoned") += 1;
            let h = self.items.lock().expect("poisoned")[index];
            Box::new(TFixed::new(10.0, h))
        }
    }

    /// A 1000-item list of 20-unit rows in a 100-unit viewport.
    fn list_1000() -> Result<(Tree, Arc<Mutex<Vec<f32>>>, Arc<Mutex<usize>>)> {
        let (source, items, built) = Heights::new(vec![20.0; 1000]);
        let mut tree = Tree::new(VirtualList::new(source));
        tree.layout(Expanse::new(60.0, 100.0))?;
        Ok((tree, items, built))
    }

    #[test]
    fn mounts_only_the_visible_window() -> Result<()> {
        let (tree, _, built) = list_1000()?;
        let root = tree.root();
        let list = tree.widget::<VirtualList>(root)?;
        assert_eq!(list.visible_range(), 0..5);
        assert_eq!(tree.children(root)?.len(), 5);
        assert_eq!(*built.lock().expect("poisoned"), 5);
        Ok(())
    }

    #[test]
    fn scroll_window_is_exact() -> Result<()> {
        // Items whose [top, bottom) interval intersects [205, 305) are
        // exactly 10 through 15.
        let (mut tree, _, _) = list_1000()?;
        let root = tree.root();
        VirtualList::scroll_to(&mut tree, root, 205.0)?;
        tree.layout(Expanse::new(60.0, 100.0))?;

        let list = tree.widget::<VirtualList>(root)?;
        assert_eq!(list.visible_range(), 10..16);
        assert_eq!(tree.children(root)?.len(), 6);

        let first = tree.children(root)?[0];
        assert_eq!(tree.rect(first)?.tl.y, -5.0);
        Ok(())
    }

    #[test]
    fn scrolling_back_reuses_mounted_items() -> Result<()> {
        let (mut tree, _, built) = list_1000()?;
        let root = tree.root();
        VirtualList::scroll_to(&mut tree, root, 20.0)?;
        tree.layout(Expanse::new(60.0, 100.0))?;
        // Window slid by one: one new mount, not a full rebuild.
        assert_eq!(tree.widget::<VirtualList>(root)?.visible_range(), 1..6);
        assert_eq!(*built.lock().expect("poisoned"), 6);

        VirtualList::scroll_to(&mut tree, root, 0.0)?;
        tree.layout(Expanse::new(60.0, 100.0))?;
        assert_eq!(tree.widget::<VirtualList>(root)?.visible_range(), 0..5);
        assert_eq!(*built.lock().expect("poisoned"), 7);
        Ok(())
    }

    #[test]
    fn content_extent_sums_items() -> Result<()> {
        let (tree, _, _) = list_1000()?;
        let list = tree.widget::<VirtualList>(tree.root())?;
        assert_eq!(list.content_extent(), 20_000.0);
        Ok(())
    }

    #[test]
    fn offset_clamps_to_content() -> Result<()> {
        let (mut tree, _, _) = list_1000()?;
        let root = tree.root();
        VirtualList::scroll_to(&mut tree, root, 1e9)?;
        tree.layout(Expanse::new(60.0, 100.0))?;
        assert_eq!(tree.widget::<VirtualList>(root)?.offset(), 19_900.0);
        Ok(())
    }

    #[test]
    fn item_change_reindexes_from_that_item() -> Result<()> {
        let (mut tree, items, _) = list_1000()?;
        let root = tree.root();
        items.lock().expect("poisoned")[2] = 50.0;
        VirtualList::item_changed(&mut tree, root, 2)?;
        tree.layout(Expanse::new(60.0, 100.0))?;

        let list = tree.widget::<VirtualList>(root)?;
        assert_eq!(list.content_extent(), 20_030.0);
        // Item 2 grew, pushing item 4 below the 100-unit viewport.
        assert_eq!(list.visible_range(), 0..4);
        Ok(())
    }

    #[test]
    fn shrinking_the_set_drops_mounted_items() -> Result<()> {
        let (mut tree, items, _) = list_1000()?;
        let root = tree.root();
        items.lock().expect("poisoned").truncate(2);
        VirtualList::items_changed(&mut tree, root)?;
        tree.layout(Expanse::new(60.0, 100.0))?;

        let list = tree.widget::<VirtualList>(root)?;
        assert_eq!(list.visible_range(), 0..2);
        assert_eq!(tree.children(root)?.len(), 2);
        assert_eq!(list.content_extent(), 40.0);
        Ok(())
    }

    #[test]
    fn empty_source_mounts_nothing() -> Result<()> {
        let (source, _, _) = Heights::new(Vec::new());
        let mut tree = Tree::new(VirtualList::new(source));
        tree.layout(Expanse::new(60.0, 100.0))?;
        let list = tree.widget::<VirtualList>(tree.root())?;
        assert_eq!(list.visible_range(), 0..0);
        assert!(tree.children(tree.root())?.is_empty());
        Ok(())
    }
}
