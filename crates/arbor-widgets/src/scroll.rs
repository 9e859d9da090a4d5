use arbor_core::{NodeId, Result, Tree, Widget};
use geom::{EPSILON, Expanse, Point, Rect};

/// Geometry for one scrollbar, derived each arrange from the content-vs-
/// available comparison. Rendering and thumb dragging are the input layer's
/// business; layout only decides visibility and extents.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollBarState {
    /// Is the bar shown, with space reserved for it?
    pub visible: bool,
    /// The viewport extent on the bar's axis.
    pub page: f32,
    /// The content extent on the bar's axis.
    pub max: f32,
    /// Current scroll offset on the bar's axis.
    pub value: f32,
}

impl ScrollBarState {
    /// The largest offset that still shows a full page.
    fn limit(&self) -> f32 {
        (self.max - self.page).max(0.0)
    }
}

/// A viewport over oversized content. The content child measures against an
/// unconstrained extent on each scrollable axis; when it reports more than
/// the available room (beyond an epsilon, to keep float noise from flapping
/// the decision), the matching scrollbar becomes visible and its thickness
/// is reserved. Children are arranged at the negative scroll offset.
pub struct ScrollView {
    /// Allow horizontal scrolling.
    horizontal: bool,
    /// Allow vertical scrolling.
    vertical: bool,
    /// Current scroll offset in content coordinates.
    offset: Point,
    /// Horizontal bar geometry from the last arrange.
    hbar: ScrollBarState,
    /// Vertical bar geometry from the last arrange.
    vbar: ScrollBarState,
    /// Reentrancy suppression: set during programmatic bulk updates so
    /// offset writes do not re-trigger the change notification.
    suppress: bool,
    /// Change notification for collaborators (input layer, scrollbar
    /// thumbs).
    on_changed: Option<Box<dyn FnMut(Point) + Send>>,
}

impl ScrollView {
    /// A viewport scrolling on the vertical axis only.
    pub fn vertical() -> Self {
        Self::new(false, true)
    }

    /// A viewport scrolling on the horizontal axis only.
    pub fn horizontal() -> Self {
        Self::new(true, false)
    }

    /// A viewport scrolling on both axes.
    pub fn both() -> Self {
        Self::new(true, true)
    }

    /// Build a viewport with the given scrollable axes.
    fn new(horizontal: bool, vertical: bool) -> Self {
        Self {
            horizontal,
            vertical,
            offset: Point::zero(),
            hbar: ScrollBarState::default(),
            vbar: ScrollBarState::default(),
            suppress: false,
            on_changed: None,
        }
    }

    /// Register a change notification callback.
    pub fn on_changed(mut self, f: impl FnMut(Point) + Send + 'static) -> Self {
        self.on_changed = Some(Box::new(f));
        self
    }

    /// The current scroll offset.
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Horizontal bar geometry from the last arrange.
    pub fn hbar(&self) -> ScrollBarState {
        self.hbar
    }

    /// Vertical bar geometry from the last arrange.
    pub fn vbar(&self) -> ScrollBarState {
        self.vbar
    }

    /// Clamp an offset into the currently valid scroll range.
    fn clamp_offset(&self, offset: Point) -> Point {
        Point::new(
            offset.x.clamp(0.0, self.hbar.limit()),
            offset.y.clamp(0.0, self.vbar.limit()),
        )
    }

    /// Scroll to an absolute offset. Clamped into range; a no-op write does
    /// not notify. Suppressed entirely during a bulk update.
    pub fn scroll_to(tree: &mut Tree, id: NodeId, offset: Point) -> Result<()> {
        let view = tree.widget_mut::<Self>(id)?;
        if view.suppress {
            return Ok(());
        }
        let clamped = view.clamp_offset(offset);
        if clamped == view.offset {
            return Ok(());
        }
        view.offset = clamped;
        view.hbar.value = clamped.x;
        view.vbar.value = clamped.y;
        if let Some(cb) = &mut view.on_changed {
            cb(clamped);
        }
        tree.invalidate_arrange(id)
    }

    /// Scroll by a relative amount.
    pub fn scroll_by(tree: &mut Tree, id: NodeId, dx: f32, dy: f32) -> Result<()> {
        let current = tree.widget::<Self>(id)?.offset;
        Self::scroll_to(tree, id, Point::new(current.x + dx, current.y + dy))
    }

    /// Run a programmatic bulk update against the widget. Offset writes made
    /// while the update runs are guarded by the suppression flag, and a
    /// single change notification fires at the end.
    pub fn update(tree: &mut Tree, id: NodeId, f: impl FnOnce(&mut Self)) -> Result<()> {
        {
            let view = tree.widget_mut::<Self>(id)?;
            view.suppress = true;
            f(view);
            view.suppress = false;
            let clamped = view.clamp_offset(view.offset);
            view.offset = clamped;
            view.hbar.value = clamped.x;
            view.vbar.value = clamped.y;
            if let Some(cb) = &mut view.on_changed {
                cb(clamped);
            }
        }
        tree.invalidate_arrange(id)
    }

    /// Set the offset directly from inside a bulk update closure.
    pub fn set_offset(&mut self, offset: Point) {
        self.offset = offset;
    }
}

impl Widget for ScrollView {
    fn measure(&mut self, tree: &mut Tree, id: NodeId, available: Expanse) -> Result<Expanse> {
        // Content measures unconstrained along scrollable axes so it reports
        // its natural size.
        let mut child_available = available;
        if self.horizontal {
            child_available.w = f32::INFINITY;
        }
        if self.vertical {
            child_available.h = f32::INFINITY;
        }
        let mut desired = Expanse::ZERO;
        for child in tree.visible_children(id)? {
            tree.measure(child, child_available)?;
            desired = desired.max(tree.desired_size(child)?);
        }
        Ok(desired)
    }

    fn arrange(&mut self, tree: &mut Tree, id: NodeId, size: Expanse) -> Result<Expanse> {
        let mut content = Expanse::ZERO;
        for child in tree.visible_children(id)? {
            content = content.max(tree.desired_size(child)?);
        }
        let thickness = tree.style().scrollbar_thickness;

        // Decide bar visibility against the space that remains once the
        // other bar has taken its cut. Showing the horizontal bar can force
        // the vertical one, so that decision is revisited once.
        let mut avail = size;
        let mut v_visible = self.vertical && content.h > avail.h + EPSILON;
        if v_visible {
            avail.w = (avail.w - thickness).max(0.0);
        }
        let h_visible = self.horizontal && content.w > avail.w + EPSILON;
        if h_visible {
            avail.h = (avail.h - thickness).max(0.0);
            if !v_visible && self.vertical && content.h > avail.h + EPSILON {
                v_visible = true;
                avail.w = (avail.w - thickness).max(0.0);
            }
        }

        self.hbar = ScrollBarState {
            visible: h_visible,
            page: avail.w,
            max: content.w.max(avail.w),
            value: self.offset.x,
        };
        self.vbar = ScrollBarState {
            visible: v_visible,
            page: avail.h,
            max: content.h.max(avail.h),
            value: self.offset.y,
        };

        // Re-clamp silently: this is the engine reconciling state, not a
        // user scroll, so no change notification fires.
        let clamped = self.clamp_offset(self.offset);
        self.offset = clamped;
        self.hbar.value = clamped.x;
        self.vbar.value = clamped.y;

        let child_size = Expanse::new(
            if self.horizontal {
                content.w.max(avail.w)
            } else {
                avail.w
            },
            if self.vertical {
                content.h.max(avail.h)
            } else {
                avail.h
            },
        );
        let child_rect = Rect::from_parts(-clamped, child_size);
        for child in tree.visible_children(id)? {
            tree.arrange(child, child_rect)?;
        }
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    };

    use arbor_core::{Style, tutils::TFixed};

    use super::*;

    /// A 100x100 viewport over 60x400 content, vertical scrolling, with a
    /// 10-unit scrollbar.
    fn viewport() -> Result<(Tree, NodeId)> {
        let mut tree = Tree::new(ScrollView::vertical()).with_style(Style {
            scrollbar_thickness: 10.0,
            ..Style::default()
        });
        let content = tree.attach(tree.root(), TFixed::new(60.0, 400.0))?;
        tree.layout(Expanse::new(100.0, 100.0))?;
        Ok((tree, content))
    }

    #[test]
    fn oversized_content_shows_the_bar() -> Result<()> {
        let (tree, _) = viewport()?;
        let view = tree.widget::<ScrollView>(tree.root())?;
        assert!(view.vbar().visible);
        assert!(!view.hbar().visible);
        assert_eq!(view.vbar().page, 100.0);
        assert_eq!(view.vbar().max, 400.0);
        Ok(())
    }

    #[test]
    fn fitting_content_hides_the_bar() -> Result<()> {
        let mut tree = Tree::new(ScrollView::vertical());
        tree.attach(tree.root(), TFixed::new(60.0, 80.0))?;
        tree.layout(Expanse::new(100.0, 100.0))?;
        let view = tree.widget::<ScrollView>(tree.root())?;
        assert!(!view.vbar().visible);
        // No bar, no reserved space.
        assert_eq!(view.vbar().page, 100.0);
        Ok(())
    }

    #[test]
    fn epsilon_overflow_does_not_flap_the_bar() -> Result<()> {
        let mut tree = Tree::new(ScrollView::vertical());
        tree.attach(tree.root(), TFixed::new(60.0, 100.005))?;
        tree.layout(Expanse::new(100.0, 100.0))?;
        assert!(!tree.widget::<ScrollView>(tree.root())?.vbar().visible);
        Ok(())
    }

    #[test]
    fn bar_reserves_space_from_content_rect() -> Result<()> {
        let (tree, content) = viewport()?;
        // The vertical bar eats 10 units of width.
        assert_eq!(tree.rect(content)?.w, 90.0);
        Ok(())
    }

    #[test]
    fn children_translate_by_negative_offset() -> Result<()> {
        let (mut tree, content) = viewport()?;
        let root = tree.root();
        ScrollView::scroll_to(&mut tree, root, Point::new(0.0, 150.0))?;
        tree.layout(Expanse::new(100.0, 100.0))?;
        assert_eq!(tree.rect(content)?.tl, Point::new(0.0, -150.0));
        Ok(())
    }

    #[test]
    fn offset_clamps_to_range() -> Result<()> {
        let (mut tree, _) = viewport()?;
        let root = tree.root();
        ScrollView::scroll_to(&mut tree, root, Point::new(0.0, 1000.0))?;
        // Limit is content 400 minus page 100.
        assert_eq!(tree.widget::<ScrollView>(root)?.offset(), Point::new(0.0, 300.0));
        ScrollView::scroll_by(&mut tree, root, 0.0, -5000.0)?;
        assert_eq!(tree.widget::<ScrollView>(root)?.offset(), Point::zero());
        Ok(())
    }

    #[test]
    fn bulk_update_notifies_once() -> Result<()> {
        let notifications = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&notifications);

        let mut tree = Tree::new(
            ScrollView::vertical().on_changed(move |_| {
                counter.fetch_add(1, Ordering::Relaxed);
            }),
        );
        let root = tree.root();
        tree.attach(root, TFixed::new(60.0, 400.0))?;
        tree.layout(Expanse::new(100.0, 100.0))?;

        ScrollView::update(&mut tree, root, |view| {
            view.set_offset(Point::new(0.0, 50.0));
            view.set_offset(Point::new(0.0, 120.0));
            view.set_offset(Point::new(0.0, 80.0));
        })?;
        assert_eq!(notifications.load(Ordering::Relaxed), 1);
        assert_eq!(tree.widget::<ScrollView>(root)?.offset(), Point::new(0.0, 80.0));

        // An ordinary scroll notifies normally.
        ScrollView::scroll_to(&mut tree, root, Point::new(0.0, 10.0))?;
        assert_eq!(notifications.load(Ordering::Relaxed), 2);
        Ok(())
    }

    #[test]
    fn both_axes_interact() -> Result<()> {
        // Content that fits vertically until the horizontal bar steals
        // height: showing one bar forces the other.
        let mut tree = Tree::new(ScrollView::both()).with_style(Style {
            scrollbar_thickness: 10.0,
            ..Style::default()
        });
        tree.attach(tree.root(), TFixed::new(200.0, 95.0))?;
        tree.layout(Expanse::new(100.0, 100.0))?;
        let view = tree.widget::<ScrollView>(tree.root())?;
        assert!(view.hbar().visible);
        assert!(view.vbar().visible);
        // Each axis loses exactly the other bar's thickness.
        assert_eq!(view.hbar().page, 90.0);
        assert_eq!(view.vbar().page, 90.0);
        Ok(())
    }
}
