use super::{Axis, Point, Rect};

/// An `Expanse` is a rectangle that has a width and height but no location.
/// This is useful when we want to deal with `Rect`s abstractly, or when we
/// want to mandate that the location of a `Rect` is (0, 0).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Expanse {
    pub w: f32,
    pub h: f32,
}

impl Expanse {
    /// The zero-valued size.
    pub const ZERO: Self = Self { w: 0.0, h: 0.0 };

    /// A size unbounded on both axes, used as the measure constraint for
    /// content that may take as much room as it wants.
    pub const INFINITE: Self = Self {
        w: f32::INFINITY,
        h: f32::INFINITY,
    };

    pub fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }

    /// Return a `Rect` with the same dimensions as the `Expanse`, but a
    /// location at (0, 0).
    pub fn rect(&self) -> Rect {
        Rect {
            tl: Point::default(),
            w: self.w,
            h: self.h,
        }
    }

    /// True if this size can completely enclose the target size in both
    /// dimensions.
    pub fn contains(&self, other: &Self) -> bool {
        self.w >= other.w && self.h >= other.h
    }

    /// Component-wise minimum.
    pub fn min(&self, other: Self) -> Self {
        Self {
            w: self.w.min(other.w),
            h: self.h.min(other.h),
        }
    }

    /// Component-wise maximum.
    pub fn max(&self, other: Self) -> Self {
        Self {
            w: self.w.max(other.w),
            h: self.h.max(other.h),
        }
    }

    /// Clamp both components to be non-negative.
    pub fn non_negative(&self) -> Self {
        self.max(Self::ZERO)
    }

    /// The extent along the given axis.
    pub fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.w,
            Axis::Vertical => self.h,
        }
    }

    /// Build a size from a main-axis and cross-axis extent.
    pub fn from_axes(axis: Axis, main: f32, cross: f32) -> Self {
        match axis {
            Axis::Horizontal => Self { w: main, h: cross },
            Axis::Vertical => Self { w: cross, h: main },
        }
    }

    /// Replace the extent along the given axis.
    pub fn with_along(&self, axis: Axis, v: f32) -> Self {
        match axis {
            Axis::Horizontal => Self { w: v, h: self.h },
            Axis::Vertical => Self { w: self.w, h: v },
        }
    }
}

impl From<Rect> for Expanse {
    fn from(r: Rect) -> Self {
        Self { w: r.w, h: r.h }
    }
}

impl From<(f32, f32)> for Expanse {
    fn from(v: (f32, f32)) -> Self {
        Self { w: v.0, h: v.1 }
    }
}
