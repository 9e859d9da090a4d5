use geom::{Expanse, Thickness};

/// How a node is placed along one axis when its parent hands it more room
/// than its desired size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Take all available space on the axis.
    #[default]
    Stretch,
    /// Shrink to the desired size, aligned to the start of the axis.
    Begin,
    /// Shrink to the desired size, centered.
    Center,
    /// Shrink to the desired size, aligned to the end of the axis.
    End,
}

/// Per-node sizing policy, consulted by the measure/arrange protocol and by
/// containers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sizing {
    /// Horizontal placement within the assigned rect.
    pub horizontal: Alignment,
    /// Vertical placement within the assigned rect.
    pub vertical: Alignment,
    /// Compete for leftover horizontal space in containers that distribute
    /// it.
    pub expand_horizontal: bool,
    /// Compete for leftover vertical space in containers that distribute it.
    pub expand_vertical: bool,
    /// Weight for dividing leftover space among expanding siblings. Always
    /// finite and greater than zero.
    stretch_ratio: f32,
    /// Outer margin, deflated before measurement and arrangement.
    pub margin: Thickness,
    /// Lower bound on the node's own size, before margins.
    pub min: Expanse,
    /// Exact width override. Overrides the measured width within min/max.
    pub exact_w: Option<f32>,
    /// Exact height override. Overrides the measured height within min/max.
    pub exact_h: Option<f32>,
    /// Upper bound on width.
    pub max_w: Option<f32>,
    /// Upper bound on height.
    pub max_h: Option<f32>,
}

impl Default for Sizing {
    fn default() -> Self {
        Self {
            horizontal: Alignment::Stretch,
            vertical: Alignment::Stretch,
            expand_horizontal: false,
            expand_vertical: false,
            stretch_ratio: 1.0,
            margin: Thickness::default(),
            min: Expanse::ZERO,
            exact_w: None,
            exact_h: None,
            max_w: None,
            max_h: None,
        }
    }
}

impl Sizing {
    /// The stretch ratio. Guaranteed finite and positive.
    pub fn stretch_ratio(&self) -> f32 {
        self.stretch_ratio
    }

    /// Set the stretch ratio, clamping invalid values away. Validated entry
    /// points live on [`crate::Tree::set_stretch_ratio`]; this is the
    /// unchecked builder used when composing a policy literal.
    pub fn with_stretch_ratio(mut self, ratio: f32) -> Self {
        if ratio.is_finite() && ratio > 0.0 {
            self.stretch_ratio = ratio;
        }
        self
    }

    /// Raw write access for the validated tree setter.
    pub(crate) fn set_stretch_ratio_unchecked(&mut self, ratio: f32) {
        self.stretch_ratio = ratio;
    }

    /// Clamp an available extent into this policy's effective bounds for the
    /// width axis. Precedence: min wins over max, max wins over exact.
    pub fn clamp_w(&self, v: f32) -> f32 {
        clamp_axis(v, self.min.w, self.exact_w, self.max_w)
    }

    /// Clamp an available extent into this policy's effective bounds for the
    /// height axis.
    pub fn clamp_h(&self, v: f32) -> f32 {
        clamp_axis(v, self.min.h, self.exact_h, self.max_h)
    }

    /// Clamp both components of a size into the policy's effective bounds.
    pub fn clamp(&self, size: Expanse) -> Expanse {
        Expanse {
            w: self.clamp_w(size.w),
            h: self.clamp_h(size.h),
        }
    }
}

/// Clamp a value into the effective bounds implied by min/exact/max on one
/// axis. An exact size pins both bounds but cannot escape min/max.
fn clamp_axis(v: f32, min: f32, exact: Option<f32>, max: Option<f32>) -> f32 {
    let lo = min.max(0.0);
    let hi = max.unwrap_or(f32::INFINITY).max(lo);
    let (lo, hi) = match exact {
        Some(e) => {
            let e = e.clamp(lo, hi);
            (e, e)
        }
        None => (lo, hi),
    };
    v.clamp(lo, hi)
}
