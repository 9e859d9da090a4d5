//! Stretch-space distribution along one axis.
//!
//! Shared by the sequential and wrapping containers: given an ordered run of
//! visible children and a total extent, decide every child's size and offset
//! on that axis. Children flagged to stretch divide the leftover space by
//! ratio; a stretcher whose proportional share cannot cover its desired size
//! is reclassified as fixed and the division is retried over the rest.

use geom::EPSILON;

/// Per-child input to [`distribute`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StretchChild {
    /// The child's desired extent on the layout axis.
    pub desired: f32,
    /// Weight among stretching siblings. Ignored unless `stretch` is set;
    /// values that are zero or below make the child behave as fixed.
    pub ratio: f32,
    /// Compete for leftover space rather than taking the desired extent.
    pub stretch: bool,
}

/// Per-child output of [`distribute`]: an offset and extent along the axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    /// Offset of the child from the start of the extent.
    pub offset: f32,
    /// Size assigned to the child.
    pub size: f32,
}

/// Where unused extent goes when no child ends up stretching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Children pack to the start; leftover goes after the last child.
    #[default]
    Begin,
    /// Leftover splits evenly before and after.
    Center,
    /// Children pack to the end; leftover goes before the first child.
    End,
}

/// Distribute `extent` among `children`, separated by `separation`, and
/// return a slot per child in order. All outputs are non-negative; a
/// degenerate or infinite extent never yields an error, only clamped slots.
pub fn distribute(
    extent: f32,
    separation: f32,
    children: &[StretchChild],
    align: Align,
) -> Vec<Slot> {
    let n = children.len();
    if n == 0 {
        return Vec::new();
    }

    let extent = extent.max(0.0);
    let mut remaining = (extent - separation * (n as f32 - 1.0)).max(0.0);
    let mut sizes = vec![0.0f32; n];

    // Fixed children take their desired extent, clamped into whatever is
    // left, in layout order. Stretchers with a non-positive ratio cannot
    // receive a share and are treated as fixed.
    let mut stretchers: Vec<usize> = Vec::new();
    for (i, c) in children.iter().enumerate() {
        if c.stretch && c.ratio > 0.0 && remaining.is_finite() {
            stretchers.push(i);
        } else {
            let size = c.desired.max(0.0).min(remaining);
            sizes[i] = size;
            remaining -= size;
        }
    }

    let mut total_ratio: f32 = stretchers.iter().map(|&i| children[i].ratio).sum();
    let mut stretched = false;

    // Reclassification loop: each pass either satisfies every remaining
    // stretcher or permanently fixes at least one, so the stretch set
    // strictly shrinks. The bound is defensive; a converging pass never
    // reaches it.
    let mut passes = stretchers.len() + 1;
    while !stretchers.is_empty() && total_ratio > 0.0 && passes > 0 {
        passes -= 1;
        let starved = stretchers
            .iter()
            .position(|&i| remaining * children[i].ratio / total_ratio + EPSILON < children[i].desired);
        match starved {
            Some(pos) => {
                // The share cannot cover this child's desired size. Fix it at
                // its desired size so its shortfall flows to its stretch
                // siblings instead of being silently absorbed.
                let i = stretchers.remove(pos);
                let size = children[i].desired.max(0.0).min(remaining);
                sizes[i] = size;
                remaining -= size;
                total_ratio -= children[i].ratio;
            }
            None => {
                for &i in &stretchers {
                    sizes[i] = remaining * children[i].ratio / total_ratio;
                }
                stretched = true;
                break;
            }
        }
    }
    if !stretchers.is_empty() && !stretched {
        // Every stretcher was reclassified; any that still have zero size
        // were handled above, nothing further to assign.
        for &i in &stretchers {
            let size = children[i].desired.max(0.0).min(remaining);
            sizes[i] = size;
            remaining -= size;
        }
    }

    // With no child stretching, the unused extent is disposed of by
    // alignment.
    let lead = if stretched || !remaining.is_finite() || remaining <= 0.0 {
        0.0
    } else {
        match align {
            Align::Begin => 0.0,
            Align::Center => remaining / 2.0,
            Align::End => remaining,
        }
    };

    let mut slots = Vec::with_capacity(n);
    let mut offset = lead;
    for size in sizes {
        slots.push(Slot { offset, size });
        offset += size + separation;
    }
    slots
}
