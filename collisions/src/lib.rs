//! Narrow-phase tests between rectangles: axis-aligned overlap, separating
//! axes for rotated rectangles, and swept axis-aligned time of impact.
//!
//! Every function here is pure. Penetration axes always point from the second
//! shape towards the first, so translating the first shape by
//! `axis * depth` separates the pair, whichever test produced the result.

mod aabb;
mod sat;
mod swept;

pub use aabb::overlap_aabb;
pub use sat::overlap_sat;
pub use swept::swept_aabb;

use common::shapes::{Point, ShapeEnum, Vec2};

/// Minimum translation separating two overlapping shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    /// Unit axis pointing from the second shape towards the first.
    pub axis: Vec2,
    /// Overlap along `axis`, always positive.
    pub depth: f32,
}

impl Penetration {
    pub fn translation(&self) -> Vec2 {
        self.axis * self.depth
    }

    /// The same contact seen from the other shape.
    pub fn reversed(&self) -> Self {
        Self {
            axis: -self.axis,
            depth: self.depth,
        }
    }
}

/// First contact of a moving rectangle with a static one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    /// Middle of the moving rectangle's leading face at the moment of impact.
    pub contact: Point,
    /// Axis-aligned unit normal of the face that was hit, pointing back at the mover.
    pub normal: Vec2,
    /// Fraction of the displacement travelled before touching, in `[0, 1]`.
    pub time_of_impact: f32,
}

/// Picks the axis-aligned test when both shapes are axis-aligned, the
/// separating-axis test otherwise.
pub fn overlap_shapes(a: &ShapeEnum, b: &ShapeEnum) -> Option<Penetration> {
    if a.is_degenerate() || b.is_degenerate() {
        return None;
    }
    match (a.as_axis_aligned(), b.as_axis_aligned()) {
        (Some(a_rect), Some(b_rect)) => overlap_aabb(&a_rect, &b_rect),
        _ => overlap_sat(&a.corners(), &b.corners()),
    }
}

/// Overlap of the intervals `[min_a, max_a]` and `[min_b, max_b]` on one axis.
///
/// Returns the depth and the direction (+1 or -1 along the axis) in which the
/// first interval has to move to separate. Touching intervals do not overlap.
/// `center_delta` (a's center minus b's center, projected) breaks exact ties.
#[inline(always)]
pub(crate) fn interval_penetration(
    min_a: f32,
    max_a: f32,
    min_b: f32,
    max_b: f32,
    center_delta: f32,
) -> Option<(f32, f32)> {
    if max_a <= min_b || max_b <= min_a {
        return None;
    }
    let push_positive = max_b - min_a;
    let push_negative = max_a - min_b;
    if push_positive < push_negative {
        Some((push_positive, 1.0))
    } else if push_negative < push_positive {
        Some((push_negative, -1.0))
    } else if center_delta < 0.0 {
        Some((push_negative, -1.0))
    } else {
        Some((push_positive, 1.0))
    }
}
