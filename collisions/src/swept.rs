use crate::SweepHit;
use common::shapes::{Rect, Vec2};

// Starting this far inside the entered face, relative to the coordinate
// magnitude, still counts as touching it. Absorbs rounding left over from
// stopping exactly at a face on the previous step.
const CONTACT_SLOP: f32 = 1e-5;

/// Earliest contact of `moving` travelling by `displacement` against the
/// static rectangle `target`.
///
/// `target` is grown by `moving`'s half extents (Minkowski sum) and a ray is
/// cast from `moving`'s center through it with slab clipping. Pairs that
/// already overlap, only graze an edge or corner, or would meet beyond the end
/// of the displacement report `None`. A mover resting against a face (or
/// rounding-error deep into it) and pushing on it hits at time zero.
pub fn swept_aabb(moving: &Rect, displacement: Vec2, target: &Rect) -> Option<SweepHit> {
    if moving.is_degenerate() || target.is_degenerate() {
        return None;
    }
    let half = moving.half_extents();
    let expanded = target.expanded_by(half);
    let origin = moving.center();

    let (entry_x, exit_x, normal_x) =
        slab(origin.x, displacement.x, expanded.left(), expanded.right())?;
    let (entry_y, exit_y, normal_y) =
        slab(origin.y, displacement.y, expanded.top(), expanded.bottom())?;

    let (mut entry, normal, speed) = if entry_x > entry_y {
        (entry_x, Vec2::new(normal_x, 0.0), displacement.x.abs())
    } else {
        (entry_y, Vec2::new(0.0, normal_y), displacement.y.abs())
    };
    let exit = exit_x.min(exit_y);
    let slop = CONTACT_SLOP * origin.x.abs().max(origin.y.abs()).max(1.0);
    if entry < 0.0 && -entry * speed <= slop {
        entry = 0.0;
    }
    if entry >= exit || !(0.0..=1.0).contains(&entry) {
        return None;
    }

    let center_at_impact = origin + displacement * entry;
    let contact = center_at_impact - normal.component_mul(&half);
    Some(SweepHit {
        contact,
        normal,
        time_of_impact: entry,
    })
}

/// Entry and exit times of a ray against the slab `[min, max]` on one axis,
/// plus the sign of the normal of the face entered first.
fn slab(origin: f32, delta: f32, min: f32, max: f32) -> Option<(f32, f32, f32)> {
    if delta.abs() < f32::EPSILON {
        // No motion on this axis: the ray is either always inside the slab or never.
        if origin <= min || origin >= max {
            return None;
        }
        return Some((f32::NEG_INFINITY, f32::INFINITY, 0.0));
    }
    let inv = 1.0 / delta;
    let t_min = (min - origin) * inv;
    let t_max = (max - origin) * inv;
    if t_min <= t_max {
        Some((t_min, t_max, -1.0))
    } else {
        Some((t_max, t_min, 1.0))
    }
}
