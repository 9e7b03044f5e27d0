use crate::{interval_penetration, Penetration};
use common::shapes::{Rect, Vec2};

/// Penetration of two axis-aligned rectangles along whichever cardinal axis
/// needs the smaller push. `None` when they are separated or only touch, or
/// when either rectangle encloses no area.
pub fn overlap_aabb(a: &Rect, b: &Rect) -> Option<Penetration> {
    if a.is_degenerate() || b.is_degenerate() {
        return None;
    }
    let delta = a.center() - b.center();
    let (depth_x, sign_x) = interval_penetration(a.left(), a.right(), b.left(), b.right(), delta.x)?;
    let (depth_y, sign_y) = interval_penetration(a.top(), a.bottom(), b.top(), b.bottom(), delta.y)?;
    if depth_x <= depth_y {
        Some(Penetration {
            axis: Vec2::new(sign_x, 0.0),
            depth: depth_x,
        })
    } else {
        Some(Penetration {
            axis: Vec2::new(0.0, sign_y),
            depth: depth_y,
        })
    }
}
