use crate::{interval_penetration, Penetration};
use common::shapes::{Point, Vec2};

// Polygons with less area than this are treated as degenerate.
const MIN_AREA: f32 = 1e-8;

/// Separating-axis test for two convex quadrilaterals given by their corners
/// in winding order.
///
/// Both polygons' edge normals are tried. The first axis showing a gap ends
/// the test; otherwise the axis with the smallest overlap wins, oriented from
/// `poly_b` towards `poly_a`.
pub fn overlap_sat(poly_a: &[Point; 4], poly_b: &[Point; 4]) -> Option<Penetration> {
    if signed_area(poly_a).abs() < MIN_AREA || signed_area(poly_b).abs() < MIN_AREA {
        return None;
    }
    let center_delta = centroid(poly_a) - centroid(poly_b);

    let mut best: Option<Penetration> = None;
    for axis in edge_normals(poly_a).into_iter().chain(edge_normals(poly_b)) {
        let Some(axis) = axis else {
            continue;
        };
        let (min_a, max_a) = project(poly_a, &axis);
        let (min_b, max_b) = project(poly_b, &axis);
        let (depth, sign) =
            interval_penetration(min_a, max_a, min_b, max_b, center_delta.dot(&axis))?;
        if best.map_or(true, |current| depth < current.depth) {
            best = Some(Penetration {
                axis: axis * sign,
                depth,
            });
        }
    }
    best
}

fn edge_normals(poly: &[Point; 4]) -> [Option<Vec2>; 4] {
    let mut normals = [None; 4];
    for (i, normal) in normals.iter_mut().enumerate() {
        let edge = poly[(i + 1) % 4] - poly[i];
        *normal = Vec2::new(-edge.y, edge.x).try_normalize(f32::EPSILON);
    }
    normals
}

fn project(poly: &[Point; 4], axis: &Vec2) -> (f32, f32) {
    poly.iter()
        .map(|point| point.coords.dot(axis))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), p| {
            (min.min(p), max.max(p))
        })
}

fn signed_area(poly: &[Point; 4]) -> f32 {
    (0..4)
        .map(|i| {
            let (p, q) = (poly[i], poly[(i + 1) % 4]);
            p.x * q.y - q.x * p.y
        })
        .sum::<f32>()
        * 0.5
}

fn centroid(poly: &[Point; 4]) -> Vec2 {
    poly.iter().map(|point| point.coords).sum::<Vec2>() / 4.0
}
