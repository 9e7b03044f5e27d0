use approx::assert_relative_eq;
use common::shapes::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

#[test]
fn test_new_and_getters() {
    let rect = Rect::new(2.0, 3.0, 4.0, 6.0);
    assert_eq!(rect.width(), 4.0);
    assert_eq!(rect.height(), 6.0);
    assert_eq!(rect.left(), 2.0);
    assert_eq!(rect.right(), 6.0);
    assert_eq!(rect.top(), 3.0);
    assert_eq!(rect.bottom(), 9.0);
    assert_eq!(rect.center(), Point::new(4.0, 6.0));
    assert_eq!(rect.half_extents(), Vec2::new(2.0, 3.0));
}

#[test]
fn test_intersects_is_strict() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
    // Sharing an edge is not an intersection.
    assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
    assert!(!a.intersects(&Rect::new(20.0, 20.0, 1.0, 1.0)));
    // Zero-area rectangles intersect nothing.
    assert!(!a.intersects(&Rect::new(5.0, 5.0, 0.0, 0.0)));
}

#[test]
fn test_contains_rect_and_point() {
    let outer = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(outer.contains_rect(&Rect::new(0.0, 0.0, 10.0, 10.0)));
    assert!(outer.contains_rect(&Rect::new(2.0, 2.0, 1.0, 1.0)));
    assert!(!outer.contains_rect(&Rect::new(9.5, 2.0, 1.0, 1.0)));
    assert!(outer.contains_point(10.0, 10.0));
    assert!(!outer.contains_point(10.1, 5.0));
}

#[test]
fn test_quadrants_tile_parent() {
    let parent = Rect::new(0.0, 0.0, 100.0, 50.0);
    assert_eq!(parent.quadrant(0), Rect::new(0.0, 0.0, 50.0, 25.0));
    assert_eq!(parent.quadrant(1), Rect::new(0.0, 25.0, 50.0, 25.0));
    assert_eq!(parent.quadrant(2), Rect::new(50.0, 0.0, 50.0, 25.0));
    assert_eq!(parent.quadrant(3), Rect::new(50.0, 25.0, 50.0, 25.0));
    let area: f32 = (0..4).map(|i| parent.quadrant(i).area()).sum();
    assert_eq!(area, parent.area());
}

#[test]
fn test_degenerate_rects() {
    assert!(Rect::new(0.0, 0.0, 0.0, 5.0).is_degenerate());
    assert!(Rect::new(0.0, 0.0, -1.0, 5.0).is_degenerate());
    assert!(Rect::new(f32::NAN, 0.0, 1.0, 1.0).is_degenerate());
    assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_degenerate());
    assert!(Rect::new(0.0, 0.0, 0.0, 0.0).is_valid());
}

#[test]
fn test_oriented_rect_bounding_rect() {
    let square = OrientedRect::new(Point::new(5.0, 5.0), Vec2::new(0.5, 0.5), FRAC_PI_4);
    let bounds = square.bounding_rect();
    let half_diagonal = 0.5_f32.hypot(0.5);
    assert_relative_eq!(bounds.width, half_diagonal * 2.0, epsilon = 1e-5);
    assert_relative_eq!(bounds.center(), Point::new(5.0, 5.0), epsilon = 1e-5);
    for corner in square.corners() {
        assert!(bounds.expanded(1e-4).contains_point(corner.x, corner.y));
    }
}

#[test]
fn test_axis_aligned_detection() {
    let rect = Rect::new(0.0, 0.0, 4.0, 2.0);
    let quarter_turn = OrientedRect::from_rect(&rect, FRAC_PI_2);
    assert!(quarter_turn.is_axis_aligned());
    let aligned = ShapeEnum::Oriented(quarter_turn).as_axis_aligned().unwrap();
    assert_relative_eq!(aligned.width, 2.0, epsilon = 1e-5);
    assert_relative_eq!(aligned.height, 4.0, epsilon = 1e-5);

    let tilted = ShapeEnum::Oriented(OrientedRect::from_rect(&rect, 0.3));
    assert!(tilted.as_axis_aligned().is_none());
}

#[test]
fn test_random_rect_inside() {
    let area = Rect::new(2.0, 3.0, 6.0, 8.0);

    // Use a fixed seed for reproducibility.
    let mut rng: StdRng = SeedableRng::seed_from_u64(123);

    for _ in 0..10 {
        let rect = area.random_rect_inside(1.0, 2.0, &mut rng);
        assert!(area.contains_rect(&rect));
    }
}

#[test]
fn test_random_rect_inside_too_small_area() {
    let area = Rect::new(2.0, 3.0, 2.0, 2.0);
    let mut rng: StdRng = SeedableRng::seed_from_u64(123);

    let rect = area.random_rect_inside(4.0, 4.0, &mut rng);
    // Clamped to the top-left of the area.
    assert_eq!(rect.position(), area.position());
}
