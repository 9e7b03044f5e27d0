use nalgebra::{Point2, Rotation2, Vector2};
use rand::Rng;
use std::f32::consts::FRAC_PI_2;
use std::fmt::Debug;

pub type Vec2 = Vector2<f32>;
pub type Point = Point2<f32>;

// Angles closer than this to a multiple of 90 degrees are treated as axis-aligned.
const AXIS_ALIGNED_EPSILON: f32 = 1e-6;

pub trait Shape: Debug {
    fn bounding_box(&self) -> Rect;
}

/// Axis-aligned rectangle anchored at its top-left corner (y grows downwards).
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_min_max(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        }
    }

    pub fn from_center(center: Point, half_extents: Vec2) -> Self {
        Self {
            x: center.x - half_extents.x,
            y: center.y - half_extents.y,
            width: half_extents.x * 2.0,
            height: half_extents.y * 2.0,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Corners in winding order starting at the top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left(), self.top()),
            Point::new(self.right(), self.top()),
            Point::new(self.right(), self.bottom()),
            Point::new(self.left(), self.bottom()),
        ]
    }

    /// Finite with non-negative extents. Zero-area rectangles are valid.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }

    /// True when the rectangle encloses no area (or is not a valid rectangle at all).
    pub fn is_degenerate(&self) -> bool {
        !(self.is_valid() && self.width > 0.0 && self.height > 0.0)
    }

    // Strict: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    // Check that `inner` is fully contained in `self`; shared edges count as contained.
    pub fn contains_rect(&self, inner: &Rect) -> bool {
        self.x <= inner.x
            && self.right() >= inner.right()
            && self.y <= inner.y
            && self.bottom() >= inner.bottom()
    }

    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }

    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_min_max(
            f32::min(self.left(), other.left()),
            f32::min(self.top(), other.top()),
            f32::max(self.right(), other.right()),
            f32::max(self.bottom(), other.bottom()),
        )
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    pub fn translated(&self, delta: Vec2) -> Rect {
        let mut moved = *self;
        moved.translate(delta);
        moved
    }

    /// Grows every side by `margin`.
    pub fn expanded(&self, margin: f32) -> Rect {
        self.expanded_by(Vec2::new(margin, margin))
    }

    /// Grows the left/right sides by `amount.x` and the top/bottom sides by `amount.y`.
    pub fn expanded_by(&self, amount: Vec2) -> Rect {
        Rect {
            x: self.x - amount.x,
            y: self.y - amount.y,
            width: self.width + amount.x * 2.0,
            height: self.height + amount.y * 2.0,
        }
    }

    /// Quadrant `index` of this rectangle: 0 top-left, 1 bottom-left, 2 top-right, 3 bottom-right.
    pub fn quadrant(&self, index: usize) -> Rect {
        let half_w = self.width * 0.5;
        let half_h = self.height * 0.5;
        let x = if index >= 2 { self.x + half_w } else { self.x };
        let y = if index % 2 == 1 { self.y + half_h } else { self.y };
        Rect::new(x, y, half_w, half_h)
    }

    pub fn random_rect_inside<R: Rng>(&self, width: f32, height: f32, rng: &mut R) -> Rect {
        Rect::new(
            safe_randf32(rng, self.left(), self.right() - width),
            safe_randf32(rng, self.top(), self.bottom() - height),
            width,
            height,
        )
    }
}

fn safe_randf32<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if min >= max {
        return min;
    }
    rng.gen_range(min..=max)
}

impl Shape for Rect {
    fn bounding_box(&self) -> Rect {
        *self
    }
}

/// Rectangle rotated by `angle` radians around its center.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrientedRect {
    pub center: Point,
    pub half_extents: Vec2,
    pub angle: f32,
}

impl OrientedRect {
    pub fn new(center: Point, half_extents: Vec2, angle: f32) -> Self {
        Self {
            center,
            half_extents,
            angle,
        }
    }

    /// Rotates `rect` around its own center.
    pub fn from_rect(rect: &Rect, angle: f32) -> Self {
        Self::new(rect.center(), rect.half_extents(), angle)
    }

    pub fn rotation(&self) -> Rotation2<f32> {
        Rotation2::new(self.angle)
    }

    pub fn corners(&self) -> [Point; 4] {
        let rotation = self.rotation();
        let (hx, hy) = (self.half_extents.x, self.half_extents.y);
        [
            self.center + rotation * Vec2::new(-hx, -hy),
            self.center + rotation * Vec2::new(hx, -hy),
            self.center + rotation * Vec2::new(hx, hy),
            self.center + rotation * Vec2::new(-hx, hy),
        ]
    }

    pub fn bounding_rect(&self) -> Rect {
        let (sin, cos) = self.angle.sin_cos();
        let half = Vec2::new(
            cos.abs() * self.half_extents.x + sin.abs() * self.half_extents.y,
            sin.abs() * self.half_extents.x + cos.abs() * self.half_extents.y,
        );
        Rect::from_center(self.center, half)
    }

    pub fn is_axis_aligned(&self) -> bool {
        let rem = self.angle.rem_euclid(FRAC_PI_2);
        rem < AXIS_ALIGNED_EPSILON || FRAC_PI_2 - rem < AXIS_ALIGNED_EPSILON
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.center.x.is_finite()
            && self.center.y.is_finite()
            && self.angle.is_finite()
            && self.half_extents.x > 0.0
            && self.half_extents.y > 0.0)
    }
}

impl Shape for OrientedRect {
    fn bounding_box(&self) -> Rect {
        self.bounding_rect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeEnum {
    Rect(Rect),
    Oriented(OrientedRect),
}

impl ShapeEnum {
    pub fn center(&self) -> Point {
        match self {
            ShapeEnum::Rect(rect) => rect.center(),
            ShapeEnum::Oriented(oriented) => oriented.center,
        }
    }

    pub fn corners(&self) -> [Point; 4] {
        match self {
            ShapeEnum::Rect(rect) => rect.corners(),
            ShapeEnum::Oriented(oriented) => oriented.corners(),
        }
    }

    /// The shape as an axis-aligned rectangle, if it is one (rotations by
    /// multiples of 90 degrees included).
    pub fn as_axis_aligned(&self) -> Option<Rect> {
        match self {
            ShapeEnum::Rect(rect) => Some(*rect),
            ShapeEnum::Oriented(oriented) if oriented.is_axis_aligned() => {
                Some(oriented.bounding_rect())
            }
            ShapeEnum::Oriented(_) => None,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        match self {
            ShapeEnum::Rect(rect) => rect.is_degenerate(),
            ShapeEnum::Oriented(oriented) => oriented.is_degenerate(),
        }
    }
}

impl Shape for ShapeEnum {
    fn bounding_box(&self) -> Rect {
        match self {
            ShapeEnum::Rect(rect) => rect.bounding_box(),
            ShapeEnum::Oriented(oriented) => oriented.bounding_box(),
        }
    }
}
