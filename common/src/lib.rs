pub mod shapes;

pub use shapes::{OrientedRect, Point, Rect, ShapeEnum, Vec2};
