use common::shapes::Rect;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum QuadtreeError {
    #[error(
        "rectangle must be finite with non-negative width/height (x: {x}, y: {y}, width: {width}, height: {height})"
    )]
    InvalidRectangleDims {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    #[error("rectangle {rect:?} is not contained in the quadtree bounds {bounds:?}")]
    RectOutOfBounds { rect: Rect, bounds: Rect },
    #[error("entity {value} is not in the quadtree")]
    UnknownEntity { value: u32 },
    #[error("invariant violated at node {node} for entity {value}: {reason}")]
    InvariantViolation {
        node: u32,
        value: u32,
        reason: &'static str,
    },
}

pub type QuadtreeResult<T> = Result<T, QuadtreeError>;
