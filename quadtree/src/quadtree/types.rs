use crate::error::{QuadtreeError, QuadtreeResult};
use common::shapes::Rect;
use smallvec::SmallVec;

pub(crate) type NodeId = u32;

pub(crate) const ROOT: NodeId = 0;
// The root is never anyone's child, so slot 0 doubles as the "no children" marker.
const NO_CHILDREN: NodeId = 0;

pub(crate) type NodeStack = SmallVec<[NodeId; 64]>;
pub(crate) type NodePath = SmallVec<[NodeId; 16]>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct NodeEntity {
    pub(crate) value: u32,
    pub(crate) rect: Rect,
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) rect: Rect,
    pub(crate) depth: u32,
    first_child: NodeId,
    /// Entities owned by this node. For interior nodes these are the ones
    /// straddling more than one quadrant.
    pub(crate) entities: SmallVec<[NodeEntity; 8]>,
    /// Entities stored in this node and all of its descendants.
    pub(crate) subtree_count: u32,
}

impl Node {
    pub(crate) fn new_leaf(rect: Rect, depth: u32) -> Self {
        Self {
            rect,
            depth,
            first_child: NO_CHILDREN,
            entities: SmallVec::new(),
            subtree_count: 0,
        }
    }

    #[inline(always)]
    pub(crate) fn is_leaf(&self) -> bool {
        self.first_child == NO_CHILDREN
    }

    #[inline(always)]
    pub(crate) fn child(&self, quadrant: usize) -> NodeId {
        debug_assert!(!self.is_leaf() && quadrant < 4);
        self.first_child + quadrant as NodeId
    }

    #[inline(always)]
    pub(crate) fn first_child(&self) -> NodeId {
        self.first_child
    }

    pub(crate) fn set_children(&mut self, first_child: NodeId) {
        self.first_child = first_child;
    }

    pub(crate) fn clear_children(&mut self) {
        self.first_child = NO_CHILDREN;
    }

    pub(crate) fn position_of(&self, value: u32) -> Option<usize> {
        self.entities.iter().position(|entity| entity.value == value)
    }
}

pub(crate) fn validate_rect(rect: &Rect) -> QuadtreeResult<()> {
    if !rect.is_valid() {
        return Err(QuadtreeError::InvalidRectangleDims {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        });
    }
    Ok(())
}
