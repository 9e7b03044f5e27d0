mod collision_pairs;
mod config;
mod core;
mod maintenance;
mod query_rect;
mod types;

pub use config::Config;

use common::shapes::Rect;
use fxhash::FxHashMap;
use types::{Node, NodeId};

/// Region quadtree over a fixed world rectangle.
///
/// Nodes live in an arena and are addressed by index; the four children of an
/// interior node occupy four consecutive slots. Every entity is stored exactly
/// once, in the smallest node whose rectangle fully contains its bounds, and
/// `owner_map` records which node that is so removal never searches the tree.
pub struct QuadTree {
    bounds: Rect,
    nodes: Vec<Node>,
    free_blocks: Vec<NodeId>,
    owner_map: FxHashMap<u32, NodeId>,
    node_capacity: usize,
    max_depth: u32,
    merge_threshold: u32,
}
