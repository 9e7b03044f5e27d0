use super::types::{validate_rect, Node, NodeEntity, NodeId, NodePath, NodeStack, ROOT};
use super::*;
use crate::error::{QuadtreeError, QuadtreeResult};
use tracing::{debug, trace, warn};

impl QuadTree {
    pub fn new_with_config(bounds: Rect, config: Config) -> Self {
        if bounds.is_degenerate() {
            warn!(?bounds, "quadtree bounds enclose no area; nothing can be inserted");
        }
        let node_capacity = config.node_capacity.max(1);
        let merge_threshold = config.merge_threshold.min(node_capacity - 1) as u32;
        let mut nodes = Vec::with_capacity(config.pool_size.max(1));
        nodes.push(Node::new_leaf(bounds, 0));
        let mut owner_map = FxHashMap::default();
        owner_map.reserve(config.pool_size);
        Self {
            bounds,
            nodes,
            free_blocks: Vec::new(),
            owner_map,
            node_capacity,
            max_depth: config.max_depth as u32,
            merge_threshold,
        }
    }

    pub fn new(bounds: Rect) -> Self {
        Self::new_with_config(bounds, Config::default())
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Indexes `value` under `rect`. An id that is already present is replaced.
    ///
    /// Rectangles that are not finite, or not fully inside the tree bounds, are
    /// refused and the tree is left untouched.
    pub fn insert(&mut self, value: u32, rect: Rect) -> QuadtreeResult<()> {
        self.ensure_insertable(&rect)?;
        if self.owner_map.contains_key(&value) {
            self.remove(value)?;
        }
        self.insert_from_root(NodeEntity { value, rect });
        Ok(())
    }

    /// Removes `value` from the index, collapsing under-populated subtrees on
    /// the way.
    pub fn remove(&mut self, value: u32) -> QuadtreeResult<()> {
        let owner = match self.owner_map.remove(&value) {
            Some(owner) => owner,
            None => {
                debug!(value, "remove of an entity that is not indexed");
                return Err(QuadtreeError::UnknownEntity { value });
            }
        };
        let node = &mut self.nodes[owner as usize];
        let position = match node.position_of(value) {
            Some(position) => position,
            None => {
                return Err(QuadtreeError::InvariantViolation {
                    node: owner,
                    value,
                    reason: "owner map points at a node that does not hold the entity",
                });
            }
        };
        let removed = node.entities.swap_remove(position);
        let path = self.path_to(owner, &removed.rect);
        for &node_id in &path {
            let node = &mut self.nodes[node_id as usize];
            node.subtree_count = node.subtree_count.saturating_sub(1);
        }
        let merge_at = path.iter().copied().find(|&node_id| {
            let node = &self.nodes[node_id as usize];
            !node.is_leaf() && node.subtree_count <= self.merge_threshold
        });
        if let Some(node_id) = merge_at {
            self.collapse(node_id);
        }
        Ok(())
    }

    /// Moves `value` to `rect`. Equivalent to `remove` followed by `insert`,
    /// except that the entry is rewritten in place when it still belongs to the
    /// same node.
    ///
    /// When `rect` leaves the tree bounds the old entry is dropped and the
    /// entity stays un-indexed.
    pub fn update(&mut self, value: u32, rect: Rect) -> QuadtreeResult<()> {
        let owner = match self.owner_map.get(&value) {
            Some(&owner) => owner,
            None => {
                debug!(value, "update of an entity that is not indexed");
                return Err(QuadtreeError::UnknownEntity { value });
            }
        };
        if let Err(err) = self.ensure_insertable(&rect) {
            self.remove(value)?;
            return Err(err);
        }
        // Rects on a quadrant seam fit more than one child, so the in-place
        // rewrite is only safe when a fresh descent would land on `owner`.
        if self.home_of(&rect) == owner {
            let node = &mut self.nodes[owner as usize];
            if let Some(position) = node.position_of(value) {
                node.entities[position].rect = rect;
                return Ok(());
            }
        }
        self.remove(value)?;
        self.insert_from_root(NodeEntity { value, rect });
        Ok(())
    }

    fn ensure_insertable(&self, rect: &Rect) -> QuadtreeResult<()> {
        if let Err(err) = validate_rect(rect) {
            warn!(?rect, "refusing to index an invalid rectangle");
            return Err(err);
        }
        if !self.bounds.contains_rect(rect) {
            warn!(?rect, bounds = ?self.bounds, "refusing to index a rectangle outside the world");
            return Err(QuadtreeError::RectOutOfBounds {
                rect: *rect,
                bounds: self.bounds,
            });
        }
        Ok(())
    }

    fn insert_from_root(&mut self, entity: NodeEntity) {
        let mut node_id = ROOT;
        loop {
            let node = &mut self.nodes[node_id as usize];
            node.subtree_count += 1;
            if node.is_leaf() {
                if node.entities.len() < self.node_capacity || node.depth >= self.max_depth {
                    node.entities.push(entity);
                    self.owner_map.insert(entity.value, node_id);
                    return;
                }
                self.split(node_id);
            }
            match self.child_containing(node_id, &entity.rect) {
                Some(child) => node_id = child,
                None => {
                    self.nodes[node_id as usize].entities.push(entity);
                    self.owner_map.insert(entity.value, node_id);
                    return;
                }
            }
        }
    }

    /// The single child quadrant of `node_id` that fully contains `rect`, if any.
    pub(crate) fn child_containing(&self, node_id: NodeId, rect: &Rect) -> Option<NodeId> {
        let node = &self.nodes[node_id as usize];
        if node.is_leaf() {
            return None;
        }
        (0..4)
            .map(|quadrant| node.child(quadrant))
            .find(|&child| self.nodes[child as usize].rect.contains_rect(rect))
    }

    /// Node a descent from the root by containment of `rect` stops at, without splitting.
    pub(crate) fn home_of(&self, rect: &Rect) -> NodeId {
        let mut node_id = ROOT;
        while let Some(child) = self.child_containing(node_id, rect) {
            node_id = child;
        }
        node_id
    }

    /// Nodes visited from the root down to `target` when descending by containment of `rect`.
    pub(crate) fn path_to(&self, target: NodeId, rect: &Rect) -> NodePath {
        let mut path = NodePath::new();
        let mut node_id = ROOT;
        path.push(node_id);
        while node_id != target {
            match self.child_containing(node_id, rect) {
                Some(child) => {
                    node_id = child;
                    path.push(node_id);
                }
                None => break,
            }
        }
        debug_assert_eq!(node_id, target, "descent did not reach the owning node");
        path
    }

    fn split(&mut self, node_id: NodeId) {
        let (rect, depth) = {
            let node = &self.nodes[node_id as usize];
            (node.rect, node.depth)
        };
        let first_child = self.alloc_children(rect, depth + 1);
        let node = &mut self.nodes[node_id as usize];
        node.set_children(first_child);
        let entities = std::mem::take(&mut node.entities);
        trace!(node_id, depth, entities = entities.len(), "splitting quadtree node");

        for entity in entities {
            match self.child_containing(node_id, &entity.rect) {
                Some(child) => {
                    let child_node = &mut self.nodes[child as usize];
                    child_node.entities.push(entity);
                    child_node.subtree_count += 1;
                    self.owner_map.insert(entity.value, child);
                }
                None => self.nodes[node_id as usize].entities.push(entity),
            }
        }
    }

    fn alloc_children(&mut self, parent_rect: Rect, depth: u32) -> NodeId {
        match self.free_blocks.pop() {
            Some(first_child) => {
                for quadrant in 0..4 {
                    self.nodes[first_child as usize + quadrant] =
                        Node::new_leaf(parent_rect.quadrant(quadrant), depth);
                }
                first_child
            }
            None => {
                let first_child = self.nodes.len() as NodeId;
                for quadrant in 0..4 {
                    self.nodes
                        .push(Node::new_leaf(parent_rect.quadrant(quadrant), depth));
                }
                first_child
            }
        }
    }

    /// Pulls every entity of the subtree below `node_id` into it and frees the children.
    fn collapse(&mut self, node_id: NodeId) {
        let first_child = self.nodes[node_id as usize].first_child();
        self.nodes[node_id as usize].clear_children();
        trace!(node_id, "merging quadtree subtree");

        let mut stack = NodeStack::new();
        stack.push(first_child);
        while let Some(block) = stack.pop() {
            for quadrant in 0..4 {
                let child_id = block + quadrant;
                let child = &mut self.nodes[child_id as usize];
                let entities = std::mem::take(&mut child.entities);
                if !child.is_leaf() {
                    stack.push(child.first_child());
                    child.clear_children();
                }
                for entity in entities {
                    self.owner_map.insert(entity.value, node_id);
                    self.nodes[node_id as usize].entities.push(entity);
                }
            }
            self.free_blocks.push(block);
        }
    }
}
