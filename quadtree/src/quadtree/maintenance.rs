use super::types::{NodeStack, ROOT};
use super::*;
use crate::error::{QuadtreeError, QuadtreeResult};

impl QuadTree {
    pub fn len(&self) -> usize {
        self.owner_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owner_map.is_empty()
    }

    pub fn contains(&self, value: u32) -> bool {
        self.owner_map.contains_key(&value)
    }

    /// The rectangle `value` is currently indexed under.
    pub fn bounds_of(&self, value: u32) -> Option<Rect> {
        let owner = *self.owner_map.get(&value)?;
        let node = &self.nodes[owner as usize];
        node.position_of(value).map(|position| node.entities[position].rect)
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free_blocks.len() * 4
    }

    /// Depth of the deepest live node; a tree that never split has depth 0.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        self.visit_nodes(|node_id| {
            deepest = deepest.max(self.nodes[node_id as usize].depth);
        });
        deepest as usize
    }

    pub fn all_node_bounding_boxes(&self, bounding_boxes: &mut Vec<Rect>) {
        self.visit_nodes(|node_id| bounding_boxes.push(self.nodes[node_id as usize].rect));
    }

    /// Walks the whole tree and checks that every entity sits in the smallest
    /// node containing it, that the owner map agrees, and that subtree counts
    /// add up.
    pub fn validate(&self) -> QuadtreeResult<()> {
        let mut seen = 0usize;
        let mut result = Ok(());
        self.visit_nodes(|node_id| {
            if result.is_err() {
                return;
            }
            let node = &self.nodes[node_id as usize];
            let mut expected_count = node.entities.len() as u32;
            if !node.is_leaf() {
                expected_count += (0..4)
                    .map(|quadrant| self.nodes[node.child(quadrant) as usize].subtree_count)
                    .sum::<u32>();
            }
            for entity in &node.entities {
                seen += 1;
                let violation = if self.owner_map.get(&entity.value) != Some(&node_id) {
                    Some("owner map disagrees with node contents")
                } else if !node.rect.contains_rect(&entity.rect) {
                    Some("entity not contained by its node")
                } else if self.child_containing(node_id, &entity.rect).is_some() {
                    Some("entity could be pushed into a child")
                } else if self.home_of(&entity.rect) != node_id {
                    Some("entity not reachable by descent from the root")
                } else if node.is_leaf()
                    && node.entities.len() > self.node_capacity
                    && node.depth < self.max_depth
                {
                    Some("leaf above capacity below max depth")
                } else {
                    None
                };
                if let Some(reason) = violation {
                    result = Err(QuadtreeError::InvariantViolation {
                        node: node_id,
                        value: entity.value,
                        reason,
                    });
                    return;
                }
            }
            if node.subtree_count != expected_count {
                result = Err(QuadtreeError::InvariantViolation {
                    node: node_id,
                    value: u32::MAX,
                    reason: "subtree count mismatch",
                });
            }
        });
        result?;
        if seen != self.owner_map.len() {
            return Err(QuadtreeError::InvariantViolation {
                node: ROOT,
                value: u32::MAX,
                reason: "entity stored more than once or owner map has stale ids",
            });
        }
        Ok(())
    }

    fn visit_nodes<F>(&self, mut f: F)
    where
        F: FnMut(u32),
    {
        let mut stack = NodeStack::new();
        stack.push(ROOT);
        while let Some(node_id) = stack.pop() {
            f(node_id);
            let node = &self.nodes[node_id as usize];
            if !node.is_leaf() {
                for quadrant in 0..4 {
                    stack.push(node.child(quadrant));
                }
            }
        }
    }
}
