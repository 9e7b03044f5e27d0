use super::types::{NodeEntity, NodeId, ROOT};
use super::*;

impl QuadTree {
    /// Appends every unordered pair of indexed entities whose bounds intersect,
    /// as `(smaller id, larger id)`, sorted.
    ///
    /// An entity can only overlap entities stored in its own node, in an
    /// ancestor, or in a descendant, so each node is tested against itself and
    /// against the entities of its ancestors on the way down.
    pub fn query_all_pairs(&self, pairs: &mut Vec<(u32, u32)>) {
        let start = pairs.len();
        let mut ancestors: Vec<NodeEntity> = Vec::new();
        self.collect_pairs(ROOT, &mut ancestors, pairs);
        pairs[start..].sort_unstable();
    }

    fn collect_pairs(
        &self,
        node_id: NodeId,
        ancestors: &mut Vec<NodeEntity>,
        pairs: &mut Vec<(u32, u32)>,
    ) {
        let node = &self.nodes[node_id as usize];
        if node.subtree_count == 0 {
            return;
        }
        for (i, a) in node.entities.iter().enumerate() {
            for b in node.entities[i + 1..].iter().chain(ancestors.iter()) {
                if a.rect.intersects(&b.rect) {
                    pairs.push(ordered_pair(a.value, b.value));
                }
            }
        }
        if node.is_leaf() {
            return;
        }
        let depth_mark = ancestors.len();
        ancestors.extend(node.entities.iter().copied());
        for quadrant in 0..4 {
            self.collect_pairs(node.child(quadrant), ancestors, pairs);
        }
        ancestors.truncate(depth_mark);
    }
}

#[inline(always)]
fn ordered_pair(a: u32, b: u32) -> (u32, u32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
