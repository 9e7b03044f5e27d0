use super::types::{NodeStack, ROOT};
use super::*;

impl QuadTree {
    /// Appends every entity whose bounds intersect `rect`. Only subtrees whose
    /// rectangle intersects `rect` are visited. Degenerate query rectangles
    /// match nothing.
    pub fn query_rect(&self, rect: &Rect, out: &mut Vec<u32>) {
        if rect.is_degenerate() {
            return;
        }
        let mut stack = NodeStack::new();
        if self.nodes[ROOT as usize].rect.intersects(rect) {
            stack.push(ROOT);
        }
        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id as usize];
            out.extend(
                node.entities
                    .iter()
                    .filter(|entity| entity.rect.intersects(rect))
                    .map(|entity| entity.value),
            );
            if node.is_leaf() {
                continue;
            }
            for quadrant in 0..4 {
                let child = node.child(quadrant);
                let child_node = &self.nodes[child as usize];
                if child_node.subtree_count > 0 && child_node.rect.intersects(rect) {
                    stack.push(child);
                }
            }
        }
    }

    /// Appends every entity whose bounds contain the point (edges inclusive).
    pub fn query_point(&self, x: f32, y: f32, out: &mut Vec<u32>) {
        let mut stack = NodeStack::new();
        if self.nodes[ROOT as usize].rect.contains_point(x, y) {
            stack.push(ROOT);
        }
        while let Some(node_id) = stack.pop() {
            let node = &self.nodes[node_id as usize];
            out.extend(
                node.entities
                    .iter()
                    .filter(|entity| entity.rect.contains_point(x, y))
                    .map(|entity| entity.value),
            );
            if node.is_leaf() {
                continue;
            }
            for quadrant in 0..4 {
                let child = node.child(quadrant);
                let child_node = &self.nodes[child as usize];
                if child_node.subtree_count > 0 && child_node.rect.contains_point(x, y) {
                    stack.push(child);
                }
            }
        }
    }
}
