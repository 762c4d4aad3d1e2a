use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::BoundingBox;

/// Sentinel marking a node as a leaf: a leaf stores no child indices.
pub const LEAF: u32 = u32::MAX;

/// One node of a flat bounding-volume hierarchy.
///
/// Internal nodes carry child indices into the tree's node array; leaf
/// nodes carry a `begin..end` range into the primitive index array and
/// have `left == LEAF`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BvhNode {
    pub bbox: BoundingBox,
    pub left: u32,
    pub right: u32,
    pub begin: u32,
    pub end: u32,
}

impl BvhNode {
    pub fn leaf(bbox: BoundingBox, begin: u32, end: u32) -> Self {
        Self {
            bbox,
            left: LEAF,
            right: LEAF,
            begin,
            end,
        }
    }

    pub fn internal(bbox: BoundingBox, left: u32, right: u32) -> Self {
        Self {
            bbox,
            left,
            right,
            begin: 0,
            end: 0,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left == LEAF
    }
}

/// A flat, pointer-free BVH over a set of primitives addressed by index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BvhTree {
    nodes: Vec<BvhNode>,
    prims: Vec<u32>,
}

impl BvhTree {
    /// Build by recursive median split on the longest axis of the
    /// centroid bounds. `boxes[i]` is the AABB of primitive `i`.
    pub fn build_median(boxes: &[BoundingBox], leaf_size: usize) -> Self {
        assert!(leaf_size >= 1, "leaf size must be at least 1");
        let mut tree = Self {
            nodes: Vec::new(),
            prims: (0..boxes.len() as u32).collect(),
        };
        if boxes.is_empty() {
            return tree;
        }
        let count = boxes.len();
        tree.build_range(boxes, 0, count, leaf_size);
        debug!(
            primitives = boxes.len(),
            nodes = tree.nodes.len(),
            "built bvh"
        );
        tree
    }

    fn range_bbox(&self, boxes: &[BoundingBox], begin: usize, end: usize) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for &prim in &self.prims[begin..end] {
            bbox = bbox.union(&boxes[prim as usize]);
        }
        bbox
    }

    /// Build the subtree over `prims[begin..end]`, returning its node
    /// index.
    fn build_range(
        &mut self,
        boxes: &[BoundingBox],
        begin: usize,
        end: usize,
        leaf_size: usize,
    ) -> u32 {
        let bbox = self.range_bbox(boxes, begin, end);
        let index = self.nodes.len() as u32;
        if end - begin <= leaf_size {
            self.nodes.push(BvhNode::leaf(bbox, begin as u32, end as u32));
            return index;
        }

        let axis = bbox.longest_axis();
        self.prims[begin..end].sort_by(|&a, &b| {
            let ca = boxes[a as usize].center();
            let cb = boxes[b as usize].center();
            let (ka, kb) = match axis {
                0 => (ca.x, cb.x),
                1 => (ca.y, cb.y),
                _ => (ca.z, cb.z),
            };
            ka.partial_cmp(&kb).unwrap_or(std::cmp::Ordering::Equal)
        });
        let mid = begin + (end - begin) / 2;

        // Reserve the slot, then fill it once the children exist.
        self.nodes.push(BvhNode::leaf(bbox, 0, 0));
        let left = self.build_range(boxes, begin, mid, leaf_size);
        let right = self.build_range(boxes, mid, end, leaf_size);
        self.nodes[index as usize] = BvhNode::internal(bbox, left, right);
        index
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, index: u32) -> &BvhNode {
        &self.nodes[index as usize]
    }

    /// Primitive indices stored in a leaf.
    pub fn leaf_prims(&self, node: &BvhNode) -> &[u32] {
        &self.prims[node.begin as usize..node.end as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point3d;

    fn unit_box_at(x: f64) -> BoundingBox {
        BoundingBox::new(Point3d::new(x, 0.0, 0.0), Point3d::new(x + 1.0, 1.0, 1.0))
    }

    #[test]
    fn test_empty_tree() {
        let tree = BvhTree::build_median(&[], 4);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_single_primitive_is_root_leaf() {
        let tree = BvhTree::build_median(&[unit_box_at(0.0)], 4);
        assert_eq!(tree.node_count(), 1);
        let root = tree.node(0);
        assert!(root.is_leaf());
        assert_eq!(tree.leaf_prims(root), &[0]);
    }

    #[test]
    fn test_split_covers_all_primitives() {
        let boxes: Vec<_> = (0..9).map(|i| unit_box_at(2.0 * i as f64)).collect();
        let tree = BvhTree::build_median(&boxes, 2);
        let mut seen = vec![false; boxes.len()];
        for i in 0..tree.node_count() {
            let node = tree.node(i as u32);
            if node.is_leaf() {
                assert!(tree.leaf_prims(node).len() <= 2);
                for &prim in tree.leaf_prims(node) {
                    assert!(!seen[prim as usize], "primitive listed twice");
                    seen[prim as usize] = true;
                }
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_child_boxes_nest_in_parent() {
        let boxes: Vec<_> = (0..16).map(|i| unit_box_at(1.5 * i as f64)).collect();
        let tree = BvhTree::build_median(&boxes, 3);
        for i in 0..tree.node_count() {
            let node = tree.node(i as u32);
            if !node.is_leaf() {
                for child in [node.left, node.right] {
                    let c = tree.node(child).bbox;
                    assert!(node.bbox.contains_point(&c.min));
                    assert!(node.bbox.contains_point(&c.max));
                }
            }
        }
    }

    #[test]
    #[should_panic(expected = "leaf size must be at least 1")]
    fn test_zero_leaf_size_panics() {
        let _ = BvhTree::build_median(&[unit_box_at(0.0)], 0);
    }
}
