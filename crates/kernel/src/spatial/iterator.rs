use std::collections::HashSet;

use super::tree::BvhTree;

const DEFAULT_STACK_CAPACITY: usize = 64;

/// Depth-first traversal over a [`BvhTree`] with subtree pruning.
///
/// The caller drives the walk explicitly: inspect the current node with
/// [`current`](Self::current), optionally prune a child subtree with
/// [`block_left`](Self::block_left) / [`block_right`](Self::block_right),
/// then step with [`advance`](Self::advance). Blocked subtrees are never
/// visited. The left child is always visited before the right.
pub struct BvhIterator<'a> {
    tree: &'a BvhTree,
    stack: Vec<u32>,
    current: Option<u32>,
    blocked: HashSet<u32>,
}

impl<'a> BvhIterator<'a> {
    pub fn new(tree: &'a BvhTree) -> Self {
        Self::with_stack_capacity(tree, DEFAULT_STACK_CAPACITY)
    }

    pub fn with_stack_capacity(tree: &'a BvhTree, capacity: usize) -> Self {
        Self {
            tree,
            stack: Vec::with_capacity(capacity),
            current: if tree.is_empty() { None } else { Some(0) },
            blocked: HashSet::new(),
        }
    }

    /// Whether a current node remains.
    pub fn more(&self) -> bool {
        self.current.is_some()
    }

    /// Index of the current node. Guard with [`more`](Self::more).
    pub fn current_index(&self) -> u32 {
        self.current.expect("iterator exhausted; guard with more()")
    }

    pub fn current(&self) -> &super::tree::BvhNode {
        self.tree.node(self.current_index())
    }

    pub fn is_leaf(&self) -> bool {
        self.current().is_leaf()
    }

    /// Prune the left subtree of the current node. No-op on a leaf.
    pub fn block_left(&mut self) {
        let node = *self.current();
        if !node.is_leaf() {
            self.blocked.insert(node.left);
        }
    }

    /// Prune the right subtree of the current node. No-op on a leaf.
    pub fn block_right(&mut self) {
        let node = *self.current();
        if !node.is_leaf() {
            self.blocked.insert(node.right);
        }
    }

    /// Step to the next unblocked node in depth-first order.
    pub fn advance(&mut self) {
        let Some(index) = self.current else {
            return;
        };
        let node = *self.tree.node(index);
        if !node.is_leaf() {
            if !self.blocked.contains(&node.right) {
                self.stack.push(node.right);
            }
            if !self.blocked.contains(&node.left) {
                self.current = Some(node.left);
                return;
            }
        }
        // Leaf, or both children blocked: backtrack.
        loop {
            match self.stack.pop() {
                Some(next) if self.blocked.contains(&next) => continue,
                next => {
                    self.current = next;
                    return;
                }
            }
        }
    }
}
