use std::collections::{btree_set, hash_map, BTreeSet};

use crate::graph::Aag;
use crate::types::FaceIndex;

/// Explicit walk over the nodes of an [`Aag`].
///
/// Mirrors the traversal protocol used elsewhere in the stack: check
/// [`more`](Self::more), read the current node, then [`advance`](Self::advance).
/// Iteration order is unspecified but every node in scope is visited
/// exactly once.
pub struct AdjacencyCursor<'a> {
    iter: hash_map::Iter<'a, FaceIndex, BTreeSet<FaceIndex>>,
    current: Option<(&'a FaceIndex, &'a BTreeSet<FaceIndex>)>,
}

impl<'a> AdjacencyCursor<'a> {
    pub fn new(graph: &'a Aag) -> Self {
        let mut iter = graph.adjacency().iter();
        let current = iter.next();
        Self { iter, current }
    }

    pub fn more(&self) -> bool {
        self.current.is_some()
    }

    pub fn advance(&mut self) {
        self.current = self.iter.next();
    }

    /// Face at the cursor. Guard with [`more`](Self::more).
    pub fn face_id(&self) -> FaceIndex {
        *self.current.expect("cursor exhausted; guard with more()").0
    }

    pub fn neighbors(&self) -> &'a BTreeSet<FaceIndex> {
        self.current.expect("cursor exhausted; guard with more()").1
    }

    pub fn neighbor_iter(&self) -> btree_set::Iter<'a, FaceIndex> {
        self.neighbors().iter()
    }
}
