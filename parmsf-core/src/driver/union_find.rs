//! Union-find (disjoint set union) used by the stitching pass.
//!
//! Kruskal's completion step processes edges in ascending order and keeps an
//! edge only when it joins two different components. This module tracks
//! component membership for that check.

use crate::{Result, error::MsfError};

#[derive(Clone, Debug)]
pub(crate) struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

const fn unknown_node(node: usize) -> MsfError {
    MsfError::InvariantViolation {
        invariant: "union-find node must be within the node table",
        vertex: node,
    }
}

impl DisjointSet {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn parent_of(&self, node: usize) -> Result<usize> {
        self.parent.get(node).copied().ok_or(unknown_node(node))
    }

    fn rank_of(&self, node: usize) -> Result<u8> {
        self.rank.get(node).copied().ok_or(unknown_node(node))
    }

    fn set_parent(&mut self, node: usize, parent: usize) -> Result<()> {
        let slot = self.parent.get_mut(node).ok_or(unknown_node(node))?;
        *slot = parent;
        Ok(())
    }

    pub(crate) fn find(&mut self, node: usize) -> Result<usize> {
        let mut root = node;
        loop {
            let parent = self.parent_of(root)?;
            if parent == root {
                break;
            }
            root = parent;
        }

        let mut current = node;
        while current != root {
            let next = self.parent_of(current)?;
            self.set_parent(current, root)?;
            current = next;
        }

        Ok(root)
    }

    /// Joins the sets holding `left` and `right`. Returns `false` when they
    /// were already joined.
    pub(crate) fn union(&mut self, left: usize, right: usize) -> Result<bool> {
        let left_root = self.find(left)?;
        let right_root = self.find(right)?;
        if left_root == right_root {
            return Ok(false);
        }
        let left_rank = self.rank_of(left_root)?;
        let right_rank = self.rank_of(right_root)?;
        let (parent, child) = if left_rank < right_rank {
            (right_root, left_root)
        } else {
            (left_root, right_root)
        };
        self.set_parent(child, parent)?;
        if left_rank == right_rank {
            let rank = self.rank.get_mut(parent).ok_or(unknown_node(parent))?;
            *rank = rank.saturating_add(1);
        }
        Ok(true)
    }
}
