//! Shared helpers for merge property tests.

use crate::PartialForest;

/// Follows parent pointers from `vertex` and returns its root, or `None`
/// when the chain leaves the forest or does not reach a root within
/// `capacity` steps.
pub(super) fn root_of(forest: &PartialForest, vertex: usize) -> Option<usize> {
    let mut current = vertex;
    for _ in 0..=forest.capacity() {
        let parent = forest.parent_id(current).ok()?;
        if parent == current {
            return Some(current);
        }
        current = parent;
    }
    None
}
