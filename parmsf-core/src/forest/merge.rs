//! Folding one partial forest into another.

use super::PartialForest;
use crate::error::ForestError;

impl PartialForest {
    /// Merges `other` into `self`.
    ///
    /// Parents already committed in `self` are never changed. Where both
    /// forests hold a vertex under different parents, the part of `other`'s
    /// ancestor chain above that vertex that `self` does not know yet is
    /// attached to `self` in reverse, hanging each newly added ancestor from
    /// the vertex below it. Every remaining vertex of `other` is then copied
    /// with its original parent; those vertices form subtrees that are
    /// disjoint from everything `self` holds.
    ///
    /// The result is acyclic and commits the union of both vertex sets.
    ///
    /// # Errors
    /// Returns [`ForestError::CapacityMismatch`] when the capacities differ.
    ///
    /// # Examples
    /// ```
    /// use parmsf_core::PartialForest;
    ///
    /// let mut left = PartialForest::new(3);
    /// left.add(0, 0)?.add(1, 0)?;
    /// let mut right = PartialForest::new(3);
    /// right.add(2, 2)?.add(1, 2)?;
    ///
    /// left.merge(&right)?;
    /// assert_eq!(left.parent_id(2)?, 1);
    /// assert!(left.is_complete());
    /// # Ok::<(), parmsf_core::ForestError>(())
    /// ```
    pub fn merge(&mut self, other: &Self) -> Result<&mut Self, ForestError> {
        if self.capacity() != other.capacity() {
            return Err(ForestError::CapacityMismatch {
                left: self.capacity(),
                right: other.capacity(),
            });
        }

        for vertex in other.vertices() {
            if self.contains(vertex) && self.parent_id(vertex)? != other.recorded_parent(vertex)? {
                self.adopt_ancestors(other, vertex)?;
            }
        }

        for vertex in other.vertices() {
            if !self.contains(vertex) {
                self.add(vertex, other.recorded_parent(vertex)?)?;
            }
        }

        Ok(self)
    }

    /// Walks `other`'s chain upward from `start`, adding every ancestor that
    /// `self` lacks as a child of the vertex it was reached from.
    fn adopt_ancestors(&mut self, other: &Self, start: usize) -> Result<(), ForestError> {
        let mut current = start;
        loop {
            let next = other.recorded_parent(current)?;
            if self.contains(next) {
                return Ok(());
            }
            self.add(next, current)?;
            if other.recorded_parent(next)? == next {
                return Ok(());
            }
            current = next;
        }
    }
}
