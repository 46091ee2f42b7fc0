//! Parent-pointer spanning forests under construction.
//!
//! A [`PartialForest`] records, for every vertex of a fixed-capacity graph,
//! whether it has joined the forest and which vertex it hangs from. Vertices
//! move from free to staged (a tentative parent that may still be replaced)
//! to committed (the parent is final). A committed vertex whose parent is
//! itself is the root of its tree.

mod merge;

use std::fmt;

use fixedbitset::FixedBitSet;
use rand::Rng;

use crate::error::ForestError;

const BLOCK_BITS: usize = usize::BITS as usize;

/// An in-progress spanning forest over `capacity` vertices.
///
/// # Examples
/// ```
/// use parmsf_core::PartialForest;
///
/// let mut forest = PartialForest::new(3);
/// forest.add(0, 0)?;
/// forest.stage(1, 0)?;
/// forest.stage(1, 2)?;
/// forest.commit(1)?;
/// assert_eq!(forest.parent_id(1)?, 2);
/// assert!(forest.is_root(0)?);
/// assert!(!forest.contains(2));
/// # Ok::<(), parmsf_core::ForestError>(())
/// ```
#[derive(Clone, Debug)]
pub struct PartialForest {
    parents: Vec<usize>,
    committed: FixedBitSet,
    staged: FixedBitSet,
    committed_count: usize,
}

impl PartialForest {
    /// Creates an empty forest able to hold `capacity` vertices.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            parents: (0..capacity).collect(),
            committed: FixedBitSet::with_capacity(capacity),
            staged: FixedBitSet::with_capacity(capacity),
            committed_count: 0,
        }
    }

    /// Returns the number of vertices this forest can hold.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.parents.len()
    }

    /// Returns the number of committed vertices.
    #[must_use]
    #[rustfmt::skip]
    pub fn committed_count(&self) -> usize { self.committed_count }

    /// Returns `true` once every vertex is committed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.committed_count == self.capacity()
    }

    /// Returns `true` when `vertex` is committed. Out-of-range vertices are
    /// never contained.
    #[must_use]
    pub fn contains(&self, vertex: usize) -> bool {
        self.committed.contains(vertex)
    }

    /// Returns `true` when `vertex` has a tentative parent that is not yet
    /// committed.
    #[must_use]
    pub fn is_staged(&self, vertex: usize) -> bool {
        self.staged.contains(vertex)
    }

    /// Returns the first vertex `>= from` that is not committed.
    ///
    /// Scans the committed set a word at a time.
    #[must_use]
    pub fn next_free_vertex(&self, from: usize) -> Option<usize> {
        let mut mask = usize::MAX << (from % BLOCK_BITS);
        for (block, &bits) in self
            .committed
            .as_slice()
            .iter()
            .enumerate()
            .skip(from / BLOCK_BITS)
        {
            let free = !bits & mask;
            if free != 0 {
                let vertex = block * BLOCK_BITS + free.trailing_zeros() as usize;
                // Padding bits past the capacity read as free.
                return (vertex < self.capacity()).then_some(vertex);
            }
            mask = usize::MAX;
        }
        None
    }

    /// Returns a uniformly drawn free vertex `>= min`.
    ///
    /// Draws up to `capacity() - min` candidates from `rng` and falls back to
    /// [`PartialForest::next_free_vertex`] when every draw hits a committed
    /// vertex. Returns `None` only when no vertex `>= min` is free.
    pub fn random_free_vertex<R>(&self, min: usize, rng: &mut R) -> Option<usize>
    where
        R: Rng + ?Sized,
    {
        let fallback = self.next_free_vertex(min)?;
        let range = min..self.capacity();
        (0..range.len())
            .map(|_| rng.gen_range(range.clone()))
            .find(|&vertex| !self.committed.contains(vertex))
            .or(Some(fallback))
    }

    /// Records `parent` as the tentative parent of `vertex`.
    ///
    /// A staged vertex may be restaged any number of times until it is
    /// committed.
    ///
    /// # Errors
    /// Returns [`ForestError::VertexOutOfRange`] when either vertex exceeds
    /// the capacity and [`ForestError::AlreadyCommitted`] when `vertex` is
    /// already committed.
    pub fn stage(&mut self, vertex: usize, parent: usize) -> Result<(), ForestError> {
        self.check_range(vertex)?;
        self.check_range(parent)?;
        if self.committed.contains(vertex) {
            return Err(ForestError::AlreadyCommitted { vertex });
        }
        let capacity = self.capacity();
        let slot = self
            .parents
            .get_mut(vertex)
            .ok_or(ForestError::VertexOutOfRange { vertex, capacity })?;
        *slot = parent;
        self.staged.insert(vertex);
        Ok(())
    }

    /// Makes the staged parent of `vertex` final.
    ///
    /// # Errors
    /// Returns [`ForestError::VertexOutOfRange`],
    /// [`ForestError::AlreadyCommitted`], or [`ForestError::NotStaged`] when
    /// `vertex` was never staged.
    pub fn commit(&mut self, vertex: usize) -> Result<(), ForestError> {
        self.check_range(vertex)?;
        if self.committed.contains(vertex) {
            return Err(ForestError::AlreadyCommitted { vertex });
        }
        if !self.staged.contains(vertex) {
            return Err(ForestError::NotStaged { vertex });
        }
        self.staged.set(vertex, false);
        self.committed.insert(vertex);
        self.committed_count += 1;
        Ok(())
    }

    /// Stages and commits `vertex` under `parent` in one step.
    ///
    /// # Errors
    /// Same as [`PartialForest::stage`].
    pub fn add(&mut self, vertex: usize, parent: usize) -> Result<&mut Self, ForestError> {
        self.stage(vertex, parent)?;
        self.commit(vertex)?;
        Ok(self)
    }

    /// Returns the committed parent of `vertex`.
    ///
    /// # Errors
    /// Returns [`ForestError::VertexOutOfRange`] or
    /// [`ForestError::NotCommitted`].
    pub fn parent_id(&self, vertex: usize) -> Result<usize, ForestError> {
        let parent = self.recorded_parent(vertex)?;
        if !self.committed.contains(vertex) {
            return Err(ForestError::NotCommitted { vertex });
        }
        Ok(parent)
    }

    /// Returns `true` when the committed `vertex` is its own parent.
    ///
    /// # Errors
    /// Same as [`PartialForest::parent_id`].
    pub fn is_root(&self, vertex: usize) -> Result<bool, ForestError> {
        Ok(self.parent_id(vertex)? == vertex)
    }

    /// Iterates the committed vertices in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = usize> + '_ {
        self.committed.ones()
    }

    /// Iterates the committed roots in ascending order.
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges_with_roots()
            .filter_map(|(vertex, parent)| (vertex == parent).then_some(vertex))
    }

    /// Iterates `(child, parent)` pairs of every committed non-root vertex.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges_with_roots()
            .filter(|&(vertex, parent)| vertex != parent)
    }

    /// `(vertex, parent)` for every committed vertex, roots included.
    fn edges_with_roots(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.vertices()
            .filter_map(|vertex| self.parents.get(vertex).map(|&parent| (vertex, parent)))
    }

    /// Last parent recorded for `vertex`, staged or committed.
    fn recorded_parent(&self, vertex: usize) -> Result<usize, ForestError> {
        self.parents
            .get(vertex)
            .copied()
            .ok_or(ForestError::VertexOutOfRange {
                vertex,
                capacity: self.capacity(),
            })
    }

    fn check_range(&self, vertex: usize) -> Result<(), ForestError> {
        if vertex < self.capacity() {
            Ok(())
        } else {
            Err(ForestError::VertexOutOfRange {
                vertex,
                capacity: self.capacity(),
            })
        }
    }
}

/// Forests are equal when they hold the same committed vertices under the
/// same parents. Staged parents are ignored.
impl PartialEq for PartialForest {
    fn eq(&self, other: &Self) -> bool {
        self.capacity() == other.capacity()
            && self.committed == other.committed
            && self
                .vertices()
                .all(|vertex| self.parents.get(vertex) == other.parents.get(vertex))
    }
}

impl Eq for PartialForest {}

/// One line per vertex: the vertex, a tab, then its parent or `-` when it is
/// not committed. Roots carry a trailing `(root)` marker.
impl fmt::Display for PartialForest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (vertex, &parent) in self.parents.iter().enumerate() {
            if !self.committed.contains(vertex) {
                writeln!(f, "{vertex}\t-")?;
            } else if parent == vertex {
                writeln!(f, "{vertex}\t{parent}\t(root)")?;
            } else {
                writeln!(f, "{vertex}\t{parent}")?;
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod property;
