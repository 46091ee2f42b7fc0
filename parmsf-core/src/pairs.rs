//! Generators of distinct unordered vertex pairs.
//!
//! [`UniquePairs`] samples uniformly without replacement from all
//! `V * (V - 1) / 2` unordered pairs. It flattens the ordered pair space
//! `V * (V - 1)` (self-pairs excluded), draws a rank among the values that
//! remain in a [`GapDistribution`], and removes both orientations of the
//! chosen pair so it can never recur.
//!
//! [`RejectionPairs`] offers the same contract with a seen-set and redraws.
//! It is simple and fast while the pair space is sparse, but its expected
//! cost grows without bound as the space fills up.

use std::collections::HashSet;

use rand::Rng;

use crate::{error::GraphError, gap::GapDistribution};

/// Returns the number of distinct unordered pairs over `vertices`.
///
/// # Errors
/// Returns [`GraphError::TooFewVertices`] when `vertices < 2` and
/// [`GraphError::PairSpaceOverflow`] when the ordered pair space does not fit
/// in a machine word.
pub fn pair_count(vertices: usize) -> Result<usize, GraphError> {
    Ok(ordered_domain(vertices)? / 2)
}

fn ordered_domain(vertices: usize) -> Result<usize, GraphError> {
    if vertices < 2 {
        return Err(GraphError::TooFewVertices { vertices });
    }
    vertices
        .checked_mul(vertices - 1)
        .ok_or(GraphError::PairSpaceOverflow { vertices })
}

fn validate_cap(vertices: usize, max_pairs: usize) -> Result<usize, GraphError> {
    let available = pair_count(vertices)?;
    if max_pairs > available {
        return Err(GraphError::TooManyEdges {
            requested: max_pairs,
            available,
        });
    }
    Ok(available)
}

/// Lazily yields distinct unordered pairs `(a, b)` with `a < b < vertices`.
///
/// The random source is injected so callers control seeding.
///
/// # Examples
/// ```
/// use parmsf_core::UniquePairs;
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let pairs: Vec<_> = UniquePairs::new(4, 0, SmallRng::seed_from_u64(7))
///     .expect("four vertices are valid")
///     .collect();
/// assert_eq!(pairs.len(), 6);
/// assert!(pairs.iter().all(|&(a, b)| a < b && b < 4));
/// ```
#[derive(Debug)]
pub struct UniquePairs<R> {
    vertices: usize,
    max_pairs: usize,
    gaps: GapDistribution,
    rng: R,
}

impl<R: Rng> UniquePairs<R> {
    /// Creates a generator over `vertices` vertices.
    ///
    /// `max_pairs == 0` draws until every pair has been produced.
    ///
    /// # Errors
    /// Returns [`GraphError::TooFewVertices`] when `vertices < 2`,
    /// [`GraphError::PairSpaceOverflow`] when `vertices * (vertices - 1)`
    /// overflows, and [`GraphError::TooManyEdges`] when `max_pairs` exceeds
    /// the number of distinct pairs.
    pub fn new(vertices: usize, max_pairs: usize, rng: R) -> Result<Self, GraphError> {
        validate_cap(vertices, max_pairs)?;
        let domain = ordered_domain(vertices)?;
        Ok(Self {
            vertices,
            max_pairs,
            gaps: GapDistribution::new(domain),
            rng,
        })
    }

    /// Returns the number of pairs produced so far.
    #[must_use]
    pub fn produced(&self) -> usize {
        self.gaps.count() / 2
    }

    fn target(&self) -> usize {
        if self.max_pairs == 0 {
            self.gaps.len() / 2
        } else {
            self.max_pairs
        }
    }

    fn decode(&self, index: usize) -> (usize, usize) {
        let stride = self.vertices - 1;
        let first = index / stride;
        let mut second = index % stride;
        if first <= second {
            second += 1;
        }
        if first < second {
            (first, second)
        } else {
            (second, first)
        }
    }
}

impl<R: Rng> Iterator for UniquePairs<R> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.produced() >= self.target() || self.gaps.remaining() == 0 {
            return None;
        }

        let rank = self.rng.gen_range(0..self.gaps.remaining());
        let (first, second) = self.decode(self.gaps.project(rank));

        // The self-pair skip shifted `second` up by one in the forward
        // orientation; undo it when computing that orientation's index.
        let stride = self.vertices - 1;
        let forward = self.gaps.remove(first * stride + second - 1);
        let backward = self.gaps.remove(second * stride + first);
        debug_assert!(forward && backward, "pair ({first}, {second}) drawn twice");

        Some((first, second))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.target().saturating_sub(self.produced());
        (left, Some(left))
    }
}

impl<R: Rng> ExactSizeIterator for UniquePairs<R> {}

/// Seen-set variant of [`UniquePairs`] that redraws colliding pairs.
#[derive(Debug)]
pub struct RejectionPairs<R> {
    vertices: usize,
    target: usize,
    seen: HashSet<(usize, usize)>,
    rng: R,
}

impl<R: Rng> RejectionPairs<R> {
    /// Creates a generator over `vertices` vertices.
    ///
    /// `max_pairs == 0` draws until every pair has been produced.
    ///
    /// # Errors
    /// Same as [`UniquePairs::new`].
    pub fn new(vertices: usize, max_pairs: usize, rng: R) -> Result<Self, GraphError> {
        let available = validate_cap(vertices, max_pairs)?;
        let target = if max_pairs == 0 { available } else { max_pairs };
        Ok(Self {
            vertices,
            target,
            seen: HashSet::with_capacity(target),
            rng,
        })
    }
}

impl<R: Rng> Iterator for RejectionPairs<R> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.seen.len() >= self.target {
            return None;
        }
        loop {
            let first = self.rng.gen_range(0..self.vertices);
            let second = self.rng.gen_range(0..self.vertices);
            if first == second {
                continue;
            }
            let pair = (first.min(second), first.max(second));
            if self.seen.insert(pair) {
                return Some(pair);
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.target - self.seen.len();
        (left, Some(left))
    }
}

impl<R: Rng> ExactSizeIterator for RejectionPairs<R> {}
