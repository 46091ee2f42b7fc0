//! Prim's algorithm under a step budget.
//!
//! A [`BoundedPrim`] grows trees into a caller-owned [`PartialForest`],
//! starting each new tree at the first free vertex at or after an offset, or
//! at a random free vertex past the offset when given a root generator.
//! The budget caps how many vertices a single run may commit, so several
//! runners can each claim a slice of the vertex range and later have their
//! forests merged.

use std::{cmp::Reverse, collections::BinaryHeap};

use rand::rngs::SmallRng;
use tracing::instrument;

use crate::{
    GraphStore, PartialForest, Result,
    error::{ForestError, GraphError},
};

/// Frontier entry. Field order gives the heap ordering: weight, then the
/// edge's smaller and larger endpoint, so equal weights break ties the same
/// way on every run.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
struct Candidate {
    weight: usize,
    low: usize,
    high: usize,
    vertex: usize,
}

impl Candidate {
    const fn root(vertex: usize) -> Self {
        Self {
            weight: 0,
            low: vertex,
            high: vertex,
            vertex,
        }
    }

    fn key(&self) -> (usize, usize, usize) {
        (self.weight, self.low, self.high)
    }
}

/// Bounded Prim runner over a shared graph.
///
/// The runner owns its frontier heap and best-key array; only the graph is
/// shared, so runners on different threads never contend. Both buffers are
/// reset at the start of every run and reused across runs.
///
/// # Examples
/// ```
/// use parmsf_core::{BoundedPrim, GraphStore, PartialForest};
///
/// let graph = GraphStore::from_edges(3, [(0, 1, 2), (1, 2, 1), (0, 2, 5)], true)?;
/// let mut forest = PartialForest::new(3);
/// let committed = BoundedPrim::new(&graph)?.run(&mut forest, usize::MAX, 0)?;
/// assert_eq!(committed, 3);
/// assert_eq!(forest.parent_id(2)?, 1);
/// # Ok::<(), parmsf_core::MsfError>(())
/// ```
#[derive(Debug)]
pub struct BoundedPrim<'graph> {
    graph: &'graph GraphStore,
    best: Vec<(usize, usize, usize)>,
    frontier: BinaryHeap<Reverse<Candidate>>,
    root_rng: Option<SmallRng>,
}

impl<'graph> BoundedPrim<'graph> {
    /// Creates a runner over `graph`.
    ///
    /// # Errors
    /// Returns [`GraphError::AdjacencyNotBuilt`] when the graph lacks its
    /// adjacency index.
    pub fn new(graph: &'graph GraphStore) -> Result<Self> {
        if !graph.has_adjacency() {
            return Err(GraphError::AdjacencyNotBuilt.into());
        }
        Ok(Self {
            graph,
            best: vec![(usize::MAX, usize::MAX, usize::MAX); graph.vertex_count()],
            frontier: BinaryHeap::new(),
            root_rng: None,
        })
    }

    /// Starts every new tree at a free vertex drawn from `rng` instead of
    /// the next free one.
    ///
    /// Roots are drawn from `[offset, vertex_count)` on each
    /// [`BoundedPrim::run`]; the forest weight is unaffected.
    #[must_use]
    pub fn with_random_roots(mut self, rng: SmallRng) -> Self {
        self.root_rng = Some(rng);
        self
    }

    /// Commits at most `steps` vertices to `forest`, starting trees only at
    /// free vertices `>= offset`, and returns how many were committed.
    ///
    /// Neighbours below `offset` may still join a tree that reaches them.
    ///
    /// # Errors
    /// Returns [`ForestError::CapacityMismatch`] when the forest and graph
    /// sizes differ, and propagates forest or graph failures.
    #[instrument(level = "debug", skip(self, forest))]
    pub fn run(&mut self, forest: &mut PartialForest, steps: usize, offset: usize) -> Result<usize> {
        if forest.capacity() != self.graph.vertex_count() {
            return Err(ForestError::CapacityMismatch {
                left: forest.capacity(),
                right: self.graph.vertex_count(),
            }
            .into());
        }

        self.frontier.clear();
        self.best.fill((usize::MAX, usize::MAX, usize::MAX));
        let mut committed = 0;
        let mut cursor = offset;
        while committed < steps && !forest.is_complete() {
            let next_root = match self.root_rng.as_mut() {
                Some(rng) => forest.random_free_vertex(offset, rng),
                None => forest.next_free_vertex(cursor),
            };
            let Some(root) = next_root else {
                break;
            };
            cursor = root;
            forest.stage(root, root)?;
            self.frontier.push(Reverse(Candidate::root(root)));
            committed += self.grow(forest, steps - committed)?;
        }
        Ok(committed)
    }

    /// Expands the current tree until the frontier empties or the budget is
    /// spent.
    fn grow(&mut self, forest: &mut PartialForest, budget: usize) -> Result<usize> {
        let mut committed = 0;
        while committed < budget {
            let Some(Reverse(candidate)) = self.frontier.pop() else {
                break;
            };
            if forest.contains(candidate.vertex) {
                continue;
            }
            let from = candidate.vertex;
            forest.commit(from)?;
            committed += 1;

            for edge in self.graph.neighbors(from)? {
                let to = edge.second();
                let next = Candidate {
                    weight: edge.weight(),
                    low: from.min(to),
                    high: from.max(to),
                    vertex: to,
                };
                if forest.contains(to) {
                    continue;
                }
                let best = self.best.get_mut(to).ok_or(GraphError::VertexOutOfRange {
                    vertex: to,
                    vertex_count: self.graph.vertex_count(),
                })?;
                if next.key() < *best {
                    *best = next.key();
                    self.frontier.push(Reverse(next));
                    forest.stage(to, from)?;
                }
            }
        }
        Ok(committed)
    }
}
