//! Random graph generation.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{info, instrument};

use super::GraphStore;
use crate::{
    error::GraphError,
    pairs::{UniquePairs, pair_count},
};

/// How many edges a generated graph receives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgeBudget {
    /// Exactly this many distinct edges.
    Count(usize),
    /// This fraction of all `V * (V - 1) / 2` possible edges, rounded down.
    Probability(f64),
}

/// Configures random Erdős–Rényi graphs.
///
/// Edges are drawn uniformly without replacement and weighted uniformly in
/// `[0, E)`.
///
/// # Examples
/// ```
/// use parmsf_core::{EdgeBudget, GraphBuilder};
///
/// let graph = GraphBuilder::new(50, EdgeBudget::Probability(0.2))
///     .with_seed(42)
///     .with_adjacency(true)
///     .build()
///     .expect("configuration is valid");
/// assert_eq!(graph.vertex_count(), 50);
/// assert_eq!(graph.edge_count(), 245);
/// assert!(graph.has_adjacency());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GraphBuilder {
    vertices: usize,
    budget: EdgeBudget,
    seed: u64,
    adjacency: bool,
}

impl GraphBuilder {
    /// Creates a builder for `vertices` vertices with seed 0 and no
    /// adjacency index.
    #[must_use]
    pub fn new(vertices: usize, budget: EdgeBudget) -> Self {
        Self {
            vertices,
            budget,
            seed: 0,
            adjacency: false,
        }
    }

    /// Overrides the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Selects whether [`GraphBuilder::build`] also builds the adjacency
    /// index.
    #[must_use]
    pub fn with_adjacency(mut self, adjacency: bool) -> Self {
        self.adjacency = adjacency;
        self
    }

    /// Returns the configured vertex count.
    #[must_use]
    #[rustfmt::skip]
    pub fn vertices(&self) -> usize { self.vertices }

    /// Returns the configured edge budget.
    #[must_use]
    #[rustfmt::skip]
    pub fn budget(&self) -> EdgeBudget { self.budget }

    /// Returns the configured seed.
    #[must_use]
    #[rustfmt::skip]
    pub fn seed(&self) -> u64 { self.seed }

    /// Resolves the edge budget to a concrete edge count.
    ///
    /// # Errors
    /// Returns [`GraphError::TooFewVertices`] when fewer than two vertices are
    /// configured, [`GraphError::InvalidProbability`] for probabilities
    /// outside `[0, 1]`, and [`GraphError::TooManyEdges`] when the count
    /// exceeds the number of distinct pairs.
    pub fn edge_count(&self) -> Result<usize, GraphError> {
        let available = pair_count(self.vertices)?;
        match self.budget {
            EdgeBudget::Count(requested) if requested > available => {
                Err(GraphError::TooManyEdges {
                    requested,
                    available,
                })
            }
            EdgeBudget::Count(requested) => Ok(requested),
            EdgeBudget::Probability(probability) if !(0.0..=1.0).contains(&probability) => {
                Err(GraphError::InvalidProbability { probability })
            }
            EdgeBudget::Probability(probability) => {
                #[expect(
                    clippy::cast_possible_truncation,
                    clippy::cast_precision_loss,
                    clippy::cast_sign_loss,
                    reason = "the product lies in [0, available] and is rounded down"
                )]
                let count = (available as f64 * probability) as usize;
                Ok(count.min(available))
            }
        }
    }

    /// Validates the configuration and draws the graph.
    ///
    /// # Errors
    /// Returns the configuration errors of [`GraphBuilder::edge_count`]
    /// before any edge is drawn.
    #[instrument(name = "graph.generate", skip(self), fields(vertices = self.vertices, seed = self.seed))]
    pub fn build(&self) -> Result<GraphStore, GraphError> {
        let edge_count = self.edge_count()?;
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let weight_seed = rng.r#gen::<u64>();
        let pairs = UniquePairs::new(self.vertices, edge_count, rng)?;
        let weights = uniform_weights(edge_count, SmallRng::seed_from_u64(weight_seed));
        let graph =
            GraphStore::from_iters(self.vertices, edge_count, pairs, weights, self.adjacency)?;
        info!(edges = graph.edge_count(), "generated graph");
        Ok(graph)
    }
}

/// Endless weights uniform in `[0, max(edge_count, 1))`.
fn uniform_weights(edge_count: usize, mut rng: SmallRng) -> impl Iterator<Item = usize> {
    let bound = edge_count.max(1);
    std::iter::repeat_with(move || rng.gen_range(0..bound))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{EdgeBudget, GraphBuilder};
    use crate::error::GraphError;

    #[rstest]
    #[case::count(EdgeBudget::Count(17), 17)]
    #[case::empty(EdgeBudget::Count(0), 0)]
    #[case::complete(EdgeBudget::Probability(1.0), 45)]
    #[case::half(EdgeBudget::Probability(0.5), 22)]
    #[case::none(EdgeBudget::Probability(0.0), 0)]
    fn resolves_edge_budget(#[case] budget: EdgeBudget, #[case] expected: usize) {
        let builder = GraphBuilder::new(10, budget);
        assert_eq!(builder.edge_count().expect("valid budget"), expected);
    }

    #[rstest]
    #[case::negative(-0.1)]
    #[case::above_one(1.5)]
    #[case::nan(f64::NAN)]
    fn rejects_invalid_probabilities(#[case] probability: f64) {
        let err = GraphBuilder::new(10, EdgeBudget::Probability(probability))
            .build()
            .expect_err("probability out of range");
        assert!(matches!(err, GraphError::InvalidProbability { .. }));
    }

    #[test]
    fn rejects_too_many_edges() {
        let err = GraphBuilder::new(4, EdgeBudget::Count(7))
            .build()
            .expect_err("only six pairs exist");
        assert!(matches!(
            err,
            GraphError::TooManyEdges {
                requested: 7,
                available: 6
            }
        ));
    }

    #[test]
    fn rejects_single_vertex() {
        let err = GraphBuilder::new(1, EdgeBudget::Count(0))
            .build()
            .expect_err("one vertex has no pairs");
        assert!(matches!(err, GraphError::TooFewVertices { vertices: 1 }));
    }

    #[test]
    fn weights_stay_below_edge_count() {
        let graph = GraphBuilder::new(40, EdgeBudget::Count(100))
            .with_seed(9)
            .build()
            .expect("valid configuration");
        assert_eq!(graph.edge_count(), 100);
        assert!(graph.edges().iter().all(|edge| edge.weight() < 100));
    }

    #[test]
    fn identical_seeds_reproduce_the_graph() {
        let builder = GraphBuilder::new(30, EdgeBudget::Probability(0.3)).with_seed(77);
        let left = builder.build().expect("valid");
        let right = builder.build().expect("valid");
        assert_eq!(left.edges(), right.edges());

        let other = builder.clone().with_seed(78).build().expect("valid");
        assert_ne!(left.edges(), other.edges());
    }
}
