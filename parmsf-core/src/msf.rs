//! Validated spanning forest configuration.

use std::num::NonZeroUsize;

use tracing::instrument;

use crate::{
    GraphStore, PartialForest, Result,
    builder::ExecutionStrategy,
    driver::{compute_msf_parallel, compute_mst},
};

/// Entry point for computing a minimum spanning forest with a chosen
/// strategy.
///
/// # Examples
/// ```
/// use parmsf_core::{EdgeBudget, ExecutionStrategy, GraphBuilder, MsfBuilder};
///
/// let graph = GraphBuilder::new(30, EdgeBudget::Probability(0.2))
///     .with_seed(5)
///     .with_adjacency(true)
///     .build()?;
/// let config = MsfBuilder::new().with_threads(3).build()?;
/// let forest = config.run(&graph)?;
/// assert!(forest.is_complete());
/// # Ok::<(), parmsf_core::MsfError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MsfConfig {
    threads: NonZeroUsize,
    execution_strategy: ExecutionStrategy,
}

impl MsfConfig {
    pub(crate) fn new(threads: NonZeroUsize, execution_strategy: ExecutionStrategy) -> Self {
        Self {
            threads,
            execution_strategy,
        }
    }

    /// Returns the worker thread count used by the parallel strategy.
    #[must_use]
    pub fn threads(&self) -> NonZeroUsize {
        self.threads
    }

    /// Returns the configured execution strategy.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Computes the minimum spanning forest of `graph`.
    ///
    /// # Errors
    /// Propagates the errors of [`compute_mst`] or [`compute_msf_parallel`].
    #[instrument(
        name = "msf.run",
        skip(self, graph),
        fields(threads = self.threads.get(), strategy = ?self.execution_strategy),
    )]
    pub fn run(&self, graph: &GraphStore) -> Result<PartialForest> {
        match self.execution_strategy {
            ExecutionStrategy::Sequential => compute_mst(graph),
            ExecutionStrategy::Parallel => compute_msf_parallel(graph, self.threads.get()),
        }
    }
}
