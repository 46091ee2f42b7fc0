//! Builder utilities for configuring spanning forest runs.
//!
//! Exposes the execution strategy selection surface and builder validation
//! used before constructing [`MsfConfig`] instances.

use std::{num::NonZeroUsize, thread};

use crate::{Result, error::MsfError, msf::MsfConfig};

/// Selects how [`MsfConfig::run`] computes the forest.
///
/// # Examples
/// ```
/// use parmsf_core::ExecutionStrategy;
///
/// let strategy = ExecutionStrategy::default();
/// assert_eq!(strategy, ExecutionStrategy::Parallel);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// One unbounded Prim runner on the calling thread.
    Sequential,
    /// One bounded runner per worker thread, merged and stitched.
    #[default]
    Parallel,
}

/// Configures and constructs [`MsfConfig`] instances.
///
/// # Examples
/// ```
/// use parmsf_core::{ExecutionStrategy, MsfBuilder};
///
/// let config = MsfBuilder::new()
///     .with_threads(4)
///     .with_execution_strategy(ExecutionStrategy::Sequential)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(config.threads().get(), 4);
/// assert_eq!(config.execution_strategy(), ExecutionStrategy::Sequential);
/// ```
#[derive(Debug, Clone)]
pub struct MsfBuilder {
    threads: usize,
    execution_strategy: ExecutionStrategy,
}

impl Default for MsfBuilder {
    fn default() -> Self {
        Self {
            threads: thread::available_parallelism().map_or(1, NonZeroUsize::get),
            execution_strategy: ExecutionStrategy::default(),
        }
    }
}

impl MsfBuilder {
    /// Creates a builder using every available core and the parallel
    /// strategy.
    ///
    /// # Examples
    /// ```
    /// use parmsf_core::MsfBuilder;
    ///
    /// let builder = MsfBuilder::new();
    /// assert!(builder.threads() >= 1);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the worker thread count.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Returns the configured worker thread count.
    #[must_use]
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Sets the execution strategy.
    #[must_use]
    pub fn with_execution_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.execution_strategy = strategy;
        self
    }

    /// Returns the configured execution strategy.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Validates the configuration and constructs an [`MsfConfig`].
    ///
    /// # Errors
    /// Returns [`MsfError::InvalidThreadCount`] when the thread count is zero.
    ///
    /// # Examples
    /// ```
    /// use parmsf_core::{MsfBuilder, MsfErrorCode};
    ///
    /// let err = MsfBuilder::new().with_threads(0).build().expect_err("zero threads");
    /// assert_eq!(err.code(), MsfErrorCode::InvalidThreadCount);
    /// ```
    pub fn build(self) -> Result<MsfConfig> {
        let threads = NonZeroUsize::new(self.threads)
            .ok_or(MsfError::InvalidThreadCount { got: self.threads })?;
        Ok(MsfConfig::new(threads, self.execution_strategy))
    }
}
