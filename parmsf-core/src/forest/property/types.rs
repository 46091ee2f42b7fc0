//! Type definitions for merge property tests.

use crate::{PartialForest, test_utils::read_env_or_default};

/// How the vertex sets of generated forests relate to one another.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum OverlapPattern {
    /// The forests commit disjoint vertex sets.
    Disjoint,
    /// Each forest commits an independent random subset.
    Partial,
    /// Every forest commits every vertex.
    Complete,
}

/// A group of same-capacity forests to merge.
#[derive(Clone, Debug)]
pub(super) struct MergeFixture {
    /// Shared capacity of every forest.
    pub capacity: usize,
    /// The generated forests; the first receives the merges.
    pub forests: Vec<PartialForest>,
    /// Overlap pattern used during generation.
    pub pattern: OverlapPattern,
}

/// Configuration for the fold-order property.
pub(super) struct FoldConfig {
    /// Number of shuffled fold orders tried per fixture.
    pub repetitions: usize,
}

impl FoldConfig {
    /// Loads the configuration from `PARMSF_MERGE_PBT_REPS` (default: 4).
    pub(super) fn load() -> Self {
        let repetitions = read_env_or_default("PARMSF_MERGE_PBT_REPS", 4, |raw| {
            raw.trim()
                .parse()
                .map_err(|error| format!("parse error: {error}"))
        });
        Self { repetitions }
    }
}
