//! Benchmark parameter types.

use std::fmt;

/// Parameters for a pair generator benchmark run.
#[derive(Clone, Debug)]
pub struct GeneratorBenchParams {
    /// Number of vertices spanning the pair space.
    pub vertices: usize,
    /// Number of pairs drawn.
    pub pairs: usize,
}

impl fmt::Display for GeneratorBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V={},E={}", self.vertices, self.pairs)
    }
}

/// Parameters for a spanning forest benchmark run.
#[derive(Clone, Debug)]
pub struct MsfBenchParams {
    /// Number of vertices in the generated graph.
    pub vertices: usize,
    /// Worker threads handed to the parallel driver.
    pub threads: usize,
}

impl fmt::Display for MsfBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V={},t={}", self.vertices, self.threads)
    }
}
