//! Benchmark support crate for parmsf.
//!
//! Provides the setup error type, parameter labels, and logging setup shared
//! by the Criterion benchmarks for pair generation and spanning forest
//! computation.

pub mod error;
pub mod logging;
pub mod params;
