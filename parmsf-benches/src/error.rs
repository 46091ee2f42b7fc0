//! Benchmark setup error type.
//!
//! Lets setup functions propagate generator and solver failures with `?`.

use parmsf_core::{GraphError, MsfError, SequenceError, logging::LoggingError};

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Graph generation, persistence, or loading failed.
    #[error("graph setup failed: {0}")]
    Graph(#[from] GraphError),
    /// Spanning forest computation failed.
    #[error("spanning forest computation failed: {0}")]
    Msf(#[from] MsfError),
    /// Shift register sequence construction failed.
    #[error("sequence setup failed: {0}")]
    Sequence(#[from] SequenceError),
    /// Logging configuration was malformed.
    #[error("logging setup failed: {0}")]
    Logging(#[from] LoggingError),
    /// Scratch directory creation failed.
    #[error("scratch directory unavailable: {0}")]
    Scratch(#[from] std::io::Error),
}
