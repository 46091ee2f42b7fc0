//! Logging for benchmark runs.

use parmsf_core::logging::{LogSettings, LoggingError};

use crate::error::BenchSetupError;

/// Installs structured logging for a benchmark binary.
///
/// Solver spans fire on every Criterion iteration, so output defaults to
/// warnings only. `RUST_LOG`, `PARMSF_LOG_FORMAT`, and `PARMSF_LOG_TIMING`
/// override the defaults; `RUST_LOG=info` reports per-run span timings.
/// Calling this again, or after the host installed a subscriber, is a no-op.
///
/// # Errors
/// Returns [`BenchSetupError::Logging`] when an environment variable is
/// malformed.
pub fn init_bench_logging() -> Result<(), BenchSetupError> {
    match LogSettings::default().with_filter("warn").with_env()?.install() {
        Ok(()) | Err(LoggingError::Install(_)) => Ok(()),
        Err(err) => Err(err.into()),
    }
}
