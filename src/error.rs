//! Error kinds for cache construction, trace loading, and result reporting.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the simulator library.
#[derive(Debug, Error)]
pub enum SimError {
    /// The cache geometry cannot be built (zero sets, non-power-of-two sizes).
    #[error("invalid cache configuration: {0}")]
    Configuration(String),

    /// The trace source could not be opened or read.
    #[error("trace unavailable: {path}: {source}")]
    TraceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A trace line did not match `<type> <hex address> <gap>`.
    #[error("malformed trace line {line}: {reason}")]
    TraceParse { line: usize, reason: String },

    /// Hit and miss rates are undefined for a run with no accesses.
    #[error("hit rate undefined: no accesses were simulated")]
    UndefinedRate,

    /// The result table could not be written.
    #[error("failed to write results: {0}")]
    Report(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
