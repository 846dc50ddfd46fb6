//! Error types for the fallible library surface.
//!
//! Note that sample production itself cannot fail: missing or truncated
//! sample files are resolved at the one-time lazy load with a zero-fill
//! or short-buffer fallback (see [`crate::batch::LoadOutcome`]), never
//! escalated through the call boundary. These errors cover only the
//! explicitly fallible helpers used by tooling and tests.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for flicker-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from trace-file helpers and spectral analysis.
#[derive(Debug, Error)]
pub enum Error {
    /// Trace file could not be read or written.
    #[error("trace file I/O error at {path}: {source}")]
    TraceIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Too few samples for the requested analysis.
    #[error("insufficient samples: got {got}, need at least {need}")]
    InsufficientSamples { got: usize, need: usize },
}
