//! The driver-facing call boundary.
//!
//! The external simulation driver issues one zero-argument call per
//! simulated time step and receives one f64 sample. [`CallBoundary`]
//! owns exactly one backend generator for the process lifetime; backend
//! selection happens once at construction, so the per-call path contains
//! no mode branching.

use std::path::PathBuf;

use crate::batch::{BatchGenerator, DEFAULT_CAPACITY, DEFAULT_SAMPLE_FILE};
use crate::streaming::{Calibration, StreamingGenerator};

/// The shared one-sample-per-call contract.
///
/// Implementations are stateful: every call advances internal state and
/// yields the next value of the sequence. Callers must invoke
/// `next_sample` exactly once per time step, in order, and must never
/// treat it as pure or cacheable. The sequence is defined only for a
/// single, strictly sequential call stream.
pub trait SampleSource {
    /// Produce the next sample. Always returns a finite f64.
    fn next_sample(&mut self) -> f64;
}

/// Which backend serves the call boundary. Fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// On-the-fly Voss-McCartney synthesis.
    #[default]
    Streaming,
    /// Replay of a precomputed trace file.
    Batch,
}

/// Boundary configuration, resolved once at process start.
#[derive(Debug, Clone)]
pub struct BoundaryConfig {
    pub backend: Backend,
    /// Streaming calibration constants.
    pub calibration: Calibration,
    /// Trace file for the batch backend.
    pub sample_file: PathBuf,
    /// Trace buffer capacity for the batch backend.
    pub capacity: usize,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Streaming,
            calibration: Calibration::default(),
            sample_file: PathBuf::from(DEFAULT_SAMPLE_FILE),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// The single entry point the driver calls into, bound to one backend.
pub struct CallBoundary {
    source: Box<dyn SampleSource + Send>,
}

impl CallBoundary {
    /// Instantiate the boundary's one generator per the configuration.
    pub fn new(config: BoundaryConfig) -> Self {
        let source: Box<dyn SampleSource + Send> = match config.backend {
            Backend::Streaming => Box::new(StreamingGenerator::new(config.calibration)),
            Backend::Batch => Box::new(BatchGenerator::new(config.sample_file, config.capacity)),
        };
        Self { source }
    }

    /// Forward one call to the owned generator.
    #[inline]
    pub fn next(&mut self) -> f64 {
        self.source.next_sample()
    }
}

impl Default for CallBoundary {
    fn default() -> Self {
        Self::new(BoundaryConfig::default())
    }
}

impl std::fmt::Debug for CallBoundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallBoundary").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streaming::generate;

    #[test]
    fn test_streaming_boundary_matches_direct_generator() {
        let mut boundary = CallBoundary::new(BoundaryConfig::default());
        let direct = generate(Calibration::default(), 100);
        let via_boundary: Vec<f64> = (0..100).map(|_| boundary.next()).collect();
        assert_eq!(via_boundary, direct);
    }

    #[test]
    fn test_batch_boundary_has_identical_contract() {
        // Missing trace: the boundary still honors "always a finite f64".
        let mut boundary = CallBoundary::new(BoundaryConfig {
            backend: Backend::Batch,
            sample_file: PathBuf::from("no/such/trace.bin"),
            ..BoundaryConfig::default()
        });
        for _ in 0..10 {
            let v = boundary.next();
            assert!(v.is_finite());
            assert_eq!(v, 0.0);
        }
    }
}
