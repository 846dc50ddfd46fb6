//! Deterministic 1/f (flicker) noise generation for time-stepped
//! circuit simulation.
//!
//! An external simulation driver calls a zero-argument function once per
//! time step and receives one f64 noise sample. Two interchangeable
//! backends serve that call:
//!
//! - **Streaming**: on-the-fly Voss-McCartney synthesis from a bank of
//!   multi-rate random sources, calibrated to a target RMS. Matches the
//!   reference trace statistically (RMS, spectral slope).
//! - **Batch**: replay of a precomputed trace file, for bit-exact
//!   verification against an externally produced reference.
//!
//! Both are deterministic for a fixed seed/trace; the output sequence is
//! a pure function of the call history. Sample production never fails:
//! a missing or truncated trace file degrades to zeros or a shorter
//! wraparound period with a `log` diagnostic, and the call boundary
//! keeps its "always a finite f64" contract.

pub mod bank;
pub mod batch;
pub mod boundary;
pub mod error;
pub mod ffi;
pub mod measure;
pub mod rng;
pub mod spectrum;
pub mod streaming;

pub use bank::{DEFAULT_SOURCES, NoiseBank};
pub use batch::{
    BatchBuffer, BatchGenerator, DEFAULT_CAPACITY, DEFAULT_SAMPLE_FILE, LoadOutcome, read_trace,
    write_trace,
};
pub use boundary::{Backend, BoundaryConfig, CallBoundary, SampleSource};
pub use error::{Error, Result};
pub use measure::{TraceStatistics, measure_raw_rms, rms, theoretical_raw_rms};
pub use spectrum::{SpectrumResult, fit_spectral_slope, power_spectrum};
pub use streaming::{
    Calibration, DEFAULT_SEED, DEFAULT_TARGET_RMS, RAW_RMS_SEED42_N10, StreamingGenerator,
    generate,
};
