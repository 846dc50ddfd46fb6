//! Precomputed-trace replay backend.
//!
//! [`BatchBuffer`] loads a fixed-capacity array of samples from a flat,
//! headerless, native-endian f64 binary file and serves them by index
//! with wraparound. [`BatchGenerator`] wraps it behind the same
//! one-sample-per-call contract as the streaming backend, so the driver
//! side can be rebuilt against either without modification.
//!
//! Replaying an externally produced trace is what makes bit-exact
//! verification against the reference generator possible: the streaming
//! backend matches it statistically, the batch backend sample-by-sample.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::boundary::SampleSource;
use crate::error::{Error, Result};

/// Default buffer capacity in samples (32 KiB of f64 data).
pub const DEFAULT_CAPACITY: usize = 4096;

/// Default trace file path, relative to the simulation working directory.
pub const DEFAULT_SAMPLE_FILE: &str = "data/flicker_noise_batch.bin";

/// Number of initial calls traced at debug level for integration
/// debugging. Not part of the functional contract.
const TRACE_CALLS: u64 = 30;

/// Outcome of the one-time trace load.
///
/// All outcomes leave the buffer operational; a failed or short load
/// degrades fidelity (zeros, shorter wraparound period) but never aborts
/// the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// All capacity slots filled from the file.
    Full,
    /// File was shorter than capacity; wraparound uses the loaded count.
    Partial { loaded: usize },
    /// File missing or empty; buffer zero-filled to capacity.
    Fallback,
}

/// Fixed-capacity preloaded sample buffer with wraparound cursor.
///
/// The sample array is immutable after load; only the cursor mutates.
#[derive(Debug, Clone)]
pub struct BatchBuffer {
    samples: Vec<f64>,
    cursor: usize,
}

impl BatchBuffer {
    /// Load up to `capacity` samples from `path`.
    ///
    /// - Open failure: zero-fills all `capacity` slots and returns
    ///   [`LoadOutcome::Fallback`], logging the regeneration command.
    /// - Short file: keeps the samples actually read and returns
    ///   [`LoadOutcome::Partial`]. A readable but empty file degrades to
    ///   the zero-fill fallback, since wraparound needs at least one
    ///   sample.
    ///
    /// Diagnostics go to the `log` channel only; the numeric behavior of
    /// [`BatchBuffer::next_sample`] is unaffected by how the load went.
    pub fn load(path: &Path, capacity: usize) -> (Self, LoadOutcome) {
        assert!(capacity > 0, "capacity must be nonzero");

        let samples = match read_trace_bounded(path, capacity) {
            Ok(samples) => samples,
            Err(err) => {
                log::error!(
                    "cannot open noise trace {}: {}; falling back to zeros \
                     (regenerate with `flicker generate --output {}`)",
                    path.display(),
                    err,
                    path.display(),
                );
                return (
                    Self {
                        samples: vec![0.0; capacity],
                        cursor: 0,
                    },
                    LoadOutcome::Fallback,
                );
            }
        };

        let loaded = samples.len();
        let outcome = if loaded == capacity {
            log::debug!(
                "loaded {} noise samples from {} ({:.1} KiB)",
                loaded,
                path.display(),
                (loaded * 8) as f64 / 1024.0
            );
            LoadOutcome::Full
        } else if loaded > 0 {
            log::warn!(
                "noise trace {} shorter than expected: {} of {} samples; \
                 wraparound period degraded (regenerate with `flicker generate`)",
                path.display(),
                loaded,
                capacity
            );
            LoadOutcome::Partial { loaded }
        } else {
            log::error!(
                "noise trace {} is empty; falling back to zeros \
                 (regenerate with `flicker generate`)",
                path.display()
            );
            return (
                Self {
                    samples: vec![0.0; capacity],
                    cursor: 0,
                },
                LoadOutcome::Fallback,
            );
        };

        (Self { samples, cursor: 0 }, outcome)
    }

    /// Number of samples the buffer wraps over.
    pub fn loaded_count(&self) -> usize {
        self.samples.len()
    }

    /// Loaded samples, in file order.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Return the sample at the cursor and advance with wraparound.
    #[inline]
    pub fn next_sample(&mut self) -> f64 {
        let v = self.samples[self.cursor];
        self.cursor = (self.cursor + 1) % self.samples.len();
        v
    }
}

/// Replay state: trace location until the first call, then a live buffer.
#[derive(Debug, Clone)]
enum BatchState {
    Pending { path: PathBuf, capacity: usize },
    Ready { buffer: BatchBuffer, calls: u64 },
}

/// Batch-mode generator: one preloaded sample per call.
///
/// Identical call contract to
/// [`StreamingGenerator`](crate::streaming::StreamingGenerator); the
/// trace file is opened exactly once, on the first call.
#[derive(Debug, Clone)]
pub struct BatchGenerator {
    state: BatchState,
}

impl BatchGenerator {
    /// Create a generator replaying `path` with the given capacity.
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            state: BatchState::Pending {
                path: path.into(),
                capacity,
            },
        }
    }

    /// Outcome of the lazy load, if it has happened yet.
    pub fn buffer(&self) -> Option<&BatchBuffer> {
        match &self.state {
            BatchState::Ready { buffer, .. } => Some(buffer),
            BatchState::Pending { .. } => None,
        }
    }
}

impl Default for BatchGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_FILE, DEFAULT_CAPACITY)
    }
}

impl SampleSource for BatchGenerator {
    fn next_sample(&mut self) -> f64 {
        if let BatchState::Pending { path, capacity } = &self.state {
            let (buffer, _) = BatchBuffer::load(path, *capacity);
            self.state = BatchState::Ready { buffer, calls: 0 };
        }
        match &mut self.state {
            BatchState::Ready { buffer, calls } => {
                let index = *calls as usize % buffer.loaded_count();
                let v = buffer.next_sample();
                if *calls < TRACE_CALLS {
                    log::debug!("batch call {:3}: index={}, value={:.6}", calls, index, v);
                }
                *calls += 1;
                v
            }
            BatchState::Pending { .. } => unreachable!("buffer loaded above"),
        }
    }
}

/// Read a full trace file as native-endian f64 samples.
pub fn read_trace(path: &Path) -> Result<Vec<f64>> {
    let mut bytes = Vec::new();
    File::open(path)
        .and_then(|mut f| f.read_to_end(&mut bytes))
        .map_err(|source| Error::TraceIo {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(decode_samples(&bytes))
}

/// Write samples as a flat, headerless, native-endian f64 trace file.
///
/// This is the interchange format consumed by [`BatchBuffer::load`]:
/// no version, checksum, or metadata; producer and consumer agree on
/// capacity and element type out of band.
pub fn write_trace(path: &Path, samples: &[f64]) -> Result<()> {
    let mut bytes = Vec::with_capacity(samples.len() * 8);
    for sample in samples {
        bytes.extend_from_slice(&sample.to_ne_bytes());
    }
    std::fs::write(path, bytes).map_err(|source| Error::TraceIo {
        path: path.to_path_buf(),
        source,
    })
}

/// Read at most `capacity` samples from `path`.
fn read_trace_bounded(path: &Path, capacity: usize) -> std::io::Result<Vec<f64>> {
    let mut bytes = Vec::with_capacity(capacity * 8);
    File::open(path)?
        .take((capacity * 8) as u64)
        .read_to_end(&mut bytes)?;
    Ok(decode_samples(&bytes))
}

fn decode_samples(bytes: &[u8]) -> Vec<f64> {
    // A trailing partial element (torn write) is dropped.
    bytes
        .chunks_exact(8)
        .map(|chunk| f64::from_ne_bytes(chunk.try_into().expect("8-byte chunk")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::SampleSource;

    fn write_temp_trace(samples: &[f64]) -> tempfile::TempPath {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        let path = file.into_temp_path();
        write_trace(&path, samples).expect("write trace");
        path
    }

    #[test]
    fn test_full_load_round_trips_exactly() {
        let samples = vec![0.125, -3.5, 1e-9, 42.0];
        let path = write_temp_trace(&samples);
        let (buffer, outcome) = BatchBuffer::load(&path, samples.len());
        assert_eq!(outcome, LoadOutcome::Full);
        assert_eq!(buffer.samples(), samples.as_slice());
    }

    #[test]
    fn test_wraparound_repeats_file_order() {
        let path = write_temp_trace(&[1.5, -2.0, 0.5]);
        let mut gen = BatchGenerator::new(&*path, 3);
        let five: Vec<f64> = (0..5).map(|_| gen.next_sample()).collect();
        assert_eq!(five, vec![1.5, -2.0, 0.5, 1.5, -2.0]);
    }

    #[test]
    fn test_missing_file_falls_back_to_zeros() {
        let (buffer, outcome) = BatchBuffer::load(Path::new(""), DEFAULT_CAPACITY);
        assert_eq!(outcome, LoadOutcome::Fallback);
        assert_eq!(buffer.loaded_count(), DEFAULT_CAPACITY);
        assert!(buffer.samples().iter().all(|&s| s == 0.0));

        let mut gen = BatchGenerator::new("no/such/trace.bin", DEFAULT_CAPACITY);
        for _ in 0..5 {
            assert_eq!(gen.next_sample(), 0.0);
        }
    }

    #[test]
    fn test_short_file_degrades_wraparound() {
        let path = write_temp_trace(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let (mut buffer, outcome) = BatchBuffer::load(&path, 8);
        assert_eq!(outcome, LoadOutcome::Partial { loaded: 5 });
        assert_eq!(buffer.loaded_count(), 5);
        // Sixth call wraps to the first sample.
        let six: Vec<f64> = (0..6).map(|_| buffer.next_sample()).collect();
        assert_eq!(six, vec![10.0, 20.0, 30.0, 40.0, 50.0, 10.0]);
    }

    #[test]
    fn test_empty_file_falls_back_to_zeros() {
        let path = write_temp_trace(&[]);
        let (buffer, outcome) = BatchBuffer::load(&path, 16);
        assert_eq!(outcome, LoadOutcome::Fallback);
        assert_eq!(buffer.loaded_count(), 16);
        assert!(buffer.samples().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_torn_trailing_element_dropped() {
        let path = write_temp_trace(&[1.0, 2.0]);
        // Append 3 stray bytes; the partial element must not surface.
        let mut bytes = std::fs::read(&path).expect("read");
        bytes.extend_from_slice(&[0xaa, 0xbb, 0xcc]);
        std::fs::write(&path, bytes).expect("rewrite");

        let (buffer, outcome) = BatchBuffer::load(&path, 4);
        assert_eq!(outcome, LoadOutcome::Partial { loaded: 2 });
        assert_eq!(buffer.samples(), &[1.0, 2.0]);
    }

    #[test]
    fn test_load_caps_at_capacity() {
        let path = write_temp_trace(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let (buffer, outcome) = BatchBuffer::load(&path, 4);
        assert_eq!(outcome, LoadOutcome::Full);
        assert_eq!(buffer.samples(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_exact_replay_of_reference_trace() {
        // Bit-exact replay is the whole point of batch mode.
        let reference = crate::streaming::generate(crate::streaming::Calibration::default(), 256);
        let path = write_temp_trace(&reference);
        let mut gen = BatchGenerator::new(&*path, 256);
        for (j, &expected) in reference.iter().enumerate() {
            let got = gen.next_sample();
            assert!(
                (got - expected).abs() < 1e-9,
                "sample {}: {} != {}",
                j,
                got,
                expected
            );
        }
    }
}
