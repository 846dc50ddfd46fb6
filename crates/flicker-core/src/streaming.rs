//! On-the-fly flicker noise synthesis.
//!
//! [`StreamingGenerator`] produces one calibrated sample per call from a
//! live [`NoiseBank`]. The generator is stateful by contract: there are
//! no arguments to memoize against, and every call must yield the next
//! value of the sequence. The lifecycle is an explicit Pending -> Ready
//! transition so the type, not a runtime flag, rules out producing a
//! sample from an unseeded bank.

use crate::bank::{DEFAULT_SOURCES, NoiseBank};
use crate::boundary::SampleSource;

/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 42;

/// Default target output RMS (V).
pub const DEFAULT_TARGET_RMS: f64 = 0.25;

/// Empirical RMS of the unscaled source sum for seed 42, N = 10,
/// measured over 2^20 samples of this crate's SplitMix64 stream.
///
/// The theoretical value for N independent uniform[-1,1) sources is
/// `sqrt(N/3)` (~1.826 for N = 10), retained in [`crate::measure`] as a
/// sanity bound. This constant is tied to the exact RNG algorithm and
/// update-rate law; changing either requires re-measuring it with
/// `flicker calibrate` rather than deriving it in closed form.
pub const RAW_RMS_SEED42_N10: f64 = 1.8270;

/// Calibration constants for the streaming generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// RNG seed, fixed for determinism.
    pub seed: u64,
    /// Number of noise sources in the bank.
    pub n_sources: usize,
    /// Target output RMS.
    pub target_rms: f64,
    /// Empirically measured RMS of the unscaled source sum.
    pub raw_rms: f64,
}

impl Calibration {
    /// The output scale factor applied to each raw sample.
    #[inline]
    pub fn scale(&self) -> f64 {
        self.target_rms / self.raw_rms
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            n_sources: DEFAULT_SOURCES,
            target_rms: DEFAULT_TARGET_RMS,
            raw_rms: RAW_RMS_SEED42_N10,
        }
    }
}

/// Generator lifecycle: configuration held until the first call, then a
/// live bank.
#[derive(Debug, Clone)]
enum State {
    Pending(Calibration),
    Ready { bank: NoiseBank, scale: f64 },
}

/// Streaming flicker noise generator.
///
/// For a fixed calibration the output sequence is a pure function of the
/// call history: no call may be skipped or repeated without perturbing
/// every subsequent sample.
#[derive(Debug, Clone)]
pub struct StreamingGenerator {
    state: State,
}

impl StreamingGenerator {
    /// Create a generator with the given calibration. No random state is
    /// created until the first sample is requested.
    pub fn new(calibration: Calibration) -> Self {
        Self {
            state: State::Pending(calibration),
        }
    }

    fn ready(&mut self) -> (&mut NoiseBank, f64) {
        if let State::Pending(cal) = self.state {
            self.state = State::Ready {
                bank: NoiseBank::new(cal.seed, cal.n_sources),
                scale: cal.scale(),
            };
        }
        match &mut self.state {
            State::Ready { bank, scale } => (bank, *scale),
            State::Pending(_) => unreachable!("generator initialized above"),
        }
    }
}

impl Default for StreamingGenerator {
    fn default() -> Self {
        Self::new(Calibration::default())
    }
}

impl SampleSource for StreamingGenerator {
    fn next_sample(&mut self) -> f64 {
        let (bank, scale) = self.ready();
        bank.advance() * scale
    }
}

/// Run a fresh streaming generator for `count` samples.
///
/// Convenience for trace generation and statistical verification.
pub fn generate(calibration: Calibration, count: usize) -> Vec<f64> {
    let mut gen = StreamingGenerator::new(calibration);
    (0..count).map(|_| gen.next_sample()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// First output sample for the default calibration, pinned from a
    /// reference run of this algorithm.
    const GOLDEN_FIRST_SAMPLE: f64 = -0.1620209252290254;

    #[test]
    fn test_first_sample_matches_golden_constant() {
        let mut gen = StreamingGenerator::default();
        let first = gen.next_sample();
        assert!(
            (first - GOLDEN_FIRST_SAMPLE).abs() < 1e-15,
            "first sample {} != golden {}",
            first,
            GOLDEN_FIRST_SAMPLE
        );
    }

    #[test]
    fn test_deterministic_across_runs() {
        let a = generate(Calibration::default(), 10_000);
        let b = generate(Calibration::default(), 10_000);
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_sample_finite() {
        for sample in generate(Calibration::default(), 10_000) {
            assert!(sample.is_finite());
        }
    }

    #[test]
    fn test_repeated_calls_yield_new_values() {
        // Not a pure function: consecutive calls must not all collapse to
        // one value.
        let samples = generate(Calibration::default(), 16);
        assert!(samples.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_different_seed_diverges() {
        let a = generate(Calibration::default(), 64);
        let b = generate(
            Calibration {
                seed: 7,
                ..Calibration::default()
            },
            64,
        );
        assert_ne!(a, b);
    }
}
