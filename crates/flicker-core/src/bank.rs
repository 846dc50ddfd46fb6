//! Multi-rate noise source bank (Voss-McCartney construction).
//!
//! Holds N independent scalar sources; source i is redrawn whenever the
//! sample index is a multiple of 2^i. Low-index sources therefore carry
//! high-frequency content and high-index sources slowly varying content;
//! their sum approximates a 1/f power spectrum without an IIR filter.

use crate::rng::SplitMix64;

/// Default number of noise sources.
pub const DEFAULT_SOURCES: usize = 10;

/// A bank of N independent noise sources updated at power-of-two-spaced
/// rates.
///
/// The source count is fixed at construction; the update-rate law
/// requires `1 <= n_sources <= 63` (shift width of the period mask).
#[derive(Debug, Clone)]
pub struct NoiseBank {
    rng: SplitMix64,
    sources: Vec<f64>,
    sample_counter: u64,
}

impl NoiseBank {
    /// Create a bank with `n_sources` sources, all initially zero.
    ///
    /// The first [`NoiseBank::advance`] call (counter value 0) redraws
    /// every source, which doubles as the initial seeding step.
    ///
    /// # Panics
    ///
    /// Panics if `n_sources` is 0 or greater than 63.
    pub fn new(seed: u64, n_sources: usize) -> Self {
        assert!(
            (1..=63).contains(&n_sources),
            "n_sources must be in 1..=63, got {}",
            n_sources
        );
        Self {
            rng: SplitMix64::new(seed),
            sources: vec![0.0; n_sources],
            sample_counter: 0,
        }
    }

    /// Number of sources in the bank.
    pub fn n_sources(&self) -> usize {
        self.sources.len()
    }

    /// Number of samples produced so far.
    pub fn sample_counter(&self) -> u64 {
        self.sample_counter
    }

    /// Current source values (for inspection and tests).
    pub fn sources(&self) -> &[f64] {
        &self.sources
    }

    /// Produce one unscaled sample: redraw due sources, sum all sources,
    /// advance the counter.
    ///
    /// On call k (pre-increment counter value), source i is redrawn iff
    /// `k mod 2^i == 0`, computed with a power-of-two mask.
    pub fn advance(&mut self) -> f64 {
        for (i, source) in self.sources.iter_mut().enumerate() {
            if self.sample_counter & ((1u64 << i) - 1) == 0 {
                *source = self.rng.symmetric();
            }
        }

        let mut raw = 0.0;
        for source in &self.sources {
            raw += source;
        }

        self.sample_counter += 1;
        raw
    }
}
