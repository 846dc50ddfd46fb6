//! Amplitude measurement and empirical recalibration.
//!
//! The calibration constant [`crate::streaming::RAW_RMS_SEED42_N10`]
//! cannot be derived in closed form: it depends on the exact
//! distribution the RNG realizes. It is measured here by running the
//! unscaled multi-rate bank for a large sample count. The theoretical
//! approximation `sqrt(N/3)` for N independent uniform[-1,1) sources is
//! kept only as a sanity bound.

use crate::bank::NoiseBank;

/// Root-mean-square of a sample slice. Returns 0.0 for an empty slice.
pub fn rms(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f64).sqrt()
}

/// Arithmetic mean of a sample slice. Returns 0.0 for an empty slice.
pub fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Subtract the mean in place (DC removal).
pub fn remove_dc(samples: &mut [f64]) {
    let dc = mean(samples);
    for s in samples.iter_mut() {
        *s -= dc;
    }
}

/// Rescale in place so the slice's RMS equals `target_rms`.
///
/// No-op for an all-zero slice.
pub fn normalize_rms(samples: &mut [f64], target_rms: f64) {
    let current = rms(samples);
    if current > 0.0 {
        let scale = target_rms / current;
        for s in samples.iter_mut() {
            *s *= scale;
        }
    }
}

/// Summary statistics for a noise trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceStatistics {
    pub count: usize,
    pub mean: f64,
    pub rms: f64,
    pub min: f64,
    pub max: f64,
}

impl TraceStatistics {
    /// Compute statistics over a sample slice.
    pub fn from_samples(samples: &[f64]) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &s in samples {
            min = min.min(s);
            max = max.max(s);
        }
        Self {
            count: samples.len(),
            mean: mean(samples),
            rms: rms(samples),
            min,
            max,
        }
    }
}

/// Measure the RMS of the unscaled source sum by simulation.
///
/// This is the recalibration procedure: run it with a large
/// `num_samples` (2^20 was used for the shipped constant) whenever the
/// seed, source count, distribution, or update-rate law changes, and
/// hard-code the result.
pub fn measure_raw_rms(seed: u64, n_sources: usize, num_samples: usize) -> f64 {
    let mut bank = NoiseBank::new(seed, n_sources);
    let mut sum_sq = 0.0;
    for _ in 0..num_samples {
        let raw = bank.advance();
        sum_sq += raw * raw;
    }
    (sum_sq / num_samples as f64).sqrt()
}

/// Theoretical RMS of the sum of N independent uniform[-1,1) sources.
///
/// Sanity bound only; the multi-rate update law correlates consecutive
/// samples, so the measured value drifts from this.
pub fn theoretical_raw_rms(n_sources: usize) -> f64 {
    (n_sources as f64 / 3.0).sqrt()
}
