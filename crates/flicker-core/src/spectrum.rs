//! Power spectral density and spectral-slope estimation.
//!
//! Used to verify the 1/f shape of a trace independent of exact sample
//! values: the exponent of frequency in a log-log PSD fit should be
//! close to -1 for flicker noise.

use rustfft::{FftPlanner, num_complex::Complex};

use crate::error::{Error, Result};
use crate::measure;

/// One-sided power spectrum of a real trace.
#[derive(Debug, Clone)]
pub struct SpectrumResult {
    /// Frequency bins in Hz (DC bin included).
    pub frequencies: Vec<f64>,
    /// Power spectral density per bin: |X(f)|^2.
    pub psd: Vec<f64>,
    /// Sample rate used for the analysis (Hz).
    pub sample_rate: f64,
}

/// Compute the one-sided power spectrum of `samples`.
///
/// DC is removed before the transform so the zero bin does not swamp
/// the fit. No window is applied; for broadband noise the rectangular
/// window bias is negligible and keeps the analysis deterministic.
pub fn power_spectrum(samples: &[f64], sample_rate: f64) -> Result<SpectrumResult> {
    const MIN_SAMPLES: usize = 4;
    if samples.len() < MIN_SAMPLES {
        return Err(Error::InsufficientSamples {
            got: samples.len(),
            need: MIN_SAMPLES,
        });
    }

    let n = samples.len();
    let dc = measure::mean(samples);
    let mut buffer: Vec<Complex<f64>> = samples
        .iter()
        .map(|&s| Complex::new(s - dc, 0.0))
        .collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    let bins = n / 2 + 1;
    let frequencies = (0..bins).map(|k| k as f64 * sample_rate / n as f64).collect();
    let psd = buffer[..bins].iter().map(|x| x.norm_sqr()).collect();

    Ok(SpectrumResult {
        frequencies,
        psd,
        sample_rate,
    })
}

/// Fit the spectral slope (PSD exponent) in log-log space.
///
/// Least-squares line fit over all nonzero-frequency bins; returns the
/// slope, which is ~-1.0 for ideal 1/f noise. Returns `None` if fewer
/// than two usable bins remain.
pub fn fit_spectral_slope(spectrum: &SpectrumResult) -> Option<f64> {
    let points: Vec<(f64, f64)> = spectrum
        .frequencies
        .iter()
        .zip(spectrum.psd.iter())
        .skip(1) // DC bin has no log-frequency
        .filter(|(_, &p)| p > 0.0)
        .map(|(&f, &p)| (f.log10(), p.log10()))
        .collect();

    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let sx: f64 = points.iter().map(|(x, _)| x).sum();
    let sy: f64 = points.iter().map(|(_, y)| y).sum();
    let sxx: f64 = points.iter().map(|(x, _)| x * x).sum();
    let sxy: f64 = points.iter().map(|(x, y)| x * y).sum();

    let denom = n * sxx - sx * sx;
    if denom.abs() < f64::EPSILON {
        return None;
    }
    Some((n * sxy - sx * sy) / denom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streaming::{Calibration, generate};

    #[test]
    fn test_too_few_samples_rejected() {
        let err = power_spectrum(&[1.0, 2.0], 1.0).unwrap_err();
        assert!(matches!(err, Error::InsufficientSamples { got: 2, need: 4 }));
    }

    #[test]
    fn test_sine_peaks_at_its_frequency() {
        // 64 Hz sine sampled at 1024 Hz over one second.
        let sample_rate = 1024.0;
        let samples: Vec<f64> = (0..1024)
            .map(|i| (2.0 * std::f64::consts::PI * 64.0 * i as f64 / sample_rate).sin())
            .collect();
        let spectrum = power_spectrum(&samples, sample_rate).unwrap();

        let peak_bin = spectrum
            .psd
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(spectrum.frequencies[peak_bin], 64.0);
    }

    #[test]
    fn test_flicker_noise_slope_near_minus_one() {
        let samples = generate(Calibration::default(), 4096);
        let spectrum = power_spectrum(&samples, 100e6).unwrap();
        let slope = fit_spectral_slope(&spectrum).expect("slope fit");
        assert!(
            (-1.3..=-0.7).contains(&slope),
            "spectral slope {} outside (-1.3, -0.7)",
            slope
        );
    }

    #[test]
    fn test_all_zero_trace_has_no_slope() {
        let spectrum = power_spectrum(&[0.0; 64], 1.0).unwrap();
        assert_eq!(fit_spectral_slope(&spectrum), None);
    }
}
