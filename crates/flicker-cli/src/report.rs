//! JSON verification report for trace files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of checking one property of a trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyCheck {
    /// Property name ("rms", "spectral_slope").
    pub name: String,
    /// Whether the property is within tolerance.
    pub passed: bool,
    /// Expected value.
    pub expected: f64,
    /// Measured value.
    pub measured: f64,
    /// Allowed absolute deviation.
    pub tolerance: f64,
}

impl PropertyCheck {
    pub fn new(name: &str, expected: f64, measured: f64, tolerance: f64) -> Self {
        Self {
            name: name.to_string(),
            passed: (measured - expected).abs() <= tolerance,
            expected,
            measured,
            tolerance,
        }
    }
}

/// Complete verification report for one trace file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReport {
    /// Path to the trace file.
    pub trace_path: PathBuf,
    /// Number of samples in the trace.
    pub samples: usize,
    /// Trace mean (should be near zero).
    pub mean: f64,
    /// Whether all checks passed.
    pub passed: bool,
    /// Per-property results.
    pub checks: Vec<PropertyCheck>,
}

impl VerifyReport {
    pub fn new(trace_path: PathBuf, samples: usize, mean: f64, checks: Vec<PropertyCheck>) -> Self {
        Self {
            trace_path,
            samples,
            mean,
            passed: checks.iter().all(|c| c.passed),
            checks,
        }
    }
}
