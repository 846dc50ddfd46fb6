//! Seedable pseudo-random source for noise synthesis.
//!
//! Uses SplitMix64, a fast, high-quality mixing generator. Unlike the
//! hash-based Monte Carlo RNGs used for parameter sweeps, this one is
//! deliberately *stateful*: the noise bank consumes a single sequential
//! stream, and the whole output sequence is a pure function of the seed
//! and the call history.

/// SplitMix64 increment ("golden gamma").
const GOLDEN_GAMMA: u64 = 0x9e3779b97f4a7c15;

/// A sequential SplitMix64 stream.
///
/// For a fixed seed the stream is fully deterministic. Each call to
/// [`SplitMix64::next_u64`] advances the state exactly once; there is no
/// peek or rewind.
#[derive(Debug, Clone)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    /// Create a stream from a seed.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Advance the stream and return the next 64-bit value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }

    /// Next uniform value in [0, 1).
    ///
    /// Uses the upper 53 bits for full f64 mantissa precision.
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Next uniform value in [-1, 1).
    #[inline]
    pub fn symmetric(&mut self) -> f64 {
        2.0 * self.uniform() - 1.0
    }
}
