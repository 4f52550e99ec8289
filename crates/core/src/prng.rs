//! Injectable randomness for per-agent parameters.
//!
//! Agents draw their repulsion density and maximum offset from a
//! [`RandomSource`]. The default source is [`Xorshift64`], seeded from the
//! scene config so a run can be replayed exactly; tests can plug in a fixed
//! sequence instead.

use serde::{Deserialize, Serialize};

/// A source of uniformly distributed floats in [0, 1).
pub trait RandomSource {
    /// Returns the next value in [0, 1).
    fn next_f64(&mut self) -> f64;

    /// Returns a value in [min, max).
    fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }
}

/// Xorshift64 PRNG with shifts (13, 7, 17).
///
/// A seed of 0 is replaced with a fixed non-zero fallback, since zero is a
/// fixed point of the algorithm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
}

impl RandomSource for Xorshift64 {
    /// Upper 53 bits of `next_u64()` over 2^53.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// Values are clamped into [0, 1). An empty list always yields 0.
#[derive(Debug, Clone, Default)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl RandomSource for SequenceSource {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
