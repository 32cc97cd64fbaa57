//! Discretisation of percentage-like metric values into equal-width states.

use std::ops::Range;

use crate::error::MarkovError;

/// Number of discrete states shared by all three metrics.
///
/// Values are assumed to lie in `[0, 100)`; the range is split into `N`
/// equal-width bins of `100 / N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateCount(usize);

impl StateCount {
    /// Smallest supported state count.
    pub const MIN: usize = 1;
    /// Largest supported state count.
    pub const MAX: usize = 20;
    /// Upper end of the metric scale.
    pub const SCALE: f64 = 100.0;

    /// Creates a state count, rejecting values outside `1..=20`.
    pub fn new(n: usize) -> Result<Self, MarkovError> {
        if !(Self::MIN..=Self::MAX).contains(&n) {
            return Err(MarkovError::InvalidParameter {
                reason: format!(
                    "state count must be in {}..={}, got {n}",
                    Self::MIN,
                    Self::MAX
                ),
            });
        }
        Ok(Self(n))
    }

    /// Returns `N`.
    pub fn get(self) -> usize {
        self.0
    }

    /// Width of one bin, `100 / N`.
    pub fn bin_width(self) -> f64 {
        Self::SCALE / self.0 as f64
    }

    /// Maps a continuous value to its zero-based state.
    ///
    /// Picks the smallest `i` in `1..=N` with `value <= i * width` and
    /// returns `i - 1`. A value on a bin edge therefore lands in the lower
    /// bin; anything above the last edge lands in the last bin.
    pub fn classify(self, value: f64) -> usize {
        let width = self.bin_width();
        (1..=self.0)
            .find(|&i| value <= i as f64 * width)
            .map_or(self.0 - 1, |i| i - 1)
    }

    /// Classifies a whole series.
    pub fn classify_series(self, values: &[f64]) -> Vec<usize> {
        values.iter().map(|&v| self.classify(v)).collect()
    }

    /// Returns the half-open value range `[s * width, (s + 1) * width)` of a state.
    ///
    /// # Panics
    ///
    /// Panics if `state >= N`.
    pub fn bin_range(self, state: usize) -> Range<f64> {
        assert!(state < self.0, "state {state} out of range for N = {}", self.0);
        let width = self.bin_width();
        (state as f64 * width)..((state + 1) as f64 * width)
    }

    /// Draws a representative value uniformly from the state's bin.
    pub fn sample_value(self, state: usize, rng: &mut impl rand::Rng) -> f64 {
        rng.random_range(self.bin_range(state))
    }

    /// Draws a state uniformly from `0..N`.
    pub fn sample_state(self, rng: &mut impl rand::Rng) -> usize {
        rng.random_range(0..self.0)
    }
}

impl Default for StateCount {
    fn default() -> Self {
        Self(4)
    }
}

impl TryFrom<usize> for StateCount {
    type Error = MarkovError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        Self::new(n)
    }
}

impl std::fmt::Display for StateCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
