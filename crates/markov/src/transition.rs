//! Transition counting, normalisation and sampling for one metric.

use tracing::trace;

use crate::config::RowSumCheck;
use crate::error::MarkovError;
use crate::state::StateCount;

/// Observed transition counts for one metric, `N x N`, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionCounts {
    n: usize,
    counts: Vec<u64>,
}

impl TransitionCounts {
    /// Creates an all-zero count table.
    pub fn new(states: StateCount) -> Self {
        let n = states.get();
        Self {
            n,
            counts: vec![0; n * n],
        }
    }

    /// Counts consecutive transitions in a state sequence.
    ///
    /// # Panics
    ///
    /// Panics if any state is `>= N`.
    pub fn from_states(states: StateCount, sequence: &[usize]) -> Self {
        let mut counts = Self::new(states);
        for pair in sequence.windows(2) {
            counts.record(pair[0], pair[1]);
        }
        counts
    }

    /// Records one `from -> to` transition.
    pub fn record(&mut self, from: usize, to: usize) {
        self.counts[from * self.n + to] += 1;
    }

    /// Returns the count for `from -> to`.
    pub fn get(&self, from: usize, to: usize) -> u64 {
        self.counts[from * self.n + to]
    }

    /// Returns the counts out of `from`.
    pub fn row(&self, from: usize) -> &[u64] {
        &self.counts[from * self.n..(from + 1) * self.n]
    }

    /// Total number of recorded transitions.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// An `N x N` row-stochastic transition matrix.
///
/// Row `i` holds the probabilities of moving from state `i` to each state.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    n: usize,
    probs: Vec<f64>,
}

impl TransitionMatrix {
    /// Builds a matrix from nested rows, checking the shape against `states`.
    ///
    /// Only the shape is checked here; call [`TransitionMatrix::validate`]
    /// for the probability constraints.
    pub fn from_rows(rows: Vec<Vec<f64>>, states: StateCount) -> Result<Self, MarkovError> {
        let n = states.get();
        if rows.len() != n {
            return Err(MarkovError::InvalidConfig {
                reason: format!("expected {n} rows, got {}", rows.len()),
            });
        }
        let mut probs = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(MarkovError::InvalidConfig {
                    reason: format!("row {i} has {} columns, expected {n}", row.len()),
                });
            }
            probs.extend(row);
        }
        Ok(Self { n, probs })
    }

    /// Converts counts into probabilities.
    ///
    /// Zero cells are floored to 1 before normalising, so every transition
    /// keeps a small non-zero probability. Each row is divided by its sum
    /// except the last column, which takes `1 - sum(others)` so the row
    /// sums to exactly `1.0`.
    pub fn from_counts(counts: &TransitionCounts) -> Self {
        let n = counts.n;
        let mut probs = Vec::with_capacity(n * n);
        for i in 0..n {
            probs.extend(normalize_row(counts.row(i)));
        }
        Self { n, probs }
    }

    /// Returns `N`.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Returns the transition probabilities out of `from`.
    pub fn row(&self, from: usize) -> &[f64] {
        &self.probs[from * self.n..(from + 1) * self.n]
    }

    /// Returns the probability of moving from `from` to `to`.
    pub fn prob(&self, from: usize, to: usize) -> f64 {
        self.probs[from * self.n + to]
    }

    /// Iterates rows in state order.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.probs.chunks_exact(self.n)
    }

    /// Copies the matrix out as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    /// Validates that the matrix is row-stochastic.
    ///
    /// Every entry must be finite and in `[0, 1]`, and each row's
    /// left-to-right sum must pass `check`.
    pub fn validate(&self, check: RowSumCheck) -> Result<(), MarkovError> {
        for (i, row) in self.rows().enumerate() {
            for (j, &p) in row.iter().enumerate() {
                if !p.is_finite() {
                    return Err(MarkovError::InvalidConfig {
                        reason: format!("probs[{i}][{j}] is not finite: {p}"),
                    });
                }
                if !(0.0..=1.0).contains(&p) {
                    return Err(MarkovError::InvalidConfig {
                        reason: format!("probs[{i}][{j}] = {p} is outside [0, 1]"),
                    });
                }
            }
            let sum: f64 = row.iter().sum();
            if !check.accepts(sum) {
                return Err(MarkovError::InvalidConfig {
                    reason: match check {
                        RowSumCheck::Exact => format!("row {i} sums to {sum}, expected exactly 1"),
                        RowSumCheck::Tolerance(eps) => {
                            format!("row {i} sums to {sum}, expected 1 within {eps}")
                        }
                    },
                });
            }
        }
        Ok(())
    }

    /// Samples the next state given the current state, using cumulative CDF.
    ///
    /// Draws a uniform random number in `[0, 1)` and walks through the row's
    /// cumulative distribution, returning the first state whose cumulative
    /// probability exceeds the draw. States with probability 0 are never
    /// returned. Falls back to the last state with non-zero probability if
    /// rounding prevents a match.
    pub fn sample(&self, from: usize, rng: &mut impl rand::Rng) -> usize {
        let u: f64 = rng.random();
        let row = self.row(from);
        let mut cumulative = 0.0;
        for (state, &p) in row.iter().enumerate() {
            cumulative += p;
            if cumulative > u {
                return state;
            }
        }
        row.iter().rposition(|&p| p > 0.0).unwrap_or(self.n - 1)
    }
}

/// Applies the zero floor and normalises one row of counts.
fn normalize_row(counts: &[u64]) -> Vec<f64> {
    let smoothed: Vec<f64> = counts
        .iter()
        .map(|&c| if c == 0 { 1.0 } else { c as f64 })
        .collect();
    let row_sum: f64 = smoothed.iter().sum();
    let last = smoothed.len() - 1;

    let mut probs: Vec<f64> = smoothed[..last].iter().map(|c| c / row_sum).collect();
    let head: f64 = probs.iter().sum();
    probs.push(1.0 - head);
    probs
}

/// Estimates one metric's transition matrix from its raw values.
///
/// # Errors
///
/// Returns [`MarkovError::EmptyDataset`] for fewer than 2 values and
/// [`MarkovError::NonFiniteData`] if any value is NaN or infinite.
pub fn estimate_transitions(
    series: &[f64],
    states: StateCount,
) -> Result<TransitionMatrix, MarkovError> {
    if series.len() < 2 {
        return Err(MarkovError::EmptyDataset {
            n: series.len(),
            min: 2,
        });
    }
    if series.iter().any(|v| !v.is_finite()) {
        return Err(MarkovError::NonFiniteData);
    }

    let sequence = states.classify_series(series);
    let counts = TransitionCounts::from_states(states, &sequence);
    trace!(
        n_states = states.get(),
        n_transitions = counts.total(),
        "counted transitions"
    );
    Ok(TransitionMatrix::from_counts(&counts))
}
