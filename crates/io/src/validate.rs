//! Accumulated validation for chain configuration files.
//!
//! Structural problems (state counts, matrix shapes) are gathered with
//! [`ValidationCollector`] so that a single error lists every one of them.
//! Numeric checks on row contents are delegated to `workgen-markov`.

use std::path::Path;

use workgen_markov::{Metric, PerMetric, StateCount};

use crate::error::IoError;

// ---------------------------------------------------------------------------
// ValidationCollector
// ---------------------------------------------------------------------------

/// Accumulates validation messages and converts them into a single
/// [`IoError::InvalidConfig`].
pub(crate) struct ValidationCollector {
    errors: Vec<String>,
}

impl ValidationCollector {
    /// Create an empty collector.
    pub(crate) fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record one validation error.
    pub(crate) fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    /// Append all messages of another collector.
    pub(crate) fn extend(&mut self, other: ValidationCollector) {
        self.errors.extend(other.errors);
    }

    /// Returns `true` when no errors have been recorded.
    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of recorded errors.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    /// Consume the collector and return `Ok(())` if nothing was recorded,
    /// or `Err(IoError::InvalidConfig)` joining every message with `"; "`.
    pub(crate) fn finish(self, path: &Path) -> Result<(), IoError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(IoError::InvalidConfig {
                path: path.to_path_buf(),
                reason: self.errors.join("; "),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// State count resolution
// ---------------------------------------------------------------------------

/// Determine the state count a configuration file declares.
///
/// Precedence: the file's own `States`, then the caller's expectation, then
/// the number of CPU rows. A declared count that disagrees with the caller's
/// expectation is an error.
pub(crate) fn resolve_state_count(
    declared: Option<usize>,
    expected: Option<StateCount>,
    cpu_rows: usize,
    path: &Path,
) -> Result<StateCount, IoError> {
    let raw = declared
        .or(expected.map(StateCount::get))
        .unwrap_or(cpu_rows);

    let states = StateCount::new(raw).map_err(|e| IoError::InvalidConfig {
        path: path.to_path_buf(),
        reason: format!("declared state count: {e}"),
    })?;

    if let Some(expected) = expected
        && expected != states
    {
        return Err(IoError::InvalidConfig {
            path: path.to_path_buf(),
            reason: format!("file declares {states} states, expected {expected}"),
        });
    }
    Ok(states)
}

// ---------------------------------------------------------------------------
// Shape checks
// ---------------------------------------------------------------------------

/// Check that one metric's matrix is `n x n`.
///
/// Records one message for a wrong row count and one per ragged row.
pub(crate) fn validate_shape(metric: Metric, rows: &[Vec<f64>], n: StateCount) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    let n = n.get();

    if rows.len() != n {
        c.push(format!("{metric}: expected {n} rows, got {}", rows.len()));
    }
    for (i, row) in rows.iter().enumerate() {
        if row.len() != n {
            c.push(format!(
                "{metric}: row {i} has {} columns, expected {n}",
                row.len()
            ));
        }
    }

    c
}

/// Check all three matrices at once.
pub(crate) fn validate_shapes(rows: &PerMetric<Vec<Vec<f64>>>, n: StateCount) -> ValidationCollector {
    let mut c = ValidationCollector::new();
    for (metric, metric_rows) in rows.iter() {
        c.extend(validate_shape(metric, metric_rows, n));
    }
    c
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn n(k: usize) -> StateCount {
        StateCount::new(k).unwrap()
    }

    // -- ValidationCollector -------------------------------------------------

    #[test]
    fn collector_empty_is_ok() {
        let c = ValidationCollector::new();
        assert!(c.is_empty());
        assert_eq!(c.len(), 0);
        assert!(c.finish(Path::new("c.json")).is_ok());
    }

    #[test]
    fn collector_non_empty_joins_messages() {
        let mut c = ValidationCollector::new();
        c.push("error one");
        c.push("error two");
        assert_eq!(c.len(), 2);

        match c.finish(Path::new("c.json")).unwrap_err() {
            IoError::InvalidConfig { path, reason } => {
                assert_eq!(path, Path::new("c.json"));
                assert_eq!(reason, "error one; error two");
            }
            other => panic!("expected IoError::InvalidConfig, got {other:?}"),
        }
    }

    // -- resolve_state_count -------------------------------------------------

    #[test]
    fn declared_count_wins() {
        let s = resolve_state_count(Some(5), None, 3, Path::new("c")).unwrap();
        assert_eq!(s, n(5));
    }

    #[test]
    fn expected_count_used_when_undeclared() {
        let s = resolve_state_count(None, Some(n(6)), 3, Path::new("c")).unwrap();
        assert_eq!(s, n(6));
    }

    #[test]
    fn row_count_is_last_resort() {
        let s = resolve_state_count(None, None, 7, Path::new("c")).unwrap();
        assert_eq!(s, n(7));
    }

    #[test]
    fn declared_expected_disagreement() {
        let err = resolve_state_count(Some(4), Some(n(5)), 4, Path::new("c")).unwrap_err();
        assert!(err.to_string().contains("declares 4 states, expected 5"), "{err}");
    }

    #[test]
    fn out_of_range_declared_count() {
        assert!(resolve_state_count(Some(21), None, 21, Path::new("c")).is_err());
        assert!(resolve_state_count(None, None, 0, Path::new("c")).is_err());
    }

    // -- validate_shape ------------------------------------------------------

    #[test]
    fn square_matrix_is_clean() {
        let rows = vec![vec![0.5, 0.5], vec![1.0, 0.0]];
        assert!(validate_shape(Metric::Cpu, &rows, n(2)).is_empty());
    }

    #[test]
    fn wrong_row_count_and_ragged_rows() {
        let rows = vec![vec![0.5, 0.5], vec![1.0], vec![0.0, 0.0, 1.0]];
        let c = validate_shape(Metric::Memory, &rows, n(2));
        assert_eq!(c.len(), 3);
        let reason = match c.finish(Path::new("c")).unwrap_err() {
            IoError::InvalidConfig { reason, .. } => reason,
            other => panic!("unexpected {other:?}"),
        };
        assert!(reason.contains("Memory: expected 2 rows, got 3"));
        assert!(reason.contains("Memory: row 1 has 1 columns, expected 2"));
        assert!(reason.contains("Memory: row 2 has 3 columns, expected 2"));
    }

    #[test]
    fn shapes_reports_every_metric() {
        let good = vec![vec![1.0]];
        let bad = vec![vec![1.0], vec![1.0]];
        let rows = PerMetric::new(bad.clone(), good, bad);
        let c = validate_shapes(&rows, n(1));
        assert_eq!(c.len(), 2);
    }
}
