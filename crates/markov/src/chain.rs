//! Trained chain snapshot: per-metric matrices plus provenance.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::RowSumCheck;
use crate::error::MarkovError;
use crate::metric::{Metric, PerMetric};
use crate::state::StateCount;
use crate::transition::{TransitionMatrix, estimate_transitions};

/// A configured Markov chain for the three workload metrics.
///
/// Instances are immutable once built. Retraining or reloading produces a
/// new value that replaces the old one wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkovChainConfig {
    states: StateCount,
    matrices: PerMetric<TransitionMatrix>,
    dataset_path: PathBuf,
}

impl MarkovChainConfig {
    /// Builds a chain from nested rows, validating shape and row sums.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::InvalidConfig`] naming the offending metric if
    /// any matrix is not `N x N` or is not row-stochastic under `check`.
    pub fn from_rows(
        states: StateCount,
        rows: PerMetric<Vec<Vec<f64>>>,
        dataset_path: impl Into<PathBuf>,
        check: RowSumCheck,
    ) -> Result<Self, MarkovError> {
        check.validate()?;
        let mut rows = rows.map(Some);
        let matrices = PerMetric::try_from_fn(|metric| {
            let metric_rows = rows[metric].take().unwrap_or_default();
            let matrix = TransitionMatrix::from_rows(metric_rows, states)
                .map_err(|e| prefix_metric(metric, e))?;
            matrix
                .validate(check)
                .map_err(|e| prefix_metric(metric, e))?;
            Ok(matrix)
        })?;
        Ok(Self {
            states,
            matrices,
            dataset_path: dataset_path.into(),
        })
    }

    /// Returns the number of discrete states.
    pub fn states(&self) -> StateCount {
        self.states
    }

    /// Returns the transition matrix of one metric.
    pub fn matrix(&self, metric: Metric) -> &TransitionMatrix {
        &self.matrices[metric]
    }

    /// Returns all three matrices.
    pub fn matrices(&self) -> &PerMetric<TransitionMatrix> {
        &self.matrices
    }

    /// Returns the dataset this chain was trained from.
    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    /// Returns `true` if this chain was trained from `dataset`.
    ///
    /// Paths are compared as given; no canonicalisation is performed.
    pub fn is_trained_from(&self, dataset: &Path) -> bool {
        self.dataset_path == dataset
    }

    /// Re-checks every matrix against `check`.
    pub fn validate(&self, check: RowSumCheck) -> Result<(), MarkovError> {
        check.validate()?;
        for (metric, matrix) in self.matrices.iter() {
            matrix
                .validate(check)
                .map_err(|e| prefix_metric(metric, e))?;
        }
        Ok(())
    }
}

fn prefix_metric(metric: Metric, err: MarkovError) -> MarkovError {
    match err {
        MarkovError::InvalidConfig { reason } => MarkovError::InvalidConfig {
            reason: format!("{metric}: {reason}"),
        },
        other => other,
    }
}

/// Estimates a chain from the three metric series of one dataset.
///
/// Each metric is discretised and counted independently; see
/// [`estimate_transitions`].
///
/// # Errors
///
/// Returns [`MarkovError::LengthMismatch`] if the series differ in length,
/// [`MarkovError::EmptyDataset`] for fewer than 2 rows and
/// [`MarkovError::NonFiniteData`] for NaN or infinite values.
pub fn estimate_chain(
    series: PerMetric<&[f64]>,
    states: StateCount,
    dataset_path: impl Into<PathBuf>,
) -> Result<MarkovChainConfig, MarkovError> {
    let expected = series[Metric::Cpu].len();
    for (metric, values) in series.iter() {
        if values.len() != expected {
            return Err(MarkovError::LengthMismatch {
                metric: metric.name(),
                expected,
                got: values.len(),
            });
        }
    }

    let matrices = PerMetric::try_from_fn(|metric| estimate_transitions(series[metric], states))?;
    let dataset_path = dataset_path.into();
    debug!(
        rows = expected,
        n_states = states.get(),
        dataset = %dataset_path.display(),
        "estimated transition matrices"
    );
    Ok(MarkovChainConfig {
        states,
        matrices,
        dataset_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(k: usize) -> StateCount {
        StateCount::new(k).unwrap()
    }

    fn uniform_rows(k: usize) -> Vec<Vec<f64>> {
        vec![vec![1.0 / k as f64; k]; k]
    }

    #[test]
    fn estimate_chain_scenario() {
        let cpu = [10.0, 30.0, 55.0, 60.0];
        let mem = [80.0, 80.0, 80.0, 5.0];
        let net = [0.0, 0.0, 0.0, 0.0];
        let chain = estimate_chain(PerMetric::new(&cpu[..], &mem[..], &net[..]), n(4), "w.csv")
            .unwrap();

        assert_eq!(chain.states(), n(4));
        assert_eq!(chain.dataset_path(), Path::new("w.csv"));
        assert!(chain.is_trained_from(Path::new("w.csv")));
        assert!(!chain.is_trained_from(Path::new("other.csv")));
        assert!(chain.validate(RowSumCheck::Exact).is_ok());

        // Memory stays in state 3 twice, then drops to 0.
        let mem_row = chain.matrix(Metric::Memory).row(3);
        assert_eq!(mem_row[0], mem_row[1]);
        assert!(mem_row[3] > mem_row[0]);
        // Network self-transitions in state 0 three times.
        let net_row = chain.matrix(Metric::Network).row(0);
        assert!(net_row[0] > net_row[1]);
    }

    #[test]
    fn estimate_chain_length_mismatch() {
        let a = [1.0, 2.0, 3.0];
        let b = [1.0, 2.0];
        let err = estimate_chain(PerMetric::new(&a[..], &a[..], &b[..]), n(4), "x").unwrap_err();
        assert_eq!(
            err,
            MarkovError::LengthMismatch {
                metric: "Network",
                expected: 3,
                got: 2
            }
        );
    }

    #[test]
    fn estimate_chain_single_row() {
        let a = [1.0];
        let err = estimate_chain(PerMetric::new(&a[..], &a[..], &a[..]), n(4), "x").unwrap_err();
        assert_eq!(err, MarkovError::EmptyDataset { n: 1, min: 2 });
    }

    #[test]
    fn from_rows_accepts_valid() {
        let rows = PerMetric::from_fn(|_| uniform_rows(4));
        let chain = MarkovChainConfig::from_rows(n(4), rows, "d.csv", RowSumCheck::Exact).unwrap();
        assert_eq!(chain.matrix(Metric::Cpu).n(), 4);
    }

    #[test]
    fn from_rows_rejects_shape_mismatch() {
        let rows = PerMetric::new(uniform_rows(4), uniform_rows(3), uniform_rows(4));
        let err =
            MarkovChainConfig::from_rows(n(4), rows, "d.csv", RowSumCheck::Exact).unwrap_err();
        match err {
            MarkovError::InvalidConfig { reason } => {
                assert!(reason.starts_with("Memory:"), "{reason}");
            }
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn from_rows_rejects_drift_only_when_exact() {
        let drift = vec![
            vec![0.7, 0.2, 0.1],
            vec![0.5, 0.25, 0.25],
            vec![0.0, 0.0, 1.0],
        ];
        let rows = PerMetric::new(uniform_rows(3), uniform_rows(3), drift);
        // 1/3 + 1/3 + 1/3 sums to exactly 1.0, so only Network can fail.
        let err = MarkovChainConfig::from_rows(n(3), rows.clone(), "d", RowSumCheck::Exact)
            .unwrap_err();
        assert!(err.to_string().contains("Network: row 0"), "{err}");
        assert!(
            MarkovChainConfig::from_rows(n(3), rows, "d", RowSumCheck::Tolerance(1e-9)).is_ok()
        );
    }

    #[test]
    fn from_rows_rejects_bad_tolerance() {
        let rows = PerMetric::from_fn(|_| uniform_rows(2));
        let err = MarkovChainConfig::from_rows(n(2), rows, "d", RowSumCheck::Tolerance(-1.0))
            .unwrap_err();
        assert!(matches!(err, MarkovError::InvalidParameter { .. }));
    }
}
