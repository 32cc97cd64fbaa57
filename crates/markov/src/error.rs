//! Error types for the workgen-markov crate.

/// Error type for all fallible operations in the workgen-markov crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MarkovError {
    /// Returned when a caller-supplied parameter is out of range.
    #[error("invalid parameter: {reason}")]
    InvalidParameter {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when there are too few rows to observe a transition.
    #[error("dataset too small: got {n} rows, need at least {min}")]
    EmptyDataset {
        /// Number of rows provided.
        n: usize,
        /// Minimum required.
        min: usize,
    },

    /// Returned when the per-metric series differ in length.
    #[error("length mismatch: {metric} has {got} values, expected {expected}")]
    LengthMismatch {
        /// Name of the offending metric.
        metric: &'static str,
        /// Expected length (taken from the CPU series).
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Returned when input contains NaN or infinity.
    #[error("input data contains non-finite values")]
    NonFiniteData,

    /// Returned when a set of transition matrices fails validation.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Human-readable reason.
        reason: String,
    },
}
