//! Error types for workgen-generator.

use workgen_io::IoError;
use workgen_markov::MarkovError;

/// Error type for [`WorkloadGenerator`](crate::WorkloadGenerator) operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Generation was requested before a chain was trained or loaded.
    #[error("no Markov chain configured: train or load one first")]
    NotConfigured,

    /// A trajectory index was outside the current batch.
    #[error("trajectory index {index} out of range for batch of {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of trajectories held.
        len: usize,
    },

    /// Wraps an estimation or sampling error.
    #[error(transparent)]
    Markov(#[from] MarkovError),

    /// Wraps a file I/O or format error.
    #[error(transparent)]
    Io(#[from] IoError),
}
