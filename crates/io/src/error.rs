//! Error types for workgen-io.

use std::path::PathBuf;

use workgen_markov::MarkovError;

/// Error type for all fallible operations in the workgen-io crate.
///
/// Covers filesystem failures, malformed dataset files, invalid chain
/// configuration files and errors bubbled up from the estimator.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when a required file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path that could not be found.
        path: PathBuf,
    },

    /// Wraps an operating-system I/O failure.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Returned when a dataset header does not match the expected columns.
    #[error("schema error in {}: {reason}", path.display())]
    Schema {
        /// Dataset path.
        path: PathBuf,
        /// What was wrong with the header.
        reason: String,
    },

    /// Returned when a dataset row cannot be parsed.
    #[error("parse error in {} at line {line}: {reason}", path.display())]
    Parse {
        /// Dataset path.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What was wrong with the row.
        reason: String,
    },

    /// Returned when a chain configuration file is readable but invalid.
    #[error("invalid configuration in {}: {reason}", path.display())]
    InvalidConfig {
        /// Configuration path.
        path: PathBuf,
        /// Human-readable reason.
        reason: String,
    },

    /// Returned when a configuration cannot be serialised.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialisation failure.
        reason: String,
    },

    /// Wraps an error from the Markov chain crate.
    #[error(transparent)]
    Markov(#[from] MarkovError),
}

impl IoError {
    /// Maps an open/read error, distinguishing a missing file.
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound { path }
        } else {
            IoError::Io { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = IoError::FileNotFound {
            path: PathBuf::from("/tmp/missing.csv"),
        };
        assert_eq!(err.to_string(), "file not found: /tmp/missing.csv");
    }

    #[test]
    fn display_schema() {
        let err = IoError::Schema {
            path: PathBuf::from("w.csv"),
            reason: "expected 4 columns, got 3".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "schema error in w.csv: expected 4 columns, got 3"
        );
    }

    #[test]
    fn display_parse() {
        let err = IoError::Parse {
            path: PathBuf::from("w.csv"),
            line: 7,
            reason: "invalid CPU value 'abc'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "parse error in w.csv at line 7: invalid CPU value 'abc'"
        );
    }

    #[test]
    fn display_invalid_config() {
        let err = IoError::InvalidConfig {
            path: PathBuf::from("config.json"),
            reason: "CPU: row 2 sums to 0.9".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid configuration in config.json: CPU: row 2 sums to 0.9"
        );
    }

    #[test]
    fn from_io_not_found_maps_to_file_not_found() {
        let src = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = IoError::from_io("a.csv", src);
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }

    #[test]
    fn from_io_other_keeps_source() {
        let src = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = IoError::from_io("a.csv", src);
        assert!(matches!(err, IoError::Io { .. }));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn from_markov_error() {
        let err: IoError = MarkovError::NonFiniteData.into();
        assert!(matches!(err, IoError::Markov(MarkovError::NonFiniteData)));
        assert_eq!(err.to_string(), "input data contains non-finite values");
    }

    #[test]
    fn error_is_send_sync_and_std_error() {
        fn assert_bounds<T: Send + Sync + std::error::Error>() {}
        assert_bounds::<IoError>();
    }
}
