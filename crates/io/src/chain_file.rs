//! JSON persistence for trained Markov chains.
//!
//! ```json
//! { "DatasetPath": "workload.csv",
//!   "States": 4,
//!   "MarkovChain": { "CPU": [[...]], "Memory": [[...]], "Network": [[...]] } }
//! ```
//!
//! `States` is always written but optional on read.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use workgen_markov::{MarkovChainConfig, MarkovError, Metric, PerMetric, RowSumCheck, StateCount};

use crate::error::IoError;
use crate::validate::{resolve_state_count, validate_shapes};

#[derive(Debug, Serialize, Deserialize)]
struct ChainFile {
    #[serde(rename = "DatasetPath")]
    dataset_path: String,
    #[serde(rename = "States", default, skip_serializing_if = "Option::is_none")]
    states: Option<usize>,
    #[serde(rename = "MarkovChain")]
    markov_chain: MatrixSet,
}

#[derive(Debug, Serialize, Deserialize)]
struct MatrixSet {
    #[serde(rename = "CPU")]
    cpu: Vec<Vec<f64>>,
    #[serde(rename = "Memory")]
    memory: Vec<Vec<f64>>,
    #[serde(rename = "Network")]
    network: Vec<Vec<f64>>,
}

/// Outcome of checking a persisted chain against a dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainStatus {
    /// Loadable, valid and trained from the requested dataset.
    Valid(MarkovChainConfig),
    /// Valid, but trained from a different dataset.
    Stale {
        /// Dataset recorded in the file.
        trained_from: PathBuf,
    },
    /// Present but not a usable configuration.
    Invalid {
        /// Why the file was rejected.
        reason: String,
    },
    /// No file, or an empty one.
    Missing,
}

/// Write `chain` to `path`, overwriting any existing file.
///
/// # Errors
///
/// [`IoError::Serialization`] if the dataset path is not valid UTF-8 and
/// [`IoError::Io`] if the file cannot be written.
pub fn save_chain(chain: &MarkovChainConfig, path: &Path) -> Result<(), IoError> {
    let dataset_path = chain
        .dataset_path()
        .to_str()
        .ok_or_else(|| IoError::Serialization {
            reason: format!(
                "dataset path {} is not valid UTF-8",
                chain.dataset_path().display()
            ),
        })?
        .to_string();

    let file = ChainFile {
        dataset_path,
        states: Some(chain.states().get()),
        markov_chain: MatrixSet {
            cpu: chain.matrix(Metric::Cpu).to_rows(),
            memory: chain.matrix(Metric::Memory).to_rows(),
            network: chain.matrix(Metric::Network).to_rows(),
        },
    };
    let json = serde_json::to_string(&file).map_err(|e| IoError::Serialization {
        reason: e.to_string(),
    })?;

    fs::write(path, json).map_err(|source| IoError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        n_states = chain.states().get(),
        "saved chain configuration"
    );
    Ok(())
}

/// Load and validate a chain from `path`.
///
/// The state count is taken from the file's `States`, else `expected`, else
/// the number of CPU rows. Every matrix must be `N x N` with entries in
/// `[0, 1]` and rows accepted by `check`.
///
/// # Errors
///
/// [`IoError::FileNotFound`] for a missing file, [`IoError::Io`] for other
/// read failures and [`IoError::InvalidConfig`] for malformed JSON or a
/// matrix that fails validation.
pub fn load_chain(
    path: &Path,
    expected: Option<StateCount>,
    check: RowSumCheck,
) -> Result<MarkovChainConfig, IoError> {
    let text = fs::read_to_string(path).map_err(|e| IoError::from_io(path, e))?;
    let chain = parse_chain(&text, path, expected, check)?;
    info!(
        path = %path.display(),
        n_states = chain.states().get(),
        dataset = %chain.dataset_path().display(),
        "loaded chain configuration"
    );
    Ok(chain)
}

/// Decide whether the chain at `path` can be reused for `dataset`.
///
/// Only genuine I/O failures are returned as errors; every other outcome is
/// a [`ChainStatus`].
pub fn inspect_chain(
    path: &Path,
    dataset: &Path,
    expected: Option<StateCount>,
    check: RowSumCheck,
) -> Result<ChainStatus, IoError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ChainStatus::Missing),
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
            return Ok(ChainStatus::Invalid {
                reason: "file is not valid UTF-8".to_string(),
            });
        }
        Err(source) => {
            return Err(IoError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if text.trim().is_empty() {
        return Ok(ChainStatus::Missing);
    }

    let status = match parse_chain(&text, path, expected, check) {
        Ok(chain) if chain.is_trained_from(dataset) => ChainStatus::Valid(chain),
        Ok(chain) => ChainStatus::Stale {
            trained_from: chain.dataset_path().to_path_buf(),
        },
        Err(IoError::InvalidConfig { reason, .. }) => ChainStatus::Invalid { reason },
        Err(other) => return Err(other),
    };
    debug!(path = %path.display(), status = status_label(&status), "inspected chain configuration");
    Ok(status)
}

fn status_label(status: &ChainStatus) -> &'static str {
    match status {
        ChainStatus::Valid(_) => "valid",
        ChainStatus::Stale { .. } => "stale",
        ChainStatus::Invalid { .. } => "invalid",
        ChainStatus::Missing => "missing",
    }
}

fn parse_chain(
    text: &str,
    path: &Path,
    expected: Option<StateCount>,
    check: RowSumCheck,
) -> Result<MarkovChainConfig, IoError> {
    let file: ChainFile = serde_json::from_str(text).map_err(|e| IoError::InvalidConfig {
        path: path.to_path_buf(),
        reason: format!("not a chain configuration: {e}"),
    })?;

    let states = resolve_state_count(
        file.states,
        expected,
        file.markov_chain.cpu.len(),
        path,
    )?;

    let MatrixSet {
        cpu,
        memory,
        network,
    } = file.markov_chain;
    let rows = PerMetric::new(cpu, memory, network);
    validate_shapes(&rows, states).finish(path)?;

    MarkovChainConfig::from_rows(states, rows, file.dataset_path, check).map_err(|e| match e {
        MarkovError::InvalidConfig { reason } => IoError::InvalidConfig {
            path: path.to_path_buf(),
            reason,
        },
        other => IoError::Markov(other),
    })
}
