//! Workload dataset CSV reader.
//!
//! The format is a header line `Timestamp,CPU,Memory,Network` followed by
//! one row per observation: an integer timestamp and three float values.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use workgen_markov::{Metric, PerMetric};

use crate::error::IoError;

/// Expected header columns, in order.
pub const HEADER: [&str; 4] = ["Timestamp", "CPU", "Memory", "Network"];

/// A workload dataset held column-wise.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkloadDataset {
    source: PathBuf,
    timestamps: Vec<i64>,
    values: PerMetric<Vec<f64>>,
}

impl WorkloadDataset {
    /// Path the dataset was read from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Returns `true` if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Timestamp column.
    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    /// One metric's value column.
    pub fn series(&self, metric: Metric) -> &[f64] {
        &self.values[metric]
    }

    /// All three value columns, ready for estimation.
    pub fn as_series(&self) -> PerMetric<&[f64]> {
        self.values.as_ref().map(Vec::as_slice)
    }
}

/// Read a dataset from `path`.
///
/// # Errors
///
/// [`IoError::FileNotFound`] if the file is missing, [`IoError::Io`] on other
/// read failures, [`IoError::Schema`] for a bad header and
/// [`IoError::Parse`] for a malformed row.
pub fn read_dataset(path: &Path) -> Result<WorkloadDataset, IoError> {
    let file = File::open(path).map_err(|e| IoError::from_io(path, e))?;
    let dataset = parse_dataset(BufReader::new(file), path)?;
    info!(
        path = %path.display(),
        rows = dataset.len(),
        "read workload dataset"
    );
    Ok(dataset)
}

/// Parse a dataset from any buffered reader.
///
/// `source` is recorded as the dataset's path and used in error messages.
pub fn parse_dataset(reader: impl BufRead, source: &Path) -> Result<WorkloadDataset, IoError> {
    let mut lines = reader.lines().enumerate();

    let header = match lines.next() {
        Some((_, line)) => line.map_err(|e| IoError::from_io(source, e))?,
        None => {
            return Err(IoError::Schema {
                path: source.to_path_buf(),
                reason: "file is empty".to_string(),
            });
        }
    };
    check_header(&header, source)?;

    let mut timestamps = Vec::new();
    let mut cpu = Vec::new();
    let mut memory = Vec::new();
    let mut network = Vec::new();

    for (idx, line) in lines {
        let line = line.map_err(|e| IoError::from_io(source, e))?;
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let parse_err = |reason: String| IoError::Parse {
            path: source.to_path_buf(),
            line: line_no,
            reason,
        };

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != HEADER.len() {
            return Err(parse_err(format!(
                "expected {} fields, got {}",
                HEADER.len(),
                fields.len()
            )));
        }

        let ts = fields[0]
            .parse::<i64>()
            .map_err(|_| parse_err(format!("invalid Timestamp '{}'", fields[0])))?;
        timestamps.push(ts);

        for (metric, column) in [
            (Metric::Cpu, &mut cpu),
            (Metric::Memory, &mut memory),
            (Metric::Network, &mut network),
        ] {
            let raw = fields[metric.as_index() + 1];
            let value = raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| parse_err(format!("invalid {metric} value '{raw}'")))?;
            column.push(value);
        }
    }

    debug!(rows = timestamps.len(), source = %source.display(), "parsed dataset rows");

    Ok(WorkloadDataset {
        source: source.to_path_buf(),
        timestamps,
        values: PerMetric::new(cpu, memory, network),
    })
}

fn check_header(line: &str, source: &Path) -> Result<(), IoError> {
    let line = line.strip_prefix('\u{feff}').unwrap_or(line);
    let columns: Vec<&str> = line.split(',').map(str::trim).collect();
    if columns != HEADER {
        return Err(IoError::Schema {
            path: source.to_path_buf(),
            reason: format!(
                "expected header '{}', got '{}'",
                HEADER.join(","),
                line.trim()
            ),
        });
    }
    Ok(())
}
