//! CSV output for generated trajectories.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use workgen_markov::Trajectory;

use crate::dataset::HEADER;
use crate::error::IoError;

/// Write each trajectory to `dir/<k>.csv`, numbering from 1.
///
/// Files are written in the same format the dataset reader accepts. If any
/// write fails, every file created by this call is removed before the error
/// is returned; a path that could not be opened is left as it was. Existing
/// files with the same names are overwritten.
///
/// # Errors
///
/// Returns [`IoError::Io`] if the directory does not exist or a file cannot
/// be written.
pub fn write_trajectories(dir: &Path, trajectories: &[Trajectory]) -> Result<Vec<PathBuf>, IoError> {
    let mut written = Vec::with_capacity(trajectories.len());

    for (k, trajectory) in trajectories.iter().enumerate() {
        let path = dir.join(format!("{}.csv", k + 1));
        let file = match File::create(&path) {
            Ok(file) => file,
            Err(source) => {
                remove_all(&written);
                return Err(IoError::Io { path, source });
            }
        };
        written.push(path.clone());
        if let Err(source) = write_one(file, trajectory) {
            remove_all(&written);
            return Err(IoError::Io { path, source });
        }
    }

    info!(
        dir = %dir.display(),
        files = written.len(),
        "wrote trajectories"
    );
    Ok(written)
}

fn write_one(file: File, trajectory: &Trajectory) -> std::io::Result<()> {
    let mut out = BufWriter::new(file);
    writeln!(out, "{}", HEADER.join(","))?;
    for r in trajectory.records() {
        writeln!(out, "{},{},{},{}", r.timestamp, r.cpu, r.memory, r.network)?;
    }
    out.flush()
}

fn remove_all(paths: &[PathBuf]) {
    for path in paths {
        match fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "could not remove partial output"),
        }
    }
}
