//! # workgen-io
//!
//! File formats around the workload Markov chain: the `Timestamp,CPU,Memory,
//! Network` dataset CSV, the JSON chain configuration (with its cache
//! validity check) and the per-trajectory CSV output.

mod chain_file;
mod dataset;
mod error;
mod trajectory_writer;
mod validate;

pub use chain_file::{ChainStatus, inspect_chain, load_chain, save_chain};
pub use dataset::{HEADER, WorkloadDataset, parse_dataset, read_dataset};
pub use error::IoError;
pub use trajectory_writer::write_trajectories;
