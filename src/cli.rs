use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// workgen Markov-chain workload generator.
#[derive(Parser)]
#[command(
    name = "workgen",
    version,
    about = "Synthetic CPU, memory and network workload generator"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Estimate a chain from a dataset and write it as JSON.
    Train(TrainArgs),
    /// Generate trajectories as configured in a TOML file.
    Generate(GenerateArgs),
    /// Check that a chain configuration file is loadable.
    Validate(ValidateArgs),
}

/// Arguments for the `train` subcommand.
#[derive(clap::Args)]
pub struct TrainArgs {
    /// Path to the `Timestamp,CPU,Memory,Network` dataset.
    #[arg(short, long)]
    pub dataset: PathBuf,

    /// Number of discrete states per metric (1..=20).
    #[arg(short = 'n', long, default_value_t = 4)]
    pub states: usize,

    /// Where to write the chain configuration.
    #[arg(short, long, default_value = "config.json")]
    pub output: PathBuf,
}

/// Arguments for the `generate` subcommand.
#[derive(clap::Args)]
pub struct GenerateArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "workgen.toml")]
    pub config: PathBuf,

    /// Override global RNG seed from config.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Override output directory from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override number of trajectories.
    #[arg(long)]
    pub count: Option<usize>,

    /// Override window start (seconds or "YYYY-MM-DD HH:MM:SS", UTC).
    #[arg(long)]
    pub from: Option<String>,

    /// Override window end (seconds or "YYYY-MM-DD HH:MM:SS", UTC).
    #[arg(long)]
    pub to: Option<String>,

    /// Override step in seconds.
    #[arg(long)]
    pub step: Option<i64>,
}

/// Arguments for the `validate` subcommand.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Path to the chain configuration JSON.
    #[arg(short, long, default_value = "config.json")]
    pub chain: PathBuf,

    /// Expected number of states.
    #[arg(short = 'n', long)]
    pub states: Option<usize>,

    /// Accept row sums within this distance of 1 instead of exactly 1.
    #[arg(short, long)]
    pub tolerance: Option<f64>,
}
