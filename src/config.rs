use std::path::PathBuf;

use serde::Deserialize;

/// Top-level workgen configuration.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct WorkgenConfig {
    /// Global RNG seed.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Where the chain comes from.
    #[serde(default)]
    pub chain: ChainToml,

    /// Window, batch size and output.
    #[serde(default)]
    pub generate: GenerateToml,

    /// Sampling options.
    #[serde(default)]
    pub sampler: SamplerToml,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainToml {
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default)]
    pub dataset: Option<PathBuf>,
    #[serde(default = "default_chain_path")]
    pub path: PathBuf,
    #[serde(default = "default_states")]
    pub states: usize,
    #[serde(default)]
    pub row_sum_tolerance: Option<f64>,
}

impl Default for ChainToml {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            dataset: None,
            path: default_chain_path(),
            states: default_states(),
            row_sum_tolerance: None,
        }
    }
}

fn default_mode() -> String {
    "dataset".to_string()
}
fn default_chain_path() -> PathBuf {
    PathBuf::from("config.json")
}
fn default_states() -> usize {
    4
}

/// A point in time: integer seconds or a `%Y-%m-%d %H:%M:%S` string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TimeToml {
    Seconds(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateToml {
    #[serde(default)]
    pub from: Option<TimeToml>,
    #[serde(default)]
    pub to: Option<TimeToml>,
    #[serde(default = "default_step")]
    pub step: i64,
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Default for GenerateToml {
    fn default() -> Self {
        Self {
            from: None,
            to: None,
            step: default_step(),
            count: default_count(),
            output: default_output(),
        }
    }
}

fn default_step() -> i64 {
    10
}
fn default_count() -> usize {
    1
}
fn default_output() -> PathBuf {
    PathBuf::from("timeseries")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SamplerToml {
    #[serde(default = "default_coupling")]
    pub coupling: String,
    #[serde(default = "default_initial_state")]
    pub initial_state: String,
}

impl Default for SamplerToml {
    fn default() -> Self {
        Self {
            coupling: default_coupling(),
            initial_state: default_initial_state(),
        }
    }
}

fn default_coupling() -> String {
    "cpu".to_string()
}
fn default_initial_state() -> String {
    "shared".to_string()
}
