//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;

use crate::config::*;

use workgen_markov::{Coupling, InitialState, RowSumCheck, SamplerConfig};

/// Format accepted for textual timestamps, interpreted as UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default window length when `to` is not configured.
pub const DEFAULT_WINDOW_SECS: i64 = 3600;

/// How `generate` obtains its chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainMode {
    /// Resolve through the cache: reuse a matching chain file or retrain.
    Dataset,
    /// Load the chain file as is.
    Config,
}

/// Parses a chain mode name.
pub fn parse_chain_mode(s: &str) -> Result<ChainMode> {
    match s.to_lowercase().as_str() {
        "dataset" => Ok(ChainMode::Dataset),
        "config" => Ok(ChainMode::Config),
        other => bail!("unknown chain mode: {other:?}"),
    }
}

/// Parses a coupling name into the corresponding enum variant.
pub fn parse_coupling(s: &str) -> Result<Coupling> {
    match s.to_lowercase().as_str() {
        "cpu" | "cpu-indexed" => Ok(Coupling::CpuIndexed),
        "per-metric" => Ok(Coupling::PerMetric),
        other => bail!("unknown coupling: {other:?}"),
    }
}

/// Parses an initial-state policy name into the corresponding enum variant.
pub fn parse_initial_state(s: &str) -> Result<InitialState> {
    match s.to_lowercase().as_str() {
        "shared" => Ok(InitialState::Shared),
        "independent" => Ok(InitialState::Independent),
        other => bail!("unknown initial state policy: {other:?}"),
    }
}

/// Parses a timestamp given as integer seconds or as [`TIMESTAMP_FORMAT`] in UTC.
pub fn parse_timestamp(s: &str) -> Result<i64> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<i64>() {
        return Ok(secs);
    }
    let dt = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .with_context(|| format!("invalid timestamp {s:?}: expected seconds or {TIMESTAMP_FORMAT}"))?;
    Ok(dt.and_utc().timestamp())
}

/// Resolves a configured point in time to seconds.
pub fn resolve_time(t: &TimeToml) -> Result<i64> {
    match t {
        TimeToml::Seconds(s) => Ok(*s),
        TimeToml::Text(s) => parse_timestamp(s),
    }
}

/// Resolves the `[generate]` window bounds.
///
/// A missing `from` means `now`; a missing `to` means one hour after `from`.
pub fn resolve_window(generate: &GenerateToml, now: i64) -> Result<(i64, i64)> {
    let from = generate.from.as_ref().map(resolve_time).transpose()?.unwrap_or(now);
    let to = match generate.to.as_ref() {
        Some(t) => resolve_time(t)?,
        None => from.saturating_add(DEFAULT_WINDOW_SECS),
    };
    Ok((from, to))
}

/// Builds a [`RowSumCheck`] from an optional tolerance.
pub fn build_row_sum_check(tolerance: Option<f64>) -> Result<RowSumCheck> {
    let check = match tolerance {
        Some(eps) => RowSumCheck::Tolerance(eps),
        None => RowSumCheck::Exact,
    };
    check.validate().context("invalid row_sum_tolerance")?;
    Ok(check)
}

/// Builds a [`SamplerConfig`] from the TOML sampler configuration.
pub fn build_sampler_config(sampler: &SamplerToml) -> Result<SamplerConfig> {
    Ok(SamplerConfig::new()
        .with_coupling(parse_coupling(&sampler.coupling)?)
        .with_initial_state(parse_initial_state(&sampler.initial_state)?))
}
