//! The [`WorkloadGenerator`] engine.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::Rng;
use tracing::{info, info_span, warn};
use workgen_io::{
    ChainStatus, inspect_chain, load_chain, read_dataset, save_chain, write_trajectories,
};
use workgen_markov::{
    MarkovChainConfig, RowSumCheck, SamplerConfig, StateCount, TimeWindow, Trajectory,
    estimate_chain, generate_trajectories,
};

use crate::error::GeneratorError;

/// Where a trained chain is persisted unless configured otherwise.
pub const DEFAULT_CHAIN_PATH: &str = "config.json";

/// How [`WorkloadGenerator::configure_from_dataset`] obtained its chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOrigin {
    /// A persisted chain trained from the same dataset was reused.
    Cached,
    /// The chain was estimated from the dataset and persisted.
    Trained,
}

/// Trains a chain with `states` bins from `dataset` and persists it to
/// `chain_path`.
///
/// Nothing random happens here, so no engine or generator is needed.
///
/// # Errors
///
/// Any error from reading the dataset, estimating the chain or writing the
/// chain file. Nothing is written unless estimation succeeds.
pub fn train_chain(
    dataset: &Path,
    states: StateCount,
    chain_path: &Path,
) -> Result<MarkovChainConfig, GeneratorError> {
    let _span = info_span!("estimate", dataset = %dataset.display()).entered();
    let data = read_dataset(dataset)?;
    let chain = estimate_chain(data.as_series(), states, dataset)?;
    save_chain(&chain, chain_path)?;
    info!(
        n_states = states.get(),
        rows = data.len(),
        chain_path = %chain_path.display(),
        "trained chain"
    );
    Ok(chain)
}

/// Trains or loads a Markov chain and samples workload trajectories from it.
///
/// The active chain is an immutable snapshot; every successful train or
/// load replaces it wholesale and a failed one leaves it untouched.
#[derive(Debug)]
pub struct WorkloadGenerator<R> {
    rng: R,
    states: StateCount,
    row_sum_check: RowSumCheck,
    sampler: SamplerConfig,
    chain_path: PathBuf,
    chain: Option<Arc<MarkovChainConfig>>,
    trajectories: Vec<Trajectory>,
}

impl<R: Rng> WorkloadGenerator<R> {
    /// Creates an unconfigured engine with 4 states and exact row-sum checks.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            states: StateCount::default(),
            row_sum_check: RowSumCheck::default(),
            sampler: SamplerConfig::default(),
            chain_path: PathBuf::from(DEFAULT_CHAIN_PATH),
            chain: None,
            trajectories: Vec::new(),
        }
    }

    /// Sets where trained chains are written and looked up.
    pub fn with_chain_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chain_path = path.into();
        self
    }

    /// Sets the row-sum check applied when loading chains.
    pub fn with_row_sum_check(mut self, check: RowSumCheck) -> Self {
        self.row_sum_check = check;
        self
    }

    /// Sets the sampling options.
    pub fn with_sampler(mut self, sampler: SamplerConfig) -> Self {
        self.sampler = sampler;
        self
    }

    /// Sets the state count used by subsequent training and loading.
    ///
    /// The active chain keeps its own state count.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::Markov`] wrapping `InvalidParameter` if `n` is
    /// outside `[1, 20]`.
    pub fn set_state_count(&mut self, n: usize) -> Result<(), GeneratorError> {
        self.states = StateCount::new(n)?;
        Ok(())
    }

    /// Trains a chain from `dataset`, persists it to the chain path and
    /// makes it active.
    pub fn estimate_from_dataset(
        &mut self,
        dataset: &Path,
    ) -> Result<Arc<MarkovChainConfig>, GeneratorError> {
        let chain = Arc::new(train_chain(dataset, self.states, &self.chain_path)?);
        self.chain = Some(Arc::clone(&chain));
        Ok(chain)
    }

    /// Makes a chain for `dataset` active, reusing the persisted one when it
    /// is valid and was trained from the same dataset, retraining otherwise.
    ///
    /// # Errors
    ///
    /// I/O failures while inspecting the cache and any training error.
    pub fn configure_from_dataset(&mut self, dataset: &Path) -> Result<ChainOrigin, GeneratorError> {
        let status = inspect_chain(
            &self.chain_path,
            dataset,
            Some(self.states),
            self.row_sum_check,
        )?;
        match status {
            ChainStatus::Valid(chain) => {
                info!(chain_path = %self.chain_path.display(), "reusing cached chain");
                self.chain = Some(Arc::new(chain));
                return Ok(ChainOrigin::Cached);
            }
            ChainStatus::Stale { trained_from } => warn!(
                trained_from = %trained_from.display(),
                "cached chain was trained from another dataset, retraining"
            ),
            ChainStatus::Invalid { reason } => {
                warn!(%reason, "cached chain is invalid, retraining");
            }
            ChainStatus::Missing => info!(
                chain_path = %self.chain_path.display(),
                "no cached chain, training"
            ),
        }
        self.estimate_from_dataset(dataset)?;
        Ok(ChainOrigin::Trained)
    }

    /// Loads and validates a chain from `path` and makes it active.
    ///
    /// # Errors
    ///
    /// Any [`load_chain`] error; the active chain is unchanged on failure.
    pub fn load_config(&mut self, path: &Path) -> Result<Arc<MarkovChainConfig>, GeneratorError> {
        let chain = Arc::new(load_chain(path, Some(self.states), self.row_sum_check)?);
        self.chain = Some(Arc::clone(&chain));
        Ok(chain)
    }

    /// Samples `count` trajectories over `from..=to` and keeps them as the
    /// current batch, replacing the previous one.
    ///
    /// # Errors
    ///
    /// [`GeneratorError::NotConfigured`] without an active chain and
    /// `InvalidParameter` for a non-positive `step` or a window longer than
    /// [`TimeWindow::MAX_RECORDS`].
    pub fn generate(
        &mut self,
        from: i64,
        to: i64,
        step: i64,
        count: usize,
    ) -> Result<&[Trajectory], GeneratorError> {
        let chain = self.chain.as_ref().ok_or(GeneratorError::NotConfigured)?;
        let window = TimeWindow::new(from, to, step)?;
        self.trajectories =
            generate_trajectories(chain, &window, count, &self.sampler, &mut self.rng);
        info!(from, to, step, count, "generated batch");
        Ok(&self.trajectories)
    }

    /// Writes the current batch to `dir` as `1.csv`, `2.csv`, ...
    ///
    /// # Errors
    ///
    /// [`GeneratorError::Io`] if any file cannot be written; files written
    /// by this call are removed first.
    pub fn save(&self, dir: &Path) -> Result<Vec<PathBuf>, GeneratorError> {
        Ok(write_trajectories(dir, &self.trajectories)?)
    }

    /// Returns trajectory `index` of the current batch.
    pub fn get_trajectory(&self, index: usize) -> Result<&Trajectory, GeneratorError> {
        self.trajectories
            .get(index)
            .ok_or(GeneratorError::IndexOutOfRange {
                index,
                len: self.trajectories.len(),
            })
    }

    /// The active chain, if any.
    pub fn chain(&self) -> Option<&Arc<MarkovChainConfig>> {
        self.chain.as_ref()
    }

    /// Returns `true` once a chain is active.
    pub fn is_configured(&self) -> bool {
        self.chain.is_some()
    }

    /// The current batch.
    pub fn trajectories(&self) -> &[Trajectory] {
        &self.trajectories
    }

    /// State count used for the next train or load.
    pub fn state_count(&self) -> StateCount {
        self.states
    }

    /// Path chains are persisted to.
    pub fn chain_path(&self) -> &Path {
        &self.chain_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn engine() -> WorkloadGenerator<StdRng> {
        WorkloadGenerator::new(StdRng::seed_from_u64(1))
    }

    #[test]
    fn defaults() {
        let g = engine();
        assert_eq!(g.state_count().get(), 4);
        assert_eq!(g.chain_path(), Path::new(DEFAULT_CHAIN_PATH));
        assert!(!g.is_configured());
        assert!(g.trajectories().is_empty());
    }

    #[test]
    fn set_state_count_bounds() {
        let mut g = engine();
        assert!(g.set_state_count(0).is_err());
        assert!(g.set_state_count(21).is_err());
        assert_eq!(g.state_count().get(), 4);
        g.set_state_count(20).unwrap();
        assert_eq!(g.state_count().get(), 20);
    }

    #[test]
    fn generate_requires_chain() {
        let mut g = engine();
        assert!(matches!(
            g.generate(0, 100, 10, 1),
            Err(GeneratorError::NotConfigured)
        ));
    }

    #[test]
    fn get_trajectory_out_of_range() {
        let g = engine();
        assert!(matches!(
            g.get_trajectory(0),
            Err(GeneratorError::IndexOutOfRange { index: 0, len: 0 })
        ));
    }
}
