//! Synthetic trajectories: timestamped per-metric values sampled from a chain.

use tracing::debug;

use crate::chain::MarkovChainConfig;
use crate::config::SamplerConfig;
use crate::error::MarkovError;
use crate::metric::{Metric, PerMetric};
use crate::simulate::{initial_states, simulate_states};

/// Sampling window in integer seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    from: i64,
    to: i64,
    step: i64,
}

impl TimeWindow {
    /// Largest number of timestamps a single window may hold.
    pub const MAX_RECORDS: usize = 10_000_000;

    /// Creates a window covering `from..=to` in increments of `step`.
    ///
    /// `to < from` is accepted and yields a single timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`MarkovError::InvalidParameter`] if `step` is not positive or
    /// the window would hold more than [`Self::MAX_RECORDS`] timestamps.
    pub fn new(from: i64, to: i64, step: i64) -> Result<Self, MarkovError> {
        if step <= 0 {
            return Err(MarkovError::InvalidParameter {
                reason: format!("step must be positive, got {step}"),
            });
        }
        let records = record_count(from, to, step);
        if records > Self::MAX_RECORDS as i128 {
            return Err(MarkovError::InvalidParameter {
                reason: format!(
                    "window {from}..={to} with step {step} holds {records} records, limit is {}",
                    Self::MAX_RECORDS
                ),
            });
        }
        Ok(Self { from, to, step })
    }

    /// Number of timestamps in the window.
    pub fn len(&self) -> usize {
        // Bounded by MAX_RECORDS in `new`.
        record_count(self.from, self.to, self.step) as usize
    }

    /// Always false: a window holds at least `from`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// First timestamp.
    pub fn start(&self) -> i64 {
        self.from
    }

    /// Last admissible timestamp.
    pub fn end(&self) -> i64 {
        self.to
    }

    /// Step between consecutive timestamps.
    pub fn step(&self) -> i64 {
        self.step
    }

    /// All timestamps of the window: `from`, then `from + k * step` while `<= to`.
    pub fn timestamps(&self) -> Vec<i64> {
        let mut out = Vec::with_capacity(self.len());
        out.push(self.from);
        let mut t = self.from;
        while let Some(next) = t.checked_add(self.step) {
            if next > self.to {
                break;
            }
            out.push(next);
            t = next;
        }
        out
    }
}

fn record_count(from: i64, to: i64, step: i64) -> i128 {
    if to < from {
        1
    } else {
        (i128::from(to) - i128::from(from)) / i128::from(step) + 1
    }
}

/// One row of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryRecord {
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    /// CPU value.
    pub cpu: f64,
    /// Memory value.
    pub memory: f64,
    /// Network value.
    pub network: f64,
}

/// A synthetic time series, stored column-wise.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    timestamps: Vec<i64>,
    values: PerMetric<Vec<f64>>,
}

impl Trajectory {
    /// Creates a trajectory, checking that every column matches the timestamps.
    pub fn new(timestamps: Vec<i64>, values: PerMetric<Vec<f64>>) -> Result<Self, MarkovError> {
        for (metric, column) in values.iter() {
            if column.len() != timestamps.len() {
                return Err(MarkovError::LengthMismatch {
                    metric: metric.name(),
                    expected: timestamps.len(),
                    got: column.len(),
                });
            }
        }
        Ok(Self { timestamps, values })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Returns `true` if there are no records.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Returns the timestamp column.
    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    /// Returns one metric's value column.
    pub fn series(&self, metric: Metric) -> &[f64] {
        &self.values[metric]
    }

    /// Returns record `index`, if present.
    pub fn record(&self, index: usize) -> Option<TrajectoryRecord> {
        let timestamp = *self.timestamps.get(index)?;
        Some(TrajectoryRecord {
            timestamp,
            cpu: self.values[Metric::Cpu][index],
            memory: self.values[Metric::Memory][index],
            network: self.values[Metric::Network][index],
        })
    }

    /// Iterates records in time order.
    pub fn records(&self) -> impl Iterator<Item = TrajectoryRecord> + '_ {
        (0..self.len()).filter_map(|i| self.record(i))
    }
}

/// Samples one trajectory.
///
/// The first record sits at `window.start()` and carries the initial states;
/// each later timestamp advances the chain by one step. States are mapped to
/// values by a uniform draw inside their bin.
pub fn generate_trajectory(
    chain: &MarkovChainConfig,
    window: &TimeWindow,
    sampler: &SamplerConfig,
    rng: &mut impl rand::Rng,
) -> Trajectory {
    let timestamps = window.timestamps();
    let states = chain.states();

    let initial = initial_states(chain, sampler.initial_state(), rng);
    let path = simulate_states(
        chain,
        initial,
        timestamps.len() - 1,
        sampler.coupling(),
        rng,
    );

    let values = PerMetric::from_fn(|metric| {
        std::iter::once(&initial)
            .chain(&path)
            .map(|s| states.sample_value(s[metric], rng))
            .collect()
    });

    Trajectory { timestamps, values }
}

/// Samples `count` independent trajectories over the same window.
///
/// `count = 0` returns an empty batch.
pub fn generate_trajectories(
    chain: &MarkovChainConfig,
    window: &TimeWindow,
    count: usize,
    sampler: &SamplerConfig,
    rng: &mut impl rand::Rng,
) -> Vec<Trajectory> {
    let batch: Vec<Trajectory> = (0..count)
        .map(|_| generate_trajectory(chain, window, sampler, rng))
        .collect();
    debug!(
        count,
        records = batch.first().map_or(0, Trajectory::len),
        coupling = ?sampler.coupling(),
        initial_state = ?sampler.initial_state(),
        "generated trajectories"
    );
    batch
}
