//! First-order Markov chains for synthetic CPU, memory and network usage.
//!
//! Each metric is discretised into `N` equal-width states over `[0, 100)`,
//! an `N x N` transition matrix is estimated per metric, and new series are
//! sampled by walking the chain and drawing a value inside each visited bin.
//!
//! # Pipeline
//!
//! ```text
//!  ┌──────────────┐     ┌────────────────┐     ┌──────────────────┐
//!  │    state      │────▶│  transition    │────▶│   trajectory     │
//!  │  (classify)   │     │  (estimate P)  │     │  (draw series)   │
//!  └──────────────┘     └────────────────┘     └──────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use workgen_markov::{
//!     PerMetric, SamplerConfig, StateCount, TimeWindow, estimate_chain, generate_trajectories,
//! };
//!
//! let cpu = [12.0, 40.0, 35.0, 80.0];
//! let memory = [50.0, 52.0, 55.0, 60.0];
//! let network = [5.0, 1.0, 7.0, 3.0];
//! let states = StateCount::new(4).unwrap();
//! let chain = estimate_chain(PerMetric::new(&cpu[..], &memory[..], &network[..]), states, "w.csv")
//!     .unwrap();
//!
//! let window = TimeWindow::new(0, 600, 60).unwrap();
//! let mut rng = StdRng::seed_from_u64(1);
//! let batch = generate_trajectories(&chain, &window, 2, &SamplerConfig::new(), &mut rng);
//! assert_eq!(batch.len(), 2);
//! assert_eq!(batch[0].len(), 11);
//! ```

pub mod chain;
pub mod config;
pub mod error;
pub mod metric;
pub mod simulate;
pub mod state;
pub mod trajectory;
pub mod transition;

pub use chain::{MarkovChainConfig, estimate_chain};
pub use config::{Coupling, InitialState, RowSumCheck, SamplerConfig};
pub use error::MarkovError;
pub use metric::{Metric, PerMetric};
pub use simulate::{initial_states, simulate_states, simulate_states_into, step_states};
pub use state::StateCount;
pub use trajectory::{
    TimeWindow, Trajectory, TrajectoryRecord, generate_trajectories, generate_trajectory,
};
pub use transition::{TransitionCounts, TransitionMatrix, estimate_transitions};
