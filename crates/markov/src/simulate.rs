//! Markov chain state simulation.

use crate::chain::MarkovChainConfig;
use crate::config::{Coupling, InitialState};
use crate::metric::{Metric, PerMetric};

/// Draws the starting state of each metric.
pub fn initial_states(
    chain: &MarkovChainConfig,
    policy: InitialState,
    rng: &mut impl rand::Rng,
) -> PerMetric<usize> {
    let states = chain.states();
    match policy {
        InitialState::Shared => {
            let s = states.sample_state(rng);
            PerMetric::new(s, s, s)
        }
        InitialState::Independent => PerMetric::from_fn(|_| states.sample_state(rng)),
    }
}

/// Advances all three metrics by one step.
///
/// Every metric's next state is drawn before any current state is updated,
/// so under [`Coupling::CpuIndexed`] Memory and Network read the CPU state
/// of the previous step.
pub fn step_states(
    chain: &MarkovChainConfig,
    current: PerMetric<usize>,
    coupling: Coupling,
    rng: &mut impl rand::Rng,
) -> PerMetric<usize> {
    PerMetric::from_fn(|metric| {
        let from = match coupling {
            Coupling::CpuIndexed => current[Metric::Cpu],
            Coupling::PerMetric => current[metric],
        };
        chain.matrix(metric).sample(from, rng)
    })
}

/// Simulates `n_steps` states following `initial`.
///
/// The returned vector does not include `initial` itself.
pub fn simulate_states(
    chain: &MarkovChainConfig,
    initial: PerMetric<usize>,
    n_steps: usize,
    coupling: Coupling,
    rng: &mut impl rand::Rng,
) -> Vec<PerMetric<usize>> {
    let mut out = vec![initial; n_steps];
    simulate_states_into(chain, initial, coupling, rng, &mut out);
    out
}

/// Simulates states into a pre-allocated buffer, one step per element.
pub fn simulate_states_into(
    chain: &MarkovChainConfig,
    initial: PerMetric<usize>,
    coupling: Coupling,
    rng: &mut impl rand::Rng,
    out: &mut [PerMetric<usize>],
) {
    let mut prev = initial;
    for slot in out.iter_mut() {
        let next = step_states(chain, prev, coupling, rng);
        *slot = next;
        prev = next;
    }
}
