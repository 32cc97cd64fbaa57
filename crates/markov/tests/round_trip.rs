use rand::SeedableRng;
use rand::rngs::StdRng;
use workgen_markov::{
    Coupling, InitialState, MarkovChainConfig, Metric, PerMetric, RowSumCheck, SamplerConfig,
    StateCount, TimeWindow, estimate_chain, generate_trajectories,
};

/// Generate a synthetic training dataset of `n_rows` rows.
///
/// CPU drifts as a bounded random walk, Memory tracks CPU loosely and
/// Network is bursty, so every metric visits several states.
fn synthetic_data(n_rows: usize, seed: u64) -> PerMetric<Vec<f64>> {
    use rand::Rng;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut cpu = Vec::with_capacity(n_rows);
    let mut memory = Vec::with_capacity(n_rows);
    let mut network = Vec::with_capacity(n_rows);

    let mut level: f64 = 50.0;
    for _ in 0..n_rows {
        level = (level + rng.random_range(-8.0..8.0)).clamp(0.0, 99.0);
        cpu.push(level);
        memory.push((level * 0.6 + rng.random_range(0.0..30.0)).min(99.0));
        network.push(if rng.random_bool(0.2) {
            rng.random_range(60.0..99.0)
        } else {
            rng.random_range(0.0..10.0)
        });
    }
    PerMetric::new(cpu, memory, network)
}

fn train(data: &PerMetric<Vec<f64>>, states: usize) -> MarkovChainConfig {
    let series = PerMetric::from_fn(|m| data[m].as_slice());
    estimate_chain(series, StateCount::new(states).unwrap(), "training.csv")
        .expect("estimate_chain failed")
}

// ---------------------------------------------------------------------------
// 1. rows_are_exactly_stochastic
// ---------------------------------------------------------------------------
#[test]
fn rows_are_exactly_stochastic() {
    let data = synthetic_data(2_000, 1);
    for states in 1..=20 {
        let chain = train(&data, states);
        chain
            .validate(RowSumCheck::Exact)
            .unwrap_or_else(|e| panic!("N = {states}: {e}"));
    }
}

// ---------------------------------------------------------------------------
// 2. rebuild_from_rows_is_identical
// ---------------------------------------------------------------------------
#[test]
fn rebuild_from_rows_is_identical() {
    let data = synthetic_data(1_000, 2);
    for states in 1..=20 {
        let chain = train(&data, states);
        let rows = PerMetric::from_fn(|m| chain.matrix(m).to_rows());
        let rebuilt = MarkovChainConfig::from_rows(
            chain.states(),
            rows,
            chain.dataset_path(),
            RowSumCheck::Exact,
        )
        .expect("estimated rows must pass exact validation");
        assert_eq!(rebuilt, chain, "N = {states}");
    }
}

// ---------------------------------------------------------------------------
// 3. deterministic_with_seed
// ---------------------------------------------------------------------------
#[test]
fn deterministic_with_seed() {
    let chain = train(&synthetic_data(1_000, 3), 5);
    let window = TimeWindow::new(1_700_000_000, 1_700_003_600, 10).unwrap();
    let sampler = SamplerConfig::new();

    let a = generate_trajectories(&chain, &window, 4, &sampler, &mut StdRng::seed_from_u64(42));
    let b = generate_trajectories(&chain, &window, 4, &sampler, &mut StdRng::seed_from_u64(42));
    assert_eq!(a, b, "same seed must produce identical output");

    let c = generate_trajectories(&chain, &window, 4, &sampler, &mut StdRng::seed_from_u64(43));
    assert_ne!(a, c, "different seeds should differ");
}

// ---------------------------------------------------------------------------
// 4. per_metric_sampling_reproduces_occupancy
// ---------------------------------------------------------------------------
#[test]
fn per_metric_sampling_reproduces_occupancy() {
    let states = StateCount::new(4).unwrap();
    let data = synthetic_data(20_000, 4);
    let chain = train(&data, 4);

    let observed = occupancy(&data[Metric::Network], states);

    let sampler = SamplerConfig::new()
        .with_coupling(Coupling::PerMetric)
        .with_initial_state(InitialState::Independent);
    let window = TimeWindow::new(0, 50_000, 1).unwrap();
    let mut rng = StdRng::seed_from_u64(12345);
    let batch = generate_trajectories(&chain, &window, 1, &sampler, &mut rng);
    let simulated = occupancy(batch[0].series(Metric::Network), states);

    // Smoothing adds mass to unseen transitions, so allow a loose match.
    for s in 0..4 {
        assert!(
            (observed[s] - simulated[s]).abs() < 0.1,
            "state {s}: observed {:.3}, simulated {:.3}",
            observed[s],
            simulated[s]
        );
    }
}

fn occupancy(values: &[f64], states: StateCount) -> Vec<f64> {
    let mut counts = vec![0usize; states.get()];
    for &v in values {
        counts[states.classify(v)] += 1;
    }
    counts
        .into_iter()
        .map(|c| c as f64 / values.len() as f64)
        .collect()
}

// ---------------------------------------------------------------------------
// 5. cpu_indexed_memory_follows_cpu_rows
// ---------------------------------------------------------------------------
#[test]
fn cpu_indexed_memory_follows_cpu_rows() {
    // Memory always jumps to state 3 from CPU state 0 and to state 0 otherwise;
    // CPU stays in state 0 forever.
    let stay_zero = vec![
        vec![1.0, 0.0, 0.0, 0.0],
        vec![1.0, 0.0, 0.0, 0.0],
        vec![1.0, 0.0, 0.0, 0.0],
        vec![1.0, 0.0, 0.0, 0.0],
    ];
    let memory = vec![
        vec![0.0, 0.0, 0.0, 1.0],
        vec![1.0, 0.0, 0.0, 0.0],
        vec![1.0, 0.0, 0.0, 0.0],
        vec![1.0, 0.0, 0.0, 0.0],
    ];
    let chain = MarkovChainConfig::from_rows(
        StateCount::new(4).unwrap(),
        PerMetric::new(stay_zero.clone(), memory, stay_zero),
        "hand.csv",
        RowSumCheck::Exact,
    )
    .unwrap();
    let window = TimeWindow::new(0, 100, 10).unwrap();

    let legacy = SamplerConfig::new();
    let mut rng = StdRng::seed_from_u64(5);
    let t = &generate_trajectories(&chain, &window, 1, &legacy, &mut rng)[0];
    // From step 2 on, CPU is in state 0, so Memory is pinned to state 3.
    assert!(t.series(Metric::Memory)[2..].iter().all(|&v| v >= 75.0));

    let corrected = SamplerConfig::new().with_coupling(Coupling::PerMetric);
    let mut rng = StdRng::seed_from_u64(5);
    let t = &generate_trajectories(&chain, &window, 1, &corrected, &mut rng)[0];
    // Following its own row, Memory alternates between states 3 and 0.
    let mem_states: Vec<usize> = t.series(Metric::Memory)[1..]
        .iter()
        .map(|&v| chain.states().classify(v))
        .collect();
    assert!(mem_states.windows(2).all(|w| w[0] != w[1]), "{mem_states:?}");
}
