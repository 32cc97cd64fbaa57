//! Train command: estimate a chain from a dataset and persist it.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use workgen_generator::train_chain;
use workgen_markov::StateCount;

use crate::cli::TrainArgs;

/// Run training.
pub fn run(args: TrainArgs) -> Result<()> {
    let _cmd = info_span!("train").entered();

    let states = StateCount::new(args.states).context("invalid --states")?;
    let chain = train_chain(&args.dataset, states, &args.output)
        .with_context(|| format!("failed to train from {}", args.dataset.display()))?;

    info!(
        n_states = chain.states().get(),
        output = %args.output.display(),
        "chain written"
    );
    Ok(())
}
