//! Validate command: load a chain file with the same checks generation uses.

use anyhow::{Context, Result};
use tracing::info_span;

use workgen_io::load_chain;
use workgen_markov::{Metric, StateCount};

use crate::cli::ValidateArgs;
use crate::convert;

/// Run validation and print a short summary to stdout.
pub fn run(args: ValidateArgs) -> Result<()> {
    let _cmd = info_span!("validate").entered();

    let expected = args
        .states
        .map(StateCount::new)
        .transpose()
        .context("invalid --states")?;
    let check = convert::build_row_sum_check(args.tolerance)?;

    let chain = load_chain(&args.chain, expected, check)
        .with_context(|| format!("chain {} is not valid", args.chain.display()))?;

    println!(
        "{}: valid, {} states, trained from {}",
        args.chain.display(),
        chain.states(),
        chain.dataset_path().display()
    );
    for metric in Metric::ALL {
        let self_loops: Vec<String> = (0..chain.states().get())
            .map(|s| format!("{:.3}", chain.matrix(metric).prob(s, s)))
            .collect();
        println!("  {metric:<8} self-transition: [{}]", self_loops.join(", "));
    }
    Ok(())
}
