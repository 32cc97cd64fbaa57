//! Generate command: resolve a chain, sample trajectories and write them.

use anyhow::{Context, Result, bail};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, info_span};

use workgen_generator::WorkloadGenerator;

use crate::cli::GenerateArgs;
use crate::config::{TimeToml, WorkgenConfig};
use crate::convert::{self, ChainMode};

/// Run the generation pipeline.
pub fn run(args: GenerateArgs) -> Result<()> {
    let _cmd = info_span!("generate").entered();

    // 1. Load TOML and apply CLI overrides
    let toml_str = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let mut config: WorkgenConfig =
        toml::from_str(&toml_str).context("failed to parse TOML config")?;
    apply_overrides(&mut config, &args);

    // 2. Build library configs
    let mode = convert::parse_chain_mode(&config.chain.mode)?;
    let check = convert::build_row_sum_check(config.chain.row_sum_tolerance)?;
    let sampler = convert::build_sampler_config(&config.sampler)?;
    let (from, to) = convert::resolve_window(&config.generate, chrono::Utc::now().timestamp())?;

    // 3. Seeded RNG
    let rng = match config.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };

    let mut engine = WorkloadGenerator::new(rng)
        .with_chain_path(&config.chain.path)
        .with_row_sum_check(check)
        .with_sampler(sampler);
    engine
        .set_state_count(config.chain.states)
        .context("invalid [chain].states")?;

    // 4. Resolve the chain
    match mode {
        ChainMode::Dataset => {
            let Some(dataset) = config.chain.dataset.as_ref() else {
                bail!("no dataset: set [chain].dataset or use mode = \"config\"");
            };
            let origin = engine
                .configure_from_dataset(dataset)
                .with_context(|| format!("failed to configure from {}", dataset.display()))?;
            info!(?origin, dataset = %dataset.display(), "chain ready");
        }
        ChainMode::Config => {
            engine.load_config(&config.chain.path).with_context(|| {
                format!("failed to load chain: {}", config.chain.path.display())
            })?;
        }
    }

    // 5. Generate and write
    let batch = engine
        .generate(from, to, config.generate.step, config.generate.count)
        .context("generation failed")?;
    info!(
        count = batch.len(),
        records = batch.first().map_or(0, |t| t.len()),
        "trajectories generated"
    );

    let output = &config.generate.output;
    std::fs::create_dir_all(output)
        .with_context(|| format!("failed to create output dir: {}", output.display()))?;
    let files = engine
        .save(output)
        .with_context(|| format!("failed to write trajectories to {}", output.display()))?;
    info!(n_files = files.len(), dir = %output.display(), "trajectories written");

    Ok(())
}

fn apply_overrides(config: &mut WorkgenConfig, args: &GenerateArgs) {
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(ref output) = args.output {
        config.generate.output = output.clone();
    }
    if let Some(count) = args.count {
        config.generate.count = count;
    }
    if let Some(ref from) = args.from {
        config.generate.from = Some(TimeToml::Text(from.clone()));
    }
    if let Some(ref to) = args.to {
        config.generate.to = Some(TimeToml::Text(to.clone()));
    }
    if let Some(step) = args.step {
        config.generate.step = step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args() -> GenerateArgs {
        GenerateArgs {
            config: PathBuf::from("workgen.toml"),
            seed: None,
            output: None,
            count: None,
            from: None,
            to: None,
            step: None,
        }
    }

    #[test]
    fn no_overrides_keep_config() {
        let mut cfg = WorkgenConfig::default();
        apply_overrides(&mut cfg, &args());
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.generate.count, 1);
        assert_eq!(cfg.generate.from, None);
    }

    #[test]
    fn overrides_replace_config() {
        let mut cfg = WorkgenConfig::default();
        let a = GenerateArgs {
            seed: Some(7),
            output: Some(PathBuf::from("out")),
            count: Some(5),
            from: Some("100".into()),
            to: Some("2024-01-01 00:00:00".into()),
            step: Some(1),
            ..args()
        };
        apply_overrides(&mut cfg, &a);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.generate.output, PathBuf::from("out"));
        assert_eq!(cfg.generate.count, 5);
        assert_eq!(cfg.generate.step, 1);
        let (from, to) = convert::resolve_window(&cfg.generate, 0).unwrap();
        assert_eq!((from, to), (100, 1_704_067_200));
    }
}
