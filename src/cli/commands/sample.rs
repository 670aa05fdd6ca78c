//! Sample command - heuristic strategy tables from seeded random walks

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::{
    cli::{
        commands::{save_table, scored_graph},
        config::ConfigArgs,
        output::{
            create_trial_progress, print_kv, print_section, print_subsection, print_table,
            print_verify_report,
        },
    },
    sampler::MinPathSampler,
};

#[derive(Parser, Debug)]
#[command(about = "Sample small strategy tables with random walks")]
pub struct SampleArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Number of trials
    #[arg(long, short = 'n')]
    pub trials: Option<usize>,

    /// Seed of the first trial
    #[arg(long)]
    pub seed: Option<u64>,

    /// Save the best table to this file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Table file format (json, msgpack, csv); inferred from the extension
    #[arg(long)]
    pub format: Option<String>,

    /// Hide the progress bar
    #[arg(long)]
    pub quiet: bool,
}

pub fn execute(args: SampleArgs) -> Result<()> {
    let mut config = args.config.resolve()?;
    if let Some(trials) = args.trials {
        config = config.with_trials(trials);
    }
    if let Some(seed) = args.seed {
        config = config.with_first_seed(seed);
    }
    config.validate()?;
    let sampler_config = config.sampler_config()?;

    let graph = scored_graph(config.mode)?;
    let sampler = MinPathSampler::new(&graph)?;

    let progress = (!args.quiet).then(|| create_trial_progress(sampler_config.trials as u64));
    let result = sampler.run(&sampler_config, |_, best| {
        if let Some(pb) = &progress {
            pb.set_message(format!("best {best}"));
            pb.inc(1);
        }
    })?;
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    print_section(&format!("Sampled {} table", sampler_config.sides));
    print_kv("Trials", &result.trials.to_string());
    print_kv("Best seed", &result.seed.to_string());
    print_kv("Positions", &result.size.to_string());
    print_kv("Table entries", &result.table.len().to_string());

    print_subsection("Improvements");
    for (trial, size) in &result.improvements {
        println!("  trial {trial:>6}: {size} positions");
    }

    print_subsection("Verification");
    let report = result
        .table
        .verify(&graph, sampler_config.sides, sampler_config.opening)?;
    print_verify_report(&report);

    print_subsection("Table");
    print_table(&result.table);

    if let Some(path) = &args.output {
        save_table(&result.table, path, args.format.as_deref())?;
    }
    Ok(())
}
