//! tictable CLI - symmetry-reduced noughts and crosses analysis
//!
//! - Building and scoring the state graph under each reduction mode
//! - Finding minimum strategy tables with a SAT solver
//! - Sampling heuristic tables with seeded random walks
//! - Looking up moves in saved tables

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tictable")]
#[command(version, about = "Minimum strategy tables for noughts and crosses", long_about = None)]
struct Cli {
    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the state graph and report its size and value
    Build(tictable::cli::commands::build::BuildArgs),

    /// Find the smallest strategy table
    Solve(tictable::cli::commands::solve::SolveArgs),

    /// Sample strategy tables with random walks
    Sample(tictable::cli::commands::sample::SampleArgs),

    /// Look up a move in a saved table
    Lookup(tictable::cli::commands::lookup::LookupArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Build(args) => tictable::cli::commands::build::execute(args),
        Commands::Solve(args) => tictable::cli::commands::solve::execute(args),
        Commands::Sample(args) => tictable::cli::commands::sample::execute(args),
        Commands::Lookup(args) => tictable::cli::commands::lookup::execute(args),
    }
}
