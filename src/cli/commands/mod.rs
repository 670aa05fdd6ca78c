//! Subcommands of the `tictable` binary

pub mod build;
pub mod lookup;
pub mod sample;
pub mod solve;

use std::path::Path;

use anyhow::{Context, Result};

use crate::{
    adapters::TableFormat,
    cli::output::create_spinner,
    cover::StrategyTable,
    tictactoe::{GameGraph, ReductionMode, score},
};

/// Build and score a graph behind a spinner.
pub(crate) fn scored_graph(mode: ReductionMode) -> Result<GameGraph> {
    let spinner = create_spinner(&format!("Building {mode} graph..."));
    let mut graph = GameGraph::build(mode);
    spinner.set_message(format!("Scoring {} positions...", graph.len()));
    let report = score(&mut graph)?;
    spinner.finish_and_clear();
    log::debug!("scored in {} passes", report.passes.len());
    Ok(graph)
}

/// Explicit format, else the one named by the extension, else JSON
pub(crate) fn table_format(path: &Path, format: Option<&str>) -> Result<TableFormat> {
    match format {
        Some(name) => Ok(name.parse()?),
        None => Ok(TableFormat::from_path(path).unwrap_or_default()),
    }
}

pub(crate) fn save_table(table: &StrategyTable, path: &Path, format: Option<&str>) -> Result<()> {
    let format = table_format(path, format)?;
    format
        .repository()
        .save(table, path)
        .with_context(|| format!("saving {format} table to {}", path.display()))?;
    println!("\nTable saved to: {} ({format})", path.display());
    Ok(())
}

pub(crate) fn load_table(path: &Path, format: Option<&str>) -> Result<StrategyTable> {
    let format = table_format(path, format)?;
    format
        .repository()
        .load(path)
        .with_context(|| format!("loading {format} table from {}", path.display()))
}
