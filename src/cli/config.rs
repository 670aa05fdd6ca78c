//! Configuration flags shared by the analysis commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::{app::AnalysisConfig, cover::Sides};

/// Configuration file plus the flags that override it
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// JSON configuration file; flags override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Games the table must serve: controlled-first, adversary-first or both
    #[arg(long)]
    pub sides: Option<String>,

    /// Forced opening cell (0-8) when the table moves first, or "any"
    #[arg(long)]
    pub opening: Option<String>,
}

impl ConfigArgs {
    /// Load the file (or defaults) and apply the flags on top.
    pub fn resolve(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::load(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => AnalysisConfig::default(),
        };

        if let Some(sides) = &self.sides {
            let sides: Sides = sides.parse()?;
            config = config.with_sides(sides.controlled_first(), sides.adversary_first());
        }
        if let Some(opening) = &self.opening {
            config = config.with_opening(parse_opening(opening)?);
        }

        config.validate()?;
        Ok(config)
    }
}

/// `"any"` or `"none"` for no forced opening, otherwise a cell index
pub fn parse_opening(value: &str) -> Result<Option<usize>> {
    match value.trim().to_ascii_lowercase().as_str() {
        "any" | "none" => Ok(None),
        cell => {
            let cell: usize = cell
                .parse()
                .with_context(|| format!("opening must be a cell 0-8 or 'any', got '{value}'"))?;
            Ok(Some(cell))
        }
    }
}
