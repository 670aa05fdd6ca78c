//! Configuration for graph analysis, cover search and sampling.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    cover::{CoverQuery, Sides, Traversal},
    sampler::SamplerConfig,
    tictactoe::ReductionMode,
};

/// Settings shared by the `solve` and `sample` commands.
///
/// Builder-style, and loadable from a JSON file where every field is
/// optional.
///
/// # Examples
///
/// ```
/// use tictable::app::AnalysisConfig;
/// use tictable::cover::{Sides, Traversal};
///
/// let config = AnalysisConfig::new()
///     .with_sides(true, true)
///     .with_opening(None)
///     .with_traversal(Traversal::Exhaustive);
/// assert_eq!(config.sides().unwrap(), Sides::Both);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// How positions are merged while building the graph; cover search and
    /// sampling only run on the canonical graph
    pub mode: ReductionMode,
    /// The table has to serve games it opens
    pub controlled_first: bool,
    /// The table has to serve games the opponent opens
    pub adversary_first: bool,
    /// Forced opening cell; `None` allows any best move
    pub opening: Option<usize>,
    pub traversal: Traversal,
    /// Number of sampler trials
    pub trials: usize,
    /// Seed of the first sampler trial
    pub first_seed: u64,
}

impl AnalysisConfig {
    /// Controlled-first centre opening, canonical graph, skip traversal.
    pub fn new() -> Self {
        Self {
            mode: ReductionMode::Canonical,
            controlled_first: true,
            adversary_first: false,
            opening: Some(4),
            traversal: Traversal::Skip,
            trials: 1000,
            first_seed: 1,
        }
    }

    /// Read a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or fails
    /// [`AnalysisConfig::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config file {path:?}"),
            source,
        })?;
        let config: AnalysisConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).map_err(|source| Error::Io {
            operation: format!("write config file {path:?}"),
            source,
        })
    }

    pub fn with_mode(mut self, mode: ReductionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_sides(mut self, controlled_first: bool, adversary_first: bool) -> Self {
        self.controlled_first = controlled_first;
        self.adversary_first = adversary_first;
        self
    }

    pub fn with_opening(mut self, opening: Option<usize>) -> Self {
        self.opening = opening;
        self
    }

    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn with_first_seed(mut self, seed: u64) -> Self {
        self.first_seed = seed;
        self
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when the graph is not
    /// canonical, no side is selected, the opening is off the board, or there
    /// are no sampler trials.
    pub fn validate(&self) -> Result<()> {
        if self.mode != ReductionMode::Canonical {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "strategy tables need a canonical graph, got mode {}",
                    self.mode
                ),
            });
        }
        self.sides()?;
        self.cover_query()?.validate()?;
        if self.trials == 0 {
            return Err(Error::InvalidConfiguration {
                message: "trials must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn sides(&self) -> Result<Sides> {
        Sides::from_flags(self.controlled_first, self.adversary_first)
    }

    pub fn cover_query(&self) -> Result<CoverQuery> {
        Ok(CoverQuery::new(self.sides()?)
            .with_opening(self.opening)
            .with_traversal(self.traversal))
    }

    pub fn sampler_config(&self) -> Result<SamplerConfig> {
        Ok(SamplerConfig::new(self.sides()?)
            .with_opening(self.opening)
            .with_trials(self.trials)
            .with_first_seed(self.first_seed))
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn defaults_validate() {
        let config = AnalysisConfig::default();
        config.validate().unwrap();
        assert_eq!(config.cover_query().unwrap(), CoverQuery::default());
    }

    #[test]
    fn no_sides_is_rejected() {
        let config = AnalysisConfig::new().with_sides(false, false);
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn unreduced_modes_are_rejected() {
        for mode in [ReductionMode::Full, ReductionMode::Fingerprint] {
            let config = AnalysisConfig::new().with_mode(mode);
            assert!(matches!(
                config.validate(),
                Err(Error::InvalidConfiguration { .. })
            ));
        }

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"mode": "fingerprint"}"#).unwrap();
        assert!(matches!(
            AnalysisConfig::load(&path),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: AnalysisConfig =
            serde_json::from_str(r#"{"adversary_first": true, "traversal": "exhaustive"}"#).unwrap();
        assert_eq!(config.sides().unwrap(), Sides::Both);
        assert_eq!(config.traversal, Traversal::Exhaustive);
        assert_eq!(config.mode, ReductionMode::Canonical);
        assert_eq!(config.opening, Some(4));
    }

    #[test]
    fn file_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let config = AnalysisConfig::new()
            .with_sides(false, true)
            .with_opening(None)
            .with_trials(25)
            .with_first_seed(9);

        config.save(&path).unwrap();
        assert_eq!(AnalysisConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn load_rejects_invalid_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"opening": 11}"#).unwrap();
        assert!(AnalysisConfig::load(&path).is_err());

        std::fs::write(&path, r#"{"mode": "mirror"}"#).unwrap();
        assert!(matches!(
            AnalysisConfig::load(&path),
            Err(Error::Serialization(_))
        ));
    }
}
