//! Randomized search for small strategy tables.
//!
//! Each trial walks the game once per side: the controlled player picks a
//! random best move, preferring moves into positions an earlier walk already
//! needed, and the adversary tries every reply. A trial is sized by every
//! position it marks, counted once per game, which is the quantity the exact
//! search minimizes. Results are upper bounds on the exact minimum found by
//! [`crate::cover::CoverSolver`].

use std::collections::{BTreeMap, HashSet};

use rand::{SeedableRng, prelude::IndexedRandom, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    cover::{Side, Sides, StrategyTable, TableEntry},
    tictactoe::{GameGraph, NodeId, ReductionMode},
};

/// Settings for a sampling run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerConfig {
    pub sides: Sides,
    /// Forced first move when the table opens
    pub opening: Option<usize>,
    pub trials: usize,
    /// Seed of the first trial; trial `i` uses `first_seed + i`
    pub first_seed: u64,
}

impl SamplerConfig {
    pub fn new(sides: Sides) -> Self {
        Self {
            sides,
            opening: Some(4),
            trials: 1000,
            first_seed: 1,
        }
    }

    pub fn with_opening(mut self, opening: Option<usize>) -> Self {
        self.opening = opening;
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
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self::new(Sides::default())
    }
}

/// Outcome of one seeded walk
#[derive(Debug, Clone)]
pub struct Trial {
    pub seed: u64,
    /// Positions the walk marks, terminal ones included, once per game
    pub size: usize,
    /// Distinct positions marked over all games
    pub marked: usize,
    /// Move chosen at each controlled, non-terminal position
    pub choices: BTreeMap<NodeId, usize>,
}

/// Best trial of a sampling run
#[derive(Debug, Clone)]
pub struct SampleResult {
    pub seed: u64,
    pub size: usize,
    pub table: StrategyTable,
    pub trials: usize,
    /// `(trial index, size)` each time the best size dropped
    pub improvements: Vec<(usize, usize)>,
}

/// Random minimal-path sampler over a scored canonical graph
pub struct MinPathSampler<'g> {
    graph: &'g GameGraph,
}

impl<'g> MinPathSampler<'g> {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for a graph that is not
    /// symmetry reduced and [`Error::GraphNotScored`] if best moves are not
    /// known yet.
    pub fn new(graph: &'g GameGraph) -> Result<Self> {
        if graph.mode() != ReductionMode::Canonical {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "sampling needs a canonical graph, got a {} graph",
                    graph.mode()
                ),
            });
        }
        if !graph.is_scored() {
            return Err(Error::GraphNotScored {
                operation: "sampling strategy tables".to_string(),
            });
        }
        Ok(Self { graph })
    }

    /// Walk every side in `sides` once with a generator seeded by `seed`.
    pub fn walk(&self, seed: u64, sides: Sides, opening: Option<usize>) -> Result<Trial> {
        let mut walk = Walk {
            graph: self.graph,
            rng: StdRng::seed_from_u64(seed),
            opening,
            marked: HashSet::new(),
            visited: HashSet::new(),
            choices: BTreeMap::new(),
        };

        let root = self.graph.root();
        for &side in sides.sides() {
            if side.controls(self.graph, root) {
                walk.controlled_ply(root, side)?;
            } else {
                walk.adversary_ply(root, side)?;
            }
        }

        Ok(Trial {
            seed,
            size: walk.visited.len(),
            marked: walk.marked.len(),
            choices: walk.choices,
        })
    }

    /// Run `config.trials` walks and keep the smallest.
    ///
    /// `on_trial` sees every trial together with the best size so far.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for zero trials, and any error
    /// a walk hits on a malformed graph.
    pub fn run(
        &self,
        config: &SamplerConfig,
        mut on_trial: impl FnMut(&Trial, usize),
    ) -> Result<SampleResult> {
        if config.trials == 0 {
            return Err(Error::InvalidConfiguration {
                message: "sampler needs at least one trial".to_string(),
            });
        }

        let mut best: Option<Trial> = None;
        let mut improvements = Vec::new();
        for index in 0..config.trials {
            let seed = config.first_seed.wrapping_add(index as u64);
            let trial = self.walk(seed, config.sides, config.opening)?;
            let improved = best.as_ref().is_none_or(|b| trial.size < b.size);
            let best_size = match &best {
                Some(b) if !improved => b.size,
                _ => trial.size,
            };
            on_trial(&trial, best_size);

            if improved {
                log::info!("min path positions {}, seed {}", trial.size, seed);
                improvements.push((index, trial.size));
                best = Some(trial);
            }
        }

        let best = best.ok_or(Error::InvalidConfiguration {
            message: "sampler produced no trials".to_string(),
        })?;
        let table = self.table_for(&best)?;
        Ok(SampleResult {
            seed: best.seed,
            size: best.size,
            table,
            trials: config.trials,
            improvements,
        })
    }

    /// Strategy table holding the choices of `trial`.
    pub fn table_for(&self, trial: &Trial) -> Result<StrategyTable> {
        trial
            .choices
            .iter()
            .map(|(&node, &mv)| TableEntry::for_move(self.graph.position(node), mv))
            .collect()
    }
}

/// State of one seeded walk
struct Walk<'g> {
    graph: &'g GameGraph,
    rng: StdRng,
    opening: Option<usize>,
    /// Positions on the path of any game
    marked: HashSet<NodeId>,
    /// Positions on the path, per game
    visited: HashSet<(Side, NodeId)>,
    choices: BTreeMap<NodeId, usize>,
}

impl Walk<'_> {
    fn controlled_ply(&mut self, node: NodeId, side: Side) -> Result<()> {
        if !self.visited.insert((side, node)) {
            return Ok(());
        }
        self.marked.insert(node);

        let graph = self.graph;
        let position = graph.position(node);
        if position.is_terminal() {
            return Ok(());
        }

        let mv = match self.choices.get(&node) {
            Some(&mv) => mv,
            None => {
                let mv = self.choose(node, side)?;
                self.choices.insert(node, mv);
                mv
            }
        };
        let child = position.child(mv).ok_or(Error::MissingChild {
            key: position.key().value(),
            position: mv,
        })?;
        self.adversary_ply(child, side)
    }

    fn adversary_ply(&mut self, node: NodeId, side: Side) -> Result<()> {
        if !self.visited.insert((side, node)) {
            return Ok(());
        }
        self.marked.insert(node);

        let graph = self.graph;
        for (_, child) in graph.position(node).moves() {
            self.controlled_ply(child, side)?;
        }
        Ok(())
    }

    /// Forced opening at the root, else a random best move into a position
    /// this game already marked if there is one, else any random best move.
    fn choose(&mut self, node: NodeId, side: Side) -> Result<usize> {
        let graph = self.graph;
        let position = graph.position(node);
        if side == Side::ControlledFirst
            && node == graph.root()
            && let Some(opening) = self.opening
        {
            return Ok(opening);
        }

        let preferred: Vec<usize> = position
            .best_moves
            .iter()
            .copied()
            .filter(|&mv| {
                position
                    .child(mv)
                    .is_some_and(|child| self.visited.contains(&(side, child)))
            })
            .collect();
        let pool = if preferred.is_empty() {
            &position.best_moves
        } else {
            &preferred
        };

        pool.choose(&mut self.rng)
            .copied()
            .ok_or(Error::GraphNotScored {
                operation: format!("choosing a move at position {}", position.key()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::{ReductionMode, score};

    fn scored_graph() -> GameGraph {
        let mut graph = GameGraph::build(ReductionMode::Canonical);
        score(&mut graph).unwrap();
        graph
    }

    #[test]
    fn walks_are_reproducible_per_seed() {
        let graph = scored_graph();
        let sampler = MinPathSampler::new(&graph).unwrap();
        let a = sampler.walk(7, Sides::Both, Some(4)).unwrap();
        let b = sampler.walk(7, Sides::Both, Some(4)).unwrap();
        assert_eq!(a.size, b.size);
        assert_eq!(a.choices, b.choices);
        assert!(a.marked <= a.size);
    }

    #[test]
    fn walk_table_verifies() {
        let graph = scored_graph();
        let sampler = MinPathSampler::new(&graph).unwrap();
        let trial = sampler.walk(3, Sides::ControlledFirst, Some(4)).unwrap();
        assert_eq!(trial.choices.get(&graph.root()), Some(&4));
        assert_eq!(trial.marked, trial.size);
        assert!(trial.size >= 41);

        let table = sampler.table_for(&trial).unwrap();
        assert_eq!(table.len(), trial.choices.len());
        let report = table.verify(&graph, Sides::ControlledFirst, Some(4)).unwrap();
        assert_eq!(report.losses, 0);
        assert_eq!(report.decisions, trial.choices.len());
    }

    #[test]
    fn run_keeps_the_smallest_trial() {
        let graph = scored_graph();
        let sampler = MinPathSampler::new(&graph).unwrap();
        let config = SamplerConfig::new(Sides::ControlledFirst)
            .with_trials(20)
            .with_first_seed(100);

        let mut sizes = Vec::new();
        let result = sampler
            .run(&config, |trial, best| {
                assert!(best <= trial.size);
                sizes.push(trial.size);
            })
            .unwrap();

        assert_eq!(sizes.len(), 20);
        assert_eq!(result.size, *sizes.iter().min().unwrap());
        assert!(result.size >= 41);
        assert!((100..120).contains(&result.seed));
        assert_eq!(result.improvements.last().map(|&(_, size)| size), Some(result.size));
    }

    #[test]
    fn zero_trials_is_a_configuration_error() {
        let graph = scored_graph();
        let sampler = MinPathSampler::new(&graph).unwrap();
        let config = SamplerConfig::default().with_trials(0);
        assert!(matches!(
            sampler.run(&config, |_, _| {}),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn adversary_first_walk_starts_at_the_root() {
        let graph = scored_graph();
        let sampler = MinPathSampler::new(&graph).unwrap();
        let trial = sampler.walk(11, Sides::AdversaryFirst, None).unwrap();

        // The root belongs to the opponent; every opening needs a table move
        assert!(trial.size >= 127);
        assert!(!trial.choices.contains_key(&graph.root()));
        for (_, opening) in graph.position(graph.root()).moves() {
            assert!(trial.choices.contains_key(&opening));
        }
    }

    #[test]
    fn fingerprint_graph_is_rejected() {
        let mut graph = GameGraph::build(ReductionMode::Fingerprint);
        score(&mut graph).unwrap();
        assert!(matches!(
            MinPathSampler::new(&graph),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn unscored_graph_is_rejected() {
        let graph = GameGraph::build(ReductionMode::Canonical);
        assert!(matches!(
            MinPathSampler::new(&graph),
            Err(Error::GraphNotScored { .. })
        ));
    }
}
