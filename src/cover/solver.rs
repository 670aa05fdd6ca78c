//! Minimum covering-set search over a scored canonical graph

use super::{
    encoding::{CoverProblem, Encoder},
    query::CoverQuery,
    search::{Attempt, minimize_bound},
    table::StrategyTable,
};
use crate::{
    Error, Result,
    ports::{Model, SatBackend},
    tictactoe::{Fingerprint, GameGraph, ReductionMode},
};

/// Result of a minimum cover search
#[derive(Debug, Clone)]
pub struct CoverSolution {
    pub query: CoverQuery,
    /// Smallest number of remembered positions that suffices
    pub bound: usize,
    /// Canonical keys of the positions in the cover, terminal ones included,
    /// listed once per game that needs them
    pub selected: Vec<Fingerprint>,
    /// Moves for the non-terminal positions of the cover
    pub table: StrategyTable,
    /// Every feasibility check, in the order made
    pub attempts: Vec<Attempt>,
    pub variables: usize,
    pub clauses: usize,
    /// Positions the bound ranges over
    pub counted: usize,
}

/// Drives a [`SatBackend`] to find minimum strategy tables.
///
/// # Examples
///
/// ```no_run
/// use tictable::adapters::VarisatBackend;
/// use tictable::cover::{CoverQuery, CoverSolver, Sides};
/// use tictable::tictactoe::{GameGraph, ReductionMode, score};
///
/// let mut graph = GameGraph::build(ReductionMode::Canonical);
/// score(&mut graph)?;
///
/// let mut solver = CoverSolver::new(&graph, VarisatBackend::new())?;
/// let solution = solver.solve(&CoverQuery::new(Sides::ControlledFirst))?;
/// assert_eq!(solution.bound, 41);
/// # Ok::<(), tictable::Error>(())
/// ```
pub struct CoverSolver<'g, B> {
    graph: &'g GameGraph,
    backend: B,
}

impl<'g, B: SatBackend> CoverSolver<'g, B> {
    /// # Errors
    ///
    /// The graph has to be symmetry reduced and scored: returns
    /// [`Error::InvalidConfiguration`] or [`Error::GraphNotScored`] otherwise.
    pub fn new(graph: &'g GameGraph, backend: B) -> Result<Self> {
        if graph.mode() != ReductionMode::Canonical {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "cover search needs a canonical graph, got a {} graph",
                    graph.mode()
                ),
            });
        }
        if !graph.is_scored() {
            return Err(Error::GraphNotScored {
                operation: "searching for a cover".to_string(),
            });
        }
        Ok(Self { graph, backend })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn encode(&self, query: &CoverQuery) -> Result<CoverProblem> {
        Encoder::encode(self.graph, *query)
    }

    /// Check `problem` with at most `bound` counted positions.
    pub fn check(&mut self, problem: &CoverProblem, bound: usize) -> Result<Option<Model>> {
        self.backend
            .check(problem.formula(), Some(problem.at_most(bound)))
    }

    /// Find the smallest table answering `query`.
    ///
    /// # Errors
    ///
    /// Encoding errors, [`Error::InfeasibleAtMaximum`] when even the full
    /// position set fails, backend errors, and
    /// [`Error::UnmatchedSelection`] if the final model cannot be decoded.
    pub fn solve(&mut self, query: &CoverQuery) -> Result<CoverSolution> {
        let problem = self.encode(query)?;
        log::info!(
            "encoded {} cover with {} traversal: {} variables, {} clauses, {} counted positions",
            query.sides,
            query.traversal,
            problem.variable_count(),
            problem.clause_count(),
            problem.upper_bound()
        );

        let mut attempts = Vec::new();
        let mut best: Option<(usize, Model)> = None;
        let bound = minimize_bound(problem.upper_bound(), |bound| {
            let model = self.check(&problem, bound)?;
            let feasible = model.is_some();
            log::info!(
                "bound {bound}: {}",
                if feasible { "feasible" } else { "infeasible" }
            );
            attempts.push(Attempt { bound, feasible });
            if let Some(model) = model
                && best.as_ref().is_none_or(|(smallest, _)| bound < *smallest)
            {
                best = Some((bound, model));
            }
            Ok(feasible)
        })?;

        let model = best
            .filter(|(smallest, _)| *smallest == bound)
            .map(|(_, model)| model)
            .ok_or(Error::MissingModel)?;
        let decoded = problem.decode(self.graph, &model)?;

        log::info!(
            "minimum {} cover: {} positions, {} table entries after {} attempts",
            query.sides,
            bound,
            decoded.table.len(),
            attempts.len()
        );

        Ok(CoverSolution {
            query: *query,
            bound,
            selected: decoded
                .selected
                .iter()
                .map(|&node| self.graph.position(node).key())
                .collect(),
            table: decoded.table,
            attempts,
            variables: problem.variable_count(),
            clauses: problem.clause_count(),
            counted: problem.upper_bound(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::VarisatBackend,
        cover::{Sides, Traversal},
        ports::AtMost,
        tictactoe::score,
    };
    use varisat::CnfFormula;

    fn scored_graph() -> GameGraph {
        let mut graph = GameGraph::build(ReductionMode::Canonical);
        score(&mut graph).unwrap();
        graph
    }

    /// Backend that fails every check
    struct BrokenBackend;

    impl SatBackend for BrokenBackend {
        fn check(&mut self, _: &CnfFormula, _: Option<AtMost<'_>>) -> Result<Option<Model>> {
            Err(Error::Backend {
                message: "out of memory".to_string(),
            })
        }

        fn checks(&self) -> usize {
            0
        }
    }

    #[test]
    fn rejects_unreduced_or_unscored_graphs() {
        let graph = GameGraph::build(ReductionMode::Fingerprint);
        assert!(matches!(
            CoverSolver::new(&graph, VarisatBackend::new()),
            Err(Error::InvalidConfiguration { .. })
        ));

        let graph = GameGraph::build(ReductionMode::Canonical);
        assert!(matches!(
            CoverSolver::new(&graph, VarisatBackend::new()),
            Err(Error::GraphNotScored { .. })
        ));
    }

    #[test]
    fn controlled_first_centre_opening_needs_41_positions() {
        let graph = scored_graph();
        let mut solver = CoverSolver::new(&graph, VarisatBackend::new()).unwrap();
        let query = CoverQuery::new(Sides::ControlledFirst);
        let solution = solver.solve(&query).unwrap();

        assert_eq!(solution.bound, 41);
        assert_eq!(solution.selected.len(), 41);
        assert!(solution.table.len() <= 41);
        assert_eq!(solution.attempts[0].bound, solution.counted);
        assert_eq!(solver.backend().checks(), solution.attempts.len());

        let report = solution
            .table
            .verify(&graph, query.sides, query.opening)
            .unwrap();
        assert_eq!(report.losses, 0);
    }

    #[test]
    fn exhaustive_traversal_agrees() {
        let graph = scored_graph();
        let mut solver = CoverSolver::new(&graph, VarisatBackend::new()).unwrap();
        let query = CoverQuery::new(Sides::ControlledFirst).with_traversal(Traversal::Exhaustive);
        let solution = solver.solve(&query).unwrap();

        assert_eq!(solution.bound, 41);
        solution
            .table
            .verify(&graph, query.sides, query.opening)
            .unwrap();
    }

    #[test]
    fn backend_failure_aborts_the_search() {
        let graph = scored_graph();
        let mut solver = CoverSolver::new(&graph, BrokenBackend).unwrap();
        let result = solver.solve(&CoverQuery::default());
        assert!(matches!(result, Err(Error::Backend { .. })));
    }

    #[test]
    fn bad_opening_is_rejected_before_solving() {
        let graph = scored_graph();
        let mut solver = CoverSolver::new(&graph, VarisatBackend::new()).unwrap();
        let result = solver.solve(&CoverQuery::default().with_opening(Some(12)));
        assert!(matches!(result, Err(Error::InvalidConfiguration { .. })));
        assert_eq!(solver.backend().checks(), 0);
    }
}
