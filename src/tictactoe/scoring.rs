//! Backward induction over the state graph

use super::{
    board::Player,
    graph::{GameGraph, LeafCounts, NodeId},
};

/// Progress of one scoring pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub scored: usize,
    pub remaining: usize,
}

/// Summary of a scoring run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreReport {
    pub passes: Vec<PassSummary>,
}

impl ScoreReport {
    /// Positions that received a value during this run
    pub fn newly_scored(&self) -> usize {
        self.passes.iter().map(|pass| pass.scored).sum()
    }
}

/// Score every position: X maximizes, O minimizes, all tied moves are kept.
///
/// Runs passes until nothing is left unscored. Safe to call again on a scored
/// graph, which then does no work.
///
/// # Errors
///
/// Returns [`crate::Error::ScoringStalled`] if a pass scores nothing while
/// positions remain, which only happens on a malformed graph.
pub fn score(graph: &mut GameGraph) -> crate::Result<ScoreReport> {
    let mut report = ScoreReport::default();
    let mut pending: Vec<NodeId> = graph
        .ids()
        .filter(|&id| !graph.position(id).is_scored())
        .collect();

    while !pending.is_empty() {
        let before = pending.len();
        pending.retain(|&id| !try_score(graph, id));
        let scored = before - pending.len();
        let summary = PassSummary {
            scored,
            remaining: pending.len(),
        };
        log::debug!(
            "scoring pass {}: {} scored, {} remaining",
            report.passes.len() + 1,
            summary.scored,
            summary.remaining
        );
        report.passes.push(summary);

        if scored == 0 {
            return Err(crate::Error::ScoringStalled {
                unscored: pending.len(),
            });
        }
    }

    let root = graph.position(graph.root());
    log::info!(
        "scored graph in {} passes: value {:?}, X wins {}, O wins {}, draws {}",
        report.passes.len(),
        root.value,
        root.leaves.x_wins,
        root.leaves.o_wins,
        root.leaves.draws
    );
    Ok(report)
}

/// Score `id` if all of its children carry values. Returns whether it did.
fn try_score(graph: &mut GameGraph, id: NodeId) -> bool {
    let position = graph.position(id);
    let mover = position.to_move();

    let mut leaves = LeafCounts::default();
    let mut best_value: Option<i8> = None;
    let mut best_moves = Vec::new();

    for (mv, child_id) in position.moves() {
        let child = graph.position(child_id);
        let Some(value) = child.value else {
            return false;
        };
        leaves += child.leaves;

        let improves = match (best_value, mover) {
            (None, _) => true,
            (Some(best), Player::X) => value > best,
            (Some(best), Player::O) => value < best,
        };
        if improves {
            best_value = Some(value);
            best_moves.clear();
            best_moves.push(mv);
        } else if best_value == Some(value) {
            best_moves.push(mv);
        }
    }

    // A non-terminal position without children never becomes scorable.
    let Some(value) = best_value else {
        return false;
    };

    let position = graph.position_mut(id);
    position.leaves = leaves;
    position.value = Some(value);
    position.best_moves = best_moves;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::{Board, ReductionMode};

    #[test]
    fn canonical_root_is_a_draw_with_all_openings_best() {
        let mut graph = GameGraph::build(ReductionMode::Canonical);
        score(&mut graph).unwrap();

        let root = graph.position(graph.root());
        assert_eq!(root.value, Some(0));
        assert_eq!(root.best_moves, (0..9).collect::<Vec<_>>());
        assert_eq!(
            root.leaves,
            LeafCounts {
                x_wins: 131_184,
                o_wins: 77_904,
                draws: 46_080
            }
        );
    }

    #[test]
    fn rescoring_is_a_no_op() {
        let mut graph = GameGraph::build(ReductionMode::Canonical);
        let first = score(&mut graph).unwrap();
        assert_eq!(first.newly_scored(), 765 - 138);

        let second = score(&mut graph).unwrap();
        assert!(second.passes.is_empty());
        assert_eq!(graph.position(graph.root()).value, Some(0));
    }

    #[test]
    fn immediate_win_is_the_only_best_move() {
        // X to move can complete the top row at 2
        let board = Board::from_string("XX./OO./...").unwrap();
        let mut graph = GameGraph::build_from(board, ReductionMode::Fingerprint);
        score(&mut graph).unwrap();

        let root = graph.position(graph.root());
        assert_eq!(root.value, Some(1));
        assert!(root.best_moves.contains(&2));
        assert!(!root.best_moves.contains(&6));
    }

    #[test]
    fn o_minimizes() {
        // O to move must block at 2 or lose
        let board = Board::from_string("XX./.O./...").unwrap();
        let mut graph = GameGraph::build_from(board, ReductionMode::Fingerprint);
        score(&mut graph).unwrap();

        let root = graph.position(graph.root());
        assert_eq!(root.to_move(), Player::O);
        assert_eq!(root.best_moves, vec![2]);
        assert_eq!(root.value, Some(0));
    }

    #[test]
    fn every_open_position_has_best_moves() {
        let mut graph = GameGraph::build(ReductionMode::Canonical);
        score(&mut graph).unwrap();
        for (_, position) in graph.positions() {
            if position.is_terminal() {
                assert!(position.best_moves.is_empty());
            } else {
                assert!(!position.best_moves.is_empty());
                for &mv in &position.best_moves {
                    let child = graph.position(position.child(mv).unwrap());
                    assert_eq!(child.value, position.value);
                }
            }
        }
    }
}
