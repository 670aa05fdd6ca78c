//! Strategy tables: the positions a player has to remember, with one move each

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::query::{Side, Sides};
use crate::{
    Error, Result,
    tictactoe::{Board, Fingerprint, GameGraph, Outcome, Position, outcome_code},
};

/// One remembered position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    /// Canonical fingerprint of the position
    pub key: u16,
    /// Move in the canonical orientation
    #[serde(rename = "move")]
    pub mv: u8,
    /// Outcome code of the canonical board after the move
    pub outcome: i8,
}

impl TableEntry {
    /// Entry for playing `mv` at `position`, with `mv` in the stored orientation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMove`] if `mv` is not legal at `position`.
    pub fn for_move(position: &Position, mv: usize) -> Result<Self> {
        let key = position.board.canonical_key();
        let canonical_move = key.map_move_to_canonical(mv);
        let next = position
            .board
            .permute(key.symmetry)
            .make_move(canonical_move)?;
        Ok(TableEntry {
            key: key.min.value(),
            mv: canonical_move as u8,
            outcome: outcome_code(&next),
        })
    }
}

/// A move read from the table, in the caller's orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableMove {
    pub mv: usize,
    pub outcome: i8,
}

/// Entries ordered by key, at most one per key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TableEntry>", into = "Vec<TableEntry>")]
pub struct StrategyTable {
    entries: Vec<TableEntry>,
}

impl From<Vec<TableEntry>> for StrategyTable {
    fn from(mut entries: Vec<TableEntry>) -> Self {
        entries.sort_by_key(|entry| entry.key);
        entries.dedup_by_key(|entry| entry.key);
        StrategyTable { entries }
    }
}

impl From<StrategyTable> for Vec<TableEntry> {
    fn from(table: StrategyTable) -> Self {
        table.entries
    }
}

impl FromIterator<TableEntry> for StrategyTable {
    fn from_iter<I: IntoIterator<Item = TableEntry>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}

/// What a verification walk saw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VerifyReport {
    /// Controlled positions that needed a table move
    pub decisions: usize,
    /// Terminal positions reached, from the controlled player's point of view
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl StrategyTable {
    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, key: Fingerprint) -> Option<&TableEntry> {
        self.entries
            .binary_search_by_key(&key.value(), |entry| entry.key)
            .ok()
            .map(|index| &self.entries[index])
    }

    /// Move for `board` in any orientation.
    ///
    /// The board is canonicalized, the entry found by key, and its move mapped
    /// back through the same symmetry.
    pub fn lookup(&self, board: &Board) -> Option<TableMove> {
        let key = board.canonical_key();
        let entry = self.entry(key.min)?;
        let mv = usize::from(entry.mv);
        (mv < 9).then(|| TableMove {
            mv: key.map_canonical_to_original(mv),
            outcome: entry.outcome,
        })
    }

    /// Play the table against every adversary reply and check it holds up.
    ///
    /// Every controlled position reached must have an entry whose move is
    /// legal and among the best moves, except that the opening move at the
    /// root is `opening` when one is forced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphNotScored`] on an unscored graph,
    /// [`Error::MissingEntry`] for a reachable position without an entry and
    /// [`Error::IllegalTableMove`] for a move that is illegal, suboptimal or
    /// recorded with the wrong outcome code.
    pub fn verify(
        &self,
        graph: &GameGraph,
        sides: Sides,
        opening: Option<usize>,
    ) -> Result<VerifyReport> {
        if !graph.is_scored() {
            return Err(Error::GraphNotScored {
                operation: "verifying a strategy table".to_string(),
            });
        }

        let mut report = VerifyReport::default();
        for &side in sides.sides() {
            let controlled = side.controlled(graph);
            let forced = match side {
                Side::ControlledFirst => opening,
                Side::AdversaryFirst => None,
            };

            let mut visited = HashSet::new();
            let mut stack = vec![graph.root()];
            while let Some(id) = stack.pop() {
                if !visited.insert(id) {
                    continue;
                }
                let position = graph.position(id);

                match position.outcome {
                    Outcome::Undecided => {}
                    Outcome::Draw => {
                        report.draws += 1;
                        continue;
                    }
                    Outcome::Win(player) if player == controlled => {
                        report.wins += 1;
                        continue;
                    }
                    Outcome::Win(_) => {
                        report.losses += 1;
                        continue;
                    }
                }

                if position.to_move() != controlled {
                    stack.extend(position.moves().map(|(_, child)| child));
                    continue;
                }

                report.decisions += 1;
                let forced = forced.filter(|_| id == graph.root());
                let mv = self.check_position(position, forced)?;
                stack.extend(position.child(mv));
            }
        }

        log::debug!(
            "verified {} table entries over {} decisions: {} wins, {} draws, {} losses",
            self.len(),
            report.decisions,
            report.wins,
            report.draws,
            report.losses
        );
        Ok(report)
    }

    /// Check the entry for one controlled position and return its move in the
    /// stored orientation.
    fn check_position(&self, position: &Position, forced: Option<usize>) -> Result<usize> {
        let key = position.board.canonical_key();
        let entry = self.entry(key.min).ok_or(Error::MissingEntry {
            key: key.min.value(),
        })?;
        let illegal = |reason: String| Error::IllegalTableMove {
            key: entry.key,
            position: usize::from(entry.mv),
            reason,
        };

        let canonical_move = usize::from(entry.mv);
        if canonical_move >= 9 {
            return Err(illegal("outside the board".to_string()));
        }
        let mv = key.map_canonical_to_original(canonical_move);
        if position.child(mv).is_none() {
            return Err(illegal("not a legal move".to_string()));
        }

        match forced {
            Some(opening) if opening != mv => {
                return Err(illegal(format!("not the forced opening {opening}")));
            }
            Some(_) => {}
            None if !position.best_moves.contains(&mv) => {
                return Err(illegal("not among the best moves".to_string()));
            }
            None => {}
        }

        let next = position
            .board
            .permute(key.symmetry)
            .make_move(canonical_move)?;
        let expected = outcome_code(&next);
        if expected != entry.outcome {
            return Err(illegal(format!(
                "recorded with outcome {} instead of {expected}",
                entry.outcome
            )));
        }
        Ok(mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::{ReductionMode, Symmetry, score};

    fn scored_graph() -> GameGraph {
        let mut graph = GameGraph::build(ReductionMode::Canonical);
        score(&mut graph).unwrap();
        graph
    }

    #[test]
    fn entries_are_sorted_and_unique() {
        let table: StrategyTable = vec![
            TableEntry { key: 30, mv: 1, outcome: 0 },
            TableEntry { key: 3, mv: 4, outcome: 0 },
            TableEntry { key: 30, mv: 2, outcome: 0 },
        ]
        .into();
        let keys: Vec<u16> = table.entries().iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![3, 30]);
    }

    #[test]
    fn entry_records_canonical_move_and_outcome() {
        let graph = scored_graph();
        let board = Board::from_string("XX./OO./...").unwrap();
        let id = graph.find(&board).unwrap();
        let position = graph.position(id);

        let win = position
            .best_moves
            .iter()
            .copied()
            .find(|&mv| graph.position(position.child(mv).unwrap()).outcome.is_terminal())
            .unwrap();
        let entry = TableEntry::for_move(position, win).unwrap();
        assert_eq!(entry.key, position.key().value());
        assert!((1..=8).contains(&entry.outcome));
    }

    #[test]
    fn lookup_maps_moves_into_every_orientation() {
        let graph = scored_graph();
        let board = Board::from_string("X../.O./...").unwrap();
        let position = graph.position(graph.find(&board).unwrap());
        let mv = position.best_moves[0];
        let table: StrategyTable = vec![TableEntry::for_move(position, mv).unwrap()].into();

        for symmetry in Symmetry::ALL {
            let image = board.permute(symmetry);
            let found = table.lookup(&image).unwrap();
            assert!(image.is_empty(found.mv));

            // The chosen cell lands on the same canonical child
            let expected = position.board.make_move(mv).unwrap().canonical_key().min;
            assert_eq!(image.make_move(found.mv).unwrap().canonical_key().min, expected);
        }
    }

    #[test]
    fn missing_entries_fail_verification() {
        let graph = scored_graph();
        let result = StrategyTable::default().verify(&graph, Sides::ControlledFirst, Some(4));
        assert!(matches!(result, Err(Error::MissingEntry { key: 0 })));
    }

    #[test]
    fn suboptimal_moves_fail_verification() {
        let graph = scored_graph();
        // X wins on the spot at 2; most other cells hand O the middle row
        let board = Board::from_string("XX./OO./...").unwrap();
        let position = graph.position(graph.find(&board).unwrap());
        let bad = (0..9)
            .find(|&mv| position.child(mv).is_some() && !position.best_moves.contains(&mv))
            .unwrap();
        let table: StrategyTable = vec![TableEntry::for_move(position, bad).unwrap()].into();
        let err = table.check_position(position, None).unwrap_err();
        assert!(matches!(err, Error::IllegalTableMove { .. }));
        assert!(err.to_string().contains("best moves"));
    }

    #[test]
    fn wrong_outcome_code_is_rejected() {
        let graph = scored_graph();
        let position = graph.position(graph.root());
        let mut entry = TableEntry::for_move(position, 4).unwrap();
        entry.outcome = 9;
        let table: StrategyTable = vec![entry].into();
        assert!(table.check_position(position, Some(4)).is_err());

        entry.outcome = 0;
        let table: StrategyTable = vec![entry].into();
        assert_eq!(table.check_position(position, Some(4)).unwrap(), 4);
        assert!(table.check_position(position, Some(0)).is_err());
    }
}
