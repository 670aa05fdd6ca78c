//! Common test utilities for the tictable test suite.

#![allow(dead_code)]

use tictable::tictactoe::{Board, GameGraph, Player, ReductionMode, score};

/// Canonical graph with values and best moves filled in
pub fn scored_canonical() -> GameGraph {
    scored(ReductionMode::Canonical)
}

pub fn scored(mode: ReductionMode) -> GameGraph {
    let mut graph = GameGraph::build(mode);
    score(&mut graph).expect("scoring a freshly built graph succeeds");
    graph
}

/// Win, loss and draw counts over every complete game, by plain recursion
pub struct GameEnumeration {
    pub games: u64,
    pub x_wins: u64,
    pub o_wins: u64,
    pub draws: u64,
}

pub fn enumerate_games() -> GameEnumeration {
    fn traverse(board: &Board, stats: &mut GameEnumeration) {
        if board.is_terminal() {
            stats.games += 1;
            match board.winner() {
                Some(Player::X) => stats.x_wins += 1,
                Some(Player::O) => stats.o_wins += 1,
                None => stats.draws += 1,
            }
            return;
        }
        for pos in board.empty_positions() {
            let next = board.make_move(pos).expect("empty cell is a legal move");
            traverse(&next, stats);
        }
    }

    let mut stats = GameEnumeration {
        games: 0,
        x_wins: 0,
        o_wins: 0,
        draws: 0,
    };
    traverse(&Board::new(), &mut stats);
    stats
}
