//! Winning line analysis and outcome codes

use super::{Board, Cell, Player};

/// Winning line indices on the 3x3 board, in outcome-code order
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Outcome code for a board where play continues
pub const OUTCOME_CONTINUES: i8 = 0;

/// Outcome code for a drawn board
pub const OUTCOME_DRAW: i8 = 9;

/// Utility for analyzing winning lines
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Check if a player has three in a row
    pub fn has_won(cells: &[Cell; 9], player: Player) -> bool {
        let target = player.to_cell();
        WINNING_LINES
            .iter()
            .any(|line| line.iter().all(|&idx| cells[idx] == target))
    }

    /// First completed line as `(line index, owner)`
    pub fn winning_line(cells: &[Cell; 9]) -> Option<(usize, Player)> {
        WINNING_LINES.iter().enumerate().find_map(|(i, line)| {
            let first = cells[line[0]];
            let owner = first.to_player()?;
            (cells[line[1]] == first && cells[line[2]] == first).then_some((i, owner))
        })
    }

    pub fn winner(cells: &[Cell; 9]) -> Option<Player> {
        Self::winning_line(cells).map(|(_, player)| player)
    }
}

/// Outcome code of a board: 0 continues, 1..=8 the completed line, 9 draw,
/// negated when O owns the line. A completed line beats a full board.
pub fn outcome_code(board: &Board) -> i8 {
    match LineAnalyzer::winning_line(&board.cells) {
        Some((line, player)) => {
            let code = line as i8 + 1;
            match player {
                Player::X => code,
                Player::O => -code,
            }
        }
        None if board.depth() == 9 => OUTCOME_DRAW,
        None => OUTCOME_CONTINUES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_won_horizontal() {
        let mut cells = [Cell::Empty; 9];
        cells[0] = Cell::X;
        cells[1] = Cell::X;
        cells[2] = Cell::X;

        assert!(LineAnalyzer::has_won(&cells, Player::X));
        assert!(!LineAnalyzer::has_won(&cells, Player::O));
    }

    #[test]
    fn test_has_won_vertical() {
        let mut cells = [Cell::Empty; 9];
        cells[0] = Cell::O;
        cells[3] = Cell::O;
        cells[6] = Cell::O;

        assert!(LineAnalyzer::has_won(&cells, Player::O));
        assert_eq!(LineAnalyzer::winning_line(&cells), Some((3, Player::O)));
    }

    #[test]
    fn test_outcome_codes() {
        let cases = [
            ("XXX/OO./...", 1),
            ("OO./XXX/...", 2),
            ("X.O/XO./O.X", -8),
            ("X../.X./OOX", 7),
            ("XOX/.O./XO.", -5),
            ("XOX/XOO/OXX", OUTCOME_DRAW),
            ("X../.O./...", OUTCOME_CONTINUES),
            ("XOX/OXO/OXX", 7),
        ];
        for (board, expected) in cases {
            let board = Board::from_string(board).unwrap();
            assert_eq!(outcome_code(&board), expected, "board {board:?}");
        }
    }
}
