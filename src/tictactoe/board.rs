//! Board representation and basic operations

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lines::LineAnalyzer;

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' | ' ' | '_' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }

    /// Base-3 digit used by fingerprints
    pub fn digit(self) -> u16 {
        match self {
            Cell::Empty => 0,
            Cell::X => 1,
            Cell::O => 2,
        }
    }

    pub(crate) fn from_digit(digit: u16) -> Cell {
        match digit {
            1 => Cell::X,
            2 => Cell::O,
            _ => Cell::Empty,
        }
    }

    pub fn to_player(self) -> Option<Player> {
        match self {
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
            Cell::Empty => None,
        }
    }
}

/// A mover. X (mover A) always opens the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }

    /// Game value of a win for this player (+1 for X, -1 for O)
    pub fn win_value(self) -> i8 {
        match self {
            Player::X => 1,
            Player::O => -1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().to_char())
    }
}

/// Terminal classification of a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Outcome {
    /// Game still in progress
    #[default]
    Undecided,
    Draw,
    Win(Player),
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        self != Outcome::Undecided
    }

    /// Game value of a terminal outcome, `None` while undecided
    pub fn value(self) -> Option<i8> {
        match self {
            Outcome::Undecided => None,
            Outcome::Draw => Some(0),
            Outcome::Win(player) => Some(player.win_value()),
        }
    }
}

/// Nine cells in row-major order. The mover is implied by parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    pub cells: [Cell; 9],
}

impl Board {
    /// Empty board, X to move
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Cell; 9]) -> Self {
        Board { cells }
    }

    /// Parse a board from 9 cell characters; whitespace and `/` separators are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the string does not hold exactly 9 cells, contains an
    /// unknown character, or has piece counts no legal game can produce.
    pub fn from_string(s: &str) -> Result<Self, crate::Error> {
        let chars: Vec<char> = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/')
            .collect();
        if chars.len() != 9 {
            return Err(crate::Error::InvalidConfiguration {
                message: format!("board '{s}' must have exactly 9 cells, got {}", chars.len()),
            });
        }

        let mut cells = [Cell::Empty; 9];
        for (i, &c) in chars.iter().enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| crate::Error::InvalidConfiguration {
                message: format!("invalid character '{c}' at position {i} in '{s}'"),
            })?;
        }

        let board = Board { cells };
        let (x, o) = board.piece_counts();
        if x != o && x != o + 1 {
            return Err(crate::Error::InvalidConfiguration {
                message: format!("piece counts X={x}, O={o} in '{s}' are not reachable"),
            });
        }
        Ok(board)
    }

    fn piece_counts(&self) -> (usize, usize) {
        self.cells.iter().fold((0, 0), |(x, o), cell| match cell {
            Cell::X => (x + 1, o),
            Cell::O => (x, o + 1),
            Cell::Empty => (x, o),
        })
    }

    /// Number of filled cells, i.e. the ply depth
    pub fn depth(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Player to move, by parity of filled cells
    pub fn to_move(&self) -> Player {
        if self.depth() % 2 == 0 {
            Player::X
        } else {
            Player::O
        }
    }

    pub fn is_empty(&self, pos: usize) -> bool {
        self.cells[pos] == Cell::Empty
    }

    /// Indices of empty cells in ascending order
    pub fn empty_positions(&self) -> Vec<usize> {
        (0..9).filter(|&i| self.is_empty(i)).collect()
    }

    /// Place the mover's piece and return the new board
    #[must_use = "make_move returns a new board; the original is unchanged"]
    pub fn make_move(&self, pos: usize) -> Result<Board, crate::Error> {
        if pos >= 9 || !self.is_empty(pos) {
            return Err(crate::Error::InvalidMove { position: pos });
        }
        let mut next = *self;
        next.cells[pos] = self.to_move().to_cell();
        Ok(next)
    }

    pub fn winner(&self) -> Option<Player> {
        LineAnalyzer::winner(&self.cells)
    }

    /// Win on any line, draw on a full board, otherwise undecided
    pub fn outcome(&self) -> Outcome {
        match self.winner() {
            Some(player) => Outcome::Win(player),
            None if self.depth() == 9 => Outcome::Draw,
            None => Outcome::Undecided,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome().is_terminal()
    }

    /// Legal moves (empty cells while the game is undecided)
    pub fn legal_moves(&self) -> Vec<usize> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.empty_positions()
    }

    /// Compact single-line rendering, e.g. `X.O/.X./..O`
    pub fn to_compact(&self) -> String {
        let mut s = String::with_capacity(11);
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 && i % 3 == 0 {
                s.push('/');
            }
            s.push(cell.to_char());
        }
        s
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if (i + 1).is_multiple_of(3) && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board() {
        let board = Board::new();
        assert_eq!(board.to_move(), Player::X);
        assert_eq!(board.depth(), 0);
        assert_eq!(board.legal_moves().len(), 9);
    }

    #[test]
    fn test_make_move_alternates_players() {
        let board = Board::new().make_move(4).unwrap();
        assert_eq!(board.cells[4], Cell::X);
        assert_eq!(board.to_move(), Player::O);

        let board = board.make_move(0).unwrap();
        assert_eq!(board.cells[0], Cell::O);
        assert_eq!(board.to_move(), Player::X);

        let err = board.make_move(4).unwrap_err();
        assert!(err.to_string().contains("occupied"));
        assert!(board.make_move(9).is_err());
    }

    #[test]
    fn test_outcome_detection() {
        let win = Board::from_string("XXX/OO./...").unwrap();
        assert_eq!(win.outcome(), Outcome::Win(Player::X));
        assert!(win.legal_moves().is_empty());

        let o_win = Board::from_string("XX./OOO/X.X").unwrap();
        assert_eq!(o_win.outcome(), Outcome::Win(Player::O));

        let draw = Board::from_string("XOX/XOO/OXX").unwrap();
        assert_eq!(draw.outcome(), Outcome::Draw);

        let open = Board::from_string("X../.O./...").unwrap();
        assert_eq!(open.outcome(), Outcome::Undecided);
    }

    #[test]
    fn test_full_board_with_line_is_a_win() {
        let board = Board::from_string("XOX/OXO/OXX").unwrap();
        assert_eq!(board.outcome(), Outcome::Win(Player::X));
    }

    #[test]
    fn test_from_string_rejects_bad_input() {
        assert!(Board::from_string("XO").is_err());
        assert!(Board::from_string("XOZ......").is_err());
        assert!(Board::from_string("XXXX.....").is_err());
        assert!(Board::from_string("O........").is_err());
    }

    #[test]
    fn test_display_and_compact() {
        let board = Board::from_string("XOX.O.X..").unwrap();
        assert_eq!(board.to_compact(), "XOX/.O./X..");
        let display = format!("{board}");
        assert_eq!(display, "XOX\n.O.\nX..");
    }
}
