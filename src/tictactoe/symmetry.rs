//! Board fingerprints and the eight symmetries of the square

use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::{Board, Cell};

/// Number of distinct cell assignments, 3^9
pub const FINGERPRINT_LIMIT: u32 = 19_683;

/// Base-3 encoding of a board with cell 0 as the least significant digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Fingerprint(u16);

impl Fingerprint {
    /// Wrap a raw value, rejecting anything outside `[0, 3^9)`.
    pub fn new(value: u32) -> crate::Result<Self> {
        if value >= FINGERPRINT_LIMIT {
            return Err(crate::Error::FingerprintOutOfRange { value });
        }
        Ok(Fingerprint(value as u16))
    }

    pub fn of(board: &Board) -> Self {
        let value = board
            .cells
            .iter()
            .rev()
            .fold(0u16, |acc, cell| acc * 3 + cell.digit());
        Fingerprint(value)
    }

    /// Exact inverse of [`Fingerprint::of`]
    pub fn decode(self) -> Board {
        let mut cells = [Cell::Empty; 9];
        let mut rest = self.0;
        for cell in &mut cells {
            *cell = Cell::from_digit(rest % 3);
            rest /= 3;
        }
        Board::from_cells(cells)
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the 8 symmetries as a 3-bit code.
///
/// Bit 1 flips rows, bit 2 flips columns, bit 4 transposes; `apply` performs
/// them in that order and `invert` undoes them in reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Symmetry(u8);

impl Symmetry {
    pub const IDENTITY: Symmetry = Symmetry(0);

    /// All codes in enumeration order; canonicalization keeps the first minimum.
    pub const ALL: [Symmetry; 8] = [
        Symmetry(0),
        Symmetry(1),
        Symmetry(2),
        Symmetry(3),
        Symmetry(4),
        Symmetry(5),
        Symmetry(6),
        Symmetry(7),
    ];

    pub fn from_code(code: u8) -> Option<Self> {
        (code < 8).then_some(Symmetry(code))
    }

    pub fn code(self) -> u8 {
        self.0
    }

    fn flips_rows(self) -> bool {
        self.0 & 1 != 0
    }

    fn flips_cols(self) -> bool {
        self.0 & 2 != 0
    }

    fn transposes(self) -> bool {
        self.0 & 4 != 0
    }

    pub fn apply(self, row: usize, col: usize) -> (usize, usize) {
        let (mut r, mut c) = (row, col);
        if self.flips_rows() {
            r = 2 - r;
        }
        if self.flips_cols() {
            c = 2 - c;
        }
        if self.transposes() {
            (r, c) = (c, r);
        }
        (r, c)
    }

    pub fn invert(self, row: usize, col: usize) -> (usize, usize) {
        let (mut r, mut c) = (row, col);
        if self.transposes() {
            (r, c) = (c, r);
        }
        if self.flips_cols() {
            c = 2 - c;
        }
        if self.flips_rows() {
            r = 2 - r;
        }
        (r, c)
    }

    /// The code whose `apply` equals this code's `invert`
    pub fn inverse(self) -> Symmetry {
        if self.transposes() {
            Symmetry(4 | ((self.0 & 1) << 1) | ((self.0 & 2) >> 1))
        } else {
            self
        }
    }

    pub fn apply_index(self, index: usize) -> usize {
        let (r, c) = self.apply(index / 3, index % 3);
        r * 3 + c
    }

    pub fn invert_index(self, index: usize) -> usize {
        let (r, c) = self.invert(index / 3, index % 3);
        r * 3 + c
    }
}

/// Result of canonicalizing a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalKey {
    /// Fingerprint of the board as given
    pub own: Fingerprint,
    /// Minimum fingerprint over the symmetry orbit
    pub min: Fingerprint,
    /// Symmetry mapping the given board onto its minimal image
    pub symmetry: Symmetry,
}

impl CanonicalKey {
    /// Map a move on the given board to the canonical board
    pub fn map_move_to_canonical(&self, original_move: usize) -> usize {
        self.symmetry.invert_index(original_move)
    }

    /// Map a move on the canonical board back to the given board
    pub fn map_canonical_to_original(&self, canonical_move: usize) -> usize {
        self.symmetry.apply_index(canonical_move)
    }
}

impl Board {
    /// Image of this board under a symmetry: `out[r][c] = self[s.apply(r, c)]`
    pub fn permute(&self, symmetry: Symmetry) -> Board {
        let mut cells = [Cell::Empty; 9];
        for (i, cell) in cells.iter_mut().enumerate() {
            *cell = self.cells[symmetry.apply_index(i)];
        }
        Board::from_cells(cells)
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(self)
    }

    /// Evaluate all 8 images and keep the first one with the minimum fingerprint.
    pub fn canonical_key(&self) -> CanonicalKey {
        let own = Fingerprint::of(self);
        let mut min = own;
        let mut best = Symmetry::IDENTITY;
        for symmetry in Symmetry::ALL.into_iter().skip(1) {
            let fingerprint = Fingerprint::of(&self.permute(symmetry));
            if fingerprint < min {
                min = fingerprint;
                best = symmetry;
            }
        }
        CanonicalKey {
            own,
            min,
            symmetry: best,
        }
    }

    /// The minimal image of this board
    pub fn canonical(&self) -> Board {
        self.permute(self.canonical_key().symmetry)
    }
}
