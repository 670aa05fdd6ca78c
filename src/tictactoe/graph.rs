//! State graph construction with transposition and symmetry reduction
//!
//! Positions live in a single arena owned by [`GameGraph`]; children are
//! [`NodeId`] indices into that arena, so a canonical child reached from several
//! parents is stored once and the structure is a DAG rather than a tree.

use std::{
    collections::HashMap,
    fmt,
    ops::{Add, AddAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use super::{
    board::{Board, Outcome, Player},
    symmetry::Fingerprint,
};

/// How positions are deduplicated while the graph is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReductionMode {
    /// Every path is its own node (the full game tree)
    Full,
    /// Identical boards are merged
    Fingerprint,
    /// Boards equal up to symmetry are merged
    #[default]
    Canonical,
}

impl ReductionMode {
    pub const ALL: [ReductionMode; 3] = [
        ReductionMode::Full,
        ReductionMode::Fingerprint,
        ReductionMode::Canonical,
    ];

    const EXPECTED: &'static str = "full/0, fingerprint/1, canonical/2";
}

impl fmt::Display for ReductionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReductionMode::Full => "full",
            ReductionMode::Fingerprint => "fingerprint",
            ReductionMode::Canonical => "canonical",
        };
        f.write_str(label)
    }
}

impl FromStr for ReductionMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase();
        match normalised.as_str() {
            "full" | "tree" | "0" => Ok(ReductionMode::Full),
            "fingerprint" | "hashed" | "1" => Ok(ReductionMode::Fingerprint),
            "canonical" | "symmetric" | "2" => Ok(ReductionMode::Canonical),
            _ => Err(crate::Error::ParseReductionMode {
                input: s.to_string(),
                expected: Self::EXPECTED.to_string(),
            }),
        }
    }
}

impl TryFrom<u8> for ReductionMode {
    type Error = crate::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ReductionMode::Full),
            1 => Ok(ReductionMode::Fingerprint),
            2 => Ok(ReductionMode::Canonical),
            _ => Err(crate::Error::ParseReductionMode {
                input: value.to_string(),
                expected: Self::EXPECTED.to_string(),
            }),
        }
    }
}

/// Index of a position in the graph arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn from_index(index: usize) -> Self {
        NodeId(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Terminal leaves summed over a subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeafCounts {
    pub x_wins: u64,
    pub o_wins: u64,
    pub draws: u64,
}

impl LeafCounts {
    /// Counts for a single terminal leaf
    pub fn of_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Win(Player::X) => LeafCounts {
                x_wins: 1,
                ..Default::default()
            },
            Outcome::Win(Player::O) => LeafCounts {
                o_wins: 1,
                ..Default::default()
            },
            Outcome::Draw => LeafCounts {
                draws: 1,
                ..Default::default()
            },
            Outcome::Undecided => LeafCounts::default(),
        }
    }

    pub fn total(&self) -> u64 {
        self.x_wins + self.o_wins + self.draws
    }
}

impl Add for LeafCounts {
    type Output = LeafCounts;

    fn add(self, rhs: LeafCounts) -> LeafCounts {
        LeafCounts {
            x_wins: self.x_wins + rhs.x_wins,
            o_wins: self.o_wins + rhs.o_wins,
            draws: self.draws + rhs.draws,
        }
    }
}

impl AddAssign for LeafCounts {
    fn add_assign(&mut self, rhs: LeafCounts) {
        *self = *self + rhs;
    }
}

/// A node of the state graph
#[derive(Debug, Clone)]
pub struct Position {
    /// Board in the orientation children were generated from
    pub board: Board,
    /// One slot per move; `None` for occupied cells or terminal positions
    pub children: [Option<NodeId>; 9],
    pub outcome: Outcome,
    pub leaves: LeafCounts,
    /// +1 X forces a win, -1 O forces a win, 0 draw; `None` until scored
    pub value: Option<i8>,
    /// Every move achieving `value`, ascending
    pub best_moves: Vec<usize>,
}

impl Position {
    fn new(board: Board) -> Self {
        let outcome = board.outcome();
        Position {
            board,
            children: [None; 9],
            outcome,
            leaves: LeafCounts::of_outcome(outcome),
            value: outcome.value(),
            best_moves: Vec::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    pub fn is_scored(&self) -> bool {
        self.value.is_some()
    }

    pub fn to_move(&self) -> Player {
        self.board.to_move()
    }

    pub fn child(&self, mv: usize) -> Option<NodeId> {
        self.children.get(mv).copied().flatten()
    }

    /// `(move, child)` pairs for every expanded move
    pub fn moves(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(mv, child)| child.map(|id| (mv, id)))
    }

    /// Canonical key of this position's board
    pub fn key(&self) -> Fingerprint {
        self.board.canonical_key().min
    }
}

/// Size of the game tree a graph stands for, with shared children expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeSize {
    pub nodes: u64,
    pub leaves: u64,
}

/// Arena of positions plus the registry used to deduplicate them
#[derive(Debug, Clone)]
pub struct GameGraph {
    mode: ReductionMode,
    positions: Vec<Position>,
    registry: HashMap<Fingerprint, NodeId>,
    root: NodeId,
    examined: usize,
}

struct BuildContext {
    mode: ReductionMode,
    positions: Vec<Position>,
    registry: HashMap<Fingerprint, NodeId>,
    examined: usize,
}

impl BuildContext {
    fn new(mode: ReductionMode) -> Self {
        BuildContext {
            mode,
            positions: Vec::new(),
            registry: HashMap::new(),
            examined: 0,
        }
    }

    fn next_id(&self) -> NodeId {
        NodeId(self.positions.len() as u32)
    }

    fn expand(&mut self, board: Board) -> NodeId {
        self.examined += 1;

        let board = match self.mode {
            ReductionMode::Full => board,
            ReductionMode::Fingerprint => {
                let key = board.fingerprint();
                if let Some(&id) = self.registry.get(&key) {
                    return id;
                }
                self.registry.insert(key, self.next_id());
                board
            }
            ReductionMode::Canonical => {
                let key = board.canonical_key();
                if let Some(&id) = self.registry.get(&key.min) {
                    return id;
                }
                self.registry.insert(key.min, self.next_id());
                board.permute(key.symmetry)
            }
        };

        let id = self.next_id();
        let position = Position::new(board);
        let terminal = position.is_terminal();
        self.positions.push(position);
        if terminal {
            return id;
        }

        let mover = board.to_move().to_cell();
        for mv in board.empty_positions() {
            let mut next = board;
            next.cells[mv] = mover;
            let child = self.expand(next);
            self.positions[id.index()].children[mv] = Some(child);
        }
        id
    }
}

impl GameGraph {
    /// Build the graph of every position reachable from the empty board.
    pub fn build(mode: ReductionMode) -> Self {
        Self::build_from(Board::new(), mode)
    }

    /// Build the graph of every position reachable from `start`.
    pub fn build_from(start: Board, mode: ReductionMode) -> Self {
        let mut ctx = BuildContext::new(mode);
        let root = ctx.expand(start);
        log::info!(
            "built {} graph: {} positions retained, {} examined",
            mode,
            ctx.positions.len(),
            ctx.examined
        );
        GameGraph {
            mode,
            positions: ctx.positions,
            registry: ctx.registry,
            root,
            examined: ctx.examined,
        }
    }

    pub fn mode(&self) -> ReductionMode {
        self.mode
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of retained positions
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of expansion calls made while building
    pub fn examined(&self) -> usize {
        self.examined
    }

    pub fn position(&self, id: NodeId) -> &Position {
        &self.positions[id.index()]
    }

    pub(crate) fn position_mut(&mut self, id: NodeId) -> &mut Position {
        &mut self.positions[id.index()]
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + use<> {
        (0..self.positions.len() as u32).map(NodeId)
    }

    pub fn positions(&self) -> impl Iterator<Item = (NodeId, &Position)> {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, p)| (NodeId(i as u32), p))
    }

    /// Look up the position standing for `board`, in either orientation.
    ///
    /// Only available for reduced graphs; a full tree has no registry.
    pub fn find(&self, board: &Board) -> Option<NodeId> {
        let key = match self.mode {
            ReductionMode::Full => return None,
            ReductionMode::Fingerprint => board.fingerprint(),
            ReductionMode::Canonical => board.canonical_key().min,
        };
        self.registry.get(&key).copied()
    }

    /// Whether every position carries a value
    pub fn is_scored(&self) -> bool {
        self.positions.iter().all(Position::is_scored)
    }

    /// Node and leaf counts of the game tree this graph represents.
    pub fn tree_size(&self) -> TreeSize {
        let mut memo: Vec<Option<TreeSize>> = vec![None; self.positions.len()];
        self.tree_size_of(self.root, &mut memo)
    }

    fn tree_size_of(&self, id: NodeId, memo: &mut [Option<TreeSize>]) -> TreeSize {
        if let Some(size) = memo[id.index()] {
            return size;
        }
        let mut size = TreeSize { nodes: 1, leaves: 0 };
        let mut has_children = false;
        for (_, child) in self.position(id).moves() {
            has_children = true;
            let sub = self.tree_size_of(child, memo);
            size.nodes += sub.nodes;
            size.leaves += sub.leaves;
        }
        if !has_children {
            size.leaves = 1;
        }
        memo[id.index()] = Some(size);
        size
    }
}
