//! Noughts and crosses positions, symmetry reduction and backward induction

pub mod board;
pub mod graph;
pub mod lines;
pub mod scoring;
pub mod symmetry;

pub use board::{Board, Cell, Outcome, Player};
pub use graph::{GameGraph, LeafCounts, NodeId, Position, ReductionMode, TreeSize};
pub use lines::{LineAnalyzer, OUTCOME_CONTINUES, OUTCOME_DRAW, WINNING_LINES, outcome_code};
pub use scoring::{PassSummary, ScoreReport, score};
pub use symmetry::{CanonicalKey, FINGERPRINT_LIMIT, Fingerprint, Symmetry};
