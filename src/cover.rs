//! Minimum strategy tables.
//!
//! A strategy table lists canonical positions with one move each. The cover
//! solver finds the smallest table that still lets the controlled player
//! play optimally against every reply, by bounding the number of selected
//! positions in a SAT formula and searching for the smallest feasible bound.

pub mod encoding;
pub mod query;
pub mod search;
pub mod solver;
pub mod table;
pub mod variables;

pub use encoding::CoverProblem;
pub use query::{CoverQuery, Side, Sides, Traversal};
pub use search::{Attempt, minimize_bound};
pub use solver::{CoverSolution, CoverSolver};
pub use table::{StrategyTable, TableEntry, TableMove, VerifyReport};
pub use variables::{CoverVar, VariablePool};
