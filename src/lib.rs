//! Minimum strategy tables for noughts and crosses
//!
//! This crate provides:
//! - Board fingerprints and canonicalization under the 8 symmetries of the square
//! - The state graph under three reduction modes, scored by backward induction
//! - A SAT-backed search for the smallest set of positions a player has to
//!   remember to play perfectly
//! - A seeded random-walk sampler producing small (not minimal) tables
//! - Table persistence in MessagePack, JSON and CSV

pub mod adapters;
pub mod app;
pub mod cli;
pub mod cover;
pub mod error;
pub mod ports;
pub mod sampler;
pub mod tictactoe;

pub use cover::{CoverQuery, CoverSolution, CoverSolver, Sides, StrategyTable, Traversal};
pub use error::{Error, Result};
pub use sampler::{MinPathSampler, SamplerConfig};
pub use tictactoe::{Board, GameGraph, ReductionMode, score};
