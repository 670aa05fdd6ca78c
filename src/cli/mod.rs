//! CLI infrastructure for tictable
//!
//! Thin orchestration over the library: build and score graphs, search for
//! minimum strategy tables, sample heuristic ones and query saved tables.

pub mod commands;
pub mod config;
pub mod output;
