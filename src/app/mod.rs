//! Application layer: configuration shared by the library entry points and
//! the command-line tool.

pub mod config;

pub use config::AnalysisConfig;
