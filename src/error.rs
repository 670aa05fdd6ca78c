//! Error types for the tictable crate

use thiserror::Error;

/// Main error type for the tictable crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move: position {position} is out of range or already occupied")]
    InvalidMove { position: usize },

    #[error("fingerprint {value} is out of range (must be below 19683)")]
    FingerprintOutOfRange { value: u32 },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("invalid reduction mode '{input}'. Expected one of: {expected}")]
    ParseReductionMode { input: String, expected: String },

    #[error("invalid traversal '{input}'. Expected one of: {expected}")]
    ParseTraversal { input: String, expected: String },

    #[error("scoring made no progress with {unscored} positions still unscored")]
    ScoringStalled { unscored: usize },

    #[error("graph has not been scored; run the scorer before {operation}")]
    GraphNotScored { operation: String },

    #[error("position {key} has no child for move {position}")]
    MissingChild { key: u16, position: usize },

    #[error("no cover fits within the maximum bound {bound}; the constraint model is broken")]
    InfeasibleAtMaximum { bound: usize },

    #[error("selected position {key} has no selected outgoing move")]
    UnmatchedSelection { key: u16 },

    #[error("strategy table has no entry for controlled position {key}")]
    MissingEntry { key: u16 },

    #[error("strategy table move {position} at position {key} is {reason}")]
    IllegalTableMove {
        key: u16,
        position: usize,
        reason: String,
    },

    #[error("SAT backend failed: {message}")]
    Backend { message: String },

    #[error("SAT backend reported satisfiable without a model")]
    MissingModel,

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
