//! Ports (trait boundaries) for external dependencies.
//!
//! The domain owns these traits; adapters implement them.

pub mod backend;
pub mod repository;

pub use backend::{AtMost, Model, SatBackend};
pub use repository::TableRepository;
