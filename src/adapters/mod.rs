//! Adapters implementing domain ports.
//!
//! Infrastructure implementations of the traits in [`crate::ports`]: the
//! varisat SAT backend and table storage in three formats.

pub mod csv_repository;
pub mod json_repository;
pub mod msgpack_repository;
pub mod varisat_backend;

use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

pub use csv_repository::CsvRepository;
pub use json_repository::JsonRepository;
pub use msgpack_repository::MsgPackRepository;
pub use varisat_backend::VarisatBackend;

use crate::{Error, Result, ports::TableRepository};

/// On-disk table format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableFormat {
    #[default]
    Json,
    MsgPack,
    Csv,
}

impl TableFormat {
    const EXPECTED: &'static str = "json, msgpack, csv";

    /// Format named by the file extension, if any
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()?.to_str()?.parse().ok()
    }

    pub fn repository(self) -> Box<dyn TableRepository> {
        match self {
            TableFormat::Json => Box::new(JsonRepository),
            TableFormat::MsgPack => Box::new(MsgPackRepository),
            TableFormat::Csv => Box::new(CsvRepository),
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableFormat::Json => write!(f, "json"),
            TableFormat::MsgPack => write!(f, "msgpack"),
            TableFormat::Csv => write!(f, "csv"),
        }
    }
}

impl FromStr for TableFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(TableFormat::Json),
            "msgpack" | "mpk" => Ok(TableFormat::MsgPack),
            "csv" => Ok(TableFormat::Csv),
            other => Err(Error::InvalidConfiguration {
                message: format!("unknown table format '{other}'. Expected one of: {}", Self::EXPECTED),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(TableFormat::from_path(Path::new("t.csv")), Some(TableFormat::Csv));
        assert_eq!(TableFormat::from_path(Path::new("t.MsgPack")), Some(TableFormat::MsgPack));
        assert_eq!(TableFormat::from_path(Path::new("t.bin")), None);
        assert_eq!(TableFormat::from_path(Path::new("table")), None);
    }
}
