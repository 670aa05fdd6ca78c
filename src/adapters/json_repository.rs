//! JSON implementation of the table repository.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use crate::{Result, cover::StrategyTable, error::Error, ports::TableRepository};

/// Pretty-printed JSON array of `{key, move, outcome}` objects
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRepository;

impl JsonRepository {
    pub fn new() -> Self {
        Self
    }
}

impl TableRepository for JsonRepository {
    fn save(&self, table: &StrategyTable, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), table)?;
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<StrategyTable> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::cover::TableEntry;

    #[test]
    fn test_json_roundtrip_sorts_entries() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("table.json");
        std::fs::write(
            &file_path,
            r#"[{"key": 30, "move": 2, "outcome": 0}, {"key": 3, "move": 4, "outcome": -9}]"#,
        )
        .unwrap();

        let repo = JsonRepository::new();
        let loaded = repo.load(&file_path).unwrap();
        assert_eq!(
            loaded.entries(),
            &[
                TableEntry { key: 3, mv: 4, outcome: -9 },
                TableEntry { key: 30, mv: 2, outcome: 0 },
            ]
        );

        repo.save(&loaded, &file_path).unwrap();
        let text = std::fs::read_to_string(&file_path).unwrap();
        assert!(text.contains("\"move\": 4"));
        assert_eq!(repo.load(&file_path).unwrap(), loaded);
    }

    #[test]
    fn test_malformed_json_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("table.json");
        std::fs::write(&file_path, "{\"key\": 3}").unwrap();

        let result = JsonRepository::new().load(&file_path);
        assert!(matches!(result, Err(Error::Serialization(_))));
    }
}
