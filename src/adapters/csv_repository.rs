//! CSV implementation of the table repository.

use std::path::Path;

use crate::{
    Result,
    cover::{StrategyTable, TableEntry},
    ports::TableRepository,
};

/// One `key,move,outcome` row per entry, with a header
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRepository;

impl CsvRepository {
    pub fn new() -> Self {
        Self
    }
}

impl TableRepository for CsvRepository {
    fn save(&self, table: &StrategyTable, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for entry in table.entries() {
            writer.serialize(entry)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<StrategyTable> {
        let mut reader = csv::Reader::from_path(path)?;
        let entries = reader
            .deserialize::<TableEntry>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries.into())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_csv_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("table.csv");
        let table: StrategyTable = vec![
            TableEntry { key: 0, mv: 4, outcome: 0 },
            TableEntry { key: 19_682, mv: 1, outcome: -3 },
        ]
        .into();

        let repo = CsvRepository::new();
        repo.save(&table, &file_path).unwrap();

        let text = std::fs::read_to_string(&file_path).unwrap();
        assert_eq!(text.lines().next(), Some("key,move,outcome"));
        assert_eq!(text.lines().count(), 3);

        assert_eq!(repo.load(&file_path).unwrap(), table);
    }

    #[test]
    fn test_missing_file_returns_error() {
        let result = CsvRepository::new().load(Path::new("/tmp/nonexistent_tictable_12345.csv"));
        assert!(result.is_err());
    }
}
