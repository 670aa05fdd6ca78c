//! MessagePack implementation of the table repository.

use std::{fs::File, path::Path};

use crate::{Result, cover::StrategyTable, error::Error, ports::TableRepository};

/// MessagePack-based table repository.
///
/// Compact binary storage via rmp_serde; the table is written as its ordered
/// entry list.
///
/// # Examples
///
/// ```no_run
/// use tictable::adapters::MsgPackRepository;
/// use tictable::cover::StrategyTable;
/// use tictable::ports::TableRepository;
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// repo.save(&StrategyTable::default(), Path::new("table.msgpack"))?;
/// let loaded = repo.load(Path::new("table.msgpack"))?;
/// # Ok::<(), tictable::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    pub fn new() -> Self {
        Self
    }
}

impl TableRepository for MsgPackRepository {
    fn save(&self, table: &StrategyTable, path: &Path) -> Result<()> {
        let mut file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;

        rmp_serde::encode::write(&mut file, table).map_err(|e| Error::SerializationContext {
            operation: "serialize strategy table to MessagePack".to_string(),
            message: e.to_string(),
        })?;

        Ok(())
    }

    fn load(&self, path: &Path) -> Result<StrategyTable> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        rmp_serde::decode::from_read(&file).map_err(|e| Error::SerializationContext {
            operation: "deserialize strategy table from MessagePack".to_string(),
            message: e.to_string(),
        })
    }
}
