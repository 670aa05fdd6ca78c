//! Repository port for strategy table persistence.

use std::path::Path;

use crate::{Result, cover::StrategyTable};

/// Port for persisting and loading strategy tables.
///
/// Implementations choose the on-disk format; the table itself is always the
/// ordered list of `(key, move, outcome)` entries.
///
/// # Examples
///
/// ```no_run
/// use tictable::ports::TableRepository;
/// use tictable::cover::StrategyTable;
/// use std::path::Path;
///
/// fn export<R: TableRepository>(repo: &R, table: &StrategyTable) -> tictable::Result<()> {
///     repo.save(table, Path::new("table.json"))
/// }
/// ```
pub trait TableRepository {
    /// Save a table to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or serialization fails.
    fn save(&self, table: &StrategyTable, path: &Path) -> Result<()>;

    /// Load a table from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or its contents do not decode.
    fn load(&self, path: &Path) -> Result<StrategyTable>;
}
