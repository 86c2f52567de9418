use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::trace;

use super::{GridService, GridServiceError};
use crate::grid::{self, Grid, GridRange};

type TableKey = (String, String);

#[derive(Clone, Default)]
/// A [GridService] keeping every table in memory.
///
/// Tables spring into existence on their first write and fetching a
/// table that was never written returns an empty grid. Trailing empty
/// cells are dropped but rows that were written are kept, even when
/// empty. Clones share the same tables.
pub struct MemoryGridService {
    tables: Arc<RwLock<ahash::HashMap<TableKey, Grid>>>,
}

impl MemoryGridService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole of a table with `values`.
    pub fn insert(&self, table_id: &str, table: &str, mut values: Grid) {
        grid::trim_cells(&mut values);
        let key = (table_id.to_string(), table.to_string());
        self.tables.write().insert(key, values);
    }

    /// Returns a copy of the whole of a table.
    pub fn get(&self, table_id: &str, table: &str) -> Option<Grid> {
        let key = (table_id.to_string(), table.to_string());
        self.tables.read().get(&key).cloned()
    }
}

#[async_trait]
impl GridService for MemoryGridService {
    async fn fetch(&self, table_id: &str, range: &GridRange) -> Result<Grid, GridServiceError> {
        trace!(table_id, range = %range, "Fetching values");
        let key = (table_id.to_string(), range.table.clone());
        let lock = self.tables.read();
        let values = lock
            .get(&key)
            .map(|values| grid::slice(values, range.bounds))
            .unwrap_or_default();
        Ok(values)
    }

    async fn write(
        &self,
        table_id: &str,
        range: &GridRange,
        values: Grid,
    ) -> Result<(), GridServiceError> {
        trace!(table_id, range = %range, num_rows = values.len(), "Writing values");
        let key = (table_id.to_string(), range.table.clone());
        let mut lock = self.tables.write();
        let table = lock.entry(key).or_default();
        if !grid::overwrite(table, range.bounds, &values) {
            return Err(GridServiceError::RangeOverflow {
                range: range.to_string(),
            });
        }
        Ok(())
    }

    async fn clear(&self, table_id: &str, range: &GridRange) -> Result<(), GridServiceError> {
        trace!(table_id, range = %range, "Clearing values");
        let key = (table_id.to_string(), range.table.clone());
        if let Some(table) = self.tables.write().get_mut(&key) {
            grid::clear(table, range.bounds);
        }
        Ok(())
    }
}
