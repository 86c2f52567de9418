use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{GridService, GridServiceError};
use crate::grid::{self, cell_to_string, Grid, GridRange};

const FILE_EXTENSION: &str = "csv";

#[derive(Debug, Clone)]
/// A [GridService] storing each table as a CSV file.
///
/// Tables are laid out on disk as:
///
/// ```text
/// root/
/// └── <table_id>/
///     └── <table>.csv
/// ```
///
/// Every cell is read back as a string. A table with no file reads as an
/// empty grid and the file is created on the first write. Written rows
/// are kept even when every cell is empty.
pub struct CsvGridService {
    root: Arc<PathBuf>,
}

impl CsvGridService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(root.into()),
        }
    }

    /// Returns the root directory the table sources live in.
    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    fn table_path(&self, table_id: &str, table: &str) -> Result<PathBuf, GridServiceError> {
        if !is_plain_file_name(table) {
            return Err(GridServiceError::InvalidTableName(table.to_string()));
        }
        if !table_id.is_empty() && !is_plain_file_name(table_id) {
            return Err(GridServiceError::InvalidTableName(table_id.to_string()));
        }

        Ok(self
            .root
            .join(table_id)
            .join(format!("{table}.{FILE_EXTENSION}")))
    }

    async fn load(&self, path: &Path) -> Result<Grid, GridServiceError> {
        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Grid::new()),
            Err(e) => return Err(e.into()),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data.as_slice());

        let mut values = Grid::new();
        for record in reader.records() {
            let record = record?;
            values.push(
                record
                    .iter()
                    .map(|field| Value::String(field.to_string()))
                    .collect(),
            );
        }
        grid::trim_cells(&mut values);
        Ok(values)
    }

    async fn store(&self, path: &Path, values: &[Vec<Value>]) -> Result<(), GridServiceError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(Vec::new());

        for row in values {
            if row.is_empty() {
                // The csv writer refuses empty records.
                writer.write_record([""])?;
            } else {
                writer.write_record(row.iter().map(cell_to_string))?;
            }
        }

        let data = writer
            .into_inner()
            .map_err(|e| GridServiceError::Io(e.into_error()))?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, data).await?;
        Ok(())
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

#[async_trait]
impl GridService for CsvGridService {
    #[instrument(skip(self, range), fields(range = %range))]
    async fn fetch(&self, table_id: &str, range: &GridRange) -> Result<Grid, GridServiceError> {
        let path = self.table_path(table_id, &range.table)?;
        let values = self.load(&path).await?;
        Ok(grid::slice(&values, range.bounds))
    }

    #[instrument(skip(self, range, values), fields(range = %range, num_rows = values.len()))]
    async fn write(
        &self,
        table_id: &str,
        range: &GridRange,
        values: Grid,
    ) -> Result<(), GridServiceError> {
        let path = self.table_path(table_id, &range.table)?;
        let mut table = self.load(&path).await?;
        if !grid::overwrite(&mut table, range.bounds, &values) {
            return Err(GridServiceError::RangeOverflow {
                range: range.to_string(),
            });
        }
        self.store(&path, &table).await?;
        debug!(path = %path.display(), "Wrote table file");
        Ok(())
    }

    #[instrument(skip(self, range), fields(range = %range))]
    async fn clear(&self, table_id: &str, range: &GridRange) -> Result<(), GridServiceError> {
        let path = self.table_path(table_id, &range.table)?;
        let mut table = self.load(&path).await?;
        grid::clear(&mut table, range.bounds);
        self.store(&path, &table).await?;
        Ok(())
    }
}
