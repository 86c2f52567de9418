//! Grid services fetch, write and clear raw cell values of a table.
//!
//! The mapping layer only ever talks to a [GridService], each backend
//! (in-memory, CSV files, Google Sheets) provides one implementation.

mod csv;
mod google;
mod memory;

use async_trait::async_trait;
use gridlink_driver::DriverError;

pub use self::csv::CsvGridService;
pub use self::google::{GoogleSheetsService, SheetsServiceOptions};
pub use self::memory::MemoryGridService;
use crate::grid::{Grid, GridRange};

#[async_trait]
/// Access to the raw values of the tables within a table source.
///
/// `table_id` identifies the table source, e.g. a spreadsheet, while
/// the [GridRange] names the table (sheet) and cells within it.
pub trait GridService: Send + Sync {
    /// Fetches the values within the range.
    ///
    /// The returned grid is anchored at the first cell of the range and
    /// omits trailing empty cells and rows.
    async fn fetch(&self, table_id: &str, range: &GridRange) -> Result<Grid, GridServiceError>;

    /// Replaces the values within the range starting at its first cell.
    async fn write(
        &self,
        table_id: &str,
        range: &GridRange,
        values: Grid,
    ) -> Result<(), GridServiceError>;

    /// Empties every cell within the range without removing rows or columns.
    async fn clear(&self, table_id: &str, range: &GridRange) -> Result<(), GridServiceError>;
}

#[derive(Debug, thiserror::Error)]
/// An error that can occur while accessing a grid service.
pub enum GridServiceError {
    #[error("HTTP Error: {0}")]
    /// The request could not be completed.
    Http(#[from] reqwest::Error),
    #[error("Service responded with status {status}: {message}")]
    /// The service rejected the request.
    Status { status: u16, message: String },
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV Error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("Invalid table name: {0:?}")]
    /// The table name cannot be used by this backend.
    InvalidTableName(String),
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Values do not fit within range {range}")]
    /// More values were written than the range has cells.
    RangeOverflow { range: String },
}

impl From<GridServiceError> for DriverError {
    fn from(error: GridServiceError) -> Self {
        DriverError::service(error)
    }
}
