//! Spreadsheet-like table sources for the gridlink driver contract.
//!
//! A table source holds tables (sheets) of raw cell values. The first
//! row of a table, or the row at a configured offset, names the columns
//! of the table and wrapping a column name in parentheses marks the
//! column as part of the primary key:
//!
//! ```text
//! | (id) | name  |
//! | 1    | alice |
//! | 2    | bob   |
//! ```
//!
//! Raw cell values are read and written through a [GridService] which
//! has in-memory, CSV file and Google Sheets implementations.

pub mod annotation;
mod conn;
mod driver;
pub mod grid;
pub mod mapper;
mod options;
mod service;

pub use self::conn::SpreadsheetConn;
pub use self::driver::{SpreadsheetDriver, CSV_DRIVER, MEMORY_DRIVER, SPREADSHEET_DRIVER};
pub use self::options::ConnOptions;
pub use self::service::{
    CsvGridService,
    GoogleSheetsService,
    GridService,
    GridServiceError,
    MemoryGridService,
    SheetsServiceOptions,
};
