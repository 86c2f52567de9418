use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use async_trait::async_trait;
use gridlink_driver::{Conn, Driver, DriverError};
use tracing::info;

use crate::conn::SpreadsheetConn;
use crate::options::ConnOptions;
use crate::service::GridService;

/// The name the Google Sheets backed driver is registered under.
pub const SPREADSHEET_DRIVER: &str = "spreadsheet";
/// The name the CSV backed driver is registered under.
pub const CSV_DRIVER: &str = "csv";
/// The name the in-memory driver is registered under.
pub const MEMORY_DRIVER: &str = "memory";

#[derive(Clone)]
/// A [Driver] opening [SpreadsheetConn]s on top of a shared [GridService].
///
/// The connection string is parsed with [ConnOptions::from_dsn].
pub struct SpreadsheetDriver {
    service: Arc<dyn GridService>,
}

impl Debug for SpreadsheetDriver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("SpreadsheetDriver")
    }
}

impl SpreadsheetDriver {
    pub fn new(service: impl GridService + 'static) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

#[async_trait]
impl Driver for SpreadsheetDriver {
    async fn open(&self, dsn: &str) -> Result<Box<dyn Conn>, DriverError> {
        let options = ConnOptions::from_dsn(dsn)?;
        let conn = SpreadsheetConn::new(self.service.clone(), options)?;
        info!(
            table_source = conn.table_source(),
            header_row_index = conn.header_row_index(),
            "Opened connection"
        );
        Ok(Box::new(conn))
    }
}
