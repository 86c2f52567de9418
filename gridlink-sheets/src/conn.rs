use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use async_trait::async_trait;
use gridlink_driver::{Conn, DriverError, Row, Schema};
use tracing::{debug, info, instrument};

use crate::grid::{CellBounds, Grid, GridRange};
use crate::mapper;
use crate::options::ConnOptions;
use crate::service::GridService;

/// A [Conn] mapping the tables (sheets) of a table source onto schemas
/// and rows.
///
/// The header row of each table, at the configured index, holds the
/// column names. Columns whose name is wrapped in parentheses, e.g.
/// `(id)`, make up the primary key.
///
/// ## Consistency
///
/// Every call fetches the table again, nothing is cached. Writes are a
/// clear followed by a write and are not atomic, a concurrent writer
/// racing between the two requests may corrupt the header row and a
/// concurrent reader may briefly observe an empty table.
pub struct SpreadsheetConn {
    table_source: String,
    header_row_index: usize,
    read_only: bool,
    service: Arc<dyn GridService>,
}

impl Debug for SpreadsheetConn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SpreadsheetConn(table_source={}, header_row_index={})",
            self.table_source, self.header_row_index
        )
    }
}

impl SpreadsheetConn {
    /// Creates a new connection reading and writing through `service`.
    ///
    /// Returns [DriverError::InvalidConfiguration] if the header row
    /// index is negative.
    pub fn new(service: Arc<dyn GridService>, options: ConnOptions) -> Result<Self, DriverError> {
        let header_row_index = usize::try_from(options.header_row_index).map_err(|_| {
            DriverError::InvalidConfiguration(format!(
                "header row index must not be negative, got {}",
                options.header_row_index
            ))
        })?;

        Ok(Self {
            table_source: options.table_source,
            header_row_index,
            read_only: options.read_only,
            service,
        })
    }

    #[inline]
    /// Returns the ID of the table source.
    pub fn table_source(&self) -> &str {
        &self.table_source
    }

    #[inline]
    /// Returns the index of the header row.
    pub fn header_row_index(&self) -> usize {
        self.header_row_index
    }

    async fn fetch_table(&self, name: &str) -> Result<Grid, DriverError> {
        let values = self
            .service
            .fetch(&self.table_source, &GridRange::table(name))
            .await?;
        Ok(values)
    }

    fn ensure_writable(&self, operation: &str) -> Result<(), DriverError> {
        if self.read_only {
            return Err(DriverError::UnsupportedOperation(format!(
                "{operation} on a read-only connection"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Conn for SpreadsheetConn {
    #[instrument(skip(self), fields(table_source = %self.table_source))]
    async fn get_schema(&self, name: &str) -> Result<Schema, DriverError> {
        let values = self.fetch_table(name).await?;
        mapper::extract_schema(name, &values, self.header_row_index)
    }

    #[instrument(skip(self, schema), fields(table_source = %self.table_source))]
    async fn set_schema(&self, name: &str, schema: &Schema) -> Result<(), DriverError> {
        self.ensure_writable("set_schema")?;
        schema.validate()?;

        let values = self.fetch_table(name).await?;
        if let Some(header) = values.get(self.header_row_index) {
            if !header.is_empty() {
                let bounds = CellBounds::row(self.header_row_index, header.len());
                debug!(width = header.len(), "Clearing existing header row");
                self.service
                    .clear(&self.table_source, &GridRange::bounded(name, bounds))
                    .await?;
            }
        }

        let header = mapper::serialize_schema(schema);
        if header.is_empty() {
            return Ok(());
        }

        let bounds = CellBounds::row(self.header_row_index, header.len());
        self.service
            .write(&self.table_source, &GridRange::bounded(name, bounds), vec![header])
            .await?;

        info!(
            num_columns = schema.columns.len(),
            primary_key = %schema.primary_key,
            "Wrote schema"
        );
        Ok(())
    }

    #[instrument(skip(self), fields(table_source = %self.table_source))]
    async fn get_rows(&self, name: &str) -> Result<Vec<Row>, DriverError> {
        let values = self.fetch_table(name).await?;
        mapper::extract_rows(name, &values, self.header_row_index)
    }

    #[instrument(skip(self, rows), fields(table_source = %self.table_source, num_rows = rows.len()))]
    async fn set_rows(&self, name: &str, rows: &[Row]) -> Result<(), DriverError> {
        self.ensure_writable("set_rows")?;

        let values = self.fetch_table(name).await?;
        let has_header = values
            .get(self.header_row_index)
            .is_some_and(|header| !header.is_empty());
        if !has_header {
            return Err(DriverError::MissingSchema(name.to_string()));
        }

        let schema = mapper::extract_schema(name, &values, self.header_row_index)?;
        let head = &values[..=self.header_row_index];
        let table = mapper::serialize_rows(&schema, head, rows);

        let range = GridRange::table(name);
        self.service.clear(&self.table_source, &range).await?;
        self.service.write(&self.table_source, &range, table).await?;

        info!("Wrote rows");
        Ok(())
    }
}
