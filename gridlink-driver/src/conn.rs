use async_trait::async_trait;

use crate::{DriverError, Row, Schema};

#[async_trait]
/// An open connection to a table source.
///
/// Every operation is a single request/response exchange with the
/// backing source. Nothing is cached between calls so each read reflects
/// the source as it was when the call was made.
///
/// Dropping the returned future cancels the operation, whatever part of
/// the exchange has not been issued yet will not be.
pub trait Conn: Send + Sync {
    /// Returns the schema of the named table.
    async fn get_schema(&self, name: &str) -> Result<Schema, DriverError>;

    /// Replaces the schema of the named table.
    async fn set_schema(&self, name: &str, schema: &Schema) -> Result<(), DriverError>;

    /// Returns every row of the named table in table order.
    async fn get_rows(&self, name: &str) -> Result<Vec<Row>, DriverError>;

    /// Replaces every row of the named table with `rows`.
    async fn set_rows(&self, name: &str, rows: &[Row]) -> Result<(), DriverError>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), DriverError> {
        Ok(())
    }
}

#[async_trait]
/// A factory of [Conn]s, registered by name in a [crate::DriverRegistry].
pub trait Driver: Send + Sync {
    /// Opens a new connection using the given connection string.
    async fn open(&self, dsn: &str) -> Result<Box<dyn Conn>, DriverError>;
}
