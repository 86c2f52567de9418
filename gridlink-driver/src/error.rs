use std::error::Error;

#[derive(Debug, thiserror::Error)]
/// An error that can occur while opening a connection or executing
/// one of its operations.
///
/// No error is recovered from internally, every failure aborts the
/// current operation and is returned to the caller as is.
pub enum DriverError {
    #[error("Invalid configuration: {0}")]
    /// The connection was configured with a value it cannot operate with,
    /// e.g. a negative header row index.
    InvalidConfiguration(String),
    #[error("Invalid connection string {dsn:?}: {reason}")]
    /// The connection string could not be parsed.
    InvalidConnectionString { dsn: String, reason: String },
    #[error("Missing data: row {row} requested but the grid only has {available} rows")]
    /// The requested header or data row lies outside the fetched grid.
    MissingData { row: usize, available: usize },
    #[error("Type mismatch at row {row}, column {column}: expected a string, found {found}")]
    /// A cell that must be string valued held some other kind of value.
    TypeMismatch {
        row: usize,
        column: usize,
        found: String,
    },
    #[error("Unsupported operation: {0}")]
    /// The connection does not implement the requested operation.
    UnsupportedOperation(String),
    #[error("Missing schema: table {0:?} has no header row")]
    /// A write needed an existing header row to order its columns and
    /// the table has none yet.
    MissingSchema(String),
    #[error("Duplicate column: {0:?}")]
    /// Two columns in the same schema resolved to the same name.
    DuplicateColumn(String),
    #[error("Driver not found: {0:?}")]
    /// No driver is registered under the given name.
    UnknownDriver(String),
    #[error("Service Error: {0}")]
    /// The backing table service failed the request.
    Service(#[source] Box<dyn Error + Send + Sync>),
}

impl DriverError {
    /// Wraps an error produced by a backing service.
    pub fn service(error: impl Error + Send + Sync + 'static) -> Self {
        Self::Service(Box::new(error))
    }
}
