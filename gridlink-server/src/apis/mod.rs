use poem_openapi::Tags;

mod health;
mod tables;

pub use self::health::GridlinkHealthApi;
pub use self::tables::GridlinkTableApi;

#[derive(Tags)]
pub(super) enum Tag {
    #[oai(rename = "Health Endpoints")]
    /// Service health related endpoints
    ///
    /// This can be used when behind load balancers or to ensure an instance is operating
    /// correctly.
    ///
    /// The basic health check endpoint will always return `200 OK` and can be used to
    /// check the service is reachable.
    HealthEndpoints,
    #[oai(rename = "Table Endpoints")]
    /// Read and replace the schema and rows of the tables within the table source.
    ///
    /// A table's schema is read from its header row, columns whose header is wrapped
    /// in parentheses, e.g. `(id)`, make up the primary key:
    ///
    /// ```json
    /// {
    ///     "name": "users",
    ///     "columns": [
    ///         {"name": "id", "ordinal_position": 0, "type": "string"},
    ///         {"name": "name", "ordinal_position": 1, "type": "string"}
    ///     ],
    ///     "primary_key": {"column_names": ["id"]}
    /// }
    /// ```
    ///
    /// Rows are always read and written as a whole, writing rows replaces every
    /// row of the table while keeping its header row as is.
    ///
    /// **NOTE: Writes are not atomic, a concurrent reader may briefly observe an
    /// empty table.**
    TableEndpoints,
}
