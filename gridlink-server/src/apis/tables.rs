use std::sync::Arc;

use gridlink_driver::{Conn, DriverError, Row, Schema};
use poem::http::StatusCode;
use poem_openapi::param::Path;
use poem_openapi::payload::Json;
use poem_openapi::OpenApi;
use serde_json::Value;
use tracing::{error, warn};

use super::Tag;

/// Schema and row API endpoints
pub struct GridlinkTableApi {
    conn: Arc<dyn Conn>,
}

impl GridlinkTableApi {
    pub fn new(conn: Arc<dyn Conn>) -> Self {
        Self { conn }
    }
}

fn status_of(error: &DriverError) -> StatusCode {
    match error {
        DriverError::MissingData { .. } | DriverError::MissingSchema(_) => StatusCode::NOT_FOUND,
        DriverError::TypeMismatch { .. }
        | DriverError::DuplicateColumn(_)
        | DriverError::InvalidConfiguration(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DriverError::UnsupportedOperation(_) => StatusCode::METHOD_NOT_ALLOWED,
        DriverError::Service(_) => StatusCode::BAD_GATEWAY,
        DriverError::InvalidConnectionString { .. } | DriverError::UnknownDriver(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        },
    }
}

fn to_poem_error(table: &str, error: DriverError) -> poem::Error {
    let status = status_of(&error);
    if status.is_server_error() {
        error!(table, error = %error, "Table operation failed");
    } else {
        warn!(table, error = %error, "Table operation rejected");
    }
    poem::Error::from_string(error.to_string(), status)
}

fn to_json<T: serde::Serialize>(value: &T) -> poem::Result<Json<Value>> {
    serde_json::to_value(value)
        .map(Json)
        .map_err(|e| poem::Error::from_string(e.to_string(), StatusCode::INTERNAL_SERVER_ERROR))
}

fn from_json<T: serde::de::DeserializeOwned>(value: Value) -> poem::Result<T> {
    serde_json::from_value(value)
        .map_err(|e| poem::Error::from_string(format!("Invalid body: {e}"), StatusCode::BAD_REQUEST))
}

#[OpenApi(tag = Tag::TableEndpoints)]
impl GridlinkTableApi {
    #[oai(path = "/tables/:table/schema", method = "get")]
    /// Get Table Schema
    ///
    /// Reads the schema of the table from its header row.
    async fn get_schema(&self, table: Path<String>) -> poem::Result<Json<Value>> {
        let schema = self
            .conn
            .get_schema(&table)
            .await
            .map_err(|e| to_poem_error(&table, e))?;
        to_json(&schema)
    }

    #[oai(path = "/tables/:table/schema", method = "put")]
    /// Replace Table Schema
    ///
    /// Rewrites the header row of the table, data rows are left untouched.
    async fn set_schema(&self, table: Path<String>, body: Json<Value>) -> poem::Result<Json<bool>> {
        let schema: Schema = from_json(body.0)?;
        self.conn
            .set_schema(&table, &schema)
            .await
            .map_err(|e| to_poem_error(&table, e))?;
        Ok(Json(true))
    }

    #[oai(path = "/tables/:table/rows", method = "get")]
    /// Get Table Rows
    ///
    /// Returns every row of the table in table order.
    async fn get_rows(&self, table: Path<String>) -> poem::Result<Json<Value>> {
        let rows = self
            .conn
            .get_rows(&table)
            .await
            .map_err(|e| to_poem_error(&table, e))?;
        to_json(&rows)
    }

    #[oai(path = "/tables/:table/rows", method = "put")]
    /// Replace Table Rows
    ///
    /// Replaces every row of the table, the table must already have a header row.
    async fn set_rows(&self, table: Path<String>, body: Json<Value>) -> poem::Result<Json<bool>> {
        let rows: Vec<Row> = from_json(body.0)?;
        self.conn
            .set_rows(&table, &rows)
            .await
            .map_err(|e| to_poem_error(&table, e))?;
        Ok(Json(true))
    }
}
