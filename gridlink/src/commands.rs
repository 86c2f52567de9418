use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Subcommand;
use gridlink_driver::{Conn, DriverRegistry, Row, Schema};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the schema of a table as JSON
    Schema {
        /// The name of the table (sheet).
        table: String,
    },
    /// Print every row of a table as JSON
    Rows {
        /// The name of the table (sheet).
        table: String,
    },
    /// Replace the header row of a table with the schema in a JSON file
    SetSchema {
        /// The name of the table (sheet).
        table: String,
        /// The path of the JSON file holding the schema.
        file: PathBuf,
    },
    /// Replace every row of a table with the rows in a JSON file
    ///
    /// The table must already have a header row.
    SetRows {
        /// The name of the table (sheet).
        table: String,
        /// The path of the JSON file holding a list of rows.
        file: PathBuf,
    },
    /// List the available drivers
    Drivers,
    /// Run the gridlink REST server
    Serve {
        #[arg(
            short,
            long,
            env = "GRIDLINK_LISTEN_ADDRESS",
            default_value = "127.0.0.1:4210"
        )]
        /// The server bind address. {n}
        /// {n}
        /// * For local development this should be `127.0.0.1`. {n}
        /// * For external use this should be `0.0.0.0`.
        listen_address: SocketAddr,
    },
}

impl Commands {
    /// Triggers any additional startup messages which are aware
    /// of the provided subcommand.
    pub fn display_startup_message(&self, driver: &str) {
        match self {
            Commands::Serve { listen_address } => {
                info!(listen_address = %listen_address, driver, "Starting the gridlink server");
            },
            Commands::Drivers => {},
            _ => {
                info!(driver, "Opening table source");
            },
        }
    }

    /// Executes the command
    pub async fn execute(
        self,
        registry: &DriverRegistry,
        driver: &str,
        dsn: &str,
    ) -> Result<()> {
        if let Commands::Drivers = self {
            for name in registry.drivers() {
                println!("{name}");
            }
            return Ok(());
        }

        let conn: Arc<dyn Conn> = registry
            .open(driver, dsn)
            .await
            .with_context(|| format!("Open {driver} connection"))?
            .into();

        let result = self.execute_with_conn(conn.clone()).await;
        conn.close().await.context("Close connection")?;
        result
    }

    async fn execute_with_conn(self, conn: Arc<dyn Conn>) -> Result<()> {
        match self {
            Commands::Schema { table } => {
                let schema = conn
                    .get_schema(&table)
                    .await
                    .with_context(|| format!("Get schema of {table:?}"))?;
                print_json(&schema)?;
            },
            Commands::Rows { table } => {
                let rows = conn
                    .get_rows(&table)
                    .await
                    .with_context(|| format!("Get rows of {table:?}"))?;
                print_json(&rows)?;
            },
            Commands::SetSchema { table, file } => {
                let schema: Schema = read_json(&file).await?;
                conn.set_schema(&table, &schema)
                    .await
                    .with_context(|| format!("Set schema of {table:?}"))?;
                info!(table = %table, num_columns = schema.columns.len(), "Schema updated");
            },
            Commands::SetRows { table, file } => {
                let rows: Vec<Row> = read_json(&file).await?;
                conn.set_rows(&table, &rows)
                    .await
                    .with_context(|| format!("Set rows of {table:?}"))?;
                info!(table = %table, num_rows = rows.len(), "Rows updated");
            },
            Commands::Serve { listen_address } => {
                gridlink_server::run(listen_address, conn).await?;
            },
            Commands::Drivers => {},
        }

        Ok(())
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Read {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("Parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use gridlink_sheets::{CsvGridService, SpreadsheetDriver, CSV_DRIVER};

    use super::*;

    #[tokio::test]
    async fn test_set_schema_and_rows_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let registry = DriverRegistry::new();
        registry.register(
            CSV_DRIVER,
            SpreadsheetDriver::new(CsvGridService::new(dir.path().join("tables"))),
        );

        let schema_file = dir.path().join("schema.json");
        std::fs::write(
            &schema_file,
            r#"{
                "name": "users",
                "columns": [
                    {"name": "id", "ordinal_position": 0},
                    {"name": "name", "ordinal_position": 1}
                ],
                "primary_key": {"column_names": ["id"]}
            }"#,
        )
        .unwrap();
        let rows_file = dir.path().join("rows.json");
        std::fs::write(
            &rows_file,
            r#"[{"values": {"id": "1", "name": "alice"}}, {"values": {"id": "2", "name": "bob"}}]"#,
        )
        .unwrap();

        Commands::SetSchema {
            table: "users".to_string(),
            file: schema_file,
        }
        .execute(&registry, CSV_DRIVER, "book")
        .await
        .expect("Set schema");
        Commands::SetRows {
            table: "users".to_string(),
            file: rows_file,
        }
        .execute(&registry, CSV_DRIVER, "book")
        .await
        .expect("Set rows");

        let written = std::fs::read_to_string(dir.path().join("tables/book/users.csv")).unwrap();
        assert_eq!(written, "(id),name\n1,alice\n2,bob\n");

        Commands::Rows {
            table: "users".to_string(),
        }
        .execute(&registry, CSV_DRIVER, "book")
        .await
        .expect("Get rows");
    }

    #[tokio::test]
    async fn test_unknown_driver() {
        let registry = DriverRegistry::new();
        let result = Commands::Schema {
            table: "users".to_string(),
        }
        .execute(&registry, "missing", "")
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_read_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{").unwrap();

        let error = read_json::<Schema>(&path).await.unwrap_err();
        assert!(error.to_string().contains("broken.json"));
    }
}
