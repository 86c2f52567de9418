mod commands;
mod logging;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gridlink_driver::DriverRegistry;
use gridlink_sheets::{
    CsvGridService,
    GoogleSheetsService,
    MemoryGridService,
    SheetsServiceOptions,
    SpreadsheetDriver,
    CSV_DRIVER,
    MEMORY_DRIVER,
    SPREADSHEET_DRIVER,
};
use tracing::info;

use crate::logging::init_logging;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Debug, Parser)]
#[command(version, about)]
/// gridlink, spreadsheets as tables.
///
/// gridlink reads the tables of a spreadsheet as schemas and rows, the header row
/// of each sheet names its columns and `(column)` headers make up the primary key.
pub struct Args {
    #[arg(long, env = "GRIDLINK_LOG_LEVEL", default_value = "info")]
    /// Set the log level.
    ///
    /// This can filter on various levels, for example `info,gridlink_sheets=debug`
    /// will display all logs at `info` level severity and above, except for log
    /// events that appear within the `gridlink_sheets` crate which are shown from
    /// `debug` upwards.
    log_level: String,
    #[arg(long, env = "GRIDLINK_LOG_JSON")]
    /// Emit logs in JSON format rather than as plain text.
    log_json: bool,
    #[arg(long, env = "GRIDLINK_LOG_NO_ANSI")]
    /// Disable ANSI colour codes being present in the logs.
    ///
    /// ANSI codes can cause rendering issues on various observability platforms
    /// or text file logging due to its escape sequences.
    log_no_ansi: bool,
    #[arg(long, env = "GRIDLINK_DRIVER", default_value = SPREADSHEET_DRIVER)]
    /// The driver used to open the table source.
    ///
    /// One of `spreadsheet` (Google Sheets), `csv` or `memory`.
    driver: String,
    #[arg(long, env = "GRIDLINK_DSN", default_value = "")]
    /// The connection string of the table source.
    ///
    /// `<table_source>[?header_row=<n>&read_only=<bool>]` where the table source is
    /// the spreadsheet ID, or the directory name under `--csv-root` for CSV files.
    dsn: String,
    #[arg(long, env = "GRIDLINK_SHEETS_ACCESS_TOKEN", hide_env_values = true)]
    /// The OAuth2 access token used for the Google Sheets API.
    sheets_access_token: Option<String>,
    #[arg(long, env = "GRIDLINK_SHEETS_BASE_URL")]
    /// Overrides the base URL of the Google Sheets API.
    sheets_base_url: Option<String>,
    #[arg(long, env = "GRIDLINK_CSV_ROOT", default_value = ".")]
    /// The directory holding the table sources of the `csv` driver.
    csv_root: PathBuf,
    #[command(subcommand)]
    command: commands::Commands,
}

/// Creates the registry of every driver this binary ships with.
fn build_registry(args: &Args) -> anyhow::Result<DriverRegistry> {
    let registry = DriverRegistry::new();

    let options = SheetsServiceOptions::builder()
        .maybe_access_token(args.sheets_access_token.clone());
    let options = match args.sheets_base_url.clone() {
        Some(base_url) => options.base_url(base_url).build(),
        None => options.build(),
    };
    let sheets = GoogleSheetsService::new(options).context("Create Google Sheets service")?;
    registry.register(SPREADSHEET_DRIVER, SpreadsheetDriver::new(sheets));

    registry.register(
        CSV_DRIVER,
        SpreadsheetDriver::new(CsvGridService::new(args.csv_root.clone())),
    );
    registry.register(MEMORY_DRIVER, SpreadsheetDriver::new(MemoryGridService::new()));

    Ok(registry)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(&args)
        .context("Init logging")?;

    info!("gridlink v{}", env!("CARGO_PKG_VERSION"));

    let registry = build_registry(&args)?;
    args.command.display_startup_message(&args.driver);
    args.command
        .execute(&registry, &args.driver, &args.dsn)
        .await
}
