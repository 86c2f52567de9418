use bon::Builder;
use gridlink_driver::DriverError;

#[derive(Debug, Clone, Eq, PartialEq, Builder)]
/// Options for opening a [crate::SpreadsheetConn].
///
/// Options are usually parsed from a connection string of the form
/// `<table_source>[?header_row=<n>&read_only=<bool>]`, e.g.
/// `1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms?header_row=1`.
pub struct ConnOptions {
    #[builder(into)]
    /// The ID of the table source, e.g. the spreadsheet ID.
    pub table_source: String,
    #[builder(default = 0)]
    /// The zero-based index of the row holding the column names.
    ///
    /// Must not be negative, it is validated when the connection
    /// is created.
    pub header_row_index: i64,
    #[builder(default)]
    /// Rejects any schema or row writes when set.
    pub read_only: bool,
}

impl ConnOptions {
    /// Parses the options from a connection string.
    pub fn from_dsn(dsn: &str) -> Result<Self, DriverError> {
        let invalid = |reason: String| DriverError::InvalidConnectionString {
            dsn: dsn.to_string(),
            reason,
        };

        let (table_source, query) = match dsn.split_once('?') {
            Some((table_source, query)) => (table_source, query),
            None => (dsn, ""),
        };

        let mut options = ConnOptions::builder()
            .table_source(table_source.trim())
            .build();

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "header_row" => {
                    options.header_row_index = value
                        .parse()
                        .map_err(|e| invalid(format!("header_row {value:?}: {e}")))?;
                },
                "read_only" => {
                    options.read_only = value
                        .parse()
                        .map_err(|e| invalid(format!("read_only {value:?}: {e}")))?;
                },
                other => return Err(invalid(format!("unknown option {other:?}"))),
            }
        }

        Ok(options)
    }
}
