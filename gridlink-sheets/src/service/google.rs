use std::time::Duration;

use async_trait::async_trait;
use bon::Builder;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use super::{GridService, GridServiceError};
use crate::grid::{self, Grid, GridRange};

/// The Google Sheets v4 REST endpoint.
pub const DEFAULT_SHEETS_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Builder)]
/// Configuration options for connecting to the Google Sheets API.
pub struct SheetsServiceOptions {
    #[builder(into)]
    /// The OAuth2 bearer token sent with every request.
    ///
    /// How the token is obtained is up to the caller, the service treats
    /// it as an opaque credential.
    access_token: Option<String>,
    #[builder(into, default = DEFAULT_SHEETS_URL.to_string())]
    /// The base URL of the spreadsheets collection.
    base_url: String,
    #[builder(default = DEFAULT_TIMEOUT)]
    /// The timeout applied to each request.
    ///
    /// Default is `30s`.
    timeout: Duration,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    major_dimension: Option<String>,
    #[serde(default)]
    values: Grid,
}

#[derive(Clone)]
/// A [GridService] backed by the Google Sheets `spreadsheets.values` API.
///
/// `table_id` is the spreadsheet ID and tables are the sheets (tabs)
/// within it. Requests are issued exactly once, a failed request is
/// returned to the caller as is.
pub struct GoogleSheetsService {
    client: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl GoogleSheetsService {
    /// Creates a new service with the given options.
    pub fn new(options: SheetsServiceOptions) -> Result<Self, GridServiceError> {
        let base_url = Url::parse(&options.base_url)
            .map_err(|e| GridServiceError::InvalidBaseUrl(format!("{}: {e}", options.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(GridServiceError::InvalidBaseUrl(options.base_url));
        }

        let client = Client::builder().timeout(options.timeout).build()?;

        Ok(Self {
            client,
            base_url,
            access_token: options.access_token,
        })
    }

    /// Builds `{base_url}/{spreadsheet_id}/values/{segment}`.
    fn values_url(&self, spreadsheet_id: &str, segment: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(spreadsheet_id)
                .push("values")
                .push(segment);
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.access_token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check_status(response: Response) -> Result<Response, GridServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(GridServiceError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl GridService for GoogleSheetsService {
    #[instrument(skip(self, range), fields(range = %range))]
    async fn fetch(&self, table_id: &str, range: &GridRange) -> Result<Grid, GridServiceError> {
        let url = self.values_url(table_id, &range.to_string());
        let request = self
            .client
            .get(url)
            .query(&[("majorDimension", "ROWS")]);

        let response = self.authorize(request).send().await?;
        let body: ValueRange = Self::check_status(response).await?.json().await?;

        let mut values = body.values;
        grid::trim(&mut values);
        debug!(num_rows = values.len(), "Fetched values");
        Ok(values)
    }

    #[instrument(skip(self, range, values), fields(range = %range, num_rows = values.len()))]
    async fn write(
        &self,
        table_id: &str,
        range: &GridRange,
        values: Grid,
    ) -> Result<(), GridServiceError> {
        let range_a1 = range.to_string();
        let url = self.values_url(table_id, &range_a1);
        let body = ValueRange {
            range: Some(range_a1),
            major_dimension: Some("ROWS".to_string()),
            values,
        };
        let request = self
            .client
            .put(url)
            .query(&[("valueInputOption", "RAW")])
            .json(&body);

        let response = self.authorize(request).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self, range), fields(range = %range))]
    async fn clear(&self, table_id: &str, range: &GridRange) -> Result<(), GridServiceError> {
        let url = self.values_url(table_id, &format!("{range}:clear"));
        let request = self.client.post(url).json(&serde_json::json!({}));

        let response = self.authorize(request).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellBounds;

    fn service(base_url: &str) -> GoogleSheetsService {
        let options = SheetsServiceOptions::builder().base_url(base_url).build();
        GoogleSheetsService::new(options).expect("Create service")
    }

    #[test]
    fn test_values_url_escapes_range() {
        let service = service(DEFAULT_SHEETS_URL);
        let range = GridRange::bounded("My Sheet", CellBounds::row(0, 2));
        let url = service.values_url("abc123", &range.to_string());
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/'My%20Sheet'!A1:B1"
        );
    }

    #[test]
    fn test_values_url_trailing_slash() {
        let service = service("http://127.0.0.1:8080/v4/spreadsheets/");
        let url = service.values_url("abc", "'users':clear");
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/v4/spreadsheets/abc/values/'users':clear"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let options = SheetsServiceOptions::builder().base_url("not a url").build();
        assert!(matches!(
            GoogleSheetsService::new(options),
            Err(GridServiceError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_value_range_missing_values() {
        let body: ValueRange =
            serde_json::from_str(r#"{"range": "'users'!A1:Z1000", "majorDimension": "ROWS"}"#)
                .unwrap();
        assert!(body.values.is_empty());
    }
}
