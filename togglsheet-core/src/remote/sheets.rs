//! Google Sheets API v4 values client for a single worksheet.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::google_auth::{ServiceAccountKey, fetch_access_token};
use super::{SheetStore, check_status, endpoint, http_client, parse_base_url, read_json, transport_error};
use crate::config::SyncConfig;
use crate::constants::{FIRST_COLUMN, LAST_COLUMN, SHEETS_SCOPE};
use crate::error::SyncResult;
use crate::row::Row;

const SERVICE: &str = "Google Sheets";
/// Lets Sheets parse `YYYY-MM-DD HH:MM:SS` text into dates and numbers
const VALUE_INPUT_OPTION: &str = "USER_ENTERED";

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<&'a str>,
    major_dimension: &'static str,
    values: Vec<Vec<Value>>,
}

/// One worksheet inside a spreadsheet, accessed with a bearer token.
pub struct GoogleSheet {
    http: reqwest::Client,
    base_url: Url,
    sheet_key: String,
    worksheet: String,
    access_token: String,
    timeout: Duration,
}

impl GoogleSheet {
    /// Authenticate with the configured service account and open the worksheet.
    pub async fn connect(config: &SyncConfig) -> SyncResult<Self> {
        let http = http_client(&config.user_agent, config.request_timeout)?;
        let key = ServiceAccountKey::load(&config.credentials)?;
        let token = fetch_access_token(&http, &key, SHEETS_SCOPE, config.request_timeout).await?;
        debug!(expires_at = ?token.expires_at, "Obtained Google access token");

        Self::new(
            http,
            &config.sheets_api_base,
            &config.sheet_key,
            &config.worksheet,
            &token.token,
            config.request_timeout,
        )
    }

    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        sheet_key: &str,
        worksheet: &str,
        access_token: &str,
        timeout: Duration,
    ) -> SyncResult<Self> {
        Ok(GoogleSheet {
            http,
            base_url: parse_base_url(base_url)?,
            sheet_key: sheet_key.to_string(),
            worksheet: worksheet.to_string(),
            access_token: access_token.to_string(),
            timeout,
        })
    }

    fn values_url(&self, range: &str) -> SyncResult<Url> {
        endpoint(&self.base_url, &["v4", "spreadsheets", self.sheet_key.as_str(), "values", range])
    }

    async fn get_values(&self, range: &str, major_dimension: &str) -> SyncResult<Vec<Vec<Value>>> {
        let mut url = self.values_url(range)?;
        url.query_pairs_mut()
            .append_pair("majorDimension", major_dimension);

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;
        let response = check_status(SERVICE, response).await?;

        let range: ValueRange = read_json(SERVICE, response, self.timeout).await?;
        Ok(range.values)
    }
}

#[async_trait]
impl SheetStore for GoogleSheet {
    async fn identifier_column(&self) -> SyncResult<Vec<Value>> {
        let range = a1_range(&self.worksheet, &format!("{FIRST_COLUMN}:{FIRST_COLUMN}"));
        let columns = self.get_values(&range, "COLUMNS").await?;
        Ok(columns.into_iter().next().unwrap_or_default())
    }

    async fn row_count(&self) -> SyncResult<usize> {
        let range = quote_sheet_name(&self.worksheet);
        Ok(self.get_values(&range, "ROWS").await?.len())
    }

    async fn write_row(&self, row_number: usize, row: &Row) -> SyncResult<()> {
        let range = a1_range(
            &self.worksheet,
            &format!("{FIRST_COLUMN}{row_number}:{LAST_COLUMN}{row_number}"),
        );
        let mut url = self.values_url(&range)?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", VALUE_INPUT_OPTION);

        let body = ValueRangeBody {
            range: Some(range.as_str()),
            major_dimension: "ROWS",
            values: vec![row.to_cells()],
        };

        let response = self
            .http
            .put(url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;
        check_status(SERVICE, response).await?;
        Ok(())
    }

    async fn append_row(&self, row: &Row) -> SyncResult<()> {
        let range = a1_range(&self.worksheet, &format!("{FIRST_COLUMN}:{LAST_COLUMN}"));
        let mut url = self.values_url(&format!("{range}:append"))?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", VALUE_INPUT_OPTION)
            .append_pair("insertDataOption", "INSERT_ROWS");

        let body = ValueRangeBody {
            range: None,
            major_dimension: "ROWS",
            values: vec![row.to_cells()],
        };

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;
        check_status(SERVICE, response).await?;
        Ok(())
    }
}

/// Quote a sheet name for A1 notation.
///
/// Always quoted: a bare `Q12024` would be read as a cell reference.
fn quote_sheet_name(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

fn a1_range(worksheet: &str, cells: &str) -> String {
    format!("{}!{}", quote_sheet_name(worksheet), cells)
}
