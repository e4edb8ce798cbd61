//! Collaborators: where entries come from and where rows go.
//!
//! The sync engine only talks to the [`EntrySource`] and [`SheetStore`]
//! traits. The HTTP implementations for Toggl Track and Google Sheets live in
//! the submodules.

pub mod google_auth;
pub mod sheets;
pub mod toggl;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use url::Url;

use crate::entry::EntryBatch;
use crate::error::{SyncError, SyncResult};
use crate::row::Row;
use crate::window::SyncWindow;

/// Upstream time-tracking service.
#[async_trait]
pub trait EntrySource: Send + Sync {
    /// All entries of the authenticated user inside the window, in API order.
    ///
    /// Entries that fail to decode are counted in the batch instead of
    /// failing the fetch.
    async fn fetch_entries(&self, window: &SyncWindow) -> SyncResult<EntryBatch>;
}

/// Destination worksheet.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Every cell of the identifier column (column A), header included.
    async fn identifier_column(&self) -> SyncResult<Vec<Value>>;

    /// Number of rows currently holding data.
    async fn row_count(&self) -> SyncResult<usize>;

    /// Write a row at a 1-based row number.
    async fn write_row(&self, row_number: usize, row: &Row) -> SyncResult<()>;

    /// Append a row after the last row with data.
    async fn append_row(&self, row: &Row) -> SyncResult<()>;
}

/// Shared HTTP client with identification and per-request timeout.
pub fn http_client(user_agent: &str, timeout: Duration) -> SyncResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .map_err(|e| SyncError::Config(format!("Failed to build HTTP client: {e}")))
}

pub(crate) fn parse_base_url(base: &str) -> SyncResult<Url> {
    Url::parse(base).map_err(|e| SyncError::Config(format!("Invalid base URL '{base}': {e}")))
}

/// Append path segments to a base URL, keeping any path it already has.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> SyncResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| SyncError::Config(format!("Base URL '{base}' cannot hold a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

pub(crate) fn transport_error(err: reqwest::Error, timeout: Duration) -> SyncError {
    if err.is_timeout() {
        SyncError::Timeout(timeout)
    } else {
        SyncError::Network(err.to_string())
    }
}

/// Turn a non-success response into the matching error.
pub(crate) async fn check_status(
    service: &'static str,
    response: reqwest::Response,
) -> SyncResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SyncError::Authentication(
            format!("{service} rejected credentials ({}): {}", status.as_u16(), body),
        )),
        _ => Err(SyncError::Api {
            service,
            status: status.as_u16(),
            body,
        }),
    }
}

pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    service: &'static str,
    response: reqwest::Response,
    timeout: Duration,
) -> SyncResult<T> {
    let text = response
        .text()
        .await
        .map_err(|e| transport_error(e, timeout))?;
    serde_json::from_str(&text)
        .map_err(|e| SyncError::Serialization(format!("Unexpected {service} response: {e}")))
}
