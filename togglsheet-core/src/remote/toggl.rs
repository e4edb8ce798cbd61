//! Toggl Track API v9 client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{EntrySource, check_status, endpoint, http_client, parse_base_url, read_json, transport_error};
use crate::config::SyncConfig;
use crate::entry::{EntryBatch, TimeEntry};
use crate::error::SyncResult;
use crate::window::SyncWindow;

const SERVICE: &str = "Toggl";

/// Fetches the authenticated user's time entries.
pub struct TogglClient {
    http: reqwest::Client,
    base_url: Url,
    api_token: String,
    timeout: Duration,
}

impl TogglClient {
    pub fn from_config(config: &SyncConfig) -> SyncResult<Self> {
        let http = http_client(&config.user_agent, config.request_timeout)?;
        Self::new(http, &config.toggl_api_base, &config.toggl_api_token, config.request_timeout)
    }

    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        api_token: &str,
        timeout: Duration,
    ) -> SyncResult<Self> {
        Ok(TogglClient {
            http,
            base_url: parse_base_url(base_url)?,
            api_token: api_token.to_string(),
            timeout,
        })
    }

    fn entries_url(&self, window: &SyncWindow) -> SyncResult<Url> {
        let mut url = endpoint(&self.base_url, &["api", "v9", "me", "time_entries"])?;
        {
            let mut query = url.query_pairs_mut();
            match window {
                SyncWindow::Bounded { .. } => {
                    query.append_pair("start_date", &window.since_param());
                    if let Some(until) = window.until_param() {
                        query.append_pair("end_date", &until);
                    }
                }
                // `since` matches entries modified after it, so deleted and
                // older edited entries come back too; see `is_live`
                SyncWindow::OpenEnded { since } => {
                    query.append_pair("since", &since.timestamp().to_string());
                }
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl EntrySource for TogglClient {
    async fn fetch_entries(&self, window: &SyncWindow) -> SyncResult<EntryBatch> {
        let url = self.entries_url(window)?;
        debug!(%url, "Fetching Toggl time entries");

        let response = self
            .http
            .get(url)
            .basic_auth(&self.api_token, Some("api_token"))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;

        let response = check_status(SERVICE, response).await?;

        // An empty account answers with `null` rather than `[]`
        let values: Option<Vec<Value>> = read_json(SERVICE, response, self.timeout).await?;
        let mut batch = EntryBatch::from_values(values.unwrap_or_default());
        batch.entries.retain(|entry| is_live(entry, window));
        Ok(batch)
    }
}

/// Not deleted, and started inside the window.
fn is_live(entry: &TimeEntry, window: &SyncWindow) -> bool {
    if entry.is_deleted() {
        debug!(id = %entry.id, "Dropping deleted entry");
        return false;
    }
    if !window.admits_start(entry.start.as_deref()) {
        debug!(id = %entry.id, start = ?entry.start, "Dropping entry started outside the window");
        return false;
    }
    true
}
