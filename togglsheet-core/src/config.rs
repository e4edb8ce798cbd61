//! Typed configuration for a sync run.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::constants::{
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SHEET_KEY, DEFAULT_SHEETS_API_BASE,
    DEFAULT_TOGGL_API_BASE, DEFAULT_USER_AGENT, DEFAULT_WINDOW_DAYS, DEFAULT_WORKSHEET_NAME,
};
use crate::error::{SyncError, SyncResult};
use crate::projects::ProjectRegistry;

/// Where the Google service-account key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    File(PathBuf),
    Inline(String),
}

impl CredentialSource {
    /// Pick the key source: an existing file first, then inline JSON.
    pub fn resolve(path: Option<&Path>, inline: Option<&str>) -> SyncResult<Self> {
        if let Some(path) = path {
            if path.is_file() {
                return Ok(CredentialSource::File(path.to_path_buf()));
            }
            warn!(path = %path.display(), "GOOGLE_CREDENTIALS_PATH does not point to a file");
        }

        match inline {
            Some(json) if !json.trim().is_empty() => Ok(CredentialSource::Inline(json.to_string())),
            _ => Err(SyncError::Config(
                "No Google credentials found. Set GOOGLE_CREDENTIALS_PATH or GOOGLE_CREDENTIALS_JSON."
                    .into(),
            )),
        }
    }
}

/// How accepted rows reach the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Write `A{n}:F{n}` at the row cursor
    #[default]
    Cursor,
    /// Order-preserving append after the last row
    Append,
}

impl FromStr for WriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cursor" => Ok(WriteMode::Cursor),
            "append" => Ok(WriteMode::Append),
            other => Err(format!("Unknown write mode '{other}'. Expected 'cursor' or 'append'")),
        }
    }
}

/// Options that shape the sync algorithm itself.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub window_days: i64,
    pub open_ended: bool,
    pub write_mode: WriteMode,
    pub dry_run: bool,
    pub projects: ProjectRegistry,
}

impl Default for SyncOptions {
    fn default() -> Self {
        SyncOptions {
            window_days: DEFAULT_WINDOW_DAYS,
            open_ended: false,
            write_mode: WriteMode::default(),
            dry_run: false,
            projects: ProjectRegistry::default(),
        }
    }
}

/// Everything needed to build the collaborators and run one sync.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub toggl_api_token: String,
    pub credentials: CredentialSource,
    pub user_agent: String,
    pub sheet_key: String,
    pub worksheet: String,
    pub request_timeout: Duration,
    pub toggl_api_base: String,
    pub sheets_api_base: String,
    pub options: SyncOptions,
}

impl SyncConfig {
    /// Config with defaults for everything but the secrets.
    pub fn new(toggl_api_token: impl Into<String>, credentials: CredentialSource) -> Self {
        SyncConfig {
            toggl_api_token: toggl_api_token.into(),
            credentials,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            sheet_key: DEFAULT_SHEET_KEY.to_string(),
            worksheet: DEFAULT_WORKSHEET_NAME.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            toggl_api_base: DEFAULT_TOGGL_API_BASE.to_string(),
            sheets_api_base: DEFAULT_SHEETS_API_BASE.to_string(),
            options: SyncOptions::default(),
        }
    }

    /// Reject configurations that would fail only after network calls.
    pub fn validate(&self) -> SyncResult<()> {
        if self.toggl_api_token.trim().is_empty() {
            return Err(SyncError::Config("TOGGL_API_TOKEN is not set".into()));
        }
        if self.sheet_key.trim().is_empty() {
            return Err(SyncError::Config("Sheet key must not be empty".into()));
        }
        if self.worksheet.trim().is_empty() {
            return Err(SyncError::Config("Worksheet name must not be empty".into()));
        }
        if self.options.window_days <= 0 {
            return Err(SyncError::Config(format!(
                "Sync window must be at least one day, got {}",
                self.options.window_days
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(SyncError::Config("Request timeout must be positive".into()));
        }
        Ok(())
    }
}
