//! Command-line and environment configuration.
//!
//! Every option can come from the environment (optionally via `.env`) or a
//! flag of the same name.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use togglsheet_core::constants::{
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SHEET_KEY, DEFAULT_SHEETS_API_BASE,
    DEFAULT_TOGGL_API_BASE, DEFAULT_USER_AGENT, DEFAULT_WINDOW_DAYS, DEFAULT_WORKSHEET_NAME,
};
use togglsheet_core::{
    CredentialSource, ProjectRegistry, SyncConfig, SyncError, SyncOptions, SyncResult, WriteMode,
};

#[derive(Parser, Debug, Clone)]
#[command(name = "togglsheet")]
#[command(about = "Sync recent Toggl Track time entries into a Google Sheets worksheet")]
pub struct Args {
    /// Toggl Track API token
    #[arg(long, env = "TOGGL_API_TOKEN", hide_env_values = true)]
    pub toggl_api_token: Option<String>,

    /// Path to a Google service-account key file
    #[arg(long, env = "GOOGLE_CREDENTIALS_PATH")]
    pub google_credentials_path: Option<PathBuf>,

    /// Inline Google service-account key JSON (used when the path is unset or missing)
    #[arg(long, env = "GOOGLE_CREDENTIALS_JSON", hide_env_values = true)]
    pub google_credentials_json: Option<String>,

    /// User-Agent sent to the Toggl API
    #[arg(long, env = "USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Spreadsheet key (the id in the sheet's URL)
    #[arg(long, env = "GOOGLE_SHEET_KEY", default_value = DEFAULT_SHEET_KEY)]
    pub sheet_key: String,

    /// Worksheet (tab) receiving the rows
    #[arg(long, env = "WORKSHEET_NAME", default_value = DEFAULT_WORKSHEET_NAME)]
    pub worksheet: String,

    /// Days of history to fetch
    #[arg(long, env = "SYNC_WINDOW_DAYS", default_value_t = DEFAULT_WINDOW_DAYS)]
    pub window_days: i64,

    /// Fetch everything since the window start instead of bounding it at now
    #[arg(long, env = "SYNC_OPEN_ENDED", default_value = "false")]
    pub open_ended: bool,

    /// How rows are written: "cursor" (explicit row ranges) or "append"
    #[arg(long, env = "WRITE_MODE", default_value = "cursor")]
    pub write_mode: WriteMode,

    /// TOML file with a [projects] table of name = id pairs
    #[arg(long, env = "PROJECTS_FILE")]
    pub projects_file: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    #[arg(long, env = "TOGGL_API_BASE", default_value = DEFAULT_TOGGL_API_BASE, hide = true)]
    pub toggl_api_base: String,

    #[arg(long, env = "SHEETS_API_BASE", default_value = DEFAULT_SHEETS_API_BASE, hide = true)]
    pub sheets_api_base: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Compute rows without writing them
    #[arg(long, env = "DRY_RUN", default_value = "false")]
    pub dry_run: bool,
}

impl Args {
    /// Resolve credentials and the project registry into a validated config.
    pub fn into_config(self) -> SyncResult<SyncConfig> {
        let token = self
            .toggl_api_token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| SyncError::Config("TOGGL_API_TOKEN is not set".into()))?;

        let credentials = CredentialSource::resolve(
            self.google_credentials_path.as_deref(),
            self.google_credentials_json.as_deref(),
        )?;

        let projects = match &self.projects_file {
            Some(path) => ProjectRegistry::load(path)?,
            None => ProjectRegistry::default(),
        };

        let config = SyncConfig {
            user_agent: self.user_agent,
            sheet_key: self.sheet_key,
            worksheet: self.worksheet,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            toggl_api_base: self.toggl_api_base,
            sheets_api_base: self.sheets_api_base,
            options: SyncOptions {
                window_days: self.window_days,
                open_ended: self.open_ended,
                write_mode: self.write_mode,
                dry_run: self.dry_run,
                projects,
            },
            ..SyncConfig::new(token, credentials)
        };

        config.validate()?;
        Ok(config)
    }
}
