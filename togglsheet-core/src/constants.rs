//! Defaults shared by the engine and the CLI.

/// Length of the trailing fetch window
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

pub const DEFAULT_TOGGL_API_BASE: &str = "https://api.track.toggl.com";
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com";

pub const DEFAULT_SHEET_KEY: &str = "1LnXyqlzjRm6BEejWdGb3y66FgZD2GmaMmfNmYdDW-dU";
pub const DEFAULT_WORKSHEET_NAME: &str = "TogglLog";
pub const DEFAULT_USER_AGENT: &str = "togglsheet";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// OAuth scope needed to read and write sheet values
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Columns spanned by a row (A = entry id ... F = project name)
pub const FIRST_COLUMN: &str = "A";
pub const LAST_COLUMN: &str = "F";

/// Fetch attempts before a transient failure becomes fatal
pub const FETCH_ATTEMPTS: u32 = 3;
pub const FETCH_RETRY_DELAY_MS: u64 = 500;
