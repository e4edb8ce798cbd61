//! Timestamp rendering for the sheet.
//!
//! Toggl sends ISO-8601 timestamps; the sheet wants `YYYY-MM-DD HH:MM:SS` so
//! that `USER_ENTERED` writes are recognized as dates. Anything that does not
//! parse is passed through untouched rather than failing the run.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use tracing::debug;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Outcome of formatting a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattedTime {
    /// No timestamp was given
    Empty,
    /// Parsed and rendered in display format
    Parsed(String),
    /// Could not be parsed; holds the original input
    Passthrough(String),
}

impl FormattedTime {
    pub fn into_display(self) -> String {
        match self {
            FormattedTime::Empty => String::new(),
            FormattedTime::Parsed(s) | FormattedTime::Passthrough(s) => s,
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, FormattedTime::Passthrough(_))
    }
}

/// Render an ISO-8601 timestamp using the wall-clock fields it was written in.
pub fn format_timestamp(input: Option<&str>) -> FormattedTime {
    let raw = match input {
        Some(s) if !s.is_empty() => s,
        _ => return FormattedTime::Empty,
    };

    match parse_wall_clock(raw) {
        Some(dt) => FormattedTime::Parsed(dt.format(DISPLAY_FORMAT).to_string()),
        None => {
            debug!(timestamp = raw, "Unparseable timestamp, passing through");
            FormattedTime::Passthrough(raw.to_string())
        }
    }
}

fn parse_wall_clock(raw: &str) -> Option<NaiveDateTime> {
    let normalized = match raw.strip_suffix('Z') {
        Some(stripped) => format!("{stripped}+00:00"),
        None => raw.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.naive_local());
    }

    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::<FixedOffset>::parse_from_str(&normalized, fmt).ok())
        .map(|dt| dt.naive_local())
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(&normalized, fmt).ok())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
