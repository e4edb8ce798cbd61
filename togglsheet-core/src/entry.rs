//! Time entries as returned by the Toggl Track API.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Entry identifier.
///
/// Toggl returns numeric ids while the sheet stores text, so ids are always
/// compared through their string form (see [`EntryId::as_key`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Number(i64),
    Text(String),
}

impl EntryId {
    pub fn as_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Number(n) => write!(f, "{n}"),
            EntryId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntryId {
    fn from(id: i64) -> Self {
        EntryId::Number(id)
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        EntryId::Text(id.to_string())
    }
}

/// A single recorded time interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: EntryId,
    #[serde(default)]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    /// ISO-8601 start timestamp
    #[serde(default)]
    pub start: Option<String>,
    /// ISO-8601 stop timestamp, absent while the entry is running
    #[serde(default)]
    pub stop: Option<String>,
    /// Seconds; negative while the entry is running
    #[serde(default)]
    pub duration: Option<i64>,
    /// Set once the entry has been deleted in Toggl
    #[serde(default)]
    pub server_deleted_at: Option<String>,
}

impl TimeEntry {
    pub fn is_deleted(&self) -> bool {
        self.server_deleted_at.is_some()
    }
}

/// Entries decoded from one fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryBatch {
    pub entries: Vec<TimeEntry>,
    /// Elements of the response that did not decode as a time entry
    pub malformed: usize,
}

impl EntryBatch {
    /// Decode each element on its own so one bad entry leaves the rest usable.
    pub fn from_values(values: Vec<Value>) -> Self {
        let mut batch = EntryBatch::default();
        for value in values {
            let id = value.get("id").cloned();
            match serde_json::from_value::<TimeEntry>(value) {
                Ok(entry) => batch.entries.push(entry),
                Err(e) => {
                    warn!(id = ?id, error = %e, "Skipping malformed time entry");
                    batch.malformed += 1;
                }
            }
        }
        batch
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<TimeEntry>> for EntryBatch {
    fn from(entries: Vec<TimeEntry>) -> Self {
        EntryBatch {
            entries,
            malformed: 0,
        }
    }
}
