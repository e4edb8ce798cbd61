//! Sync engine for copying Toggl Track time entries into a Google Sheets worksheet.
//!
//! A run fetches the entries of a trailing window, keeps those belonging to
//! registered projects, and writes one row per entry whose id is not yet in
//! the sheet's identifier column. The sheet is the only durable state: every
//! run re-reads it, so repeated runs never duplicate rows.

pub mod config;
pub mod constants;
pub mod dedup;
pub mod entry;
pub mod error;
pub mod mapper;
pub mod projects;
pub mod remote;
pub mod row;
pub mod sync;
pub mod time_format;
pub mod window;

pub use config::{CredentialSource, SyncConfig, SyncOptions, WriteMode};
pub use dedup::DedupIndex;
pub use entry::{EntryBatch, EntryId, TimeEntry};
pub use error::{SyncError, SyncResult};
pub use mapper::{MapOutcome, map_entry};
pub use projects::ProjectRegistry;
pub use row::Row;
pub use sync::{RowCursor, SyncReport, Synchronizer};
pub use time_format::{FormattedTime, format_timestamp};
pub use window::SyncWindow;
