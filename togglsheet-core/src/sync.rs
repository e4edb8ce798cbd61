//! The sync run: fetch, seed, filter, write.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::{SyncOptions, WriteMode};
use crate::constants::{FETCH_ATTEMPTS, FETCH_RETRY_DELAY_MS};
use crate::dedup::DedupIndex;
use crate::entry::EntryBatch;
use crate::error::SyncResult;
use crate::mapper::{MapOutcome, map_entry};
use crate::remote::{EntrySource, SheetStore};
use crate::row::Row;
use crate::window::SyncWindow;

/// Next writable 1-based row number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowCursor(usize);

impl RowCursor {
    /// Cursor just past the existing rows.
    pub fn after(existing_rows: usize) -> Self {
        RowCursor(existing_rows + 1)
    }

    pub fn position(&self) -> usize {
        self.0
    }

    pub fn advance(&mut self) {
        self.0 += 1;
    }
}

/// Outcome of a sync run.
#[derive(Debug, Default, Clone)]
pub struct SyncReport {
    pub fetched: usize,
    pub written: usize,
    pub skipped_unknown_project: usize,
    pub skipped_duplicate: usize,
    /// Response elements that did not decode as time entries
    pub skipped_malformed: usize,
    /// Row number of the first row written, in cursor mode
    pub first_row: Option<usize>,
    pub dry_run: bool,
    /// Rows in the order they were written (or would have been, in a dry run)
    pub rows: Vec<Row>,
}

impl SyncReport {
    pub fn has_changes(&self) -> bool {
        self.written > 0
    }
}

/// One sync run's context: the two collaborators plus the run options.
pub struct Synchronizer<S, T> {
    source: S,
    sheet: T,
    options: SyncOptions,
    retry_delay: Duration,
}

impl<S: EntrySource, T: SheetStore> Synchronizer<S, T> {
    pub fn new(source: S, sheet: T, options: SyncOptions) -> Self {
        Synchronizer {
            source,
            sheet,
            options,
            retry_delay: Duration::from_millis(FETCH_RETRY_DELAY_MS),
        }
    }

    /// Base delay between fetch attempts; grows linearly per attempt.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn sheet(&self) -> &T {
        &self.sheet
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    pub async fn run(&self) -> SyncResult<SyncReport> {
        self.run_at(Utc::now()).await
    }

    /// Run with an explicit "now" for the trailing window.
    pub async fn run_at(&self, now: DateTime<Utc>) -> SyncResult<SyncReport> {
        let window = SyncWindow::trailing(now, self.options.window_days, self.options.open_ended);
        info!(
            since = %window.since_param(),
            until = window.until_param().as_deref().unwrap_or("open"),
            "Fetching time entries"
        );
        let batch = self.fetch_with_retry(&window).await?;

        let mut seen = DedupIndex::from_cells(&self.sheet.identifier_column().await?);
        let mut cursor = RowCursor::after(self.sheet.row_count().await?);
        debug!(known_ids = seen.len(), next_row = cursor.position(), "Seeded from sheet");

        let mut report = SyncReport {
            fetched: batch.len(),
            skipped_malformed: batch.malformed,
            dry_run: self.options.dry_run,
            ..SyncReport::default()
        };

        for entry in &batch.entries {
            let row = match map_entry(entry, &self.options.projects, &seen) {
                MapOutcome::Accepted(row) => row,
                MapOutcome::UnknownProject => {
                    debug!(id = %entry.id, project_id = ?entry.project_id, "Skipping entry outside synced projects");
                    report.skipped_unknown_project += 1;
                    continue;
                }
                MapOutcome::Duplicate => {
                    debug!(id = %entry.id, "Skipping entry already in sheet");
                    report.skipped_duplicate += 1;
                    continue;
                }
            };

            if self.options.dry_run {
                info!(id = %row.id, row = cursor.position(), "Dry run, not writing entry");
            } else {
                self.write(&cursor, &row).await?;
                info!(id = %row.id, row = cursor.position(), project = %row.project_name, "Wrote entry");
            }

            if self.options.write_mode == WriteMode::Cursor {
                report.first_row.get_or_insert(cursor.position());
            }
            seen.insert(row.id.clone());
            cursor.advance();
            report.written += 1;
            report.rows.push(row);
        }

        info!(
            fetched = report.fetched,
            written = report.written,
            unknown_project = report.skipped_unknown_project,
            duplicate = report.skipped_duplicate,
            malformed = report.skipped_malformed,
            dry_run = report.dry_run,
            "Sync finished"
        );
        Ok(report)
    }

    async fn write(&self, cursor: &RowCursor, row: &Row) -> SyncResult<()> {
        match self.options.write_mode {
            WriteMode::Cursor => self.sheet.write_row(cursor.position(), row).await,
            WriteMode::Append => self.sheet.append_row(row).await,
        }
    }

    /// Fetching is read-only, so transport failures are retried.
    async fn fetch_with_retry(&self, window: &SyncWindow) -> SyncResult<EntryBatch> {
        let mut attempt = 1;
        loop {
            match self.source.fetch_entries(window).await {
                Ok(batch) => return Ok(batch),
                Err(e) if e.is_transient() && attempt < FETCH_ATTEMPTS => {
                    warn!(attempt, error = %e, "Fetch failed, retrying");
                    tokio::time::sleep(self.retry_delay * attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
