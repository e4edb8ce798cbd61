#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};
use togglsheet_core::remote::{EntrySource, SheetStore};
use togglsheet_core::{EntryBatch, EntryId, Row, SyncError, SyncResult, SyncWindow, TimeEntry};

/// Entry source that replays queued responses, then repeats the last entries.
pub struct ScriptedSource {
    responses: Mutex<VecDeque<SyncResult<Vec<TimeEntry>>>>,
    fallback: Vec<TimeEntry>,
    malformed: usize,
    calls: Mutex<Vec<SyncWindow>>,
}

impl ScriptedSource {
    pub fn returning(entries: Vec<TimeEntry>) -> Self {
        ScriptedSource {
            responses: Mutex::new(VecDeque::new()),
            fallback: entries,
            malformed: 0,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_first(errors: Vec<SyncError>, entries: Vec<TimeEntry>) -> Self {
        let source = Self::returning(entries);
        source
            .responses
            .lock()
            .unwrap()
            .extend(errors.into_iter().map(Err));
        source
    }

    /// Report `count` undecodable elements alongside the entries.
    pub fn with_malformed(mut self, count: usize) -> Self {
        self.malformed = count;
        self
    }

    pub fn calls(&self) -> Vec<SyncWindow> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EntrySource for ScriptedSource {
    async fn fetch_entries(&self, window: &SyncWindow) -> SyncResult<EntryBatch> {
        self.calls.lock().unwrap().push(*window);
        let entries = match self.responses.lock().unwrap().pop_front() {
            Some(response) => response?,
            None => self.fallback.clone(),
        };
        Ok(EntryBatch {
            entries,
            malformed: self.malformed,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    At(usize, Row),
    Appended(Row),
}

/// Worksheet held in memory, recording every write.
#[derive(Default)]
pub struct MemorySheet {
    rows: Mutex<Vec<Vec<Value>>>,
    writes: Mutex<Vec<Write>>,
    fail_writes_after: Option<usize>,
}

impl MemorySheet {
    pub fn with_rows(rows: Vec<Vec<Value>>) -> Self {
        MemorySheet {
            rows: Mutex::new(rows),
            ..Default::default()
        }
    }

    /// Header row plus one row per existing id.
    pub fn with_ids(ids: &[&str]) -> Self {
        let mut rows = vec![header()];
        rows.extend(ids.iter().map(|id| vec![json!(id)]));
        Self::with_rows(rows)
    }

    pub fn failing_after(mut self, successful_writes: usize) -> Self {
        self.fail_writes_after = Some(successful_writes);
        self
    }

    pub fn rows(&self) -> Vec<Vec<Value>> {
        self.rows.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    fn check_failure(&self) -> SyncResult<()> {
        match self.fail_writes_after {
            Some(limit) if self.writes.lock().unwrap().len() >= limit => {
                Err(SyncError::Network("connection reset".into()))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl SheetStore for MemorySheet {
    async fn identifier_column(&self) -> SyncResult<Vec<Value>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.first().cloned().unwrap_or(Value::Null))
            .collect())
    }

    async fn row_count(&self) -> SyncResult<usize> {
        Ok(self.rows.lock().unwrap().len())
    }

    async fn write_row(&self, row_number: usize, row: &Row) -> SyncResult<()> {
        self.check_failure()?;
        let mut rows = self.rows.lock().unwrap();
        if rows.len() < row_number {
            rows.resize(row_number, Vec::new());
        }
        rows[row_number - 1] = row.to_cells();
        self.writes.lock().unwrap().push(Write::At(row_number, row.clone()));
        Ok(())
    }

    async fn append_row(&self, row: &Row) -> SyncResult<()> {
        self.check_failure()?;
        self.rows.lock().unwrap().push(row.to_cells());
        self.writes.lock().unwrap().push(Write::Appended(row.clone()));
        Ok(())
    }
}

pub fn header() -> Vec<Value> {
    vec![
        json!("id"),
        json!("description"),
        json!("start"),
        json!("stop"),
        json!("duration"),
        json!("project"),
    ]
}

pub fn entry(id: i64, project_id: i64) -> TimeEntry {
    TimeEntry {
        id: EntryId::Number(id),
        project_id: Some(project_id),
        description: Some(format!("entry {id}")),
        start: Some("2024-01-01T10:00:00Z".into()),
        stop: Some("2024-01-01T10:30:00Z".into()),
        duration: Some(1800),
        server_deleted_at: None,
    }
}
