//! Set of entry ids already present in the sheet.

use std::collections::HashSet;

use serde_json::Value;

/// Ids recorded in the sheet, plus those written during the current run.
///
/// Seeded from the identifier column at the start of every run, so the sheet
/// stays the source of truth and separate runs are idempotent.
#[derive(Debug, Default, Clone)]
pub struct DedupIndex {
    ids: HashSet<String>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from raw identifier column cells.
    ///
    /// Numeric cells are stringified so they compare equal to API ids.
    pub fn from_cells<'a>(cells: impl IntoIterator<Item = &'a Value>) -> Self {
        let ids = cells.into_iter().filter_map(cell_key).collect();
        DedupIndex { ids }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Record an id; returns false if it was already present.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for DedupIndex {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        DedupIndex {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

fn cell_key(cell: &Value) -> Option<String> {
    match cell {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
