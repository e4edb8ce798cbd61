//! Entry filtering and row mapping.

use crate::dedup::DedupIndex;
use crate::entry::TimeEntry;
use crate::projects::ProjectRegistry;
use crate::row::{Row, seconds_to_minutes};
use crate::time_format::format_timestamp;

/// What to do with a fetched entry.
#[derive(Debug, Clone, PartialEq)]
pub enum MapOutcome {
    Accepted(Row),
    /// Project is missing or not in the registry
    UnknownProject,
    /// Id already recorded in the sheet or earlier in this run
    Duplicate,
}

/// Decide whether an entry is synced and build its row.
///
/// Pure: the index is only consulted, never updated.
pub fn map_entry(entry: &TimeEntry, projects: &ProjectRegistry, seen: &DedupIndex) -> MapOutcome {
    let Some(project_name) = entry.project_id.and_then(|id| projects.name_for(id)) else {
        return MapOutcome::UnknownProject;
    };

    let id = entry.id.as_key();
    if seen.contains(&id) {
        return MapOutcome::Duplicate;
    }

    MapOutcome::Accepted(Row {
        id,
        description: entry.description.clone().unwrap_or_default(),
        start: format_timestamp(entry.start.as_deref()).into_display(),
        stop: format_timestamp(entry.stop.as_deref()).into_display(),
        duration_minutes: seconds_to_minutes(entry.duration.unwrap_or(0)),
        project_name: project_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryId;

    fn registry() -> ProjectRegistry {
        ProjectRegistry::new([("TrueWork", 1), ("Entertainment", 2)]).unwrap()
    }

    fn entry(id: i64, project_id: Option<i64>) -> TimeEntry {
        TimeEntry {
            id: EntryId::Number(id),
            project_id,
            description: Some("Build".into()),
            start: Some("2024-01-01T10:00:00Z".into()),
            stop: Some("2024-01-01T11:00:00Z".into()),
            duration: Some(3600),
            server_deleted_at: None,
        }
    }

    #[test]
    fn test_accepts_known_project() {
        let outcome = map_entry(&entry(101, Some(1)), &registry(), &DedupIndex::new());

        assert_eq!(
            outcome,
            MapOutcome::Accepted(Row {
                id: "101".into(),
                description: "Build".into(),
                start: "2024-01-01 10:00:00".into(),
                stop: "2024-01-01 11:00:00".into(),
                duration_minutes: 60.0,
                project_name: "TrueWork".into(),
            })
        );
    }

    #[test]
    fn test_skips_unknown_or_missing_project() {
        let seen = DedupIndex::new();
        assert_eq!(map_entry(&entry(102, Some(99)), &registry(), &seen), MapOutcome::UnknownProject);
        assert_eq!(map_entry(&entry(103, None), &registry(), &seen), MapOutcome::UnknownProject);
    }

    #[test]
    fn test_skips_stringified_duplicate_without_touching_index() {
        let seen: DedupIndex = ["100"].into_iter().collect();
        let outcome = map_entry(&entry(100, Some(2)), &registry(), &seen);

        assert_eq!(outcome, MapOutcome::Duplicate);
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn test_defaults_for_sparse_entry() {
        let sparse = TimeEntry {
            id: EntryId::Number(7),
            project_id: Some(2),
            description: None,
            start: None,
            stop: None,
            duration: None,
            server_deleted_at: None,
        };

        let MapOutcome::Accepted(row) = map_entry(&sparse, &registry(), &DedupIndex::new()) else {
            panic!("expected row");
        };
        assert_eq!(row.description, "");
        assert_eq!(row.start, "");
        assert_eq!(row.stop, "");
        assert_eq!(row.duration_minutes, 0.0);
        assert_eq!(row.project_name, "Entertainment");
    }

    #[test]
    fn test_duration_rounding_and_malformed_stop() {
        let mut e = entry(8, Some(1));
        e.duration = Some(125);
        e.stop = Some("not a time".into());

        let MapOutcome::Accepted(row) = map_entry(&e, &registry(), &DedupIndex::new()) else {
            panic!("expected row");
        };
        assert_eq!(row.duration_minutes, 2.08);
        assert_eq!(row.stop, "not a time");
    }
}
