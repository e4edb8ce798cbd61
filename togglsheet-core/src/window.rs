//! Fetch window for time entries.

use chrono::{DateTime, Duration, Utc};

const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Time range used to bound the entry fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncWindow {
    /// `[since, until)`
    Bounded {
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    },
    /// Everything from `since` onwards
    OpenEnded { since: DateTime<Utc> },
}

impl SyncWindow {
    /// Trailing window of `days` ending at `now`.
    pub fn trailing(now: DateTime<Utc>, days: i64, open_ended: bool) -> Self {
        let since = now - Duration::days(days);
        if open_ended {
            SyncWindow::OpenEnded { since }
        } else {
            SyncWindow::Bounded { since, until: now }
        }
    }

    pub fn since(&self) -> DateTime<Utc> {
        match self {
            SyncWindow::Bounded { since, .. } | SyncWindow::OpenEnded { since } => *since,
        }
    }

    pub fn until(&self) -> Option<DateTime<Utc>> {
        match self {
            SyncWindow::Bounded { until, .. } => Some(*until),
            SyncWindow::OpenEnded { .. } => None,
        }
    }

    /// `since` as a UTC `YYYY-MM-DDTHH:MM:SSZ` string.
    pub fn since_param(&self) -> String {
        self.since().format(WIRE_FORMAT).to_string()
    }

    pub fn until_param(&self) -> Option<String> {
        self.until().map(|t| t.format(WIRE_FORMAT).to_string())
    }

    /// Whether an entry starting at `start` belongs to the window.
    ///
    /// Missing or unparseable start times are kept; the row records them as-is.
    pub fn admits_start(&self, start: Option<&str>) -> bool {
        let Some(start) = start.and_then(|s| DateTime::parse_from_rfc3339(s).ok()) else {
            return true;
        };
        let start = start.with_timezone(&Utc);
        start >= self.since() && self.until().is_none_or(|until| start < until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_trailing_bounded_window() {
        let now = Utc.with_ymd_and_hms(2024, 1, 8, 12, 30, 15).unwrap();
        let window = SyncWindow::trailing(now, 7, false);

        assert_eq!(window.since_param(), "2024-01-01T12:30:15Z");
        assert_eq!(window.until_param().as_deref(), Some("2024-01-08T12:30:15Z"));
    }

    #[test]
    fn test_open_ended_window_has_no_until() {
        let now = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
        let window = SyncWindow::trailing(now, 3, true);

        assert_eq!(window, SyncWindow::OpenEnded { since: Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap() });
        assert_eq!(window.until_param(), None);
    }

    #[test]
    fn test_admits_start_within_window() {
        let now = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
        let open = SyncWindow::trailing(now, 7, true);
        let bounded = SyncWindow::trailing(now, 7, false);

        assert!(open.admits_start(Some("2024-01-01T00:00:00Z")));
        assert!(open.admits_start(Some("2024-01-09T10:00:00+02:00")));
        assert!(!open.admits_start(Some("2023-12-31T23:59:59Z")));
        assert!(!open.admits_start(Some("2024-01-01T00:30:00+01:00")));

        assert!(bounded.admits_start(Some("2024-01-07T23:59:59Z")));
        assert!(!bounded.admits_start(Some("2024-01-08T00:00:00Z")));

        assert!(open.admits_start(None));
        assert!(open.admits_start(Some("yesterday")));
    }
}
