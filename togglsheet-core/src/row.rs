//! Sheet rows produced from accepted entries.

use serde_json::Value;

/// One worksheet row, columns A through F.
///
/// Built once per accepted entry and written exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: String,
    pub description: String,
    pub start: String,
    pub stop: String,
    /// Duration in minutes, rounded to 2 decimals
    pub duration_minutes: f64,
    pub project_name: String,
}

impl Row {
    /// Cell values in column order, as sent to the Sheets values API.
    pub fn to_cells(&self) -> Vec<Value> {
        vec![
            Value::String(self.id.clone()),
            Value::String(self.description.clone()),
            Value::String(self.start.clone()),
            Value::String(self.stop.clone()),
            Value::from(self.duration_minutes),
            Value::String(self.project_name.clone()),
        ]
    }
}

/// Convert seconds to minutes rounded to 2 decimal places.
pub fn seconds_to_minutes(seconds: i64) -> f64 {
    let minutes = seconds as f64 / 60.0;
    (minutes * 100.0).round() / 100.0
}
