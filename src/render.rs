//! Human-readable run summary.

use owo_colors::OwoColorize;
use togglsheet_core::{Row, SyncConfig, SyncReport};

pub fn report(report: &SyncReport, config: &SyncConfig) -> String {
    let mut lines: Vec<String> = report.rows.iter().map(row_line).collect();

    let summary = headline(report, &config.worksheet);
    lines.push(if report.has_changes() {
        summary.green().to_string()
    } else {
        summary.dimmed().to_string()
    });

    if let Some(skipped) = skipped(report) {
        lines.push(skipped.dimmed().to_string());
    }

    lines.join("\n")
}

fn row_line(row: &Row) -> String {
    let description = if row.description.is_empty() {
        "(no description)"
    } else {
        row.description.as_str()
    };
    format!(
        "   {} {}  {}  {}  {} min",
        "+".green(),
        row.id,
        row.project_name.bold(),
        description,
        row.duration_minutes
    )
}

fn headline(report: &SyncReport, worksheet: &str) -> String {
    let verb = if report.dry_run { "Would write" } else { "Wrote" };
    let noun = if report.written == 1 { "row" } else { "rows" };

    match report.first_row {
        Some(first) if report.written > 0 => format!(
            "{verb} {} {noun} to {worksheet} (rows {first}-{})",
            report.written,
            first + report.written - 1
        ),
        _ => format!("{verb} {} {noun} to {worksheet}", report.written),
    }
}

fn skipped(report: &SyncReport) -> Option<String> {
    let mut parts = Vec::new();
    if report.skipped_duplicate > 0 {
        parts.push(format!("{} already recorded", report.skipped_duplicate));
    }
    if report.skipped_unknown_project > 0 {
        parts.push(format!("{} outside synced projects", report.skipped_unknown_project));
    }
    if report.skipped_malformed > 0 {
        parts.push(format!("{} malformed", report.skipped_malformed));
    }
    (!parts.is_empty()).then(|| format!("Skipped {}", parts.join(", ")))
}
