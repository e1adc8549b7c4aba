use chrono::{DateTime, Local, NaiveDateTime};

use crate::model::Task;

/// How many executions the recent-runs column shows.
pub const RECENT_RUNS_LIMIT: usize = 3;

pub const EMPTY_PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTag {
    pub label: String,
    pub start_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: Option<String>,
    pub name: String,
    pub owner: String,
    pub command: String,
    /// Most recent first, at most [`RECENT_RUNS_LIMIT`].
    pub recent: Vec<RunTag>,
}

impl TaskRow {
    pub fn id_label(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    pub fn recent_label(&self) -> String {
        if self.recent.is_empty() {
            return EMPTY_PLACEHOLDER.to_string();
        }
        self.recent
            .iter()
            .map(|t| t.label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn project_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id.clone(),
        name: task.name.clone(),
        owner: task.owner.clone(),
        command: task.command.clone(),
        recent: task
            .recent_executions(RECENT_RUNS_LIMIT)
            .map(|e| RunTag {
                label: format_timestamp(&e.start_time),
                start_time: e.start_time.clone(),
            })
            .collect(),
    }
}

pub fn project_rows(tasks: &[Task]) -> Vec<TaskRow> {
    tasks.iter().map(project_row).collect()
}

/// Local wall-clock rendering of a backend timestamp. Zoned timestamps are
/// converted to local time; zone-less ones are shown as given; anything else
/// is returned untouched.
pub fn format_timestamp(raw: &str) -> String {
    const DISPLAY: &str = "%Y-%m-%d %H:%M:%S";
    let trimmed = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return ts.with_timezone(&Local).format(DISPLAY).to_string();
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return ts.format(DISPLAY).to_string();
    }
    trimmed.to_string()
}

/// Visual truncation to `max` characters with a trailing ellipsis.
pub fn ellipsize(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
