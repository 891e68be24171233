use chrono::{DateTime, Local, NaiveDate};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::model::checklist::{ChecklistItem, Priority};
use crate::model::feed::{CronJob, JobStatus};
use crate::model::record::{Classification, ExternalRef, RecordId, Stage, TaskRecord};

// ---------------------------------------------------------------------------
// Task list JSON
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TaskEntry {
    id: serde_json::Value,
    title: String,
    status: String,
    #[serde(default)]
    completed_at: Option<String>,
    #[serde(default)]
    github_issue: Option<u64>,
}

/// Parse a JSON task list (`[{id, title, status, completed_at?, github_issue?}]`)
/// into checklist items.
pub fn parse_task_list_json(source: &str) -> Result<Vec<ChecklistItem>, serde_json::Error> {
    let entries: Vec<TaskEntry> = serde_json::from_str(source)?;
    Ok(entries
        .into_iter()
        .map(|entry| ChecklistItem {
            id: match entry.id {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            },
            text: entry.title.trim().to_string(),
            done: entry.status == "completed",
            time: entry.completed_at.as_deref().and_then(local_time_of_day),
            priority: entry.github_issue.map(Priority::Issue),
        })
        .collect())
}

/// RFC 3339 timestamp to local `HH:MM`
fn local_time_of_day(timestamp: &str) -> Option<String> {
    let parsed = DateTime::parse_from_rfc3339(timestamp).ok()?;
    Some(parsed.with_timezone(&Local).format("%H:%M").to_string())
}

// ---------------------------------------------------------------------------
// Board JSON
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct BoardEntry {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    date: Option<String>,
    stage: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    github_issue: Option<u64>,
    #[serde(default)]
    repo: Option<String>,
}

/// Parse a JSON board export into kanban records.
///
/// Entries with an empty title or an unknown stage are skipped; an
/// unparseable date is dropped. A missing or unknown `type` falls back to
/// `idea`.
pub fn parse_board_json(source: &str) -> Result<Vec<TaskRecord>, serde_json::Error> {
    let entries: Vec<BoardEntry> = serde_json::from_str(source)?;
    let mut records = Vec::new();

    for entry in entries {
        let title = entry.title.trim();
        if title.is_empty() {
            continue;
        }
        let Ok(stage) = entry.stage.parse::<Stage>() else {
            continue;
        };
        let classification = entry
            .kind
            .as_deref()
            .and_then(|k| k.parse::<Classification>().ok())
            .unwrap_or(Classification::Idea);

        records.push(TaskRecord {
            id: RecordId(records.len()),
            title: title.to_string(),
            description: entry
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            classification,
            stage,
            occurred_on: entry
                .date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
            external_ref: entry.github_issue.map(|issue| ExternalRef {
                issue,
                repo: entry.repo.clone(),
            }),
        });
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// Cron status JSON
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CronStatusFile {
    jobs: IndexMap<String, CronEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CronEntry {
    name: String,
    time: String,
    #[serde(default)]
    last_run: Option<String>,
    #[serde(default)]
    last_status: Option<JobStatus>,
}

/// Parse `cron-status.json` (`{"jobs": {"<id>": {...}}}`), keeping file order.
pub fn parse_cron_status(source: &str) -> Result<Vec<CronJob>, serde_json::Error> {
    let file: CronStatusFile = serde_json::from_str(source)?;
    Ok(file
        .jobs
        .into_iter()
        .map(|(id, job)| CronJob {
            id,
            name: job.name,
            time: job.time,
            last_run: job.last_run,
            last_status: job.last_status,
        })
        .collect())
}
