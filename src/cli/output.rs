use chrono::NaiveDate;
use serde::Serialize;

use crate::io::refresh::{RefreshReport, SourceKind};
use crate::model::checklist::ChecklistItem;
use crate::model::feed::{Commit, CronJob, IssueState, JobStatus, RepoIssues};
use crate::model::record::{Stage, TaskRecord};
use crate::ops::burndown::{BoardStats, BurndownPoint};
use crate::ops::calendar::{CalendarIndex, MonthGrid};
use crate::ops::feeds::{CronSlot, cron_slot};
use crate::util::unicode::{fit_to_width, pad_left};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct BoardJson<'a> {
    pub columns: Vec<ColumnJson<'a>>,
}

#[derive(Serialize)]
pub struct ColumnJson<'a> {
    pub stage: Stage,
    pub records: Vec<&'a TaskRecord>,
}

#[derive(Serialize)]
pub struct CalendarJson<'a> {
    pub year: i32,
    pub month: u32,
    pub days: Vec<DayJson<'a>>,
}

#[derive(Serialize)]
pub struct DayJson<'a> {
    pub date: NaiveDate,
    pub records: Vec<&'a TaskRecord>,
}

#[derive(Serialize)]
pub struct StatsJson {
    #[serde(flatten)]
    pub stats: BoardStats,
    pub completion_percent: u32,
}

#[derive(Serialize)]
pub struct TodoJson<'a> {
    pub done: usize,
    pub total: usize,
    pub items: Vec<&'a ChecklistItem>,
}

#[derive(Serialize)]
pub struct CronJobJson<'a> {
    #[serde(flatten)]
    pub job: &'a CronJob,
    pub slot: CronSlot,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn board_to_json<'a>(columns: &[(Stage, Vec<&'a TaskRecord>)]) -> BoardJson<'a> {
    BoardJson {
        columns: columns
            .iter()
            .map(|(stage, records)| ColumnJson {
                stage: *stage,
                records: records.clone(),
            })
            .collect(),
    }
}

/// Days of `grid`'s month that have records, ascending
pub fn calendar_to_json<'a>(grid: &MonthGrid, index: &CalendarIndex<'a>) -> CalendarJson<'a> {
    let days = grid
        .weeks
        .iter()
        .flatten()
        .flatten()
        .filter_map(|&day| grid.date(day))
        .filter_map(|date| {
            index.get(&date).map(|records| DayJson {
                date,
                records: records.clone(),
            })
        })
        .collect();
    CalendarJson {
        year: grid.year,
        month: grid.month,
        days,
    }
}

pub fn stats_to_json(stats: &BoardStats) -> StatsJson {
    StatsJson {
        stats: *stats,
        completion_percent: stats.completion_percent(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

const NO_DATE: &str = "          ";

/// One record as a single line: id, type marker, date, title, description
pub fn format_record_line(record: &TaskRecord) -> String {
    let date = record
        .occurred_on
        .map(|d| d.to_string())
        .unwrap_or_else(|| NO_DATE.to_string());
    let mut line = format!(
        "{:>3} {} {}  {}",
        record.id.0,
        record.classification.marker(),
        date,
        record.title
    );
    if let Some(desc) = &record.description {
        line.push_str(" - ");
        line.push_str(desc);
    }
    if let Some(ext) = &record.external_ref {
        match &ext.repo {
            Some(repo) => line.push_str(&format!("  ({}#{})", repo, ext.issue)),
            None => line.push_str(&format!("  (#{})", ext.issue)),
        }
    }
    line
}

/// Kanban columns stacked vertically
pub fn format_board(columns: &[(Stage, Vec<&TaskRecord>)]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, (stage, records)) in columns.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("== {} ({}) ==", stage.label(), records.len()));
        if records.is_empty() {
            lines.push("  (empty)".to_string());
        }
        for record in records {
            lines.push(format_record_line(record));
        }
    }
    lines
}

/// Width of one calendar cell, including the separating space
pub const CALENDAR_CELL: usize = 12;
const CALENDAR_ITEMS_PER_DAY: usize = 3;
const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

fn calendar_row(cells: &[String]) -> String {
    cells
        .iter()
        .map(|c| fit_to_width(c, CALENDAR_CELL - 1))
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end()
        .to_string()
}

/// Month grid with up to three records per day; overflow shows `+N more`.
pub fn format_calendar(grid: &MonthGrid, index: &CalendarIndex<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    let title = grid
        .date(1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_default();
    lines.push(title);
    lines.push(calendar_row(&WEEKDAYS.map(str::to_string)));

    for week in &grid.weeks {
        let days: Vec<&[&TaskRecord]> = week
            .iter()
            .map(|day| {
                day.and_then(|d| grid.date(d))
                    .and_then(|date| index.get(&date))
                    .map(Vec::as_slice)
                    .unwrap_or(&[])
            })
            .collect();

        let numbers: Vec<String> = week
            .iter()
            .map(|day| day.map(|d| format!("{:>2}", d)).unwrap_or_default())
            .collect();
        lines.push(calendar_row(&numbers));

        let rows = days
            .iter()
            .map(|records| records.len())
            .max()
            .unwrap_or(0)
            .min(CALENDAR_ITEMS_PER_DAY);
        for row in 0..rows {
            let cells: Vec<String> = days
                .iter()
                .map(|records| {
                    let overflow = records.len() > CALENDAR_ITEMS_PER_DAY;
                    if overflow && row == CALENDAR_ITEMS_PER_DAY - 1 {
                        format!("+{} more", records.len() - row)
                    } else {
                        records
                            .get(row)
                            .map(|r| format!("{} {}", r.classification.marker(), r.title))
                            .unwrap_or_default()
                    }
                })
                .collect();
            lines.push(calendar_row(&cells));
        }
    }
    lines
}

const BURNDOWN_BAR: usize = 20;

/// The last `days` points of the series as text bars
pub fn format_burndown(points: &[BurndownPoint], days: usize) -> Vec<String> {
    if points.is_empty() {
        return vec!["no dated records".to_string()];
    }
    let start = points.len().saturating_sub(days);
    points[start..]
        .iter()
        .map(|p| {
            let filled = if p.total == 0 { 0 } else { p.done * BURNDOWN_BAR / p.total };
            format!(
                "{}  {}{}  {}/{} done, {} left",
                p.date,
                "\u{2588}".repeat(filled),
                "\u{2591}".repeat(BURNDOWN_BAR - filled),
                p.done,
                p.total,
                p.remaining
            )
        })
        .collect()
}

pub fn format_stats(stats: &BoardStats) -> Vec<String> {
    let row = |label: &str, n: usize| format!("{:<12}{}", label, pad_left(&n.to_string(), 4));
    vec![
        row(Stage::Backlog.label(), stats.backlog),
        row(Stage::InProgress.label(), stats.in_progress),
        row(Stage::Done.label(), stats.done),
        row("Total", stats.total),
        format!("{:<12}{}%", "Complete", pad_left(&stats.completion_percent().to_string(), 4)),
    ]
}

/// Checklist items in the order given, under a done/total header
pub fn format_checklist(items: &[&ChecklistItem], done: usize, total: usize) -> Vec<String> {
    let mut lines = vec![format!("{}/{} done", done, total)];
    for item in items {
        let mut line = format!("[{}] ", if item.done { 'x' } else { ' ' });
        if let Some(time) = &item.time {
            line.push_str(&format!("{:>5} ", time));
        }
        line.push_str(&item.text);
        if let Some(priority) = item.priority {
            line.push_str(&format!(" [{}]", priority));
        }
        lines.push(line);
    }
    lines
}

pub fn format_commits(commits: &[Commit]) -> Vec<String> {
    commits
        .iter()
        .map(|c| {
            format!(
                "{}  {}  {}  {}",
                c.sha,
                c.date,
                fit_to_width(&c.author, 14),
                c.message
            )
        })
        .collect()
}

pub fn format_issues(repos: &[RepoIssues], open_only: bool) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, repo) in repos.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        let open = repo
            .issues
            .iter()
            .filter(|issue| issue.state == IssueState::Open)
            .count();
        lines.push(format!(
            "== {} ({} open / {}) ==",
            repo.display_name,
            open,
            repo.issues.len()
        ));
        let shown: Vec<_> = repo
            .issues
            .iter()
            .filter(|issue| !open_only || issue.state == IssueState::Open)
            .collect();
        if shown.is_empty() {
            lines.push("  (no issues)".to_string());
        }
        for issue in shown {
            let state = match issue.state {
                IssueState::Open => "open",
                IssueState::Closed => "closed",
            };
            let mut line = format!("  #{:<5}{:<8}{}", issue.number, state, issue.title);
            if !issue.labels.is_empty() {
                let names: Vec<&str> = issue.labels.iter().map(|l| l.name.as_str()).collect();
                line.push_str(&format!("  [{}]", names.join(", ")));
            }
            lines.push(line);
        }
    }
    lines
}

/// Jobs in file order, marked by where they sit against `now_hhmm`
pub fn format_cron(jobs: &[CronJob], now_hhmm: &str) -> Vec<String> {
    jobs.iter()
        .map(|job| {
            let mark = match (cron_slot(job, now_hhmm), job.last_status) {
                (CronSlot::Current, _) => '>',
                (CronSlot::Upcoming, _) => ' ',
                (CronSlot::Past, Some(JobStatus::Ok)) => '\u{2713}',
                (CronSlot::Past, Some(JobStatus::Error)) => '\u{2717}',
                (CronSlot::Past, None) => '-',
            };
            let mut line = format!("{} {}  {}", mark, job.time, fit_to_width(&job.name, 20));
            if let Some(status) = job.last_status {
                let status = match status {
                    JobStatus::Ok => "ok",
                    JobStatus::Error => "error",
                };
                line.push_str(&format!("  {}", status));
            }
            if let Some(run) = &job.last_run {
                line.push_str(&format!("  (last run {})", run));
            }
            line.trim_end().to_string()
        })
        .collect()
}

fn kind_list(kinds: &[SourceKind]) -> String {
    kinds
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_refresh_report(report: &RefreshReport, at: &str) -> Vec<String> {
    let updated = if report.updated.is_empty() {
        "nothing".to_string()
    } else {
        kind_list(&report.updated)
    };
    let mut lines = vec![format!("refreshed at {}: updated {}", at, updated)];
    if !report.skipped.is_empty() {
        lines.push(format!("  skipped: {}", kind_list(&report.skipped)));
    }
    for (kind, error) in &report.failed {
        lines.push(format!("  failed: {} ({})", kind, error));
    }
    lines
}
