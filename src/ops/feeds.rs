use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::model::feed::{Commit, CronJob, Issue, IssueState, Label};
use crate::ops::checklist::time_key;

// ---------------------------------------------------------------------------
// Commits
// ---------------------------------------------------------------------------

/// One entry of the commit-list endpoint (fields we use)
#[derive(Debug, Deserialize)]
pub struct RawCommit {
    pub sha: String,
    pub html_url: String,
    pub commit: RawCommitDetail,
}

#[derive(Debug, Deserialize)]
pub struct RawCommitDetail {
    pub message: String,
    pub author: RawCommitAuthor,
}

#[derive(Debug, Deserialize)]
pub struct RawCommitAuthor {
    pub name: String,
    pub date: String,
}

/// Shape commit-list entries for display.
pub fn shape_commits(raw: Vec<RawCommit>) -> Vec<Commit> {
    raw.into_iter()
        .map(|c| Commit {
            sha: c.sha.chars().take(7).collect(),
            message: c.commit.message.lines().next().unwrap_or("").to_string(),
            date: local_timestamp(&c.commit.author.date),
            author: c.commit.author.name,
            url: c.html_url,
        })
        .collect()
}

/// RFC 3339 to local `YYYY-MM-DD HH:MM`; unparseable input passes through.
fn local_timestamp(ts: &str) -> String {
    match DateTime::parse_from_rfc3339(ts) {
        Ok(parsed) => parsed
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        Err(_) => ts.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Issues
// ---------------------------------------------------------------------------

/// One entry of the issues endpoint. Pull requests come through the same
/// endpoint and carry a `pull_request` key.
#[derive(Debug, Deserialize)]
pub struct RawIssue {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub state: IssueState,
    pub html_url: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

/// Drop pull requests and sort newest number first.
pub fn shape_issues(raw: Vec<RawIssue>) -> Vec<Issue> {
    let mut issues: Vec<Issue> = raw
        .into_iter()
        .filter(|i| i.pull_request.is_none())
        .map(|i| Issue {
            id: i.id,
            number: i.number,
            title: i.title,
            state: i.state,
            html_url: i.html_url,
            labels: i.labels,
        })
        .collect();
    issues.sort_by(|a, b| b.number.cmp(&a.number));
    issues
}

// ---------------------------------------------------------------------------
// Cron
// ---------------------------------------------------------------------------

/// Where a job sits relative to the current time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CronSlot {
    Past,
    Current,
    Upcoming,
}

/// Compare a job's `H:MM`/`HH:MM` time against `now_hhmm` by hour and minute.
pub fn cron_slot(job: &CronJob, now_hhmm: &str) -> CronSlot {
    match time_key(&job.time).cmp(&time_key(now_hhmm)) {
        std::cmp::Ordering::Less => CronSlot::Past,
        std::cmp::Ordering::Equal => CronSlot::Current,
        std::cmp::Ordering::Greater => CronSlot::Upcoming,
    }
}
