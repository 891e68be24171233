use serde::{Deserialize, Serialize};

/// A commit, already shaped for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Abbreviated (7 characters)
    pub sha: String,
    /// First line of the commit message
    pub message: String,
    /// Local time, `YYYY-MM-DD HH:MM`
    pub date: String,
    pub author: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    /// Hex color without `#`
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub state: IssueState,
    pub html_url: String,
    #[serde(default)]
    pub labels: Vec<Label>,
}

/// Issues for one tracked repository, newest number first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoIssues {
    pub repo: String,
    pub display_name: String,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Ok,
    Error,
}

/// A scheduled job from the cron status file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CronJob {
    pub id: String,
    pub name: String,
    /// Scheduled time of day, `HH:MM`
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_status: Option<JobStatus>,
}
