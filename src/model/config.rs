use serde::{Deserialize, Serialize};

/// Configuration from worktrack.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub dashboard: DashboardInfo,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub github: GithubConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardInfo {
    #[serde(default = "default_name")]
    pub name: String,
    /// Default: see src/templates/worktrack.toml
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
    /// Done records dated more than this many days ago are archived
    #[serde(default = "default_archive_days")]
    pub archive_days: i64,
}

impl Default for DashboardInfo {
    fn default() -> Self {
        DashboardInfo {
            name: default_name(),
            refresh_secs: default_refresh_secs(),
            archive_days: default_archive_days(),
        }
    }
}

fn default_name() -> String {
    "Work Tracker".to_string()
}

fn default_refresh_secs() -> u64 {
    300
}

fn default_archive_days() -> i64 {
    7
}

/// Where each slice of dashboard data comes from. Paths are relative to
/// the directory holding worktrack.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Markdown outline (or board JSON)
    #[serde(default)]
    pub outline: Option<String>,
    /// Remote fallback for the outline, fetched when the local file fails
    #[serde(default)]
    pub outline_url: Option<String>,
    /// Markdown checklist or JSON task list
    #[serde(default)]
    pub checklist: Option<String>,
    #[serde(default)]
    pub cron_status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Set to false to skip all network feeds
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub owner: String,
    /// Repository whose commits are listed
    #[serde(default)]
    pub commits_repo: Option<String>,
    #[serde(default = "default_commit_limit")]
    pub commit_limit: u32,
    #[serde(default = "default_issue_limit")]
    pub issue_limit: u32,
    /// Repositories whose issues are listed
    #[serde(default)]
    pub repos: Vec<RepoConfig>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        GithubConfig {
            enabled: true,
            api_url: default_api_url(),
            owner: String::new(),
            commits_repo: None,
            commit_limit: default_commit_limit(),
            issue_limit: default_issue_limit(),
            repos: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoConfig {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl RepoConfig {
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

fn default_true() -> bool {
    true
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_commit_limit() -> u32 {
    10
}

fn default_issue_limit() -> u32 {
    50
}
