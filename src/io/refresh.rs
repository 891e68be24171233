use std::fmt;
use std::path::{Path, PathBuf};
use std::thread;

use chrono::{DateTime, Local};
use reqwest::blocking::Client;
use serde::Serialize;

use crate::io::github::GithubFeed;
use crate::io::source::{self, SourceError};
use crate::model::checklist::ChecklistItem;
use crate::model::config::DashboardConfig;
use crate::model::feed::{Commit, CronJob, RepoIssues};
use crate::model::record::TaskRecord;
use crate::ops::board::Board;

/// One independently loaded slice of dashboard data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Outline,
    Checklist,
    Commits,
    Issues,
    Cron,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceKind::Outline => "outline",
            SourceKind::Checklist => "checklist",
            SourceKind::Commits => "commits",
            SourceKind::Issues => "issues",
            SourceKind::Cron => "cron",
        };
        f.write_str(s)
    }
}

/// Where dashboard data comes from. Each method is one source; a failure
/// in one never affects the others.
pub trait Sources: Sync {
    fn outline(&self) -> Result<Vec<TaskRecord>, SourceError>;
    fn checklist(&self) -> Result<Vec<ChecklistItem>, SourceError>;
    fn commits(&self) -> Result<Vec<Commit>, SourceError>;
    fn issues(&self) -> Result<Vec<RepoIssues>, SourceError>;
    fn cron(&self) -> Result<Vec<CronJob>, SourceError>;
}

/// Sources read from disk and the GitHub API, per worktrack.toml
pub struct LiveSources {
    base: PathBuf,
    config: DashboardConfig,
    client: Client,
}

impl LiveSources {
    /// `base` is the directory holding worktrack.toml; relative source
    /// paths resolve against it.
    pub fn new(base: &Path, config: DashboardConfig) -> Result<Self, SourceError> {
        Ok(LiveSources {
            base: base.to_path_buf(),
            config,
            client: source::http_client()?,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Local files worth watching for changes
    pub fn watched_paths(&self) -> Vec<PathBuf> {
        source::source_paths(&self.base, &self.config.sources)
    }

    fn github(&self, kind: &'static str) -> Result<GithubFeed<'_>, SourceError> {
        if !self.config.github.enabled {
            return Err(SourceError::Disabled(kind));
        }
        Ok(GithubFeed::new(&self.client, &self.config.github))
    }
}

impl Sources for LiveSources {
    fn outline(&self) -> Result<Vec<TaskRecord>, SourceError> {
        source::load_outline(&self.base, &self.config.sources, &self.client)
    }

    fn checklist(&self) -> Result<Vec<ChecklistItem>, SourceError> {
        source::load_checklist(&self.base, &self.config.sources)
    }

    fn commits(&self) -> Result<Vec<Commit>, SourceError> {
        self.github("commits")?.commits()
    }

    fn issues(&self) -> Result<Vec<RepoIssues>, SourceError> {
        self.github("issues")?.issues()
    }

    fn cron(&self) -> Result<Vec<CronJob>, SourceError> {
        source::load_cron(&self.base, &self.config.sources)
    }
}

/// What one refresh did to each slice
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefreshReport {
    pub updated: Vec<SourceKind>,
    pub skipped: Vec<SourceKind>,
    pub failed: Vec<(SourceKind, String)>,
}

impl RefreshReport {
    fn record<T>(&mut self, kind: SourceKind, result: Result<T, SourceError>, slot: impl FnOnce(T)) {
        match result {
            Ok(value) => {
                slot(value);
                self.updated.push(kind);
            }
            Err(e) if e.is_skip() => {
                tracing::debug!(source = %kind, reason = %e, "source skipped");
                self.skipped.push(kind);
            }
            Err(e) => {
                tracing::warn!(source = %kind, error = %e, "refresh failed, keeping previous data");
                self.failed.push((kind, e.to_string()));
            }
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Everything the dashboard shows. Each slice is replaced wholesale on a
/// successful load of its source and kept as-is otherwise.
#[derive(Debug, Default)]
pub struct Dashboard {
    pub board: Board,
    pub checklist: Vec<ChecklistItem>,
    pub commits: Vec<Commit>,
    pub issues: Vec<RepoIssues>,
    pub cron: Vec<CronJob>,
    pub last_update: Option<DateTime<Local>>,
}

impl Dashboard {
    /// Load all sources concurrently and apply whatever succeeded.
    pub fn refresh(&mut self, sources: &impl Sources) -> RefreshReport {
        let (outline, checklist, commits, issues, cron) = thread::scope(|s| {
            let outline = s.spawn(|| sources.outline());
            let checklist = s.spawn(|| sources.checklist());
            let commits = s.spawn(|| sources.commits());
            let issues = s.spawn(|| sources.issues());
            let cron = s.spawn(|| sources.cron());
            (
                join(outline),
                join(checklist),
                join(commits),
                join(issues),
                join(cron),
            )
        });

        let mut report = RefreshReport::default();
        report.record(SourceKind::Outline, outline, |records| self.board.replace(records));
        report.record(SourceKind::Checklist, checklist, |items| self.checklist = items);
        report.record(SourceKind::Commits, commits, |list| self.commits = list);
        report.record(SourceKind::Issues, issues, |list| self.issues = list);
        report.record(SourceKind::Cron, cron, |jobs| self.cron = jobs);
        self.last_update = Some(Local::now());

        tracing::info!(
            updated = report.updated.len(),
            failed = report.failed.len(),
            "refresh complete"
        );
        report
    }
}

/// A loader that panicked fails only its own slice.
fn join<T>(handle: thread::ScopedJoinHandle<'_, Result<T, SourceError>>) -> Result<T, SourceError> {
    handle.join().unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(SourceError::Panicked(message))
    })
}
