use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::model::checklist::ChecklistItem;
use crate::model::config::SourcesConfig;
use crate::model::feed::CronJob;
use crate::model::record::TaskRecord;
use crate::parse::{
    parse_board_json, parse_checklist, parse_cron_status, parse_outline, parse_task_list_json,
};

const USER_AGENT: &str = concat!("worktrack/", env!("CARGO_PKG_VERSION"));
const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

/// Error type for loading a dashboard source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("{0} source is not configured")]
    NotConfigured(&'static str),
    #[error("{0} feed is disabled")]
    Disabled(&'static str),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("loader panicked: {0}")]
    Panicked(String),
}

impl SourceError {
    /// Missing or switched-off sources are skipped rather than failed.
    pub fn is_skip(&self) -> bool {
        matches!(self, SourceError::NotConfigured(_) | SourceError::Disabled(_))
    }
}

/// Shared blocking HTTP client. No authorization header is ever set.
pub fn http_client() -> Result<reqwest::blocking::Client, SourceError> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(HTTP_TIMEOUT)
        .build()?;
    Ok(client)
}

/// Fetch a URL as text, failing on non-2xx statuses.
pub fn fetch_text(client: &reqwest::blocking::Client, url: &str) -> Result<String, SourceError> {
    tracing::debug!(%url, "fetching");
    let text = client.get(url).send()?.error_for_status()?.text()?;
    Ok(text)
}

fn read_local(base: &Path, rel: &str) -> Result<String, SourceError> {
    let path = base.join(rel);
    fs::read_to_string(&path).map_err(|e| SourceError::ReadError { path, source: e })
}

fn is_json(rel: &str) -> bool {
    Path::new(rel)
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

/// Resolve configured source paths against the config directory.
pub fn source_paths(base: &Path, sources: &SourcesConfig) -> Vec<PathBuf> {
    [&sources.outline, &sources.checklist, &sources.cron_status]
        .into_iter()
        .flatten()
        .map(|rel| base.join(rel))
        .collect()
}

/// Load the outline: local file first, then the remote fallback URL.
/// A `.json` path is read as a board export instead of Markdown.
pub fn load_outline(
    base: &Path,
    sources: &SourcesConfig,
    client: &reqwest::blocking::Client,
) -> Result<Vec<TaskRecord>, SourceError> {
    let local = match &sources.outline {
        Some(rel) => Some(read_local(base, rel).map(|text| (text, is_json(rel)))),
        None => None,
    };

    let (text, json) = match (local, &sources.outline_url) {
        (Some(Ok(loaded)), _) => loaded,
        (Some(Err(e)), Some(url)) => {
            tracing::warn!(error = %e, "local outline unavailable, trying remote");
            (fetch_text(client, url)?, is_json(url))
        }
        (None, Some(url)) => (fetch_text(client, url)?, is_json(url)),
        (Some(Err(e)), None) => return Err(e),
        (None, None) => return Err(SourceError::NotConfigured("outline")),
    };

    if json {
        Ok(parse_board_json(&text)?)
    } else {
        Ok(parse_outline(&text))
    }
}

/// Load the checklist from Markdown or a JSON task list.
pub fn load_checklist(base: &Path, sources: &SourcesConfig) -> Result<Vec<ChecklistItem>, SourceError> {
    let rel = sources
        .checklist
        .as_deref()
        .ok_or(SourceError::NotConfigured("checklist"))?;
    let text = read_local(base, rel)?;
    if is_json(rel) {
        Ok(parse_task_list_json(&text)?)
    } else {
        Ok(parse_checklist(&text))
    }
}

pub fn load_cron(base: &Path, sources: &SourcesConfig) -> Result<Vec<CronJob>, SourceError> {
    let rel = sources
        .cron_status
        .as_deref()
        .ok_or(SourceError::NotConfigured("cron status"))?;
    Ok(parse_cron_status(&read_local(base, rel)?)?)
}
