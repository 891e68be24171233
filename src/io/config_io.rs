use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::config::{DashboardConfig, RepoConfig};

/// Name of the config file that marks a dashboard directory
pub const CONFIG_FILE: &str = "worktrack.toml";

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no {CONFIG_FILE} found in this directory or any parent (run `wt init`)")]
    NotFound,
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {CONFIG_FILE}: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not parse {CONFIG_FILE}: {0}")]
    EditParseError(#[from] toml_edit::TomlError),
    #[error("invalid {CONFIG_FILE}: {0}")]
    Invalid(String),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Walk up from `start` to the first directory holding `worktrack.toml`.
pub fn discover_config(start: &Path) -> Result<PathBuf, ConfigError> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).is_file() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(ConfigError::NotFound);
        }
    }
}

/// Read the config, returning both the parsed config and the raw
/// toml_edit document for format-preserving edits.
pub fn read_config(root: &Path) -> Result<(DashboardConfig, toml_edit::DocumentMut), ConfigError> {
    let path = root.join(CONFIG_FILE);
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    let config: DashboardConfig = toml::from_str(&text)?;
    if config.dashboard.archive_days < 0 {
        return Err(ConfigError::Invalid(format!(
            "dashboard.archive_days must not be negative (got {})",
            config.dashboard.archive_days
        )));
    }
    let doc: toml_edit::DocumentMut = text.parse()?;
    Ok((config, doc))
}

/// Write the config document back, keeping comments and layout.
pub fn write_config(root: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    atomic_write(&root.join(CONFIG_FILE), doc.to_string().as_bytes())?;
    Ok(())
}

/// Write `content` to `path` through a temp file in the same directory.
pub fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Append a `[[github.repos]]` entry. Returns false if the repo is
/// already tracked.
pub fn add_repo(doc: &mut toml_edit::DocumentMut, repo: &RepoConfig) -> bool {
    if !doc.contains_key("github") {
        let mut table = toml_edit::Table::new();
        table.set_implicit(true);
        doc["github"] = toml_edit::Item::Table(table);
    }
    let github = &mut doc["github"];
    if github.get("repos").is_none() {
        github["repos"] = toml_edit::Item::ArrayOfTables(toml_edit::ArrayOfTables::new());
    }
    let Some(repos) = github["repos"].as_array_of_tables_mut() else {
        return false;
    };
    if repos
        .iter()
        .any(|t| t.get("name").and_then(|v| v.as_str()) == Some(repo.name.as_str()))
    {
        return false;
    }

    let mut table = toml_edit::Table::new();
    table["name"] = toml_edit::value(&repo.name);
    if let Some(display) = &repo.display_name {
        table["display_name"] = toml_edit::value(display);
    }
    repos.push(table);
    true
}

/// Remove a tracked repo by name. Returns false if it was not present.
pub fn remove_repo(doc: &mut toml_edit::DocumentMut, name: &str) -> bool {
    let Some(repos) = doc
        .get_mut("github")
        .and_then(|g| g.get_mut("repos"))
        .and_then(|r| r.as_array_of_tables_mut())
    else {
        return false;
    };
    let before = repos.len();
    repos.retain(|t| t.get("name").and_then(|v| v.as_str()) != Some(name));
    repos.len() != before
}
