use reqwest::blocking::Client;

use crate::io::source::SourceError;
use crate::model::config::{GithubConfig, RepoConfig};
use crate::model::feed::{Commit, RepoIssues};
use crate::ops::feeds::{RawCommit, RawIssue, shape_commits, shape_issues};

/// Read-only access to the GitHub REST API for the configured owner.
pub struct GithubFeed<'a> {
    client: &'a Client,
    config: &'a GithubConfig,
}

impl<'a> GithubFeed<'a> {
    pub fn new(client: &'a Client, config: &'a GithubConfig) -> Self {
        GithubFeed { client, config }
    }

    fn repo_url(&self, repo: &str, endpoint: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.config.api_url.trim_end_matches('/'),
            self.config.owner,
            repo,
            endpoint
        )
    }

    /// Latest commits of the configured commits repo.
    pub fn commits(&self) -> Result<Vec<Commit>, SourceError> {
        let repo = self
            .config
            .commits_repo
            .as_deref()
            .ok_or(SourceError::NotConfigured("commits"))?;
        let url = self.repo_url(repo, "commits");
        tracing::debug!(%url, "fetching commits");
        let raw: Vec<RawCommit> = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .query(&[("per_page", self.config.commit_limit)])
            .send()?
            .error_for_status()?
            .json()?;
        Ok(shape_commits(raw))
    }

    /// Open and closed issues of one repo, pull requests removed.
    pub fn repo_issues(&self, repo: &RepoConfig) -> Result<RepoIssues, SourceError> {
        let url = self.repo_url(&repo.name, "issues");
        tracing::debug!(%url, "fetching issues");
        let per_page = self.config.issue_limit.to_string();
        let raw: Vec<RawIssue> = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .query(&[("state", "all"), ("per_page", per_page.as_str())])
            .send()?
            .error_for_status()?
            .json()?;
        Ok(RepoIssues {
            repo: repo.name.clone(),
            display_name: repo.display_name().to_string(),
            issues: shape_issues(raw),
        })
    }

    /// Issues for every tracked repo. One failing repo fails the slice.
    pub fn issues(&self) -> Result<Vec<RepoIssues>, SourceError> {
        if self.config.repos.is_empty() {
            return Err(SourceError::NotConfigured("issues"));
        }
        self.config
            .repos
            .iter()
            .map(|repo| self.repo_issues(repo))
            .collect()
    }
}
