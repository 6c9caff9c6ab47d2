use crate::github::issues::{self, Issue};
use std::future::Future;
use std::time::Duration;

/// GitHub API defaults
pub mod endpoints {
    pub const API_BASE_URL: &str = "https://api.github.com";
    pub const ACCEPT: &str = "application/vnd.github+json";
    pub const USER_AGENT: &str = "jabref-actions";
}

/// Only the first page is ever requested.
pub const PER_PAGE: u32 = 100;
pub const ISSUE_STATE: &str = "open";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Why a fetch of the issues list did not produce issues.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to GitHub failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("GitHub answered with HTTP {0}")]
    UnexpectedStatus(u16),
    #[error("malformed issues response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

/// Source of open issues for one repository.
pub trait IssueSource: Send + Sync {
    fn fetch_open_issues(&self) -> impl Future<Output = Result<Vec<Issue>, FetchError>> + Send;
}

/// Owner and name of a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Repository {
    /// Parses `owner/name`.
    pub fn parse(value: &str) -> Option<Self> {
        let (owner, name) = value.split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Repository {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl std::fmt::Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Unauthenticated issues-list client for a single repository.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_base_url: String,
    repository: Repository,
}

impl GitHubClient {
    pub fn new(api_base_url: &str, repository: Repository) -> anyhow::Result<Self> {
        let http = anyhow::Context::context(
            reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .user_agent(endpoints::USER_AGENT)
                .build(),
            "Failed to create HTTP client",
        )?;
        Ok(GitHubClient {
            http,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            repository,
        })
    }

    pub fn issues_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/issues",
            self.api_base_url, self.repository.owner, self.repository.name
        )
    }
}

impl IssueSource for GitHubClient {
    async fn fetch_open_issues(&self) -> Result<Vec<Issue>, FetchError> {
        let response = self
            .http
            .get(self.issues_url())
            .query(&[("per_page", PER_PAGE)])
            .query(&[("state", ISSUE_STATE)])
            .header("Accept", endpoints::ACCEPT)
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(FetchError::UnexpectedStatus(response.status().as_u16()));
        }

        let body = response.text().await?;
        Ok(issues::parse_issues(&body)?)
    }
}
