use crate::github::client::{FetchError, IssueSource};
use crate::github::issues::Issue;
use crate::github::labels;

/// Internal cause of a failed query. Logged, never shown to users.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    Transport(String),
    UnexpectedStatus(u16),
    MalformedResponse(String),
}

impl From<FetchError> for FailureReason {
    fn from(error: FetchError) -> Self {
        match error {
            FetchError::Transport(err) => FailureReason::Transport(err.to_string()),
            FetchError::UnexpectedStatus(status) => FailureReason::UnexpectedStatus(status),
            FetchError::MalformedResponse(err) => FailureReason::MalformedResponse(err.to_string()),
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Transport(detail) => write!(f, "transport error: {detail}"),
            FailureReason::UnexpectedStatus(status) => write!(f, "unexpected HTTP status {status}"),
            FailureReason::MalformedResponse(detail) => write!(f, "malformed response: {detail}"),
        }
    }
}

/// Outcome of one issues fetch
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Success(Vec<Issue>),
    Failure(FailureReason),
}

/// Fetches open issues from one repository and reduces them for the actions.
#[derive(Debug, Clone)]
pub struct IssueQueryService<S> {
    source: S,
}

impl<S: IssueSource> IssueQueryService<S> {
    pub fn new(source: S) -> Self {
        IssueQueryService { source }
    }

    #[cfg(test)]
    pub(crate) fn source(&self) -> &S {
        &self.source
    }

    /// Performs exactly one upstream request. Never retries.
    pub async fn fetch_open_issues(&self) -> QueryResult {
        match self.source.fetch_open_issues().await {
            Ok(issues) => {
                tracing::debug!(count = issues.len(), "fetched open issues");
                QueryResult::Success(issues)
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch open issues");
                QueryResult::Failure(err.into())
            }
        }
    }

    pub fn top_labels(&self, issues: &[Issue], n: usize) -> Vec<(String, usize)> {
        labels::top_labels(issues, n)
    }

    pub fn filter_by_label<'a>(&self, issues: &'a [Issue], label: &str) -> Vec<&'a Issue> {
        labels::filter_by_label(issues, label)
    }
}
