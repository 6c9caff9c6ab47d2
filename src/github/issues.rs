use serde::Deserialize;

/// An open issue as reported by the issues-list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub title: String,
    pub url: String,
    /// Distinct label names in the order the API first lists them.
    pub labels: Vec<String>,
}

impl Issue {
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|name| name == label)
    }
}

#[derive(Deserialize, Debug)]
struct RawIssue {
    title: String,
    html_url: String,
    labels: Vec<RawLabel>,
}

#[derive(Deserialize, Debug)]
struct RawLabel {
    name: String,
}

impl From<RawIssue> for Issue {
    fn from(raw: RawIssue) -> Self {
        Issue {
            title: raw.title,
            url: raw.html_url,
            labels: raw.labels.into_iter().fold(Vec::new(), |mut names, label| {
                if !names.contains(&label.name) {
                    names.push(label.name);
                }
                names
            }),
        }
    }
}

/// Parses an issues-list response body.
///
/// The body must be a JSON array whose every element carries `title`,
/// `html_url` and `labels[].name`. A single malformed record rejects the
/// whole body, so callers never act on a partial page.
///
/// # Returns
///
/// * `Ok(issues)` in the order the API returned them.
/// * `Err(serde_json::Error)` describing the first malformed element.
pub fn parse_issues(body: &str) -> Result<Vec<Issue>, serde_json::Error> {
    serde_json::from_str::<Vec<RawIssue>>(body)
        .map(|raw_issues| raw_issues.into_iter().map(Issue::from).collect())
}
