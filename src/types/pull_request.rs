//! Pull request identification and parsing
//!
//! Strong-typed pull request identifiers with parsing for the canonical
//! `owner/repo#number` form and full GitHub pull request URLs. All PR
//! reference parsing is self-contained within this domain.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::repository::RepositoryId;

static PR_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://)?github\.com/([^/]+)/([^/]+)/pull/(\d+)/?$")
        .expect("Failed to compile PR URL regex")
});

static REPO_PR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^/\s]+)/([^/\s#]+)#(\d+)$").expect("Failed to compile repo#number regex")
});

/// Wrapper type for pull request numbers providing type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct PullRequestNumber(pub u64);

impl PullRequestNumber {
    /// Create a new pull request number
    pub fn new(number: u64) -> Self {
        Self(number)
    }

    /// Get the inner value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PullRequestNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strong-typed pull request identifier with parsing capabilities.
///
/// The canonical string form is `owner/repo#number`; GitHub pull request
/// URLs are accepted as an alternate input format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PullRequestId {
    pub repository: RepositoryId,
    pub number: PullRequestNumber,
}

impl PullRequestId {
    /// Create new pull request identifier
    pub fn new(repository: RepositoryId, number: PullRequestNumber) -> Self {
        Self { repository, number }
    }

    /// Parse a pull request identifier from its canonical `owner/repo#number`
    /// form or a GitHub pull request URL.
    pub fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim();

        if let Some(captures) = REPO_PR_REGEX.captures(input) {
            return Self::from_captures(&captures);
        }

        if let Some(captures) = PR_URL_REGEX.captures(input) {
            return Self::from_captures(&captures);
        }

        Err(format!("Cannot parse PR identifier: {}", input))
    }

    fn from_captures(captures: &regex::Captures<'_>) -> Result<Self, String> {
        let owner = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        let repo = captures.get(2).map(|m| m.as_str()).unwrap_or_default();
        let number: u64 = captures
            .get(3)
            .map(|m| m.as_str())
            .unwrap_or_default()
            .parse()
            .map_err(|_| "PR number must be a positive integer".to_string())?;

        if number == 0 {
            return Err("PR number must be positive".to_string());
        }

        Ok(Self::new(
            RepositoryId::new(owner, repo),
            PullRequestNumber::new(number),
        ))
    }

    /// Returns the pull request URL
    pub fn url(&self) -> String {
        format!("{}/pull/{}", self.repository.url(), self.number)
    }
}

impl std::fmt::Display for PullRequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.repository.full_name(), self.number)
    }
}
