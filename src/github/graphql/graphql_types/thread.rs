//! Wire DTOs for the `GetPRThreads` query and `ResolveReviewThread` mutation.
//!
//! Node entries are decoded permissively: a null or field-less node becomes a
//! skippable value rather than a decode failure, matching the orchestrator's
//! skip-and-continue policy for malformed data.

use serde::{Deserialize, Serialize};

use super::pager::PageInfo;
use crate::types::{ReviewThread, ThreadId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestThreadsResponse {
    pub repository: Option<ThreadsRepository>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadsRepository {
    #[serde(rename = "pullRequest")]
    pub pull_request: Option<ThreadsPullRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadsPullRequest {
    #[serde(rename = "reviewThreads")]
    pub review_threads: ReviewThreadConnection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewThreadConnection {
    #[serde(default)]
    pub nodes: Vec<Option<ReviewThreadNode>>,
    #[serde(rename = "pageInfo")]
    pub page_info: PageInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewThreadNode {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "isOutdated", default)]
    pub is_outdated: bool,
    #[serde(rename = "isResolved", default)]
    pub is_resolved: bool,
}

impl ReviewThreadNode {
    /// Convert to the domain type; `None` when the node carries no ID
    pub fn into_review_thread(self) -> Option<ReviewThread> {
        self.id.map(|id| ReviewThread {
            id: ThreadId::new(id),
            is_outdated: self.is_outdated,
            is_resolved: self.is_resolved,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveReviewThreadResponse {
    #[serde(rename = "resolveReviewThread")]
    pub resolve_review_thread: Option<ResolveReviewThreadPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveReviewThreadPayload {
    pub thread: Option<ResolvedThreadNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedThreadNode {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "isResolved", default)]
    pub is_resolved: bool,
}
