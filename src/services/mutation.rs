//! Per-PR mutation orchestration
//!
//! One orchestrator invocation runs a single pass of the per-PR state
//! machine: validate, check permission, fetch eligible targets, apply the
//! mutation to each, aggregate. The orchestrator never returns `Err`; every
//! failure funnels into the outcome's error list. Targets are re-fetched on
//! every invocation because the remote mutations are not idempotent; a stale
//! target list must never be reused.

use tracing::{debug, info};

use crate::github::GraphQLClient;
use crate::types::{
    MutationTarget, PermissionLevel, PullRequestId, RepositoryId, ReviewThread, SuggestionId,
};

const THREAD_MISSING_ID: &str = "Thread missing ID, skipping";
const SUGGESTION_MISSING_ID: &str = "Suggestion missing ID, skipping";

/// Result of one orchestrator pass over a single pull request.
///
/// `applied` can be positive alongside a non-empty error list: partial
/// success is an expected outcome and callers must be able to see both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationOutcome {
    /// Targets successfully mutated (or records fetched, for read-only runs)
    pub applied: u64,
    pub errors: Vec<String>,
    /// True when the pass aborted before reaching the apply stage
    /// (validation, permission, or target-fetch failure)
    pub aborted: bool,
}

impl MutationOutcome {
    fn abort(errors: Vec<String>) -> Self {
        Self {
            applied: 0,
            errors,
            aborted: true,
        }
    }

    fn completed(applied: u64, errors: Vec<String>) -> Self {
        Self {
            applied,
            errors,
            aborted: false,
        }
    }

    /// Whether the pass ran to completion. Per-target failures and skipped
    /// malformed nodes leave this true; they are non-fatal.
    pub fn success(&self) -> bool {
        !self.aborted
    }
}

#[derive(Debug, Clone, Copy)]
enum MutationFlow {
    ResolveOutdatedThreads,
    AcceptSuggestions,
}

/// Per-PR state machine driving write operations against one pull request
#[derive(Clone)]
pub struct MutationOrchestrator {
    client: GraphQLClient,
}

impl MutationOrchestrator {
    pub fn new(client: GraphQLClient) -> Self {
        Self { client }
    }

    /// Resolve every outdated, unresolved review thread on the pull request
    pub async fn resolve_outdated_threads(&self, pr_id: &PullRequestId) -> MutationOutcome {
        self.run_mutation_flow(pr_id, MutationFlow::ResolveOutdatedThreads)
            .await
    }

    /// Accept every code suggestion present in the pull request's reviews
    pub async fn accept_all_suggestions(&self, pr_id: &PullRequestId) -> MutationOutcome {
        self.run_mutation_flow(pr_id, MutationFlow::AcceptSuggestions)
            .await
    }

    /// Read-only pass: fetch the PR's review threads and suggestions without
    /// mutating anything. `applied` counts the records fetched. No
    /// permission gate; reading needs none beyond what the token grants.
    pub async fn collect_review_data(&self, pr_id: &PullRequestId) -> MutationOutcome {
        if let Some(error) = Self::validate(pr_id) {
            return MutationOutcome::abort(vec![error]);
        }

        let mut errors = Vec::new();
        let mut fetched: u64 = 0;

        match self.fetch_threads(pr_id).await {
            Ok((threads, mut soft_errors)) => {
                fetched += threads.len() as u64;
                errors.append(&mut soft_errors);
            }
            Err(mut hard_errors) => {
                errors.append(&mut hard_errors);
                return MutationOutcome::abort(errors);
            }
        }

        match self.fetch_suggestion_ids(pr_id).await {
            Ok((suggestions, mut soft_errors)) => {
                fetched += suggestions.len() as u64;
                errors.append(&mut soft_errors);
            }
            Err(mut hard_errors) => {
                errors.append(&mut hard_errors);
                return MutationOutcome::abort(errors);
            }
        }

        debug!("Collected {} review records for {}", fetched, pr_id);
        MutationOutcome::completed(fetched, errors)
    }

    async fn run_mutation_flow(&self, pr_id: &PullRequestId, flow: MutationFlow) -> MutationOutcome {
        if let Some(error) = Self::validate(pr_id) {
            return MutationOutcome::abort(vec![error]);
        }

        if let Err(permission_errors) = self.ensure_write_permission(&pr_id.repository).await {
            return MutationOutcome::abort(permission_errors);
        }

        let mut errors = Vec::new();
        let targets = match flow {
            MutationFlow::ResolveOutdatedThreads => match self.fetch_threads(pr_id).await {
                Ok((threads, mut soft_errors)) => {
                    errors.append(&mut soft_errors);
                    let targets: Vec<MutationTarget> = threads
                        .into_iter()
                        .filter(ReviewThread::is_resolvable)
                        .map(|thread| MutationTarget::ThreadResolution(thread.id))
                        .collect();
                    info!(
                        "Found {} outdated unresolved threads on {}",
                        targets.len(),
                        pr_id
                    );
                    targets
                }
                Err(mut hard_errors) => {
                    errors.append(&mut hard_errors);
                    return MutationOutcome::abort(errors);
                }
            },
            MutationFlow::AcceptSuggestions => match self.fetch_suggestion_ids(pr_id).await {
                Ok((suggestions, mut soft_errors)) => {
                    errors.append(&mut soft_errors);
                    info!("Found {} suggestions to accept on {}", suggestions.len(), pr_id);
                    suggestions
                        .into_iter()
                        .map(MutationTarget::SuggestionAcceptance)
                        .collect()
                }
                Err(mut hard_errors) => {
                    errors.append(&mut hard_errors);
                    return MutationOutcome::abort(errors);
                }
            },
        };

        // Every target is attempted; a failed mutation never short-circuits
        // the remaining ones.
        let mut applied: u64 = 0;
        for target in &targets {
            match self.apply_target(target).await {
                None => {
                    applied += 1;
                    debug!("Applied {} {}", target.action(), target.id());
                }
                Some(failure) => {
                    errors.push(format!(
                        "Failed to {} {}: {}",
                        target.action(),
                        target.id(),
                        failure
                    ));
                }
            }
        }

        info!(
            "Applied {} of {} targets on {} with {} error(s)",
            applied,
            targets.len(),
            pr_id,
            errors.len()
        );
        MutationOutcome::completed(applied, errors)
    }

    fn validate(pr_id: &PullRequestId) -> Option<String> {
        let owner = pr_id.repository.owner().as_str().trim();
        let repo = pr_id.repository.repo_name().as_str().trim();
        if owner.is_empty() || repo.is_empty() {
            return Some("Owner and repository name are required".to_string());
        }
        if pr_id.number.value() == 0 {
            return Some("PR number must be positive".to_string());
        }
        None
    }

    /// Gate mutations on the viewer holding WRITE or better. An unknown or
    /// blank permission string never grants access.
    async fn ensure_write_permission(&self, repository: &RepositoryId) -> Result<(), Vec<String>> {
        let result = self.client.check_permissions(repository).await;
        if !result.is_success() {
            return Err(result.error_messages());
        }

        let raw = result.data.map(|d| d.raw_permission()).unwrap_or_default();
        let level = PermissionLevel::parse_or_none(&raw);
        if !level.can_mutate() {
            return Err(vec![format!("Insufficient permissions (have: {})", raw)]);
        }

        Ok(())
    }

    /// Fetch every review thread on the PR, following pagination cursors.
    /// Hard failures (transport, GraphQL errors, missing PR) are `Err`;
    /// malformed nodes become soft errors alongside the decoded threads.
    async fn fetch_threads(
        &self,
        pr_id: &PullRequestId,
    ) -> Result<(Vec<ReviewThread>, Vec<String>), Vec<String>> {
        let mut threads = Vec::new();
        let mut soft_errors = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let result = self
                .client
                .get_pr_threads(&pr_id.repository, pr_id.number, cursor.clone())
                .await;
            if !result.is_success() {
                return Err(result.error_messages());
            }
            let Some(data) = result.data else {
                return Err(vec!["No data returned from GitHub API".to_string()]);
            };
            let Some(pull_request) = data.repository.and_then(|r| r.pull_request) else {
                return Err(vec![format!("Pull request #{} not found", pr_id.number)]);
            };

            let connection = pull_request.review_threads;
            for node in connection.nodes {
                match node.and_then(|n| n.into_review_thread()) {
                    Some(thread) => threads.push(thread),
                    None => soft_errors.push(THREAD_MISSING_ID.to_string()),
                }
            }

            match connection.page_info.next_cursor() {
                Some(next_cursor) => cursor = Some(next_cursor),
                None => break,
            }
        }

        Ok((threads, soft_errors))
    }

    /// Fetch and flatten the suggestion tree into a flat ID list
    async fn fetch_suggestion_ids(
        &self,
        pr_id: &PullRequestId,
    ) -> Result<(Vec<SuggestionId>, Vec<String>), Vec<String>> {
        let result = self
            .client
            .get_pr_suggestions(&pr_id.repository, pr_id.number)
            .await;
        if !result.is_success() {
            return Err(result.error_messages());
        }
        let Some(data) = result.data else {
            return Err(vec!["No data returned from GitHub API".to_string()]);
        };
        let Some(pull_request) = data.repository.and_then(|r| r.pull_request) else {
            return Err(vec![format!("Pull request #{} not found", pr_id.number)]);
        };

        let (ids, missing) = pull_request.flatten_suggestions();
        let soft_errors = (0..missing).map(|_| SUGGESTION_MISSING_ID.to_string()).collect();
        Ok((ids, soft_errors))
    }

    /// Apply one mutation target; `None` on success, the joined error
    /// messages on failure.
    async fn apply_target(&self, target: &MutationTarget) -> Option<String> {
        let errors = match target {
            MutationTarget::ThreadResolution(thread_id) => {
                let result = self.client.resolve_thread(thread_id).await;
                if result.is_success() {
                    Vec::new()
                } else {
                    result.error_messages()
                }
            }
            MutationTarget::SuggestionAcceptance(suggestion_id) => {
                let result = self.client.accept_suggestion(suggestion_id).await;
                if result.is_success() {
                    Vec::new()
                } else {
                    result.error_messages()
                }
            }
        };

        if errors.is_empty() {
            None
        } else {
            Some(errors.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PullRequestNumber, RepositoryId};

    fn orchestrator() -> MutationOrchestrator {
        // Never reaches the network in validation tests: any endpoint works.
        let client = GraphQLClient::with_endpoint("test_token", "http://127.0.0.1:1").unwrap();
        MutationOrchestrator::new(client)
    }

    fn pr(owner: &str, repo: &str, number: u64) -> PullRequestId {
        PullRequestId::new(RepositoryId::new(owner, repo), PullRequestNumber::new(number))
    }

    #[tokio::test]
    async fn test_blank_owner_fails_validation_without_network() {
        let outcome = orchestrator().resolve_outdated_threads(&pr("", "repo", 5)).await;
        assert!(!outcome.success());
        assert_eq!(outcome.applied, 0);
        assert_eq!(
            outcome.errors,
            vec!["Owner and repository name are required".to_string()]
        );
    }

    #[tokio::test]
    async fn test_zero_pr_number_fails_validation() {
        let outcome = orchestrator().accept_all_suggestions(&pr("owner", "repo", 0)).await;
        assert!(!outcome.success());
        assert_eq!(outcome.errors, vec!["PR number must be positive".to_string()]);
    }

    #[tokio::test]
    async fn test_collect_review_data_validates_input() {
        let outcome = orchestrator().collect_review_data(&pr("owner", "", 3)).await;
        assert!(!outcome.success());
        assert_eq!(
            outcome.errors,
            vec!["Owner and repository name are required".to_string()]
        );
    }

    #[test]
    fn test_outcome_partial_success_is_representable() {
        let outcome =
            MutationOutcome::completed(2, vec!["Failed to resolve thread t3: boom".to_string()]);
        assert!(outcome.success());
        assert_eq!(outcome.applied, 2);
        assert!(!outcome.errors.is_empty());
    }
}
