//! GitHub GraphQL v4 protocol client
//!
//! A thin, stateless-per-call wrapper over the GraphQL endpoint. Transport
//! failures, HTTP error statuses, malformed bodies, and server-reported
//! GraphQL errors are all folded into the uniform [`GraphQLResult`] value;
//! the client itself never returns `Err` once constructed. Retry and backoff
//! are deliberately left to callers.

use anyhow::{Context, Result, bail};
use reqwest::StatusCode;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time::Duration;
use tracing::{debug, warn};

use crate::github::error::GraphQLErrorType;
use crate::github::graphql::graphql_types::{
    AcceptSuggestionResponse, CheckPermissionsResponse, GraphQLError, GraphQLPayload, GraphQLQuery,
    GraphQLResponse, GraphQLResult, PullRequestSuggestionsResponse, PullRequestThreadsResponse,
    ResolveReviewThreadResponse,
};
use crate::github::graphql::permission::{CHECK_PERMISSIONS_QUERY, CheckPermissionsVariable};
use crate::github::graphql::suggestion::{
    ACCEPT_SUGGESTION_MUTATION, AcceptSuggestionVariable, PullRequestSuggestionsVariable,
    pr_suggestions_query,
};
use crate::github::graphql::thread::{
    PullRequestThreadsVariable, RESOLVE_REVIEW_THREAD_MUTATION, ResolveThreadVariable,
    pr_threads_query,
};
use crate::types::{PullRequestNumber, RepositoryId, SuggestionId, ThreadId};

/// GitHub's GraphQL v4 endpoint
pub const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Request timeout applied to every GraphQL call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("gh-pr/", env!("CARGO_PKG_VERSION"));

/// Client for GitHub GraphQL API operations.
///
/// Constructed once per authenticated session and shared; cloning is cheap
/// because the underlying HTTP connection pool is shared between clones.
///
/// # Examples
///
/// ```
/// use gh_pr::github::GraphQLClient;
///
/// let client = GraphQLClient::new("ghp_example_token").unwrap();
/// assert!(GraphQLClient::new("   ").is_err());
/// ```
#[derive(Clone, Debug)]
pub struct GraphQLClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GraphQLClient {
    /// Create a client for the production GitHub endpoint.
    ///
    /// The token is trimmed; an empty or whitespace-only token fails
    /// immediately, before any network activity.
    pub fn new(token: &str) -> Result<Self> {
        Self::with_endpoint(token, GITHUB_GRAPHQL_URL)
    }

    /// Create a client against a custom endpoint. Tests point this at a
    /// local mock server; production code uses [`GraphQLClient::new`].
    pub fn with_endpoint(token: &str, endpoint: &str) -> Result<Self> {
        let token = token.trim();
        if token.is_empty() {
            bail!("GitHub token is required");
        }

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .context("GitHub token contains characters not valid in a header")?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github.v4+json"),
        );

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("Failed to build GraphQL HTTP client")?;

        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
        })
    }

    /// Execute a raw GraphQL query or mutation.
    ///
    /// Every expected failure mode becomes an error entry in the returned
    /// result rather than an `Err`:
    /// - HTTP 401 → `UNAUTHORIZED`, HTTP 403 → `FORBIDDEN`
    /// - any other non-2xx status → `HTTP_ERROR` with the response body
    /// - connection and timeout failures → `NETWORK_ERROR`
    /// - unparseable response bodies → `JSON_ERROR`
    /// - anything else → `UNKNOWN_ERROR`
    ///
    /// An HTTP 200 carrying a non-empty `errors` array is a failed result
    /// even though transport succeeded; each entry is decoded with its
    /// server-supplied type intact. No retries happen here.
    pub async fn execute(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
    ) -> GraphQLResult<serde_json::Value> {
        let payload = GraphQLPayload {
            query: GraphQLQuery(query.to_string()),
            variables,
        };

        debug!("Sending GraphQL request to {}", self.endpoint);

        let response = match self.http.post(&self.endpoint).json(&payload).send().await {
            Ok(response) => response,
            Err(error) => {
                warn!("GraphQL transport failure: {}", error);
                return GraphQLResult::from_error(Self::transport_error(error));
            }
        };

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => {
                return GraphQLResult::from_error(GraphQLError::new(
                    GraphQLErrorType::Unauthorized,
                    "Invalid or expired GitHub token",
                ));
            }
            StatusCode::FORBIDDEN => {
                return GraphQLResult::from_error(GraphQLError::new(
                    GraphQLErrorType::Forbidden,
                    "Insufficient permissions or rate limited",
                ));
            }
            _ => {}
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return GraphQLResult::from_error(GraphQLError::new(
                GraphQLErrorType::HttpError,
                format!("HTTP {}: {}", status.as_u16(), body),
            ));
        }

        let wire: GraphQLResponse<serde_json::Value> = match response.json().await {
            Ok(wire) => wire,
            Err(error) => {
                warn!("Failed to read GraphQL response body: {}", error);
                return GraphQLResult::from_error(Self::transport_error(error));
            }
        };

        let errors = wire.errors.unwrap_or_default();
        if !errors.is_empty() {
            warn!("GraphQL request returned {} error(s)", errors.len());
        }

        GraphQLResult {
            data: wire.data,
            errors,
        }
    }

    /// Resolve a review thread via the `ResolveReviewThread` mutation
    pub async fn resolve_thread(
        &self,
        thread_id: &ThreadId,
    ) -> GraphQLResult<ResolveReviewThreadResponse> {
        let trimmed = ThreadId::new(thread_id.as_str().trim());
        if trimmed.as_str().is_empty() {
            return GraphQLResult::from_error(GraphQLError::invalid_input("Thread ID is required"));
        }
        if !trimmed.is_well_formed() {
            return GraphQLResult::from_error(GraphQLError::invalid_input(
                "Invalid thread ID format",
            ));
        }

        let variables = ResolveThreadVariable {
            thread_id: trimmed.as_str().to_string(),
        };
        self.execute_decoded(RESOLVE_REVIEW_THREAD_MUTATION, &variables)
            .await
    }

    /// Accept a code suggestion via the `AcceptSuggestion` mutation
    pub async fn accept_suggestion(
        &self,
        suggestion_id: &SuggestionId,
    ) -> GraphQLResult<AcceptSuggestionResponse> {
        let trimmed = SuggestionId::new(suggestion_id.as_str().trim());
        if trimmed.as_str().is_empty() {
            return GraphQLResult::from_error(GraphQLError::invalid_input(
                "Suggestion ID is required",
            ));
        }
        if !trimmed.is_well_formed() {
            return GraphQLResult::from_error(GraphQLError::invalid_input(
                "Invalid suggestion ID format",
            ));
        }

        let variables = AcceptSuggestionVariable {
            suggestion_id: trimmed.as_str().to_string(),
        };
        self.execute_decoded(ACCEPT_SUGGESTION_MUTATION, &variables)
            .await
    }

    /// Fetch one page of review threads for a pull request.
    ///
    /// Pass the previous page's end cursor to continue; callers own the
    /// pagination loop.
    pub async fn get_pr_threads(
        &self,
        repository_id: &RepositoryId,
        number: PullRequestNumber,
        cursor: Option<String>,
    ) -> GraphQLResult<PullRequestThreadsResponse> {
        let owner = repository_id.owner().as_str().trim();
        let repo = repository_id.repo_name().as_str().trim();
        if owner.is_empty() || repo.is_empty() {
            return GraphQLResult::from_error(GraphQLError::invalid_input(
                "Owner, repo, and PR number are required",
            ));
        }
        if number.value() == 0 {
            return GraphQLResult::from_error(GraphQLError::invalid_input(
                "PR number must be positive",
            ));
        }

        let variables = PullRequestThreadsVariable {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number: number.value(),
            cursor,
        };
        self.execute_decoded(&pr_threads_query(), &variables).await
    }

    /// Fetch the reviews→comments→suggestions tree for a pull request
    pub async fn get_pr_suggestions(
        &self,
        repository_id: &RepositoryId,
        number: PullRequestNumber,
    ) -> GraphQLResult<PullRequestSuggestionsResponse> {
        let owner = repository_id.owner().as_str().trim();
        let repo = repository_id.repo_name().as_str().trim();
        if owner.is_empty() || repo.is_empty() {
            return GraphQLResult::from_error(GraphQLError::invalid_input(
                "Owner, repo, and PR number are required",
            ));
        }
        if number.value() == 0 {
            return GraphQLResult::from_error(GraphQLError::invalid_input(
                "PR number must be positive",
            ));
        }

        let variables = PullRequestSuggestionsVariable {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number: number.value(),
        };
        self.execute_decoded(&pr_suggestions_query(), &variables)
            .await
    }

    /// Look up the viewer's permission level on a repository
    pub async fn check_permissions(
        &self,
        repository_id: &RepositoryId,
    ) -> GraphQLResult<CheckPermissionsResponse> {
        let owner = repository_id.owner().as_str().trim();
        let repo = repository_id.repo_name().as_str().trim();
        if owner.is_empty() || repo.is_empty() {
            return GraphQLResult::from_error(GraphQLError::invalid_input(
                "Owner and repo are required",
            ));
        }

        let variables = CheckPermissionsVariable {
            owner: owner.to_string(),
            repo: repo.to_string(),
        };
        self.execute_decoded(CHECK_PERMISSIONS_QUERY, &variables)
            .await
    }

    /// Execute with typed variables and decode `data` into a response DTO.
    async fn execute_decoded<V: Serialize, R: DeserializeOwned>(
        &self,
        query: &str,
        variables: &V,
    ) -> GraphQLResult<R> {
        let variables = match serde_json::to_value(variables) {
            Ok(value) => Some(value),
            Err(error) => {
                return GraphQLResult::from_error(GraphQLError::new(
                    GraphQLErrorType::JsonError,
                    format!("Invalid request variables: {}", error),
                ));
            }
        };
        Self::decode(self.execute(query, variables).await)
    }

    /// Decode the raw `data` payload into a DTO, preserving any errors. A
    /// payload that does not match the DTO shape is a soft `JSON_ERROR`
    /// result, never a panic.
    fn decode<R: DeserializeOwned>(raw: GraphQLResult<serde_json::Value>) -> GraphQLResult<R> {
        let GraphQLResult { data, errors } = raw;
        match data.map(serde_json::from_value).transpose() {
            Ok(data) => GraphQLResult { data, errors },
            Err(error) => {
                warn!("GraphQL response did not match expected shape: {}", error);
                GraphQLResult::from_error(GraphQLError::new(
                    GraphQLErrorType::JsonError,
                    "Invalid response format",
                ))
            }
        }
    }

    fn transport_error(error: reqwest::Error) -> GraphQLError {
        if error.is_timeout() || error.is_connect() {
            GraphQLError::new(
                GraphQLErrorType::NetworkError,
                format!("Network error: {}", error),
            )
        } else if error.is_decode() {
            GraphQLError::new(GraphQLErrorType::JsonError, "Invalid response format")
        } else {
            GraphQLError::new(
                GraphQLErrorType::UnknownError,
                format!("Unexpected error: {}", error),
            )
        }
    }
}
