use serde::Serialize;

/// Page size for review thread listing
pub const THREAD_PAGE_LIMIT: u8 = 100;

/// The `ResolveReviewThread` mutation, as GitHub's GraphQL v4 schema names it
pub const RESOLVE_REVIEW_THREAD_MUTATION: &str = r#"
mutation ResolveReviewThread($threadId: ID!) {
    resolveReviewThread(input: {threadId: $threadId}) {
        thread {
            id
            isResolved
        }
    }
}"#;

#[derive(Debug, Clone, Serialize)]
pub struct ResolveThreadVariable {
    #[serde(rename = "threadId")]
    pub thread_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PullRequestThreadsVariable {
    pub owner: String,
    pub repo: String,
    pub number: u64,
    // Serialized as null on the first page, matching the cursor-less request.
    pub cursor: Option<String>,
}

pub fn pr_threads_query() -> String {
    format!(
        r#"
query GetPRThreads($owner: String!, $repo: String!, $number: Int!, $cursor: String) {{
    repository(owner: $owner, name: $repo) {{
        pullRequest(number: $number) {{
            reviewThreads(first: {}, after: $cursor) {{
                nodes {{
                    id
                    isOutdated
                    isResolved
                }}
                pageInfo {{
                    hasNextPage
                    endCursor
                }}
            }}
        }}
    }}
}}"#,
        THREAD_PAGE_LIMIT
    )
}
