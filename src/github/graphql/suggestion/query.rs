use serde::Serialize;

/// Page sizes for the reviews→comments→suggestions tree
pub const REVIEW_PAGE_LIMIT: u8 = 100;
pub const COMMENT_PAGE_LIMIT: u8 = 100;
pub const SUGGESTION_PAGE_LIMIT: u8 = 10;

/// The suggestion-application mutation. GitHub does not document a public
/// GraphQL operation for this; the wire name is defined here and nowhere
/// else, so substituting the platform's real mechanism is a one-line change.
pub const ACCEPT_SUGGESTION_MUTATION: &str = r#"
mutation AcceptSuggestion($suggestionId: ID!) {
    acceptSuggestion(input: {suggestionId: $suggestionId}) {
        clientMutationId
    }
}"#;

#[derive(Debug, Clone, Serialize)]
pub struct AcceptSuggestionVariable {
    #[serde(rename = "suggestionId")]
    pub suggestion_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PullRequestSuggestionsVariable {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

pub fn pr_suggestions_query() -> String {
    format!(
        r#"
query GetPRSuggestions($owner: String!, $repo: String!, $number: Int!) {{
    repository(owner: $owner, name: $repo) {{
        pullRequest(number: $number) {{
            reviews(first: {}) {{
                nodes {{
                    comments(first: {}) {{
                        nodes {{
                            suggestions(first: {}) {{
                                nodes {{
                                    id
                                }}
                            }}
                        }}
                    }}
                }}
            }}
        }}
    }}
}}"#,
        REVIEW_PAGE_LIMIT, COMMENT_PAGE_LIMIT, SUGGESTION_PAGE_LIMIT
    )
}
