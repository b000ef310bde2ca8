//! Wire DTOs for the `GetPRSuggestions` query and `AcceptSuggestion`
//! mutation. The suggestion tree nests reviews, their comments, and each
//! comment's suggestions; every level decodes permissively.

use serde::{Deserialize, Serialize};

use crate::types::SuggestionId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestSuggestionsResponse {
    pub repository: Option<SuggestionsRepository>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionsRepository {
    #[serde(rename = "pullRequest")]
    pub pull_request: Option<SuggestionsPullRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionsPullRequest {
    #[serde(default)]
    pub reviews: Option<ReviewConnection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConnection {
    #[serde(default)]
    pub nodes: Vec<Option<ReviewNode>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewNode {
    #[serde(default)]
    pub comments: Option<CommentConnection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentConnection {
    #[serde(default)]
    pub nodes: Vec<Option<CommentNode>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentNode {
    #[serde(default)]
    pub suggestions: Option<SuggestionConnection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConnection {
    #[serde(default)]
    pub nodes: Vec<Option<SuggestionNode>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionNode {
    #[serde(default)]
    pub id: Option<String>,
}

impl SuggestionsPullRequest {
    /// Flatten the reviews→comments→suggestions tree into suggestion IDs.
    ///
    /// Returns the IDs in API response order plus the count of nodes that
    /// were present but carried no ID (reported upstream as soft errors).
    pub fn flatten_suggestions(self) -> (Vec<SuggestionId>, usize) {
        let mut ids = Vec::new();
        let mut missing = 0;

        let reviews = self.reviews.map(|r| r.nodes).unwrap_or_default();
        for review in reviews.into_iter().flatten() {
            let comments = review.comments.map(|c| c.nodes).unwrap_or_default();
            for comment in comments.into_iter().flatten() {
                let suggestions = comment.suggestions.map(|s| s.nodes).unwrap_or_default();
                for suggestion in suggestions {
                    match suggestion.and_then(|s| s.id) {
                        Some(id) => ids.push(SuggestionId::new(id)),
                        None => missing += 1,
                    }
                }
            }
        }

        (ids, missing)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptSuggestionResponse {
    #[serde(rename = "acceptSuggestion")]
    pub accept_suggestion: Option<AcceptSuggestionPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptSuggestionPayload {
    #[serde(rename = "clientMutationId", default)]
    pub client_mutation_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_nested_tree() {
        let pull_request: SuggestionsPullRequest = serde_json::from_value(serde_json::json!({
            "reviews": {
                "nodes": [
                    {
                        "comments": {
                            "nodes": [
                                {"suggestions": {"nodes": [{"id": "s1"}, {"id": "s2"}]}},
                                {"suggestions": {"nodes": []}}
                            ]
                        }
                    },
                    {
                        "comments": {
                            "nodes": [
                                {"suggestions": {"nodes": [{"id": "s3"}]}}
                            ]
                        }
                    }
                ]
            }
        }))
        .unwrap();

        let (ids, missing) = pull_request.flatten_suggestions();
        assert_eq!(
            ids,
            vec![
                SuggestionId::new("s1"),
                SuggestionId::new("s2"),
                SuggestionId::new("s3")
            ]
        );
        assert_eq!(missing, 0);
    }

    #[test]
    fn test_flatten_counts_malformed_nodes() {
        let pull_request: SuggestionsPullRequest = serde_json::from_value(serde_json::json!({
            "reviews": {
                "nodes": [
                    {
                        "comments": {
                            "nodes": [
                                {"suggestions": {"nodes": [{"id": "s1"}, {}, null]}}
                            ]
                        }
                    },
                    null
                ]
            }
        }))
        .unwrap();

        let (ids, missing) = pull_request.flatten_suggestions();
        assert_eq!(ids, vec![SuggestionId::new("s1")]);
        assert_eq!(missing, 2);
    }

    #[test]
    fn test_flatten_empty_pull_request() {
        let pull_request: SuggestionsPullRequest =
            serde_json::from_value(serde_json::json!({})).unwrap();
        let (ids, missing) = pull_request.flatten_suggestions();
        assert!(ids.is_empty());
        assert_eq!(missing, 0);
    }
}
