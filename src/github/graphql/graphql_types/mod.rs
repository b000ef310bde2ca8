pub mod pager;
pub mod permission;
pub mod suggestion;
pub mod thread;

use serde::{Deserialize, Serialize};

use crate::github::error::GraphQLErrorType;

pub use pager::*;
pub use permission::*;
pub use suggestion::*;
pub use thread::*;

#[derive(Debug, Clone, Serialize)]
pub struct GraphQLQuery(pub String);

#[derive(Debug, Clone, Serialize)]
pub struct GraphQLPayload<T: serde::Serialize> {
    pub query: GraphQLQuery,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<T>,
}

/// Raw wire response from the GraphQL endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

/// A single error entry, either decoded from the server's `errors` array or
/// synthesized by the client for transport and validation failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: GraphQLErrorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<serde_json::Value>>,
}

impl GraphQLError {
    pub fn new<M: Into<String>>(error_type: GraphQLErrorType, message: M) -> Self {
        Self {
            message: message.into(),
            error_type,
            locations: None,
            path: None,
        }
    }

    /// Shorthand for input-validation failures raised before any network call
    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::new(GraphQLErrorType::InvalidInput, message)
    }
}

impl std::fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.error_type, self.message)
    }
}

/// Uniform result of a GraphQL operation.
///
/// Transport failures, validation rejections, and server-reported GraphQL
/// errors all land in `errors`; success is derived, true iff `errors` is
/// empty. `data` can be present alongside errors when the server returned a
/// partial response.
#[derive(Debug, Clone)]
pub struct GraphQLResult<T> {
    pub data: Option<T>,
    pub errors: Vec<GraphQLError>,
}

impl<T> GraphQLResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self {
            data: None,
            errors: Vec::new(),
        }
    }

    pub fn from_error(error: GraphQLError) -> Self {
        Self {
            data: None,
            errors: vec![error],
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages of all errors, for aggregation into user-facing reports
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_is_derived_from_errors() {
        let result = GraphQLResult::ok(serde_json::json!({"field": 1}));
        assert!(result.is_success());

        let result: GraphQLResult<serde_json::Value> = GraphQLResult::empty();
        assert!(result.is_success());

        let result: GraphQLResult<serde_json::Value> =
            GraphQLResult::from_error(GraphQLError::invalid_input("bad"));
        assert!(!result.is_success());
        assert_eq!(result.error_messages(), vec!["bad".to_string()]);
    }

    #[test]
    fn test_error_decodes_server_type_passthrough() {
        let error: GraphQLError = serde_json::from_str(
            r#"{"message": "Could not resolve", "type": "NOT_FOUND", "path": ["repository"]}"#,
        )
        .unwrap();
        assert_eq!(error.error_type.to_string(), "NOT_FOUND");
        assert_eq!(error.message, "Could not resolve");
        assert!(error.locations.is_none());
        assert!(error.path.is_some());
    }

    #[test]
    fn test_error_missing_type_defaults_to_unknown() {
        let error: GraphQLError = serde_json::from_str(r#"{"message": "boom"}"#).unwrap();
        assert_eq!(error.error_type, GraphQLErrorType::UnknownError);
    }

    #[test]
    fn test_payload_omits_absent_variables() {
        let payload: GraphQLPayload<serde_json::Value> = GraphQLPayload {
            query: GraphQLQuery("query { viewer { login } }".to_string()),
            variables: None,
        };
        let body = serde_json::to_value(&payload).unwrap();
        assert!(body.get("variables").is_none());
    }
}
