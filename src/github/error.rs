//! Error taxonomy for GraphQL operations
//!
//! Every failure the client can produce is tagged with one of these types.
//! Server-supplied error types (e.g. `NOT_FOUND`, `VALIDATION_ERROR`) are
//! passed through verbatim as `Server` values rather than being coerced into
//! the local taxonomy.

use serde::{Deserialize, Serialize};

/// Classification of a GraphQL operation failure
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GraphQLErrorType {
    /// HTTP 401: the token is invalid or expired
    Unauthorized,
    /// HTTP 403: insufficient scopes or secondary rate limiting
    Forbidden,
    /// Any other non-2xx HTTP status
    HttpError,
    /// Connection or timeout failure before a response arrived
    NetworkError,
    /// The response body was not valid JSON
    JsonError,
    /// A failure that fits no other category
    UnknownError,
    /// Input rejected before any network call was made
    InvalidInput,
    /// Error type reported by the server, passed through unchanged
    Server(String),
}

impl GraphQLErrorType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::HttpError => "HTTP_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::InvalidInput => "INVALID_INPUT",
            Self::Server(raw) => raw,
        }
    }
}

impl Default for GraphQLErrorType {
    fn default() -> Self {
        Self::UnknownError
    }
}

impl From<String> for GraphQLErrorType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "UNAUTHORIZED" => Self::Unauthorized,
            "FORBIDDEN" => Self::Forbidden,
            "HTTP_ERROR" => Self::HttpError,
            "NETWORK_ERROR" => Self::NetworkError,
            "JSON_ERROR" => Self::JsonError,
            "UNKNOWN_ERROR" => Self::UnknownError,
            "INVALID_INPUT" => Self::InvalidInput,
            _ => Self::Server(raw),
        }
    }
}

impl From<&str> for GraphQLErrorType {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<GraphQLErrorType> for String {
    fn from(error_type: GraphQLErrorType) -> Self {
        error_type.as_str().to_string()
    }
}

impl std::fmt::Display for GraphQLErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
