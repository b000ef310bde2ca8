//! Review thread and suggestion domain types
//!
//! Mutation targets carry the opaque GraphQL node IDs GitHub hands back for
//! review threads and code suggestions. IDs are validated against GitHub's
//! base64 node-ID alphabet before any mutation is sent.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// GitHub node IDs are base64, including the URL-safe `-` and `_` variants.
static NODE_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9+/\-_=]+$").expect("Failed to compile node ID regex"));

/// Opaque GraphQL node ID of a review thread
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId(pub String);

impl ThreadId {
    pub fn new<T: Into<String>>(id: T) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check the ID against GitHub's base64 node-ID alphabet
    pub fn is_well_formed(&self) -> bool {
        NODE_ID_REGEX.is_match(&self.0)
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque GraphQL node ID of a code suggestion
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SuggestionId(pub String);

impl SuggestionId {
    pub fn new<T: Into<String>>(id: T) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check the ID against GitHub's base64 node-ID alphabet
    pub fn is_well_formed(&self) -> bool {
        NODE_ID_REGEX.is_match(&self.0)
    }
}

impl std::fmt::Display for SuggestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A review thread as returned by `GetPRThreads`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewThread {
    pub id: ThreadId,
    pub is_outdated: bool,
    pub is_resolved: bool,
}

impl ReviewThread {
    /// Threads eligible for automatic resolution: the anchor no longer
    /// matches the head commit and nobody resolved the thread yet.
    pub fn is_resolvable(&self) -> bool {
        self.is_outdated && !self.is_resolved
    }
}

/// A single write operation the orchestrator will apply to a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationTarget {
    /// Resolve the review thread with this ID
    ThreadResolution(ThreadId),
    /// Accept the code suggestion with this ID
    SuggestionAcceptance(SuggestionId),
}

impl MutationTarget {
    /// The node ID the mutation operates on
    pub fn id(&self) -> &str {
        match self {
            Self::ThreadResolution(id) => id.as_str(),
            Self::SuggestionAcceptance(id) => id.as_str(),
        }
    }

    /// Verb used in error messages ("resolve thread" / "accept suggestion")
    pub fn action(&self) -> &'static str {
        match self {
            Self::ThreadResolution(_) => "resolve thread",
            Self::SuggestionAcceptance(_) => "accept suggestion",
        }
    }
}
