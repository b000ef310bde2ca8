//! Output formatting for batch summaries and permission lookups

pub mod batch;
pub mod permission;

use serde::{Deserialize, Serialize};

pub use batch::*;
pub use permission::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownContent(pub String);

impl std::fmt::Display for MarkdownContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
