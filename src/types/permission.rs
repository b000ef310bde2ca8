//! Repository permission levels
//!
//! GitHub reports the viewer's access to a repository as one of six levels.
//! Mutations (resolving threads, accepting suggestions) require WRITE or
//! higher.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The authenticated token's access level to a repository
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")] // For GraphQL API compatibility
pub enum PermissionLevel {
    #[strum(serialize = "NONE")]
    None,
    #[strum(serialize = "READ")]
    Read,
    #[strum(serialize = "TRIAGE")]
    Triage,
    #[strum(serialize = "WRITE")]
    Write,
    #[strum(serialize = "MAINTAIN")]
    Maintain,
    #[strum(serialize = "ADMIN")]
    Admin,
}

impl PermissionLevel {
    /// Parse the `viewerPermission` string from the API. Unknown or blank
    /// values map to `None` so an unrecognized level never grants access.
    pub fn parse_or_none(raw: &str) -> Self {
        raw.trim().parse().unwrap_or(Self::None)
    }

    /// Whether this level allows write mutations on the repository
    pub fn can_mutate(&self) -> bool {
        matches!(self, Self::Write | Self::Maintain | Self::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_levels() {
        assert_eq!(PermissionLevel::parse_or_none("WRITE"), PermissionLevel::Write);
        assert_eq!(PermissionLevel::parse_or_none("ADMIN"), PermissionLevel::Admin);
        assert_eq!(PermissionLevel::parse_or_none("READ"), PermissionLevel::Read);
    }

    #[test]
    fn test_parse_unknown_maps_to_none() {
        assert_eq!(PermissionLevel::parse_or_none(""), PermissionLevel::None);
        assert_eq!(PermissionLevel::parse_or_none("OWNER"), PermissionLevel::None);
        assert_eq!(PermissionLevel::parse_or_none("write"), PermissionLevel::None);
    }

    #[test]
    fn test_mutation_allowed_set() {
        assert!(PermissionLevel::Write.can_mutate());
        assert!(PermissionLevel::Maintain.can_mutate());
        assert!(PermissionLevel::Admin.can_mutate());

        assert!(!PermissionLevel::None.can_mutate());
        assert!(!PermissionLevel::Read.can_mutate());
        assert!(!PermissionLevel::Triage.can_mutate());
    }

    #[test]
    fn test_display_round_trip() {
        assert_eq!(PermissionLevel::Maintain.to_string(), "MAINTAIN");
        assert_eq!(
            PermissionLevel::parse_or_none(&PermissionLevel::Triage.to_string()),
            PermissionLevel::Triage
        );
    }
}
