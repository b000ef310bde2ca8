//! Wire DTOs for the `CheckPermissions` query.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckPermissionsResponse {
    pub repository: Option<PermissionsRepository>,
    pub viewer: Option<ViewerNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionsRepository {
    #[serde(rename = "viewerPermission", default)]
    pub viewer_permission: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerNode {
    pub login: String,
}

impl CheckPermissionsResponse {
    /// The raw `viewerPermission` string; empty when the repository was
    /// absent from the response or reported no permission.
    pub fn raw_permission(&self) -> String {
        self.repository
            .as_ref()
            .and_then(|r| r.viewer_permission.clone())
            .unwrap_or_default()
    }

    pub fn viewer_login(&self) -> Option<&str> {
        self.viewer.as_ref().map(|v| v.login.as_str())
    }
}
