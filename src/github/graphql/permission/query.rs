use serde::Serialize;

pub const CHECK_PERMISSIONS_QUERY: &str = r#"
query CheckPermissions($owner: String!, $repo: String!) {
    repository(owner: $owner, name: $repo) {
        viewerPermission
    }
    viewer {
        login
    }
}"#;

#[derive(Debug, Clone, Serialize)]
pub struct CheckPermissionsVariable {
    pub owner: String,
    pub repo: String,
}
