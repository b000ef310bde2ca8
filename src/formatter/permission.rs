use crate::formatter::MarkdownContent;
use crate::types::{PermissionLevel, RepositoryId};

pub fn permission_markdown(
    repository_id: &RepositoryId,
    login: Option<&str>,
    level: PermissionLevel,
) -> MarkdownContent {
    let mut content = String::new();

    content.push_str(&format!("## Permissions for {}\n", repository_id));
    content.push('\n');
    if let Some(login) = login {
        content.push_str(&format!("Viewer: {}\n", login));
    }
    content.push_str(&format!("Permission level: {}\n", level));
    content.push_str(&format!(
        "Mutations allowed: {}\n",
        if level.can_mutate() { "yes" } else { "no" }
    ));

    MarkdownContent(content)
}
