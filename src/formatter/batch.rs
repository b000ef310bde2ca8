use crate::formatter::MarkdownContent;
use crate::types::BatchSummary;

// Cap the error list in human-readable output
const DEFAULT_ERROR_DISPLAY_LIMIT: usize = 10;

pub fn batch_summary_markdown(summary: &BatchSummary, operation_name: &str) -> MarkdownContent {
    let mut content = String::new();

    content.push_str(&format!("## {} Summary\n", operation_name));
    content.push('\n');
    content.push_str("| Metric | Value |\n");
    content.push_str("|--------|-------|\n");
    content.push_str(&format!("| Total PRs | {} |\n", summary.total_prs));
    content.push_str(&format!("| Successful | {} |\n", summary.successful));
    content.push_str(&format!("| Failed | {} |\n", summary.failed));
    content.push_str(&format!("| Success Rate | {:.1}% |\n", summary.success_rate()));
    content.push_str(&format!(
        "| Items Processed | {} |\n",
        summary.total_items_processed
    ));
    content.push_str(&format!(
        "| Total Duration | {:.2}s |\n",
        summary.total_duration.as_secs_f64()
    ));

    if !summary.errors.is_empty() {
        content.push_str("\n## Errors encountered\n");
        for error in summary.errors.iter().take(DEFAULT_ERROR_DISPLAY_LIMIT) {
            content.push_str(&format!("- {}\n", error));
        }
        if summary.errors.len() > DEFAULT_ERROR_DISPLAY_LIMIT {
            content.push_str(&format!(
                "... and {} more errors\n",
                summary.errors.len() - DEFAULT_ERROR_DISPLAY_LIMIT
            ));
        }
    }

    MarkdownContent(content)
}

pub fn batch_summary_json(summary: &BatchSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn summary(errors: Vec<String>) -> BatchSummary {
        BatchSummary {
            total_prs: 4,
            successful: 3,
            failed: 1,
            total_items_processed: 7,
            total_duration: Duration::from_secs_f64(2.5),
            errors,
        }
    }

    #[test]
    fn test_markdown_contains_metrics() {
        let content = batch_summary_markdown(&summary(vec![]), "Resolve Outdated Comments");
        assert!(content.0.contains("## Resolve Outdated Comments Summary"));
        assert!(content.0.contains("| Total PRs | 4 |"));
        assert!(content.0.contains("| Success Rate | 75.0% |"));
        assert!(content.0.contains("| Total Duration | 2.50s |"));
        assert!(!content.0.contains("Errors encountered"));
    }

    #[test]
    fn test_markdown_caps_error_list() {
        let errors: Vec<String> = (0..15).map(|i| format!("PR #o/r#{}: boom", i)).collect();
        let content = batch_summary_markdown(&summary(errors), "Test");
        assert!(content.0.contains("Errors encountered"));
        assert!(content.0.contains("... and 5 more errors"));
        assert!(content.0.contains("PR #o/r#0: boom"));
        assert!(!content.0.contains("PR #o/r#12: boom"));
    }

    #[test]
    fn test_json_round_trips() {
        let rendered = batch_summary_json(&summary(vec!["PR #o/r#1: boom".to_string()])).unwrap();
        let parsed: BatchSummary = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed.total_prs, 4);
        assert_eq!(parsed.errors.len(), 1);
    }
}
