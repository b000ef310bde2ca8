//! Batch operation result types
//!
//! One `BatchResult` per input identifier, aggregated into a single
//! `BatchSummary` per batch invocation. Both are created fresh per run and
//! never persisted.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Outcome of one per-PR unit of work within a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// The identifier as the caller supplied it (canonically `owner/repo#number`)
    pub pr_identifier: String,
    pub success: bool,
    /// Targets actually mutated (or records fetched, for read-only runs)
    pub items_processed: u64,
    /// Soft and hard errors encountered for this PR. A successful result may
    /// still carry non-fatal errors from skipped or failed targets.
    pub errors: Vec<String>,
    pub duration: Duration,
}

impl BatchResult {
    /// A result that failed before any work happened (parse/validation)
    pub fn failed<T: Into<String>>(pr_identifier: T, error: String) -> Self {
        Self {
            pr_identifier: pr_identifier.into(),
            success: false,
            items_processed: 0,
            errors: vec![error],
            duration: Duration::ZERO,
        }
    }
}

/// Aggregate of all `BatchResult`s from one batch invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_prs: usize,
    pub successful: usize,
    pub failed: usize,
    /// Summed over successful results only
    pub total_items_processed: u64,
    /// Summed over every result, successful or not
    pub total_duration: Duration,
    /// Every error from every result, prefixed with its PR identifier
    pub errors: Vec<String>,
}

impl BatchSummary {
    /// Aggregate per-PR results into a summary.
    ///
    /// `total_prs == successful + failed` holds for every input; items are
    /// counted for successful results only, while errors are flattened from
    /// all results because successful PRs can carry non-fatal errors.
    pub fn from_results(results: &[BatchResult]) -> Self {
        let successful = results.iter().filter(|r| r.success).count();
        let failed = results.len() - successful;

        let total_items_processed = results
            .iter()
            .filter(|r| r.success)
            .map(|r| r.items_processed)
            .sum();

        let total_duration = results.iter().map(|r| r.duration).sum();

        let errors = results
            .iter()
            .flat_map(|r| {
                r.errors
                    .iter()
                    .map(|e| format!("PR #{}: {}", r.pr_identifier, e))
            })
            .collect();

        Self {
            total_prs: results.len(),
            successful,
            failed,
            total_items_processed,
            total_duration,
            errors,
        }
    }

    /// Success rate as a percentage; 0 for an empty batch
    pub fn success_rate(&self) -> f64 {
        if self.total_prs == 0 {
            return 0.0;
        }
        (self.successful as f64 / self.total_prs as f64) * 100.0
    }
}
