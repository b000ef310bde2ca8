//! Concurrent, rate-limited batch driver
//!
//! Fans the per-PR orchestrator out across many PR identifiers through a
//! bounded worker pool. All units of work share one [`RateGate`], so actual
//! call throughput is capped globally at roughly `1 / rate_limit` operations
//! per second no matter how many workers are in flight. The gate respects
//! upstream secondary rate limits; it is not a per-worker delay.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::services::mutation::MutationOrchestrator;
use crate::services::rate::RateGate;
use crate::types::{BatchResult, BatchSummary, PullRequestId};

/// Default spacing between per-PR units of work, in seconds
pub const DEFAULT_RATE_LIMIT: f64 = 2.0;

/// Default bound on in-flight units
pub const DEFAULT_MAX_CONCURRENCY: usize = 5;

/// Hard ceiling on requested concurrency
pub const MAX_CONCURRENCY_CEILING: usize = 20;

/// Tuning knobs for a batch engine
#[derive(Debug, Clone, Copy)]
pub struct BatchConfig {
    /// Minimum seconds between units of work, enforced globally
    pub rate_limit: f64,
    /// Maximum units in flight at once
    pub max_concurrency: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            rate_limit: DEFAULT_RATE_LIMIT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl BatchConfig {
    /// Validate the configuration, clamping excessive concurrency down to
    /// [`MAX_CONCURRENCY_CEILING`].
    pub fn validate(self) -> Result<Self> {
        if self.rate_limit < 0.0 || self.rate_limit.is_nan() {
            bail!("Rate limit must be non-negative");
        }
        if self.max_concurrency < 1 {
            bail!("Concurrency must be at least 1");
        }

        let mut config = self;
        if config.max_concurrency > MAX_CONCURRENCY_CEILING {
            warn!(
                "Clamping concurrency from {} to {}",
                config.max_concurrency, MAX_CONCURRENCY_CEILING
            );
            config.max_concurrency = MAX_CONCURRENCY_CEILING;
        }
        Ok(config)
    }
}

/// Invoked once per completed item. UI only; never affects control flow.
pub type ProgressCallback = Arc<dyn Fn(&BatchResult) + Send + Sync>;

#[derive(Debug, Clone, Copy)]
enum BatchOperation {
    ResolveOutdatedComments,
    AcceptSuggestions,
    CollectPrData,
}

impl BatchOperation {
    fn describe(&self) -> &'static str {
        match self {
            Self::ResolveOutdatedComments => "Resolving outdated comments",
            Self::AcceptSuggestions => "Accepting suggestions",
            Self::CollectPrData => "Collecting PR data",
        }
    }
}

/// Batch executor over string PR identifiers (`owner/repo#number`)
pub struct BatchEngine {
    orchestrator: Arc<MutationOrchestrator>,
    rate_gate: Arc<RateGate>,
    max_concurrency: usize,
    progress: Option<ProgressCallback>,
}

impl BatchEngine {
    pub fn new(orchestrator: MutationOrchestrator, config: BatchConfig) -> Result<Self> {
        let config = config.validate()?;
        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            rate_gate: Arc::new(RateGate::new(Duration::from_secs_f64(config.rate_limit))),
            max_concurrency: config.max_concurrency,
            progress: None,
        })
    }

    /// Replace the default gate, e.g. to share one gate across engines so
    /// their combined throughput stays within the global budget.
    pub fn with_rate_gate(mut self, rate_gate: Arc<RateGate>) -> Self {
        self.rate_gate = rate_gate;
        self
    }

    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Resolve outdated review threads across every identified PR
    pub async fn resolve_outdated_comments_batch(&self, identifiers: &[String]) -> BatchSummary {
        self.execute_batch_operation(identifiers, BatchOperation::ResolveOutdatedComments)
            .await
    }

    /// Accept code suggestions across every identified PR
    pub async fn accept_suggestions_batch(&self, identifiers: &[String]) -> BatchSummary {
        self.execute_batch_operation(identifiers, BatchOperation::AcceptSuggestions)
            .await
    }

    /// Read-only variant: fetch review data across every identified PR
    pub async fn get_pr_data_batch(&self, identifiers: &[String]) -> BatchSummary {
        self.execute_batch_operation(identifiers, BatchOperation::CollectPrData)
            .await
    }

    async fn execute_batch_operation(
        &self,
        identifiers: &[String],
        operation: BatchOperation,
    ) -> BatchSummary {
        if identifiers.is_empty() {
            warn!("No PRs provided for batch operation");
            return BatchSummary::from_results(&[]);
        }

        info!("{} across {} PRs", operation.describe(), identifiers.len());

        // Malformed identifiers fail here, before any network activity or
        // orchestrator invocation.
        let mut results: Vec<BatchResult> = Vec::with_capacity(identifiers.len());
        let mut units = Vec::new();
        for raw in identifiers {
            match PullRequestId::parse(raw) {
                Ok(pr_id) => units.push((raw.clone(), pr_id)),
                Err(parse_error) => {
                    let failed = BatchResult::failed(raw.clone(), parse_error);
                    self.report_progress(&failed);
                    results.push(failed);
                }
            }
        }

        // Completion order, not submission order.
        let completed: Vec<BatchResult> = stream::iter(
            units
                .into_iter()
                .map(|(raw, pr_id)| self.run_unit(raw, pr_id, operation)),
        )
        .buffer_unordered(self.max_concurrency)
        .collect()
        .await;
        results.extend(completed);

        let summary = BatchSummary::from_results(&results);
        info!(
            "Batch operation completed: {}/{} PRs successful, {} items processed, {} failures",
            summary.successful, summary.total_prs, summary.total_items_processed, summary.failed
        );
        if !summary.errors.is_empty() {
            warn!(
                "Encountered {} errors during batch operation",
                summary.errors.len()
            );
        }
        summary
    }

    /// Run one per-PR unit behind the shared gate. The unit executes on its
    /// own task so a panic is confined to a failed result for that PR.
    async fn run_unit(
        &self,
        raw: String,
        pr_id: PullRequestId,
        operation: BatchOperation,
    ) -> BatchResult {
        let orchestrator = Arc::clone(&self.orchestrator);
        let rate_gate = Arc::clone(&self.rate_gate);
        let started = Instant::now();

        let handle = tokio::spawn(async move {
            rate_gate
                .throttle(async {
                    match operation {
                        BatchOperation::ResolveOutdatedComments => {
                            orchestrator.resolve_outdated_threads(&pr_id).await
                        }
                        BatchOperation::AcceptSuggestions => {
                            orchestrator.accept_all_suggestions(&pr_id).await
                        }
                        BatchOperation::CollectPrData => {
                            orchestrator.collect_review_data(&pr_id).await
                        }
                    }
                })
                .await
        });

        let result = match handle.await {
            Ok(outcome) => BatchResult {
                pr_identifier: raw,
                success: outcome.success(),
                items_processed: outcome.applied,
                errors: outcome.errors,
                duration: started.elapsed(),
            },
            Err(join_error) => {
                warn!("Batch unit for {} crashed: {}", raw, join_error);
                BatchResult {
                    pr_identifier: raw,
                    success: false,
                    items_processed: 0,
                    errors: vec![format!("Unexpected error: {}", join_error)],
                    duration: started.elapsed(),
                }
            }
        };

        self.report_progress(&result);
        result
    }

    fn report_progress(&self, result: &BatchResult) {
        if let Some(progress) = &self.progress {
            progress(result);
        }
    }
}
