//! Global rate gate for outbound API calls
//!
//! GitHub's secondary rate limits are enforced per token across the whole
//! process, so spacing must be global, not per worker. The gate is a plain
//! synchronized component injected into the batch engine, which keeps it
//! swappable and testable in isolation.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::sleep;

/// Serializes units of work and enforces a minimum spacing between them.
///
/// A unit acquires the gate, runs, sleeps the configured interval, then
/// releases. Whatever the worker count, at most one unit executes at a time
/// and consecutive units start at least `interval` apart.
#[derive(Debug)]
pub struct RateGate {
    interval: Duration,
    gate: Mutex<()>,
}

impl RateGate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            gate: Mutex::new(()),
        }
    }

    /// The configured minimum spacing
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run `work` behind the gate. A zero interval skips the deliberate
    /// sleep entirely, leaving only lock-acquisition overhead.
    pub async fn throttle<F, T>(&self, work: F) -> T
    where
        F: std::future::Future<Output = T>,
    {
        let _guard = self.gate.lock().await;
        let output = work.await;
        if !self.interval.is_zero() {
            sleep(self.interval).await;
        }
        output
    }
}
