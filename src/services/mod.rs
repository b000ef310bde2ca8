//! Core services: per-PR mutation orchestration, global rate gating, and
//! concurrent batch execution

pub mod batch;
pub mod mutation;
pub mod rate;

pub use batch::{BatchConfig, BatchEngine, ProgressCallback};
pub use mutation::{MutationOrchestrator, MutationOutcome};
pub use rate::RateGate;
