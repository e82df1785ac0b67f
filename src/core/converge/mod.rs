//! Convergence orchestration
//!
//! - [`coordinator`] - Phase ordering, concurrency and cancellation
//! - [`summary`] - Per-key outcomes and the run summary

pub mod coordinator;
pub mod summary;

pub use coordinator::ConvergeCoordinator;
pub use summary::{FailureKind, KeyOutcome, RunSummary};
