//! Convergence summary and reporting
//!
//! This module defines the per-key outcomes of a run and the summary handed
//! back to the invoker, serialisable to JSON for `converge --json`.

use crate::core::credentials::CredentialOutcome;
use crate::core::store::Change;
use crate::domain::errors::{CredentialError, ReconcileError, ResolveError, WriteError};
use crate::domain::ids::ConfigKey;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Category of a per-key failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No inventory resource carries the name
    NotFound,
    /// Several inventory resources carry the name
    Ambiguous,
    /// The inventory could not be queried; retrying may help
    Transport,
    /// The config file could not be read or written
    Write,
    /// The EC2 credential could not be found or created
    Credential,
}

impl From<&ResolveError> for FailureKind {
    fn from(err: &ResolveError) -> Self {
        match err {
            ResolveError::NotFound { .. } => FailureKind::NotFound,
            ResolveError::Ambiguous { .. } => FailureKind::Ambiguous,
            ResolveError::Transport { .. } => FailureKind::Transport,
        }
    }
}

impl From<&ReconcileError> for FailureKind {
    fn from(err: &ReconcileError) -> Self {
        match err {
            ReconcileError::Resolve(e) => e.into(),
            ReconcileError::Write(_) => FailureKind::Write,
        }
    }
}

impl From<&CredentialError> for FailureKind {
    fn from(err: &CredentialError) -> Self {
        match err {
            CredentialError::Write(_) => FailureKind::Write,
            _ => FailureKind::Credential,
        }
    }
}

/// Final state of one key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum KeyOutcome {
    Unchanged,
    Changed,
    Failed { kind: FailureKind, message: String },
}

impl KeyOutcome {
    /// Build a failed outcome from any error describing the key
    pub fn failed(kind: FailureKind, err: &impl std::fmt::Display) -> Self {
        KeyOutcome::Failed {
            kind,
            message: err.to_string(),
        }
    }

    /// Returns true if the key ended in failure
    pub fn is_failed(&self) -> bool {
        matches!(self, KeyOutcome::Failed { .. })
    }
}

impl From<Change> for KeyOutcome {
    fn from(change: Change) -> Self {
        match change {
            Change::Unchanged => KeyOutcome::Unchanged,
            Change::Changed => KeyOutcome::Changed,
        }
    }
}

impl From<Result<Change, ReconcileError>> for KeyOutcome {
    fn from(result: Result<Change, ReconcileError>) -> Self {
        match result {
            Ok(change) => change.into(),
            Err(e) => KeyOutcome::failed((&e).into(), &e),
        }
    }
}

impl From<Result<Change, WriteError>> for KeyOutcome {
    fn from(result: Result<Change, WriteError>) -> Self {
        match result {
            Ok(change) => change.into(),
            Err(e) => KeyOutcome::failed(FailureKind::Write, &e),
        }
    }
}

/// Summary of one convergence pass
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// When the pass started
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,

    /// Outcome per key, in key order
    pub outcomes: BTreeMap<ConfigKey, KeyOutcome>,

    /// What happened to the EC2 credential, if provisioning ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<CredentialOutcome>,

    /// Whether the pass stopped early on a shutdown signal
    pub interrupted: bool,

    /// True when every key converged and the pass ran to completion
    pub success: bool,
}

impl RunSummary {
    /// Create a new empty summary starting now
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            duration_ms: 0,
            outcomes: BTreeMap::new(),
            credential: None,
            interrupted: false,
            success: true,
        }
    }

    /// Record the outcome of one key
    pub fn record(&mut self, key: ConfigKey, outcome: impl Into<KeyOutcome>) {
        let outcome = outcome.into();
        if let KeyOutcome::Failed { kind, message } = &outcome {
            tracing::warn!(key = %key, kind = ?kind, error = %message, "Key failed to converge");
        }
        self.outcomes.insert(key, outcome);
    }

    /// Mark the pass as stopped by a shutdown signal
    pub fn mark_interrupted(&mut self) {
        self.interrupted = true;
    }

    /// Set the duration and compute the success flag
    pub fn finish(mut self, duration: Duration) -> Self {
        self.duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self.success = !self.interrupted && self.failed_count() == 0;
        self
    }

    /// Number of keys rewritten
    pub fn changed_count(&self) -> usize {
        self.count(|o| matches!(o, KeyOutcome::Changed))
    }

    /// Number of keys already correct
    pub fn unchanged_count(&self) -> usize {
        self.count(|o| matches!(o, KeyOutcome::Unchanged))
    }

    /// Number of keys that failed
    pub fn failed_count(&self) -> usize {
        self.count(KeyOutcome::is_failed)
    }

    /// Keys that failed, with their outcomes
    pub fn failures(&self) -> impl Iterator<Item = (&ConfigKey, &KeyOutcome)> {
        self.outcomes.iter().filter(|(_, o)| o.is_failed())
    }

    /// Check if the pass converged every key
    pub fn is_successful(&self) -> bool {
        !self.interrupted && self.failed_count() == 0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total = self.outcomes.len(),
            changed = self.changed_count(),
            unchanged = self.unchanged_count(),
            failed = self.failed_count(),
            interrupted = self.interrupted,
            duration_ms = self.duration_ms,
            "Convergence completed"
        );

        for (key, outcome) in self.failures() {
            if let KeyOutcome::Failed { kind, message } = outcome {
                tracing::warn!(key = %key, kind = ?kind, error = %message, "Convergence failure");
            }
        }
    }

    fn count(&self, predicate: impl Fn(&KeyOutcome) -> bool) -> usize {
        self.outcomes.values().filter(|o| predicate(o)).count()
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}
