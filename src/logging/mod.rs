//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with configurable log levels
//! - JSON-formatted local file logging with rotation
//! - Macros for recurring convergence events
//!
//! Secret values never reach a log line: every macro here logs values
//! through their redacted `Display` form.
//!
//! # Example
//!
//! ```no_run
//! use tempest_conf::logging::init_logging;
//! use tempest_conf::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log a config option whose stored value changed
///
/// `$old` is an `Option<String>` already redacted by the caller; `$new` is a
/// [`ConfigValue`](crate::domain::ConfigValue) and is logged through its
/// redacted `Display`.
///
/// # Example
///
/// ```no_run
/// use tempest_conf::log_key_changed;
/// use tempest_conf::domain::{ConfigKey, ConfigValue};
/// use std::str::FromStr;
///
/// let key = ConfigKey::from_str("compute/image_ref").unwrap();
/// let old: Option<String> = None;
/// log_key_changed!(&key, old, &ConfigValue::scalar("I1"));
/// ```
#[macro_export]
macro_rules! log_key_changed {
    ($key:expr, $old:expr, $new:expr) => {
        tracing::info!(
            key = %$key,
            old = $old.as_deref().unwrap_or("<absent>"),
            new = %$new,
            "Updated config option"
        );
    };
}

/// Log the outcome of a name resolution
///
/// # Example
///
/// ```no_run
/// use tempest_conf::log_resolution;
/// use tempest_conf::domain::{ResolvedId, ResolveError, ResourceKind};
///
/// let outcome: Result<ResolvedId, ResolveError> = Ok(ResolvedId::new("I1").unwrap());
/// log_resolution!(ResourceKind::Image, "cirros", &outcome);
/// ```
#[macro_export]
macro_rules! log_resolution {
    ($kind:expr, $name:expr, $outcome:expr) => {
        match $outcome {
            Ok(id) => tracing::info!(
                kind = %$kind,
                name = %$name,
                id = %id,
                "Resolved name"
            ),
            Err(error) => tracing::warn!(
                kind = %$kind,
                name = %$name,
                error = %error,
                retryable = error.is_retryable(),
                "Failed to resolve name"
            ),
        }
    };
}

/// Log the completion of a convergence pass
///
/// # Example
///
/// ```no_run
/// use tempest_conf::log_convergence_complete;
/// use tempest_conf::core::converge::RunSummary;
///
/// let summary = RunSummary::new();
/// log_convergence_complete!(&summary);
/// ```
#[macro_export]
macro_rules! log_convergence_complete {
    ($summary:expr) => {
        tracing::info!(
            changed = $summary.changed_count(),
            failed = $summary.failed_count(),
            interrupted = $summary.interrupted,
            duration_ms = $summary.duration_ms,
            "Convergence pass finished"
        );
    };
}
