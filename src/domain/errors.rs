//! Domain error types
//!
//! This module defines the error hierarchy for tempest-conf.
//! All errors are domain-specific and don't expose third-party types.
//!
//! Errors never carry the value of a configuration option. A failure is
//! described by its [`ConfigKey`] and cause only, so secret material cannot
//! leak through `Display` or `Debug` output.

use super::ids::{ConfigKey, ResourceKind};
use thiserror::Error;

/// Main tempest-conf error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum TempestError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Intent validation errors (always fatal, raised before any I/O)
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Name resolution errors
    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// Config file write errors
    #[error("Write error: {0}")]
    Write(#[from] WriteError),

    /// Credential provisioning errors
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Intent validation errors
///
/// One variant per rule and outcome. The messages match the wording operators
/// already know from the manifest guards they replace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Neither `image_name` nor `image_ref` was given
    #[error("A value for either image_name or image_ref must be provided.")]
    ImageMissing,

    /// Both `image_name` and `image_ref` were given
    #[error("Specify either image_name or image_ref, not both.")]
    ImageConflict,

    /// Neither `image_name_alt` nor `image_ref_alt` was given
    #[error("A value for either image_name_alt or image_ref_alt must be provided.")]
    ImageAltMissing,

    /// Both `image_name_alt` and `image_ref_alt` were given
    #[error("Specify either image_name_alt or image_ref_alt, not both.")]
    ImageAltConflict,

    /// Neither `public_network_id` nor `public_network_name` was given
    #[error("A value for either public_network_id or public_network_name must be provided.")]
    PublicNetworkMissing,

    /// Both `public_network_id` and `public_network_name` were given
    #[error("Specify either public_network_id or public_network_name, not both.")]
    PublicNetworkConflict,
}

/// Inventory resolution errors
///
/// `NotFound` and `Ambiguous` are data problems that a retry cannot fix.
/// `Transport` covers everything infrastructural and may be retried by the
/// caller; it is never retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No resource carries the requested name
    #[error("No {kind} named '{name}' was found")]
    NotFound { kind: ResourceKind, name: String },

    /// More than one resource carries the requested name
    #[error("Found {count} {kind}s named '{name}', expected exactly one")]
    Ambiguous {
        kind: ResourceKind,
        name: String,
        count: usize,
    },

    /// The inventory was unreachable, timed out or returned malformed data
    #[error("Failed to query {kind} inventory: {message}")]
    Transport { kind: ResourceKind, message: String },
}

impl ResolveError {
    /// Whether the caller may reasonably retry the request
    pub fn is_retryable(&self) -> bool {
        matches!(self, ResolveError::Transport { .. })
    }
}

/// Config file write errors
///
/// Carries the target key and the underlying cause, never the value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    /// Reading the existing file failed
    #[error("Failed to read {path} for {key}: {message}")]
    Read {
        key: ConfigKey,
        path: String,
        message: String,
    },

    /// Persisting the updated file failed
    #[error("Failed to persist {path} while updating {key}: {message}")]
    Persist {
        key: ConfigKey,
        path: String,
        message: String,
    },

    /// The value cannot be stored on a single `option = value` line
    #[error("Refusing to write {key}: value {reason}")]
    InvalidValue { key: ConfigKey, reason: &'static str },
}

impl WriteError {
    /// The key whose update failed
    pub fn key(&self) -> &ConfigKey {
        match self {
            WriteError::Read { key, .. }
            | WriteError::Persist { key, .. }
            | WriteError::InvalidValue { key, .. } => key,
        }
    }
}

/// Errors produced by a single setter reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// The name could not be resolved
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// The resolved id could not be written
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Credential provisioning errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// The user or project the credential belongs to does not exist
    #[error("No {what} named '{name}' was found")]
    Lookup { what: &'static str, name: String },

    /// More than one user or project carries the name
    #[error("Found {count} {what}s named '{name}', expected exactly one")]
    AmbiguousLookup {
        what: &'static str,
        name: String,
        count: usize,
    },

    /// The identity service was unreachable or returned malformed data
    #[error("Identity service request failed: {0}")]
    Transport(String),

    /// The credential could not be recorded in the config file
    #[error(transparent)]
    Write(#[from] WriteError),
}

// Conversion from std::io::Error
impl From<std::io::Error> for TempestError {
    fn from(err: std::io::Error) -> Self {
        TempestError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for TempestError {
    fn from(err: serde_json::Error) -> Self {
        TempestError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for TempestError {
    fn from(err: toml::de::Error) -> Self {
        TempestError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> ConfigKey {
        ConfigKey::new("auth", "admin_password").unwrap()
    }

    #[test]
    fn test_tempest_error_display() {
        let err = TempestError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_validation_error_conversion() {
        let err: TempestError = ValidationError::ImageMissing.into();
        assert!(matches!(err, TempestError::Validation(_)));
        assert!(err.to_string().contains("image_name or image_ref"));
    }

    #[test]
    fn test_resolve_error_messages() {
        let err = ResolveError::Ambiguous {
            kind: ResourceKind::Image,
            name: "cirros".to_string(),
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "Found 2 images named 'cirros', expected exactly one"
        );

        let err = ResolveError::NotFound {
            kind: ResourceKind::Network,
            name: "public".to_string(),
        };
        assert_eq!(err.to_string(), "No network named 'public' was found");
    }

    #[test]
    fn test_only_transport_is_retryable() {
        let transport = ResolveError::Transport {
            kind: ResourceKind::Image,
            message: "connection refused".to_string(),
        };
        let missing = ResolveError::NotFound {
            kind: ResourceKind::Image,
            name: "cirros".to_string(),
        };
        assert!(transport.is_retryable());
        assert!(!missing.is_retryable());
    }

    #[test]
    fn test_write_error_names_key_only() {
        let err = WriteError::Persist {
            key: key(),
            path: "/etc/tempest.conf".to_string(),
            message: "Permission denied".to_string(),
        };
        assert_eq!(err.key(), &key());
        assert_eq!(
            err.to_string(),
            "Failed to persist /etc/tempest.conf while updating auth/admin_password: Permission denied"
        );
    }

    #[test]
    fn test_reconcile_error_is_transparent() {
        let err: ReconcileError = ResolveError::NotFound {
            kind: ResourceKind::Image,
            name: "cirros".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "No image named 'cirros' was found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: TempestError = io_err.into();
        assert!(matches!(err, TempestError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: TempestError = toml_err.into();
        assert!(matches!(err, TempestError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let _: &dyn std::error::Error = &ValidationError::ImageConflict;
        let _: &dyn std::error::Error = &CredentialError::Transport("x".to_string());
    }
}
