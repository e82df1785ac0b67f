//! Domain models and types for tempest-conf.
//!
//! This module contains the core domain types shared by every layer:
//!
//! - **Identifiers** ([`ConfigKey`], [`ResourceKind`], [`ResolvedId`])
//! - **Values** ([`ConfigValue`]) including secrets and the service default marker
//! - **Intent** ([`Intent`]) - the declared parameter set for one run
//! - **Error types** ([`TempestError`], [`ValidationError`], [`ResolveError`],
//!   [`WriteError`], [`ReconcileError`], [`CredentialError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Config keys are parsed once and carried as a newtype, so a section and an
//! option can never be swapped by accident:
//!
//! ```rust
//! use tempest_conf::domain::ConfigKey;
//! use std::str::FromStr;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let key = ConfigKey::from_str("compute/image_ref")?;
//! assert_eq!(key.section(), "compute");
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, TempestError>`]:
//!
//! ```rust,no_run
//! use tempest_conf::domain::Result;
//!
//! fn example() -> Result<()> {
//!     // Errors are automatically converted using the ? operator
//!     let config = tempest_conf::config::load_config("tempest-conf.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod intent;
pub mod result;
pub mod value;

// Re-export commonly used types for convenience
pub use errors::{
    CredentialError, ReconcileError, ResolveError, TempestError, ValidationError, WriteError,
};
pub use ids::{ConfigKey, ResolvedId, ResourceKind};
pub use intent::Intent;
pub use result::Result;
pub use value::{ConfigValue, REDACTED, SERVICE_DEFAULT};
