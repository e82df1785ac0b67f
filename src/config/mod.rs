//! Configuration management for tempest-conf.
//!
//! This module provides TOML-based loading, parsing and validation of the
//! tool's own configuration file (`tempest-conf.toml`). It is distinct from
//! `tempest.conf`, the file being converged, which is handled by
//! [`crate::core::store`].
//!
//! # Overview
//!
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `TEMPEST_CONF_*` environment overrides
//! - Default values for optional settings
//! - Secrets held in [`SecretString`]
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`InventoryConfig`] - Image, network and identity endpoints, auth token
//! - [`LoggingConfig`] - Local file logging
//! - [`crate::domain::Intent`] - The declared intent under `[intent]`
//!
//! # Example Configuration
//!
//! ```toml
//! [inventory]
//! image_endpoint = "http://controller:9292"
//! network_endpoint = "http://controller:9696"
//! auth_token = "${OS_TOKEN}"
//!
//! [intent]
//! image_name = "cirros"
//! image_name_alt = "cirros"
//! neutron_available = true
//! public_network_name = "public"
//! tempest_roles = ["Member", "creator"]
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{ApplicationConfig, ConvergeConfig, InventoryConfig, LoggingConfig};
pub use secret::{secret_string, SecretString, SecretValue};
