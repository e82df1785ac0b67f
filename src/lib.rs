// tempest-conf - Tempest configuration convergence tool
// Copyright (c) 2025 tempest-conf Contributors
// Licensed under the MIT License

//! # tempest-conf - Tempest configuration convergence
//!
//! tempest-conf converges an INI-style `tempest.conf` to a declared intent.
//! Image and network names are resolved to ids against the cloud's
//! inventory, the static option set is written or removed, and an EC2 test
//! credential can be provisioned. A second run against an unchanged cloud
//! changes nothing.
//!
//! ## Architecture
//!
//! tempest-conf follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (validation, key set, store, resolution, convergence)
//! - [`adapters`] - External integrations (image, network and identity services)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tempest_conf::config::load_config;
//! use tempest_conf::core::converge::ConvergeCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("tempest-conf.toml")?;
//!
//!     let coordinator = ConvergeCoordinator::from_config(&config)?;
//!     let summary = coordinator.run(config.intent.clone()).await?;
//!
//!     println!("Changed {} keys", summary.changed_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Idempotent Writes
//!
//! Every write goes through [`core::store::ConfigStore`], which compares the
//! stored value first and only rewrites the file when it differs:
//!
//! ```rust,no_run
//! use tempest_conf::core::store::ConfigStore;
//! use tempest_conf::domain::{ConfigKey, ConfigValue};
//! use std::str::FromStr;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ConfigStore::new("/var/lib/tempest/etc/tempest.conf");
//! let key = ConfigKey::from_str("compute/image_ref")?;
//!
//! let change = store.write(&key, &ConfigValue::scalar("I1"))?;
//! assert!(!store.write(&key, &ConfigValue::scalar("I1"))?.is_changed());
//! # let _ = change;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! tempest-conf uses the [`domain::TempestError`] type for fatal errors.
//! Per-key failures never abort a pass; they are collected in the
//! [`core::converge::RunSummary`].
//!
//! ```rust,no_run
//! use tempest_conf::domain::TempestError;
//!
//! fn example() -> Result<(), TempestError> {
//!     let config = tempest_conf::config::load_config("tempest-conf.toml")?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
