//! Core business logic for tempest-conf.
//!
//! This module contains the convergence logic and its orchestration.
//!
//! # Modules
//!
//! - [`validate`] - Pre-flight validation of the declared intent
//! - [`keys`] - Static key set derived from the intent
//! - [`store`] - Idempotent, atomic access to `tempest.conf`
//! - [`resolve`] - Name to identifier resolution
//! - [`reconcile`] - Resolve-then-write for setter-owned keys
//! - [`credentials`] - EC2 test credential provisioning
//! - [`converge`] - Phase ordering and the run summary
//!
//! # Convergence Workflow
//!
//! 1. **Validate**: Reject conflicting or incomplete name/id pairs
//! 2. **Setters**: Resolve image and network names concurrently, write ids
//! 3. **Static keys**: Write or remove every other owned option
//! 4. **Credentials**: Ensure the EC2 test credential, if enabled
//! 5. **Report**: Produce a per-key summary
//!
//! # Example
//!
//! ```rust,no_run
//! use tempest_conf::config::load_config;
//! use tempest_conf::core::converge::ConvergeCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("tempest-conf.toml")?;
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let coordinator = ConvergeCoordinator::from_config(&config)?
//!     .with_shutdown_signal(shutdown_rx);
//!
//! let summary = coordinator.run(config.intent.clone()).await?;
//!
//! println!("Changed: {}", summary.changed_count());
//! println!("Failed: {}", summary.failed_count());
//! # Ok(())
//! # }
//! ```

pub mod converge;
pub mod credentials;
pub mod keys;
pub mod reconcile;
pub mod resolve;
pub mod store;
pub mod validate;
