//! External system integrations for tempest-conf.
//!
//! This module provides adapters for the OpenStack services a convergence
//! pass talks to:
//!
//! - [`inventory`] - Image and network listing for name resolution
//! - [`identity`] - EC2 credential lookup and creation
//! - [`client`] - Shared HTTP client construction
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with mock implementations. The core only sees the
//! [`inventory::Inventory`] and [`identity::CredentialStore`] traits.
//!
//! ```rust,no_run
//! use tempest_conf::adapters::inventory::{Inventory, OpenStackInventory};
//! use tempest_conf::config::InventoryConfig;
//! use tempest_conf::domain::ResourceKind;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = InventoryConfig {
//!     image_endpoint: "http://controller:9292".to_string(),
//!     ..InventoryConfig::default()
//! };
//!
//! let inventory = OpenStackInventory::new(&config)?;
//! let images = inventory.list_resources(ResourceKind::Image, "cirros").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod identity;
pub mod inventory;
