//! Resource inventory integration
//!
//! - [`traits`] - The [`Inventory`] capability used by the resolver
//! - [`openstack`] - Image and networking service implementation

pub mod openstack;
pub mod traits;

pub use openstack::OpenStackInventory;
pub use traits::{Inventory, InventoryResource};
