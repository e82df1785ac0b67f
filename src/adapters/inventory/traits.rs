//! Inventory abstraction traits
//!
//! This module defines the capability the resolver needs from an inventory
//! service: list the resources of one kind that carry a given name.

use crate::domain::errors::ResolveError;
use crate::domain::ids::ResourceKind;
use async_trait::async_trait;
use serde::Deserialize;

/// A resource as reported by the inventory
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InventoryResource {
    /// Stable identifier
    pub id: String,

    /// Display name; `None` for unnamed resources
    #[serde(default)]
    pub name: Option<String>,
}

impl InventoryResource {
    /// Create a named resource
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
        }
    }
}

/// Inventory client trait
///
/// Implementations may filter server-side, but callers must not rely on it:
/// the resolver applies its own exact-match filter to whatever is returned.
#[async_trait]
pub trait Inventory: Send + Sync {
    /// List resources of `kind` whose name matches `name`
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Transport`] when the service cannot be reached,
    /// answers with an error status or returns a malformed payload.
    async fn list_resources(
        &self,
        kind: ResourceKind,
        name: &str,
    ) -> Result<Vec<InventoryResource>, ResolveError>;
}
