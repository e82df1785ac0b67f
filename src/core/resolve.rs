//! Name to identifier resolution
//!
//! The [`IdentifierResolver`] turns a display name into the id of exactly one
//! inventory resource. It never caches: every call is a fresh lookup, so two
//! targets that happen to share a name are resolved independently.

use crate::adapters::inventory::Inventory;
use crate::domain::errors::ResolveError;
use crate::domain::ids::{ResolvedId, ResourceKind};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Resolution capability used by the setter reconcilers
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolve `name` to the id of the single matching resource of `kind`
    ///
    /// # Errors
    ///
    /// - [`ResolveError::NotFound`] when nothing matches
    /// - [`ResolveError::Ambiguous`] when several resources match
    /// - [`ResolveError::Transport`] on any infrastructure failure
    async fn resolve(&self, kind: ResourceKind, name: &str) -> Result<ResolvedId, ResolveError>;
}

/// Resolver backed by an [`Inventory`]
pub struct IdentifierResolver {
    inventory: Arc<dyn Inventory>,
    timeout: Duration,
}

impl IdentifierResolver {
    /// Create a resolver with a per-call time bound
    pub fn new(inventory: Arc<dyn Inventory>, timeout: Duration) -> Self {
        Self { inventory, timeout }
    }
}

#[async_trait]
impl Resolver for IdentifierResolver {
    async fn resolve(&self, kind: ResourceKind, name: &str) -> Result<ResolvedId, ResolveError> {
        let listed = tokio::time::timeout(self.timeout, self.inventory.list_resources(kind, name))
            .await
            .map_err(|_| ResolveError::Transport {
                kind,
                message: format!("timed out after {}s", self.timeout.as_secs_f32()),
            })??;

        // Servers may match loosely; only exact names count
        let mut matches: Vec<_> = listed
            .into_iter()
            .filter(|r| r.name.as_deref() == Some(name))
            .collect();

        let outcome = match matches.len() {
            0 => Err(ResolveError::NotFound {
                kind,
                name: name.to_string(),
            }),
            1 => {
                let resource = matches.remove(0);
                ResolvedId::new(resource.id).map_err(|e| ResolveError::Transport {
                    kind,
                    message: format!("inventory returned an unusable id: {e}"),
                })
            }
            count => Err(ResolveError::Ambiguous {
                kind,
                name: name.to_string(),
                count,
            }),
        };

        crate::log_resolution!(kind, name, &outcome);

        outcome
    }
}
