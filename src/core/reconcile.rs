//! Resolve-then-write reconciliation of one setter-owned key

use crate::core::resolve::Resolver;
use crate::core::store::{Change, ConfigStore};
use crate::domain::errors::ReconcileError;
use crate::domain::ids::{ConfigKey, ResourceKind};
use crate::domain::value::ConfigValue;
use std::sync::Arc;

/// Converges a key whose value is the id of a named inventory resource
///
/// Nothing is written unless resolution succeeds, so a missing or ambiguous
/// name leaves whatever the file already holds in place.
pub struct SetterReconciler {
    resolver: Arc<dyn Resolver>,
    store: Arc<ConfigStore>,
}

impl SetterReconciler {
    /// Create a reconciler writing into `store`
    pub fn new(resolver: Arc<dyn Resolver>, store: Arc<ConfigStore>) -> Self {
        Self { resolver, store }
    }

    /// Resolve `name` and record the id under `target`
    ///
    /// # Errors
    ///
    /// Returns the resolution or write failure, scoped to `target`.
    pub async fn reconcile(
        &self,
        kind: ResourceKind,
        name: &str,
        target: &ConfigKey,
    ) -> Result<Change, ReconcileError> {
        let id = self.resolver.resolve(kind, name).await?;
        let change = self
            .store
            .write(target, &ConfigValue::scalar(id.into_inner()))?;
        Ok(change)
    }
}
