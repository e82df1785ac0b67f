//! Convergence coordinator - orchestrates one pass over the config file
//!
//! The phases run in a fixed order:
//!
//! 1. Validate the intent (no I/O on failure)
//! 2. Converge setter-owned keys concurrently
//! 3. Converge the static key set
//! 4. Provision the EC2 credential, when enabled
//!
//! Failures are isolated per key: a key that fails is reported in the
//! summary and the pass carries on with the rest. Nothing already committed
//! is rolled back.

use crate::adapters::identity::{CredentialStore, KeystoneCredentialStore};
use crate::adapters::inventory::OpenStackInventory;
use crate::config::ConvergeConfig;
use crate::core::converge::summary::{FailureKind, KeyOutcome, RunSummary};
use crate::core::credentials::CredentialProvisioner;
use crate::core::keys::{aws_access_key, aws_secret_key, build_plan};
use crate::core::reconcile::SetterReconciler;
use crate::core::resolve::{IdentifierResolver, Resolver};
use crate::core::store::{Change, ConfigStore};
use crate::core::validate::{validate, SetterTarget, TargetSource};
use crate::domain::errors::{CredentialError, ReconcileError};
use crate::domain::intent::Intent;
use crate::domain::value::ConfigValue;
use crate::domain::Result;
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Convergence coordinator
pub struct ConvergeCoordinator {
    resolver: Arc<dyn Resolver>,
    credentials: Option<Arc<dyn CredentialStore>>,
    shutdown_signal: Option<watch::Receiver<bool>>,
}

impl ConvergeCoordinator {
    /// Create a coordinator around `resolver`
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        Self {
            resolver,
            credentials: None,
            shutdown_signal: None,
        }
    }

    /// Use `credentials` for EC2 credential provisioning
    pub fn with_credential_store(mut self, credentials: Arc<dyn CredentialStore>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Stop between phases once `shutdown_signal` turns true
    pub fn with_shutdown_signal(mut self, shutdown_signal: watch::Receiver<bool>) -> Self {
        self.shutdown_signal = Some(shutdown_signal);
        self
    }

    /// Wire the OpenStack adapters described by `config`
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn from_config(config: &ConvergeConfig) -> Result<Self> {
        let inventory = Arc::new(OpenStackInventory::new(&config.inventory)?);
        let resolver = Arc::new(IdentifierResolver::new(
            inventory,
            Duration::from_secs(config.inventory.timeout_seconds),
        ));

        let mut coordinator = Self::new(resolver);
        if config.intent.ec2api_available {
            coordinator = coordinator
                .with_credential_store(Arc::new(KeystoneCredentialStore::new(&config.inventory)?));
        }

        Ok(coordinator)
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown_signal
            .as_ref()
            .is_some_and(|signal| *signal.borrow())
    }

    /// Run one convergence pass
    ///
    /// # Errors
    ///
    /// Returns [`TempestError::Validation`](crate::domain::TempestError::Validation)
    /// when the intent is invalid; the file is not touched in that case.
    /// All later failures are reported per key in the summary.
    pub async fn run(&self, intent: Intent) -> Result<RunSummary> {
        let start_time = Instant::now();
        let validated = validate(intent)?;
        let intent = validated.intent();

        let store = Arc::new(ConfigStore::new(intent.tempest_conf_path.clone()));
        let mut summary = RunSummary::new();

        tracing::info!(
            path = %store.path().display(),
            setters = validated.targets().len(),
            lookups = validated.resolution_count(),
            "Starting convergence"
        );

        // Setter-owned keys are disjoint, so they converge concurrently
        let reconciler = SetterReconciler::new(self.resolver.clone(), store.clone());
        let setters = validated
            .targets()
            .iter()
            .map(|target| self.converge_target(&reconciler, &store, target));
        for (target, result) in join_all(setters).await {
            summary.record(target.key.clone(), result);
        }

        if self.shutdown_requested() {
            return Ok(self.interrupted(summary, start_time));
        }

        for option in build_plan(&validated) {
            if self.shutdown_requested() {
                return Ok(self.interrupted(summary, start_time));
            }
            let result = match option.desired {
                Some(ref value) => store.write(&option.key, value),
                None => store.remove(&option.key),
            };
            summary.record(option.key, result);
        }

        if intent.ec2api_available {
            if self.shutdown_requested() {
                return Ok(self.interrupted(summary, start_time));
            }
            self.provision_credential(intent, &store, &mut summary).await;
        }

        let summary = summary.finish(start_time.elapsed());
        crate::log_convergence_complete!(&summary);
        Ok(summary)
    }

    async fn converge_target<'a>(
        &self,
        reconciler: &SetterReconciler,
        store: &ConfigStore,
        target: &'a SetterTarget,
    ) -> (&'a SetterTarget, std::result::Result<Change, ReconcileError>) {
        let result = match target.source {
            TargetSource::Name(ref name) => reconciler.reconcile(target.kind, name, &target.key).await,
            TargetSource::Id(ref id) => {
                tracing::debug!(key = %target.key, "Writing literal id without lookup");
                store
                    .write(&target.key, &ConfigValue::scalar(id.as_str()))
                    .map_err(ReconcileError::from)
            }
        };
        (target, result)
    }

    async fn provision_credential(
        &self,
        intent: &Intent,
        store: &Arc<ConfigStore>,
        summary: &mut RunSummary,
    ) {
        let Some(ref credentials) = self.credentials else {
            let message = "no credential store configured";
            summary.record(aws_access_key(), KeyOutcome::failed(FailureKind::Credential, &message));
            summary.record(aws_secret_key(), KeyOutcome::failed(FailureKind::Credential, &message));
            return;
        };

        let provisioner = CredentialProvisioner::new(credentials.clone(), store.clone());
        let wanted = &intent.ec2_credentials;

        match provisioner
            .ensure_credential(&wanted.name, &wanted.user, &wanted.project)
            .await
        {
            Ok(report) => {
                summary.credential = Some(report.outcome);
                for (key, change) in report.keys {
                    summary.record(key, change);
                }
            }
            Err(CredentialError::Write(e)) => {
                let failed = e.key().clone();
                summary.record(failed.clone(), KeyOutcome::failed(FailureKind::Write, &e));
                // The secret is only written after the access key
                if failed == aws_access_key() {
                    summary.record(
                        aws_secret_key(),
                        KeyOutcome::failed(FailureKind::Write, &"not written after access key failure"),
                    );
                }
            }
            Err(e) => {
                let kind = FailureKind::from(&e);
                summary.record(aws_access_key(), KeyOutcome::failed(kind, &e));
                summary.record(aws_secret_key(), KeyOutcome::failed(kind, &e));
            }
        }
    }

    fn interrupted(&self, mut summary: RunSummary, start_time: Instant) -> RunSummary {
        tracing::warn!("Shutdown requested, stopping convergence before the next phase");
        summary.mark_interrupted();
        let summary = summary.finish(start_time.elapsed());
        crate::log_convergence_complete!(&summary);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{ResolveError, TempestError};
    use crate::domain::ids::{ResolvedId, ResourceKind};
    use async_trait::async_trait;
    use std::path::Path;
    use tempfile::TempDir;

    struct NameIsId;

    #[async_trait]
    impl Resolver for NameIsId {
        async fn resolve(
            &self,
            _kind: ResourceKind,
            name: &str,
        ) -> std::result::Result<ResolvedId, ResolveError> {
            Ok(ResolvedId::new(format!("id-{name}")).unwrap())
        }
    }

    fn intent(path: &Path) -> Intent {
        Intent {
            tempest_conf_path: path.to_path_buf(),
            image_name: Some("cirros".to_string()),
            image_ref_alt: Some("I2".to_string()),
            ..Intent::default()
        }
    }

    #[tokio::test]
    async fn test_run_writes_setters_and_static_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tempest.conf");
        let coordinator = ConvergeCoordinator::new(Arc::new(NameIsId));

        let summary = coordinator.run(intent(&path)).await.unwrap();

        assert!(summary.success);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("image_ref = id-cirros"));
        assert!(text.contains("image_ref_alt = I2"));
        assert!(text.contains("tempest_roles = <SERVICE DEFAULT>"));
    }

    #[tokio::test]
    async fn test_invalid_intent_is_fatal_and_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tempest.conf");
        let coordinator = ConvergeCoordinator::new(Arc::new(NameIsId));

        let err = coordinator
            .run(Intent {
                tempest_conf_path: path.clone(),
                ..Intent::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, TempestError::Validation(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_shutdown_before_static_phase() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tempest.conf");
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        let coordinator = ConvergeCoordinator::new(Arc::new(NameIsId)).with_shutdown_signal(rx);

        let summary = coordinator.run(intent(&path)).await.unwrap();

        assert!(summary.interrupted);
        assert!(!summary.success);
        // Setters committed, static phase skipped
        assert_eq!(summary.outcomes.len(), 2);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("tempest_roles"));
    }

    #[tokio::test]
    async fn test_ec2_without_store_fails_aws_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tempest.conf");
        let coordinator = ConvergeCoordinator::new(Arc::new(NameIsId));

        let summary = coordinator
            .run(Intent {
                ec2api_available: true,
                ..intent(&path)
            })
            .await
            .unwrap();

        assert!(!summary.success);
        assert_eq!(summary.failed_count(), 2);
        assert!(summary.outcomes[&aws_access_key()].is_failed());
        assert!(summary.outcomes[&aws_secret_key()].is_failed());
    }
}
