//! Integration tests for graceful shutdown
//!
//! These tests verify that:
//! - Shutdown signals propagate to every receiver
//! - A signal raised while names are being resolved stops the pass before
//!   the static keys
//! - Keys committed before the signal stay committed
//! - An interrupted summary is not successful

use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;
use tempest_conf::core::converge::ConvergeCoordinator;
use tempest_conf::core::resolve::Resolver;
use tempest_conf::core::store::ConfigStore;
use tempest_conf::domain::{ConfigKey, Intent, ResolveError, ResolvedId, ResourceKind};
use tempfile::TempDir;
use tokio::sync::watch;

/// Resolver that raises the shutdown signal while answering
struct InterruptingResolver {
    shutdown_tx: watch::Sender<bool>,
}

#[async_trait]
impl Resolver for InterruptingResolver {
    async fn resolve(&self, _kind: ResourceKind, name: &str) -> Result<ResolvedId, ResolveError> {
        let _ = self.shutdown_tx.send(true);
        Ok(ResolvedId::new(format!("id-{name}")).unwrap())
    }
}

#[tokio::test]
async fn test_shutdown_signal_propagation() {
    let (shutdown_tx, shutdown_rx1) = watch::channel(false);
    let shutdown_rx2 = shutdown_rx1.clone();

    assert!(!*shutdown_rx1.borrow());
    assert!(!*shutdown_rx2.borrow());

    shutdown_tx.send(true).unwrap();

    assert!(*shutdown_rx1.borrow());
    assert!(*shutdown_rx2.borrow());
}

#[tokio::test]
async fn test_shutdown_during_resolution_skips_static_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tempest.conf");
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let coordinator = ConvergeCoordinator::new(Arc::new(InterruptingResolver { shutdown_tx }))
        .with_shutdown_signal(shutdown_rx);

    let summary = coordinator
        .run(Intent {
            tempest_conf_path: path.clone(),
            image_name: Some("cirros".to_string()),
            image_name_alt: Some("cirros".to_string()),
            ..Intent::default()
        })
        .await
        .unwrap();

    assert!(summary.interrupted);
    assert!(!summary.success);
    assert!(!summary.is_successful());
    assert_eq!(summary.outcomes.len(), 2);
    assert_eq!(summary.failed_count(), 0);

    // Setter writes that finished before the signal are kept
    let store = ConfigStore::new(&path);
    let image_ref = store
        .read(&ConfigKey::from_str("compute/image_ref").unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(image_ref.render(), "id-cirros");
    assert!(store
        .read(&ConfigKey::from_str("auth/tempest_roles").unwrap())
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_rerun_after_interruption_completes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tempest.conf");
    let intent = Intent {
        tempest_conf_path: path.clone(),
        image_name: Some("cirros".to_string()),
        image_name_alt: Some("cirros".to_string()),
        ..Intent::default()
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let interrupted = ConvergeCoordinator::new(Arc::new(InterruptingResolver { shutdown_tx }))
        .with_shutdown_signal(shutdown_rx)
        .run(intent.clone())
        .await
        .unwrap();
    assert!(interrupted.interrupted);

    // Same resolver behaviour, but nobody listens for the signal this time
    let (shutdown_tx, _) = watch::channel(false);
    let resumed = ConvergeCoordinator::new(Arc::new(InterruptingResolver { shutdown_tx }))
        .run(intent)
        .await
        .unwrap();

    assert!(resumed.success);
    assert_eq!(
        resumed.outcomes[&ConfigKey::from_str("compute/image_ref").unwrap()],
        tempest_conf::core::converge::KeyOutcome::Unchanged
    );
    assert!(resumed.changed_count() > 0);
}
