//! EC2 test credential provisioning

use crate::adapters::identity::CredentialStore;
use crate::core::keys::{aws_access_key, aws_secret_key};
use crate::core::store::{Change, ConfigStore};
use crate::domain::errors::CredentialError;
use crate::domain::ids::ConfigKey;
use crate::domain::value::ConfigValue;
use serde::Serialize;
use std::sync::Arc;

/// What happened to the credential in the identity service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialOutcome {
    Created,
    AlreadyExists,
}

/// Result of [`CredentialProvisioner::ensure_credential`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialReport {
    pub outcome: CredentialOutcome,
    /// How each recorded key changed
    pub keys: Vec<(ConfigKey, Change)>,
}

/// Ensures an EC2 credential exists and is recorded in the config file
pub struct CredentialProvisioner {
    credentials: Arc<dyn CredentialStore>,
    store: Arc<ConfigStore>,
}

impl CredentialProvisioner {
    /// Create a provisioner recording into `store`
    pub fn new(credentials: Arc<dyn CredentialStore>, store: Arc<ConfigStore>) -> Self {
        Self { credentials, store }
    }

    /// Get or create the credential `name` for `user` in `project`
    ///
    /// The access key is recorded under `aws/aws_access` and the secret key,
    /// as a secret, under `aws/aws_secret`. An existing credential is reused,
    /// so repeated runs leave both the identity service and the file as they
    /// are.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential cannot be found or created, or if
    /// recording it fails. A failed access key write stops before the secret
    /// key is written.
    pub async fn ensure_credential(
        &self,
        name: &str,
        user: &str,
        project: &str,
    ) -> Result<CredentialReport, CredentialError> {
        let (credential, outcome) = match self.credentials.find(user, project).await? {
            Some(existing) => (existing, CredentialOutcome::AlreadyExists),
            None => (
                self.credentials.create(user, project).await?,
                CredentialOutcome::Created,
            ),
        };

        tracing::info!(
            credential = %name,
            user = %user,
            project = %project,
            outcome = ?outcome,
            "EC2 credential ensured"
        );

        let access_key = aws_access_key();
        let secret_key = aws_secret_key();

        let access = self
            .store
            .write(&access_key, &ConfigValue::scalar(credential.access))?;
        let secret = self
            .store
            .write(&secret_key, &ConfigValue::Secret(credential.secret))?;

        Ok(CredentialReport {
            outcome,
            keys: vec![(access_key, access), (secret_key, secret)],
        })
    }
}
