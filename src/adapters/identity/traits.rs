//! Credential store abstraction

use crate::config::SecretString;
use crate::domain::errors::CredentialError;
use async_trait::async_trait;

/// An EC2-style access/secret pair
#[derive(Debug, Clone)]
pub struct Ec2Credential {
    /// Access key, safe to log
    pub access: String,

    /// Secret key
    pub secret: SecretString,
}

/// Create-or-get capability for EC2 credentials
///
/// A credential is scoped to one user within one project.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up an existing credential for `user` in `project`
    ///
    /// # Errors
    ///
    /// Returns an error if the user or project cannot be identified or the
    /// identity service fails.
    async fn find(&self, user: &str, project: &str)
        -> Result<Option<Ec2Credential>, CredentialError>;

    /// Create a new credential for `user` in `project`
    ///
    /// # Errors
    ///
    /// Same conditions as [`CredentialStore::find`].
    async fn create(&self, user: &str, project: &str) -> Result<Ec2Credential, CredentialError>;
}
