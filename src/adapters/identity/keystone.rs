//! Keystone v3 credential store
//!
//! Users and projects are looked up by exact name, then EC2 credentials are
//! listed or created under `/v3/users/{user_id}/credentials/OS-EC2`.

use super::traits::{CredentialStore, Ec2Credential};
use crate::adapters::client::{build_http_client, normalize_base, AUTH_TOKEN_HEADER};
use crate::config::{secret_string, InventoryConfig, SecretString};
use crate::domain::errors::CredentialError;
use crate::domain::{Result, TempestError};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Named {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct UserList {
    users: Vec<Named>,
}

#[derive(Debug, Deserialize)]
struct ProjectList {
    projects: Vec<Named>,
}

#[derive(Deserialize)]
struct WireCredential {
    access: String,
    secret: String,
    tenant_id: String,
}

#[derive(Deserialize)]
struct CredentialList {
    credentials: Vec<WireCredential>,
}

#[derive(Deserialize)]
struct CreatedCredential {
    credential: WireCredential,
}

impl From<WireCredential> for Ec2Credential {
    fn from(wire: WireCredential) -> Self {
        Ec2Credential {
            access: wire.access,
            secret: secret_string(wire.secret),
        }
    }
}

/// Credential store backed by the identity service
pub struct KeystoneCredentialStore {
    client: Client,
    endpoint: String,
    auth_token: Option<SecretString>,
}

impl KeystoneCredentialStore {
    /// Create a new Keystone client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no identity endpoint is configured or
    /// the HTTP client cannot be built.
    pub fn new(config: &InventoryConfig) -> Result<Self> {
        let endpoint = config.identity_endpoint.as_deref().ok_or_else(|| {
            TempestError::Configuration("inventory.identity_endpoint is not set".to_string())
        })?;

        Ok(Self {
            client: build_http_client(config)?,
            endpoint: normalize_base(endpoint),
            auth_token: config.auth_token.clone(),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.auth_token {
            Some(ref token) => request.header(AUTH_TOKEN_HEADER, token.expose_secret().as_str()),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> std::result::Result<T, CredentialError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| CredentialError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CredentialError::Transport(format!(
                "request failed with status {status}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| CredentialError::Transport(format!("malformed response: {e}")))
    }

    async fn lookup_user(&self, name: &str) -> std::result::Result<String, CredentialError> {
        let url = format!("{}/v3/users", self.endpoint);
        let list: UserList = self
            .send(self.client.get(url).query(&[("name", name)]))
            .await?;
        single("user", name, list.users)
    }

    async fn lookup_project(&self, name: &str) -> std::result::Result<String, CredentialError> {
        let url = format!("{}/v3/projects", self.endpoint);
        let list: ProjectList = self
            .send(self.client.get(url).query(&[("name", name)]))
            .await?;
        single("project", name, list.projects)
    }

    fn credentials_url(&self, user_id: &str) -> String {
        format!("{}/v3/users/{user_id}/credentials/OS-EC2", self.endpoint)
    }
}

/// Picks the one entry whose name matches exactly
fn single(
    what: &'static str,
    name: &str,
    candidates: Vec<Named>,
) -> std::result::Result<String, CredentialError> {
    let mut matches: Vec<Named> = candidates.into_iter().filter(|c| c.name == name).collect();
    match matches.len() {
        0 => Err(CredentialError::Lookup {
            what,
            name: name.to_string(),
        }),
        1 => Ok(matches.remove(0).id),
        count => Err(CredentialError::AmbiguousLookup {
            what,
            name: name.to_string(),
            count,
        }),
    }
}

#[async_trait]
impl CredentialStore for KeystoneCredentialStore {
    async fn find(
        &self,
        user: &str,
        project: &str,
    ) -> std::result::Result<Option<Ec2Credential>, CredentialError> {
        let user_id = self.lookup_user(user).await?;
        let project_id = self.lookup_project(project).await?;

        let list: CredentialList = self
            .send(self.client.get(self.credentials_url(&user_id)))
            .await?;

        Ok(list
            .credentials
            .into_iter()
            .find(|c| c.tenant_id == project_id)
            .map(Ec2Credential::from))
    }

    async fn create(
        &self,
        user: &str,
        project: &str,
    ) -> std::result::Result<Ec2Credential, CredentialError> {
        let user_id = self.lookup_user(user).await?;
        let project_id = self.lookup_project(project).await?;

        let body = serde_json::json!({ "tenant_id": project_id });
        let created: CreatedCredential = self
            .send(self.client.post(self.credentials_url(&user_id)).json(&body))
            .await?;

        tracing::info!(
            user = %user,
            project = %project,
            access = %created.credential.access,
            "Created EC2 credential"
        );

        Ok(created.credential.into())
    }
}
