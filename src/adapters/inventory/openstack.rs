//! OpenStack inventory implementation
//!
//! Images are listed through the image service (`GET /v2/images?name=`),
//! networks through the networking service (`GET /v2.0/networks?name=`).
//! Both requests carry the configured token in `X-Auth-Token`.

use super::traits::{Inventory, InventoryResource};
use crate::adapters::client::{build_http_client, normalize_base, AUTH_TOKEN_HEADER};
use crate::config::{InventoryConfig, SecretString};
use crate::domain::errors::ResolveError;
use crate::domain::ids::ResourceKind;
use crate::domain::Result;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ImageList {
    images: Vec<InventoryResource>,
}

#[derive(Debug, Deserialize)]
struct NetworkList {
    networks: Vec<InventoryResource>,
}

/// Inventory backed by the OpenStack image and networking APIs
pub struct OpenStackInventory {
    client: Client,
    image_endpoint: String,
    network_endpoint: Option<String>,
    auth_token: Option<SecretString>,
}

impl OpenStackInventory {
    /// Create a new inventory client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &InventoryConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config)?,
            image_endpoint: normalize_base(&config.image_endpoint),
            network_endpoint: config.network_endpoint.as_deref().map(normalize_base),
            auth_token: config.auth_token.clone(),
        })
    }

    fn url_for(&self, kind: ResourceKind) -> std::result::Result<String, ResolveError> {
        match kind {
            ResourceKind::Image => Ok(format!("{}/v2/images", self.image_endpoint)),
            ResourceKind::Network => self
                .network_endpoint
                .as_ref()
                .map(|base| format!("{base}/v2.0/networks"))
                .ok_or_else(|| ResolveError::Transport {
                    kind,
                    message: "no network endpoint configured".to_string(),
                }),
        }
    }

    async fn fetch(
        &self,
        kind: ResourceKind,
        name: &str,
    ) -> std::result::Result<reqwest::Response, ResolveError> {
        let url = self.url_for(kind)?;
        let transport = |message: String| ResolveError::Transport { kind, message };

        let mut request = self.client.get(&url).query(&[("name", name)]);
        if let Some(ref token) = self.auth_token {
            request = request.header(AUTH_TOKEN_HEADER, token.expose_secret().as_str());
        }

        tracing::debug!(kind = %kind, name = %name, url = %url, "Querying inventory");

        let response = request.send().await.map_err(|e| transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(transport(format!(
                "request failed with status {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl Inventory for OpenStackInventory {
    async fn list_resources(
        &self,
        kind: ResourceKind,
        name: &str,
    ) -> std::result::Result<Vec<InventoryResource>, ResolveError> {
        let response = self.fetch(kind, name).await?;
        let malformed = |e: reqwest::Error| ResolveError::Transport {
            kind,
            message: format!("malformed response: {e}"),
        };

        let resources = match kind {
            ResourceKind::Image => response.json::<ImageList>().await.map_err(malformed)?.images,
            ResourceKind::Network => {
                response
                    .json::<NetworkList>()
                    .await
                    .map_err(malformed)?
                    .networks
            }
        };

        tracing::debug!(kind = %kind, name = %name, count = resources.len(), "Inventory answered");

        Ok(resources)
    }
}
