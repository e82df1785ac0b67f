//! Shared HTTP client construction

use crate::config::InventoryConfig;
use crate::domain::{Result, TempestError};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Header carrying a pre-issued OpenStack token
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Build the HTTP client used for every OpenStack API call
///
/// # Errors
///
/// Returns a configuration error if the TLS backend cannot be initialized.
pub fn build_http_client(config: &InventoryConfig) -> Result<Client> {
    let mut builder = ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(
            CONNECT_TIMEOUT_SECS.min(config.timeout_seconds),
        ))
        .user_agent(concat!("tempest-conf/", env!("CARGO_PKG_VERSION")));

    if !config.tls_verify {
        tracing::warn!("TLS certificate verification disabled for inventory requests");
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder
        .build()
        .map_err(|e| TempestError::Configuration(format!("Failed to build HTTP client: {e}")))
}

/// Trim trailing slashes so paths can be appended with `/`
pub(crate) fn normalize_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let config = InventoryConfig::default();
        assert!(build_http_client(&config).is_ok());
    }

    #[test]
    fn test_build_http_client_without_tls_verify() {
        let config = InventoryConfig {
            tls_verify: false,
            ..InventoryConfig::default()
        };
        assert!(build_http_client(&config).is_ok());
    }

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base("http://c:9292/"), "http://c:9292");
        assert_eq!(normalize_base("http://c:9292"), "http://c:9292");
    }
}
