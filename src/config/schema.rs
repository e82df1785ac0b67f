//! Configuration schema types
//!
//! This module defines the structure of `tempest-conf.toml`, the tool's own
//! configuration. The declared [`Intent`] lives under `[intent]`; the other
//! sections describe how to reach the cloud and where to log.

use crate::config::SecretString;
use crate::domain::Intent;
use serde::{Deserialize, Serialize};
use url::Url;

/// Main tempest-conf configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergeConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Inventory and identity service endpoints
    pub inventory: InventoryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Declared intent for the run
    #[serde(default)]
    pub intent: Intent,
}

impl ConvergeConfig {
    /// Validates the configuration
    ///
    /// This only checks that the configuration is structurally usable. The
    /// intent's mutual-exclusion rules are enforced separately by
    /// [`crate::core::validate::validate`] so that they run as the first step
    /// of every convergence pass.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.inventory.validate(&self.intent)?;
        self.logging.validate()?;

        if self.intent.tempest_conf_path.as_os_str().is_empty() {
            return Err("intent.tempest_conf_path cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Endpoints and credentials for the services that are queried
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Image service endpoint (e.g. `http://controller:9292`)
    pub image_endpoint: String,

    /// Networking service endpoint (e.g. `http://controller:9696`)
    #[serde(default)]
    pub network_endpoint: Option<String>,

    /// Identity service endpoint (e.g. `http://controller:5000`)
    #[serde(default)]
    pub identity_endpoint: Option<String>,

    /// Pre-issued token sent as `X-Auth-Token`
    #[serde(default)]
    pub auth_token: Option<SecretString>,

    /// Upper bound for a single inventory request, in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification enabled
    ///
    /// Only disable this against test clouds with self-signed certificates.
    #[serde(default = "default_true")]
    pub tls_verify: bool,
}

impl InventoryConfig {
    fn validate(&self, intent: &Intent) -> Result<(), String> {
        validate_endpoint("inventory.image_endpoint", &self.image_endpoint)?;

        if let Some(ref endpoint) = self.network_endpoint {
            validate_endpoint("inventory.network_endpoint", endpoint)?;
        }
        if let Some(ref endpoint) = self.identity_endpoint {
            validate_endpoint("inventory.identity_endpoint", endpoint)?;
        }

        if intent.neutron_available
            && intent.configure_networks
            && intent.public_network_name.is_some()
            && self.network_endpoint.is_none()
        {
            return Err(
                "inventory.network_endpoint is required to resolve public_network_name"
                    .to_string(),
            );
        }

        if intent.ec2api_available && self.identity_endpoint.is_none() {
            return Err(
                "inventory.identity_endpoint is required when ec2api_available is set"
                    .to_string(),
            );
        }

        if self.timeout_seconds == 0 || self.timeout_seconds > 600 {
            return Err(format!(
                "inventory.timeout_seconds must be between 1 and 600, got {}",
                self.timeout_seconds
            ));
        }

        Ok(())
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            image_endpoint: "http://localhost:9292".to_string(),
            network_endpoint: None,
            identity_endpoint: None,
            auth_token: None,
            timeout_seconds: default_timeout_seconds(),
            tls_verify: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation policy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn validate_endpoint(field: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{field} cannot be empty"));
    }

    let url = Url::parse(value).map_err(|e| format!("{field} is not a valid URL: {e}"))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!("{field} must start with http:// or https://"));
    }

    Ok(())
}

// Default value functions

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_local_path() -> String {
    "/var/log/tempest-conf".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ConvergeConfig {
        ConvergeConfig {
            application: ApplicationConfig::default(),
            inventory: InventoryConfig::default(),
            logging: LoggingConfig::default(),
            intent: Intent::default(),
        }
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig {
            log_level: "info".to_string(),
        };
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_endpoint_must_be_http() {
        let mut config = config();
        config.inventory.image_endpoint = "ftp://controller:9292".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("http:// or https://"));

        config.inventory.image_endpoint = "not a url".to_string();
        assert!(config.validate().unwrap_err().contains("not a valid URL"));
    }

    #[test]
    fn test_network_endpoint_required_for_name_resolution() {
        let mut config = config();
        config.intent.neutron_available = true;
        config.intent.public_network_name = Some("public".to_string());
        assert!(config
            .validate()
            .unwrap_err()
            .contains("inventory.network_endpoint"));

        config.inventory.network_endpoint = Some("http://controller:9696".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_network_endpoint_not_required_for_literal_id() {
        let mut config = config();
        config.intent.neutron_available = true;
        config.intent.public_network_id = Some("4c423fc6".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_identity_endpoint_required_for_ec2() {
        let mut config = config();
        config.intent.ec2api_available = true;
        assert!(config
            .validate()
            .unwrap_err()
            .contains("inventory.identity_endpoint"));
    }

    #[test]
    fn test_timeout_bounds() {
        let mut config = config();
        config.inventory.timeout_seconds = 0;
        assert!(config.validate().is_err());
        config.inventory.timeout_seconds = 601;
        assert!(config.validate().is_err());
        config.inventory.timeout_seconds = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_logging_rotation_validation() {
        let mut config = config();
        config.logging.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }
}
