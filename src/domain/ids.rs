//! Domain identifier types with validation
//!
//! This module provides newtype wrappers for the addressable pieces of a
//! convergence run: the [`ConfigKey`] naming a slot in `tempest.conf`, the
//! [`ResourceKind`] being resolved and the [`ResolvedId`] it resolves to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Address of a single option in the config file
///
/// Rendered and parsed as `section/option`, e.g. `compute/image_ref`.
/// Keys order by section, then option, which keeps summaries stable.
///
/// # Examples
///
/// ```
/// use tempest_conf::domain::ids::ConfigKey;
/// use std::str::FromStr;
///
/// let key = ConfigKey::from_str("compute/image_ref").unwrap();
/// assert_eq!(key.section(), "compute");
/// assert_eq!(key.option(), "image_ref");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConfigKey {
    section: String,
    option: String,
}

impl ConfigKey {
    /// Creates a new ConfigKey
    ///
    /// # Returns
    ///
    /// Returns `Err` if either part is empty or contains characters that
    /// cannot round-trip through the file format
    pub fn new(section: impl Into<String>, option: impl Into<String>) -> Result<Self, String> {
        let section = section.into();
        let option = option.into();

        if section.trim().is_empty() {
            return Err("Config section cannot be empty".to_string());
        }
        if option.trim().is_empty() {
            return Err("Config option cannot be empty".to_string());
        }
        if section.contains(['[', ']', '\n']) {
            return Err(format!("Invalid config section: {section}"));
        }
        if option.contains(['=', '\n']) || option.starts_with(['#', ';', '[']) {
            return Err(format!("Invalid config option: {option}"));
        }

        Ok(Self {
            section: section.trim().to_string(),
            option: option.trim().to_string(),
        })
    }

    /// Builds a key from compile-time constants known to be well formed
    pub(crate) fn from_static(section: &'static str, option: &'static str) -> Self {
        Self {
            section: section.to_string(),
            option: option.to_string(),
        }
    }

    /// Section name, without brackets
    pub fn section(&self) -> &str {
        &self.section
    }

    /// Option name within the section
    pub fn option(&self) -> &str {
        &self.option
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.section, self.option)
    }
}

impl FromStr for ConfigKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (section, option) = s
            .split_once('/')
            .ok_or_else(|| format!("Invalid config key '{s}'. Expected format: section/option"))?;
        Self::new(section, option)
    }
}

impl TryFrom<String> for ConfigKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ConfigKey> for String {
    fn from(key: ConfigKey) -> Self {
        key.to_string()
    }
}

/// Kind of inventory resource a name is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A bootable image in the image service
    Image,
    /// A network in the networking service
    Network,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Image => write!(f, "image"),
            ResourceKind::Network => write!(f, "network"),
        }
    }
}

/// Stable identifier returned by the inventory for a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedId(String);

impl ResolvedId {
    /// Creates a new ResolvedId
    ///
    /// # Returns
    ///
    /// Returns `Err` if the identifier is blank
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Resource ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ResolvedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ResolvedId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_key_parse_and_display() {
        let key = ConfigKey::from_str("network/public_network_id").unwrap();
        assert_eq!(key.section(), "network");
        assert_eq!(key.option(), "public_network_id");
        assert_eq!(key.to_string(), "network/public_network_id");
    }

    #[test]
    fn test_config_key_keeps_dashes_in_section() {
        let key = ConfigKey::from_str("data-processing-feature-enabled/plugins").unwrap();
        assert_eq!(key.section(), "data-processing-feature-enabled");
    }

    #[test]
    fn test_config_key_rejects_malformed() {
        assert!(ConfigKey::from_str("no_separator").is_err());
        assert!(ConfigKey::from_str("/option").is_err());
        assert!(ConfigKey::from_str("section/").is_err());
        assert!(ConfigKey::new("sec]tion", "opt").is_err());
        assert!(ConfigKey::new("section", "a=b").is_err());
        assert!(ConfigKey::new("section", "#comment").is_err());
    }

    #[test]
    fn test_config_key_ordering() {
        let mut keys = vec![
            ConfigKey::from_str("network/public_network_id").unwrap(),
            ConfigKey::from_str("compute/image_ref_alt").unwrap(),
            ConfigKey::from_str("compute/image_ref").unwrap(),
        ];
        keys.sort();
        let rendered: Vec<String> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "compute/image_ref",
                "compute/image_ref_alt",
                "network/public_network_id"
            ]
        );
    }

    #[test]
    fn test_config_key_serde_as_string() {
        let key = ConfigKey::from_str("auth/tempest_roles").unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"auth/tempest_roles\"");
        let back: ConfigKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn test_resolved_id() {
        let id = ResolvedId::new("4c423fc6-87f7-4e6d-9d3c-abc13058ae5b").unwrap();
        assert_eq!(id.as_str(), "4c423fc6-87f7-4e6d-9d3c-abc13058ae5b");
        assert!(ResolvedId::new("  ").is_err());
    }

    #[test]
    fn test_resource_kind_display() {
        assert_eq!(ResourceKind::Image.to_string(), "image");
        assert_eq!(ResourceKind::Network.to_string(), "network");
    }
}
