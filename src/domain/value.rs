//! Configuration values
//!
//! A [`ConfigValue`] is what gets written into one slot of `tempest.conf`.
//! Every variant knows how to render itself for the file and how to render
//! itself for humans; the two only differ for secrets.

use crate::config::secret::{secret_string, SecretString};
use secrecy::ExposeSecret;
use std::fmt;

/// Literal written for options that defer to the consuming tool's own default
pub const SERVICE_DEFAULT: &str = "<SERVICE DEFAULT>";

/// Marker shown in place of secret values in logs, errors and diffs
pub const REDACTED: &str = "[REDACTED]";

/// A value destined for the config file
#[derive(Debug, Clone)]
pub enum ConfigValue {
    /// Plain string value
    Scalar(String),

    /// Boolean rendered as `true` / `false`
    Bool(bool),

    /// Ordered list rendered comma-joined with no surrounding whitespace
    List(Vec<String>),

    /// Explicit deferral to the compiled-in default
    ServiceDefault,

    /// Value persisted in clear but never displayed
    Secret(SecretString),
}

impl ConfigValue {
    /// Creates a scalar value
    pub fn scalar(value: impl Into<String>) -> Self {
        ConfigValue::Scalar(value.into())
    }

    /// Creates a secret value
    pub fn secret(value: impl Into<String>) -> Self {
        ConfigValue::Secret(secret_string(value.into()))
    }

    /// Creates a list value, keeping declared order and dropping repeats
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen: Vec<String> = Vec::new();
        for item in items {
            let item = item.into();
            if !seen.contains(&item) {
                seen.push(item);
            }
        }
        ConfigValue::List(seen)
    }

    /// Interprets a raw string read back from the file
    ///
    /// The file format is untyped, so anything other than the service
    /// default marker comes back as a scalar.
    pub fn from_raw(raw: &str) -> Self {
        if raw == SERVICE_DEFAULT {
            ConfigValue::ServiceDefault
        } else {
            ConfigValue::Scalar(raw.to_string())
        }
    }

    /// Whether this value must be kept out of logs and errors
    pub fn is_secret(&self) -> bool {
        matches!(self, ConfigValue::Secret(_))
    }

    /// The exact text persisted in the config file
    pub fn render(&self) -> String {
        match self {
            ConfigValue::Scalar(s) => s.clone(),
            ConfigValue::Bool(b) => b.to_string(),
            ConfigValue::List(items) => items.join(","),
            ConfigValue::ServiceDefault => SERVICE_DEFAULT.to_string(),
            ConfigValue::Secret(s) => s.expose_secret().to_string(),
        }
    }

    /// Text safe to show to an operator
    pub fn redacted(&self) -> String {
        if self.is_secret() {
            REDACTED.to_string()
        } else {
            self.render()
        }
    }
}

impl PartialEq for ConfigValue {
    /// Two values are equal when they persist to the same text
    fn eq(&self, other: &Self) -> bool {
        self.render() == other.render()
    }
}

impl Eq for ConfigValue {}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Scalar(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::Scalar(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_item_list() {
        assert_eq!(ConfigValue::list(["vanilla"]).render(), "vanilla");
    }

    #[test]
    fn test_list_preserves_declared_order() {
        assert_eq!(
            ConfigValue::list(["Member", "creator"]).render(),
            "Member,creator"
        );
        assert_eq!(
            ConfigValue::list(["creator", "Member"]).render(),
            "creator,Member"
        );
    }

    #[test]
    fn test_list_drops_repeats() {
        assert_eq!(
            ConfigValue::list(["Member", "creator", "Member"]).render(),
            "Member,creator"
        );
    }

    #[test]
    fn test_service_default_is_literal_marker() {
        assert_eq!(ConfigValue::ServiceDefault.render(), "<SERVICE DEFAULT>");
        assert_eq!(
            ConfigValue::from_raw("<SERVICE DEFAULT>"),
            ConfigValue::ServiceDefault
        );
    }

    #[test]
    fn test_bool_rendering() {
        assert_eq!(ConfigValue::from(true).render(), "true");
        assert_eq!(ConfigValue::from(false).render(), "false");
    }

    #[test]
    fn test_secret_redaction() {
        let value = ConfigValue::secret("hunter2");
        assert!(value.is_secret());
        assert_eq!(value.render(), "hunter2");
        assert_eq!(value.redacted(), REDACTED);
        assert_eq!(value.to_string(), REDACTED);
        assert!(!format!("{value:?}").contains("hunter2"));
    }

    #[test]
    fn test_equality_by_rendered_text() {
        assert_eq!(ConfigValue::secret("abc"), ConfigValue::scalar("abc"));
        assert_eq!(ConfigValue::from(true), ConfigValue::scalar("true"));
        assert_ne!(ConfigValue::ServiceDefault, ConfigValue::scalar(""));
    }
}
