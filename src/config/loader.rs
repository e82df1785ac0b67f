//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ConvergeConfig;
use super::secret::secret_string;
use crate::domain::errors::TempestError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ConvergeConfig
/// 4. Applies environment variable overrides (TEMPEST_CONF_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use tempest_conf::config::loader::load_config;
///
/// let config = load_config("tempest-conf.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ConvergeConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(TempestError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        TempestError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ConvergeConfig = toml::from_str(&contents)
        .map_err(|e| TempestError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        TempestError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied verbatim.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| TempestError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(TempestError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the TEMPEST_CONF_* prefix
///
/// Environment variables follow the pattern TEMPEST_CONF_<SECTION>_<KEY>,
/// for example TEMPEST_CONF_INVENTORY_AUTH_TOKEN.
fn apply_env_overrides(config: &mut ConvergeConfig) {
    if let Ok(val) = std::env::var("TEMPEST_CONF_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Inventory overrides
    if let Ok(val) = std::env::var("TEMPEST_CONF_INVENTORY_IMAGE_ENDPOINT") {
        config.inventory.image_endpoint = val;
    }
    if let Ok(val) = std::env::var("TEMPEST_CONF_INVENTORY_NETWORK_ENDPOINT") {
        config.inventory.network_endpoint = Some(val);
    }
    if let Ok(val) = std::env::var("TEMPEST_CONF_INVENTORY_IDENTITY_ENDPOINT") {
        config.inventory.identity_endpoint = Some(val);
    }
    if let Ok(val) = std::env::var("TEMPEST_CONF_INVENTORY_AUTH_TOKEN") {
        config.inventory.auth_token = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("TEMPEST_CONF_INVENTORY_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.inventory.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("TEMPEST_CONF_INVENTORY_TLS_VERIFY") {
        config.inventory.tls_verify = val.parse().unwrap_or(true);
    }

    // Intent overrides
    if let Ok(val) = std::env::var("TEMPEST_CONF_INTENT_TEMPEST_CONF_PATH") {
        config.intent.tempest_conf_path = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("TEMPEST_CONF_INTENT_IMAGE_NAME") {
        config.intent.image_name = Some(val);
    }
    if let Ok(val) = std::env::var("TEMPEST_CONF_INTENT_IMAGE_NAME_ALT") {
        config.intent.image_name_alt = Some(val);
    }
    if let Ok(val) = std::env::var("TEMPEST_CONF_INTENT_PUBLIC_NETWORK_NAME") {
        config.intent.public_network_name = Some(val);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("TEMPEST_CONF_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("TEMPEST_CONF_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("TEMPEST_CONF_TEST_TOKEN", "tok-abc");
        let input = "auth_token = \"${TEMPEST_CONF_TEST_TOKEN}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "auth_token = \"tok-abc\"\n");
        std::env::remove_var("TEMPEST_CONF_TEST_TOKEN");
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("TEMPEST_CONF_TEST_UNSET_IN_COMMENT");
        let input = "# token = \"${TEMPEST_CONF_TEST_UNSET_IN_COMMENT}\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${TEMPEST_CONF_TEST_UNSET_IN_COMMENT}"));
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("TEMPEST_CONF_TEST_MISSING");
        let input = "auth_token = \"${TEMPEST_CONF_TEST_MISSING}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("TEMPEST_CONF_TEST_MISSING"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[inventory]
image_endpoint = "http://controller:9292"
network_endpoint = "http://controller:9696"
timeout_seconds = 15

[intent]
tempest_conf_path = "/tmp/tempest.conf"
image_name = "cirros"
image_name_alt = "cirros-alt"
neutron_available = true
public_network_name = "public"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.inventory.timeout_seconds, 15);
        assert_eq!(config.intent.image_name.as_deref(), Some("cirros"));
        assert_eq!(config.intent.public_network_name.as_deref(), Some("public"));
    }
}
