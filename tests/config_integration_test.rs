//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold `ENV_MUTEX` so they do not
//! interfere with each other.

use secrecy::ExposeSecret;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tempest_conf::config::load_config;
use tempest_conf::core::validate::validate;
use tempest_conf::domain::TempestError;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    std::env::remove_var("TEMPEST_CONF_APPLICATION_LOG_LEVEL");
    std::env::remove_var("TEMPEST_CONF_INVENTORY_AUTH_TOKEN");
    std::env::remove_var("TEMPEST_CONF_INVENTORY_TIMEOUT_SECONDS");
    std::env::remove_var("TEMPEST_CONF_INTENT_IMAGE_NAME");
    std::env::remove_var("TEST_OS_TOKEN");
    std::env::remove_var("TEST_ADMIN_PASSWORD");
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"

[inventory]
image_endpoint = "https://controller:9292"
network_endpoint = "https://controller:9696"
identity_endpoint = "https://controller:5000"
auth_token = "tok-plain"
timeout_seconds = 12
tls_verify = false

[logging]
local_enabled = false
local_path = "/tmp/tempest-conf"
local_rotation = "hourly"

[intent]
tempest_conf_path = "/etc/tempest/tempest.conf"
image_name = "cirros"
image_name_alt = "cirros-alt"
neutron_available = true
public_network_name = "public"
tempest_roles = ["Member", "creator"]
ec2api_available = true

[intent.ec2_credentials]
user = "ec2-user"
project = "ec2-project"

[intent.auth]
admin_username = "admin"
admin_password = "hunter2"

[intent.services]
sahara = true
swift = true
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");

    assert_eq!(config.inventory.image_endpoint, "https://controller:9292");
    assert_eq!(
        config.inventory.network_endpoint.as_deref(),
        Some("https://controller:9696")
    );
    assert_eq!(config.inventory.timeout_seconds, 12);
    assert!(!config.inventory.tls_verify);
    assert_eq!(
        config
            .inventory
            .auth_token
            .as_ref()
            .unwrap()
            .expose_secret()
            .as_str(),
        "tok-plain"
    );

    assert_eq!(config.logging.local_rotation, "hourly");

    let intent = &config.intent;
    assert_eq!(
        intent.tempest_conf_path,
        PathBuf::from("/etc/tempest/tempest.conf")
    );
    assert_eq!(intent.image_name_alt.as_deref(), Some("cirros-alt"));
    assert_eq!(intent.ec2_credentials.user, "ec2-user");
    assert_eq!(intent.ec2_credentials.name, "ec2_test_creds");
    assert!(intent.services.sahara);
    assert!(intent.services.nova);

    // Secrets stay out of Debug output
    assert!(!format!("{config:?}").contains("hunter2"));
    assert!(!format!("{config:?}").contains("tok-plain"));

    let validated = validate(config.intent.clone()).unwrap();
    assert_eq!(validated.resolution_count(), 3);
}

#[test]
fn test_load_minimal_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[inventory]
image_endpoint = "http://controller:9292"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.inventory.timeout_seconds, 30);
    assert!(config.inventory.tls_verify);
    assert!(config.inventory.auth_token.is_none());
    assert!(!config.logging.local_enabled);
    assert_eq!(
        config.intent.tempest_conf_path,
        PathBuf::from("/var/lib/tempest/etc/tempest.conf")
    );
    assert!(config.intent.configure_images);
    assert!(!config.intent.neutron_available);
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    std::env::set_var("TEST_OS_TOKEN", "tok-from-env");
    std::env::set_var("TEST_ADMIN_PASSWORD", "pw-from-env");

    let temp_file = write_config(
        r#"
# auth_token = "${TEST_UNSET_IN_COMMENT}"
[inventory]
image_endpoint = "http://controller:9292"
auth_token = "${TEST_OS_TOKEN}"

[intent.auth]
admin_password = "${TEST_ADMIN_PASSWORD}"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(
        config
            .inventory
            .auth_token
            .as_ref()
            .unwrap()
            .expose_secret()
            .as_str(),
        "tok-from-env"
    );
    assert_eq!(
        config
            .intent
            .auth
            .admin_password
            .as_ref()
            .unwrap()
            .expose_secret()
            .as_str(),
        "pw-from-env"
    );

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_is_reported() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[inventory]
image_endpoint = "http://controller:9292"
auth_token = "${TEST_OS_TOKEN}"
"#,
    );

    let err = load_config(temp_file.path()).unwrap_err();
    assert!(matches!(err, TempestError::Configuration(_)));
    assert!(err.to_string().contains("TEST_OS_TOKEN"));
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    std::env::set_var("TEMPEST_CONF_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("TEMPEST_CONF_INVENTORY_AUTH_TOKEN", "tok-override");
    std::env::set_var("TEMPEST_CONF_INVENTORY_TIMEOUT_SECONDS", "45");
    std::env::set_var("TEMPEST_CONF_INTENT_IMAGE_NAME", "fedora");

    let temp_file = write_config(
        r#"
[application]
log_level = "info"

[inventory]
image_endpoint = "http://controller:9292"
timeout_seconds = 10

[intent]
image_name = "cirros"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.inventory.timeout_seconds, 45);
    assert_eq!(config.intent.image_name.as_deref(), Some("fedora"));
    assert_eq!(
        config
            .inventory
            .auth_token
            .as_ref()
            .unwrap()
            .expose_secret()
            .as_str(),
        "tok-override"
    );

    cleanup_env_vars();
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let cases = [
        (
            r#"
[application]
log_level = "loud"

[inventory]
image_endpoint = "http://controller:9292"
"#,
            "Invalid log_level",
        ),
        (
            r#"
[inventory]
image_endpoint = "controller:9292"
"#,
            "inventory.image_endpoint",
        ),
        (
            r#"
[inventory]
image_endpoint = "http://controller:9292"

[intent]
ec2api_available = true
"#,
            "inventory.identity_endpoint",
        ),
        (
            r#"
[inventory]
image_endpoint = "http://controller:9292"
timeout_seconds = 0
"#,
            "timeout_seconds",
        ),
    ];

    for (contents, expected) in cases {
        let temp_file = write_config(contents);
        let err = load_config(temp_file.path()).unwrap_err();
        assert!(
            err.to_string().contains(expected),
            "expected '{expected}' in '{err}'"
        );
    }
}

#[test]
fn test_intent_conflicts_pass_loading_but_fail_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[inventory]
image_endpoint = "http://controller:9292"

[intent]
image_ref_alt = "I2"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");
    let err = validate(config.intent).unwrap_err();
    assert_eq!(
        err.to_string(),
        "A value for either image_name or image_ref must be provided."
    );
}
