//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "tempest-conf.toml")]
    pub output: String,

    /// Include every intent group with example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing tempest-conf configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your cloud's endpoints", self.output);
                println!("  2. Set either image_name or image_ref (and the _alt pair)");
                println!("  3. Create a .env file with OS_TOKEN set to a valid token");
                println!("  4. Validate configuration: tempest-conf validate-config");
                println!("  5. Converge: tempest-conf converge");
                println!();
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, output = %self.output, "Failed to write configuration file");
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(4)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# tempest-conf Configuration File
# Converges tempest.conf to a declared intent

[application]
log_level = "info"

[inventory]
image_endpoint = "http://controller:9292"
network_endpoint = "http://controller:9696"
auth_token = "${OS_TOKEN}"
timeout_seconds = 30
tls_verify = true

[logging]
local_enabled = false
local_path = "/var/log/tempest-conf"
local_rotation = "daily"

[intent]
tempest_conf_path = "/var/lib/tempest/etc/tempest.conf"
image_name = "cirros"
image_name_alt = "cirros"
neutron_available = true
public_network_name = "public"
"#
        .to_string()
    }

    /// Generate configuration with examples
    fn generate_config_with_examples() -> String {
        r#"# tempest-conf Configuration File
# Converges tempest.conf to a declared intent
#
# Environment variables:
#   ${VAR} references are substituted before parsing (comments are skipped)
#   TEMPEST_CONF_<SECTION>_<KEY> overrides a loaded value,
#   e.g. TEMPEST_CONF_INVENTORY_AUTH_TOKEN

[application]
# trace | debug | info | warn | error
log_level = "info"

[inventory]
# Image service, used to resolve image_name and image_name_alt
image_endpoint = "http://controller:9292"
# Networking service, required to resolve public_network_name
network_endpoint = "http://controller:9696"
# Identity service, required when ec2api_available = true
identity_endpoint = "http://controller:5000"
# Sent as X-Auth-Token on every request
auth_token = "${OS_TOKEN}"
# Upper bound for one lookup (1-600)
timeout_seconds = 30
# Only disable against test clouds with self-signed certificates
tls_verify = true

[logging]
# JSON log file in addition to the console
local_enabled = false
local_path = "/var/log/tempest-conf"
# daily | hourly | never
local_rotation = "daily"

[intent]
tempest_conf_path = "/var/lib/tempest/etc/tempest.conf"
tempest_workspace = "/var/lib/tempest"

# Images: set the name to look it up, or the ref to use an id directly.
# Setting both is an error.
configure_images = true
image_name = "cirros"
# image_ref = "fa3a8b0c-3d6b-4f4e-8d1b-6a0f6c9e0b11"
image_name_alt = "cirros"
# image_ref_alt = "fa3a8b0c-3d6b-4f4e-8d1b-6a0f6c9e0b11"

# Public network: same name or id rule as the images
configure_networks = true
neutron_available = true
public_network_name = "public"
# public_network_id = "4c423fc6-2d5e-4a3c-9d2b-8f0e6a1b7c55"
public_router_id = ""

tempest_roles = ["Member", "creator"]
# sahara_plugins = ["vanilla", "spark"]

# Provision an EC2 credential and write it to [aws]
ec2api_available = false

# whitebox_db_uri = "${WHITEBOX_DB_URI}"
# cli_dir = "/usr/bin"
volume_backup = false
image_api_v1 = true
image_api_v2 = true
run_service_broker_tests = false

[intent.ec2_credentials]
name = "ec2_test_creds"
user = "ec2api-tester"
project = "openstack"

[intent.auth]
admin_domain_name = "Default"
admin_password = "${OS_ADMIN_PASSWORD}"
admin_project_name = "admin"
admin_username = "admin"
use_dynamic_credentials = true

[intent.identity]
auth_version = "v3"
uri_v3 = "http://controller:5000/v3"
api_v2 = false
api_v3 = true

[intent.compute]
flavor_ref = "42"
flavor_ref_alt = "84"
resize_available = false
attach_encrypted_volume = false

[intent.validation]
image_ssh_user = "cirros"
run_validation = false

[intent.network]
nameservers = ["8.8.8.8"]

[intent.dashboard]
dashboard_url = "http://controller/dashboard/"
login_url = "http://controller/dashboard/auth/login/"

[intent.services]
cinder = true
glance = true
horizon = true
nova = true
heat = false
swift = false
sahara = false
magnum = false

[intent.logging]
debug = false
use_stderr = true
use_syslog = false

[intent.scenario]
img_file = "cirros-0.3.5-x86_64-disk.img"
"#
        .to_string()
    }
}
