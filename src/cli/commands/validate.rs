//! Validate config command implementation
//!
//! This module implements the `validate-config` command. It loads the
//! configuration, validates the declared intent and prints the keys a
//! convergence pass would own, without contacting any service.

use crate::config::load_config;
use crate::core::keys::{build_plan, describe, plan_keys};
use crate::core::validate::{validate, TargetSource};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Only print the validation result, not the planned keys
    #[arg(short, long)]
    pub quiet: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let validated = match validate(config.intent.clone()) {
            Ok(v) => {
                println!("✅ Intent is valid");
                v
            }
            Err(e) => {
                println!("❌ Intent validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Config File: {}", config.intent.tempest_conf_path.display());
        println!("  Image Service: {}", config.inventory.image_endpoint);
        if let Some(ref endpoint) = config.inventory.network_endpoint {
            println!("  Network Service: {endpoint}");
        }
        if let Some(ref endpoint) = config.inventory.identity_endpoint {
            println!("  Identity Service: {endpoint}");
        }
        println!("  Name Lookups: {}", validated.resolution_count());
        println!("  Owned Keys: {}", plan_keys(&validated).len());
        println!();

        if self.quiet {
            return Ok(0);
        }

        println!("Resolved Keys:");
        for target in validated.targets() {
            match target.source {
                TargetSource::Name(ref name) => {
                    println!("  {} <- {} named '{}'", target.key, target.kind, name);
                }
                TargetSource::Id(ref id) => println!("  {} = {}", target.key, id),
            }
        }
        if config.intent.ec2api_available {
            let wanted = &config.intent.ec2_credentials;
            println!(
                "  aws/* <- EC2 credential '{}' for {}@{}",
                wanted.name, wanted.user, wanted.project
            );
        }
        println!();

        println!("Static Keys:");
        for option in build_plan(&validated) {
            println!("  {}", describe(&option));
        }
        println!();

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_valid_intent_exits_zero() {
        let file = write_config(
            r#"
[inventory]
image_endpoint = "http://controller:9292"

[intent]
image_ref = "I1"
image_ref_alt = "I2"
"#,
        );
        let args = ValidateArgs { quiet: false };
        let code = args.execute(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_conflicting_intent_exits_two() {
        let file = write_config(
            r#"
[inventory]
image_endpoint = "http://controller:9292"

[intent]
image_name = "cirros"
image_ref = "I1"
image_ref_alt = "I2"
"#,
        );
        let args = ValidateArgs { quiet: true };
        let code = args.execute(file.path().to_str().unwrap()).await.unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_missing_file_exits_two() {
        let args = ValidateArgs { quiet: true };
        let code = args.execute("nonexistent.toml").await.unwrap();
        assert_eq!(code, 2);
    }
}
