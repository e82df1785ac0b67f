//! Converge command implementation
//!
//! This module implements the `converge` command, which runs one
//! convergence pass over `tempest.conf`.

use crate::config::load_config;
use crate::core::converge::{ConvergeCoordinator, KeyOutcome, RunSummary};
use crate::domain::TempestError;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the converge command
#[derive(Args, Debug)]
pub struct ConvergeArgs {
    /// Print the run summary as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl ConvergeArgs {
    /// Execute the converge command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting converge command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let coordinator = match ConvergeCoordinator::from_config(&config) {
            Ok(c) => c.with_shutdown_signal(shutdown_signal),
            Err(e) => {
                tracing::error!(error = %e, "Failed to create convergence coordinator");
                eprintln!("❌ Failed to initialize convergence: {e}");
                return Ok(4); // Initialization error exit code
            }
        };

        if !self.json {
            println!(
                "🚀 Converging {}...",
                config.intent.tempest_conf_path.display()
            );
            println!();
        }

        let summary = match coordinator.run(config.intent.clone()).await {
            Ok(s) => s,
            Err(TempestError::Validation(e)) => {
                tracing::error!(error = %e, "Intent validation failed");
                eprintln!("❌ Invalid intent: {e}");
                return Ok(2);
            }
            Err(e) => {
                tracing::error!(error = %e, "Convergence failed");
                eprintln!("❌ Convergence failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        summary.log_summary();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print_summary(&summary);
        }

        Ok(exit_code(&summary))
    }
}

fn print_summary(summary: &RunSummary) {
    println!("📊 Convergence Summary:");
    println!("  Keys: {}", summary.outcomes.len());
    println!("  Changed: {}", summary.changed_count());
    println!("  Unchanged: {}", summary.unchanged_count());
    println!("  Failed: {}", summary.failed_count());
    if let Some(credential) = summary.credential {
        println!("  EC2 Credential: {credential:?}");
    }
    println!("  Duration: {:.2}s", summary.duration_ms as f64 / 1000.0);
    println!();

    if summary.failed_count() > 0 {
        println!("⚠️  Keys that failed to converge:");
        for (key, outcome) in summary.failures() {
            if let KeyOutcome::Failed { kind, message } = outcome {
                println!("  - {key} ({kind:?}): {message}");
            }
        }
        println!();
    }

    if summary.interrupted {
        println!("⚠️  Convergence interrupted. Run the same command to finish.");
    } else if summary.is_successful() {
        println!("✅ tempest.conf converged");
    } else {
        println!("⚠️  Convergence completed with failures");
    }
}

/// Map a finished summary to the process exit code
fn exit_code(summary: &RunSummary) -> i32 {
    if summary.interrupted {
        130 // SIGINT exit code (standard Unix convention)
    } else if summary.is_successful() {
        0
    } else {
        1 // Partial success
    }
}
