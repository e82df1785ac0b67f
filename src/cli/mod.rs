//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for tempest-conf using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// tempest-conf - Tempest configuration convergence tool
#[derive(Parser, Debug)]
#[command(name = "tempest-conf")]
#[command(version, about, long_about = None)]
#[command(author = "tempest-conf Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "tempest-conf.toml",
        env = "TEMPEST_CONF_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TEMPEST_CONF_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Converge tempest.conf to the declared intent
    Converge(commands::converge::ConvergeArgs),

    /// Validate configuration file and show the planned keys
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
