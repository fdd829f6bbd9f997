//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for hkfhir using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// hkfhir - HealthKit sample to FHIR R4 converter
#[derive(Parser, Debug)]
#[command(name = "hkfhir")]
#[command(version, about, long_about = None)]
#[command(author = "HKFHIR Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "hkfhir.toml", env = "HKFHIR_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "HKFHIR_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert sample JSON files to FHIR
    Convert(commands::convert::ConvertArgs),

    /// Load the bundled mappings plus overrides and report on them
    ValidateMappings(commands::validate::ValidateMappingsArgs),

    /// List supported type identifiers
    Supported(commands::supported::SupportedArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
