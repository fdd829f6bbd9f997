// HKFHIR - HealthKit sample to FHIR R4 mapping engine
// Copyright (c) 2025 HKFHIR Contributors
// Licensed under the MIT License

use clap::Parser;
use hkfhir::cli::commands::load_or_default_logging;
use hkfhir::cli::{Cli, Commands};
use hkfhir::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (config_level, logging_config) = load_or_default_logging(&cli.config);
    let log_level = cli.log_level.as_deref().unwrap_or(&config_level);
    let guard = match init_logging(log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(2);
        }
    };

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        "hkfhir - HealthKit sample to FHIR R4 mapping engine"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            1
        }
    };

    drop(guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Convert(args) => args.execute(&cli.config).await,
        Commands::ValidateMappings(args) => args.execute(&cli.config).await,
        Commands::Supported(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
