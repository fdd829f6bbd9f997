//! Init command implementation
//!
//! Writes a commented sample `hkfhir.toml`.

use clap::Args;
use std::fs;
use std::path::Path;

use super::EXIT_CONFIG_ERROR;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "hkfhir.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing hkfhir configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
        }

        match fs::write(&self.output, Self::sample_config()) {
            Ok(()) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Check the mappings: hkfhir validate-mappings");
                println!("  3. Convert samples: hkfhir convert samples.json --output out/");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_CONFIG_ERROR)
            }
        }
    }

    /// Sample configuration with every key at its default
    pub fn sample_config() -> &'static str {
        r#"# hkfhir configuration
# Every key is optional. Any value can reference ${ENV_VAR} and be overridden
# with HKFHIR_<SECTION>_<KEY>.

[application]
# trace, debug, info, warn or error
log_level = "info"

[mapping]
# JSON file whose entries replace bundled mappings per identifier
# override_path = "./overrides.json"

[conversion]
# IANA zone used when a sample has no timezone (default: process-local zone)
# fallback_timezone = "Europe/Berlin"

# Parallel workers for batch conversion (1-64)
workers = 4

[extensions]
source_device = true
source_revision = true
absolute_time_range = true
metadata = true

[logging]
# JSON log files in addition to console output
local_enabled = false
local_path = "./logs"

# daily or hourly
local_rotation = "daily"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "hkfhir.toml".to_string(),
            force: false,
        };
        assert_eq!(args.output, "hkfhir.toml");
        assert!(!args.force);
    }

    #[test]
    fn test_sample_config_parses() {
        let config = parse_config(InitArgs::sample_config()).unwrap();
        assert_eq!(config.conversion.workers, 4);
        assert!(config.extensions.source_revision);
    }
}
