//! Validate-mappings command implementation
//!
//! Loads the bundled mapping document plus overrides exactly as `convert`
//! would, and reports how many identifiers each family maps.

use std::path::PathBuf;

use clap::Args;

use super::{load_or_default, EXIT_CONFIG_ERROR};
use crate::domain::SampleFamily;
use crate::mapping::MappingConfiguration;

/// Arguments for the validate-mappings command
#[derive(Args, Debug)]
pub struct ValidateMappingsArgs {
    /// Overrides file; replaces `mapping.override_path` from the configuration
    #[arg(long)]
    pub overrides: Option<PathBuf>,
}

impl ValidateMappingsArgs {
    /// Execute the validate-mappings command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating mappings");

        println!("🔍 Validating mapping configuration");
        println!();

        let mut config = match load_or_default(config_path) {
            Ok(config) => config,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };
        if let Some(path) = &self.overrides {
            config.mapping.override_path = Some(path.to_string_lossy().into_owned());
        }

        let mappings = match config.load_mappings() {
            Ok(mappings) => {
                println!("✅ Mappings loaded successfully");
                mappings
            }
            Err(e) => {
                println!("❌ Mapping configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        println!();
        print!("{}", render_summary(&mappings, config.mapping.override_path.as_deref()));
        Ok(0)
    }
}

/// Human-readable per-family summary
pub fn render_summary(mappings: &MappingConfiguration, overrides: Option<&str>) -> String {
    let summary = mappings.summary();
    let mut out = String::from("Mapping Summary:\n");
    out.push_str(&format!("  Overrides: {}\n", overrides.unwrap_or("none")));
    for family in SampleFamily::ALL {
        out.push_str(&format!(
            "  {:<22} {:>4} of {:>4}\n",
            family.document_key(),
            summary.count(family),
            family.identifiers().len()
        ));
    }
    out.push_str(&format!("  Total: {}\n", summary.total()));
    out.push_str(&format!("  Fingerprint: {}\n", mappings.fingerprint()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_summary() {
        let mappings = MappingConfiguration::bundled().unwrap();
        let text = render_summary(&mappings, None);
        assert!(text.contains("HKQuantitySample"));
        assert!(text.contains("Overrides: none"));
        assert!(text.contains(&mappings.fingerprint()));
    }
}
