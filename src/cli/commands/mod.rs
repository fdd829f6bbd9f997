//! CLI command implementations
//!
//! Commands return a process exit code: 0 on success, 1 when some samples
//! failed to convert, 2 for configuration errors.

pub mod convert;
pub mod init;
pub mod supported;
pub mod validate;

use std::path::Path;

use crate::config::{load_config, parse_config, HkFhirConfig, LoggingConfig};
use crate::domain::Result;

/// Exit code for a configuration or mapping error
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Loads the configuration file, or the defaults when it does not exist
///
/// Environment overrides apply in both cases.
pub(crate) fn load_or_default(config_path: &str) -> Result<HkFhirConfig> {
    if Path::new(config_path).exists() {
        load_config(config_path)
    } else {
        tracing::debug!(config_path, "Configuration file not found, using defaults");
        parse_config("")
    }
}

/// Log level and logging section to start the binary with
///
/// Falls back to console-only `info` logging when the configuration cannot be
/// loaded; the command reports the error itself.
pub fn load_or_default_logging(config_path: &str) -> (String, LoggingConfig) {
    match load_or_default(config_path) {
        Ok(config) => (config.application.log_level, config.logging),
        Err(_) => ("info".to_string(), LoggingConfig::console_only()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = load_or_default("definitely-missing-hkfhir.toml").unwrap();
        assert_eq!(config.conversion.workers, HkFhirConfig::default().conversion.workers);
    }

    #[test]
    fn test_logging_fallback_on_broken_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[conversion]\nworkers = 0\n").unwrap();
        let (level, logging) = load_or_default_logging(&path.to_string_lossy());
        assert_eq!(level, "info");
        assert!(!logging.local_enabled);
    }
}
