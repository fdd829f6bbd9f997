//! Configuration schema types
//!
//! Every section is optional in the TOML file; an empty file yields the
//! defaults below.

use serde::{Deserialize, Serialize};

use crate::core::extensions::StandardExtensions;
use crate::core::observation::ConversionOptions;
use crate::domain::result::Result;
use crate::mapping::MappingConfiguration;

/// Largest accepted `conversion.workers`
pub const MAX_WORKERS: usize = 64;

/// Main hkfhir configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HkFhirConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Where mapping overrides come from
    #[serde(default)]
    pub mapping: MappingSourceConfig,

    /// Conversion settings
    #[serde(default)]
    pub conversion: ConversionConfig,

    /// Which provenance extensions are attached
    #[serde(default)]
    pub extensions: ExtensionsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HkFhirConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.application.validate()?;
        self.mapping.validate()?;
        self.conversion.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Bundled mappings with the configured overrides applied
    ///
    /// # Errors
    ///
    /// Returns an error if the override file cannot be read or is not a
    /// valid mapping document.
    pub fn load_mappings(&self) -> Result<MappingConfiguration> {
        let bundled = MappingConfiguration::bundled()?;
        match &self.mapping.override_path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    crate::domain::HkFhirError::Io(format!(
                        "Failed to read mapping overrides {path}: {e}"
                    ))
                })?;
                Ok(bundled.with_overrides_json(&json)?)
            }
            None => Ok(bundled),
        }
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Mapping document sources
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingSourceConfig {
    /// JSON file whose entries replace bundled entries per identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_path: Option<String>,
}

impl MappingSourceConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        if let Some(path) = &self.override_path {
            if path.trim().is_empty() {
                return Err("mapping.override_path cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

/// Conversion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// IANA zone used when a sample carries no timezone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_timezone: Option<String>,

    /// Parallel workers for batch conversion
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl ConversionConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(format!(
                "conversion.workers must be between 1 and {MAX_WORKERS}, got {}",
                self.workers
            ));
        }
        self.options()?;
        Ok(())
    }

    /// Conversion options derived from this section
    ///
    /// # Errors
    ///
    /// Returns an error if `fallback_timezone` is not a known IANA zone
    pub fn options(&self) -> std::result::Result<ConversionOptions, String> {
        match &self.fallback_timezone {
            Some(name) => ConversionOptions::with_fallback_timezone(name)
                .map_err(|e| format!("conversion.fallback_timezone: {e}")),
            None => Ok(ConversionOptions::default()),
        }
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            fallback_timezone: None,
            workers: default_workers(),
        }
    }
}

/// Standard extension selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionsConfig {
    #[serde(default = "default_true")]
    pub source_device: bool,
    #[serde(default = "default_true")]
    pub source_revision: bool,
    #[serde(default = "default_true")]
    pub absolute_time_range: bool,
    #[serde(default = "default_true")]
    pub metadata: bool,
}

impl ExtensionsConfig {
    /// The builders to register
    pub fn selection(&self) -> StandardExtensions {
        StandardExtensions {
            source_device: self.source_device,
            source_revision: self.source_revision,
            absolute_time_range: self.absolute_time_range,
            metadata: self.metadata,
        }
    }
}

impl Default for ExtensionsConfig {
    fn default() -> Self {
        Self {
            source_device: true,
            source_revision: true,
            absolute_time_range: true,
            metadata: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }

    /// Console-only logging
    pub fn console_only() -> Self {
        Self {
            local_enabled: false,
            ..Self::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_workers() -> usize {
    4
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
