//! Application configuration for hkfhir.
//!
//! This module covers the runtime settings of the `hkfhir` binary: log level,
//! mapping override file, conversion options, extension selection and
//! logging. The mapping document itself lives in [`crate::mapping`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use hkfhir::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("hkfhir.toml")?;
//! let mappings = config.load_mappings()?;
//! println!("{} mapped identifiers", mappings.summary().total());
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [mapping]
//! override_path = "${HKFHIR_HOME}/overrides.json"
//!
//! [conversion]
//! fallback_timezone = "Europe/Berlin"
//! workers = 4
//!
//! [extensions]
//! metadata = false
//!
//! [logging]
//! local_enabled = true
//! local_path = "./logs"
//! local_rotation = "daily"
//! ```
//!
//! `${VAR_NAME}` placeholders are substituted from the environment, and any
//! key can be overridden with `HKFHIR_<SECTION>_<KEY>`.

pub mod loader;
pub mod schema;

pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, ConversionConfig, ExtensionsConfig, HkFhirConfig, LoggingConfig,
    MappingSourceConfig,
};
