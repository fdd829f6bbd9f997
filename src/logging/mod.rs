//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with configurable log levels
//! - JSON-formatted local file logging with rotation
//!
//! Conversion itself only emits `tracing` events; installing a subscriber is
//! the binary's job.
//!
//! # Example
//!
//! ```no_run
//! use hkfhir::logging::init_logging;
//! use hkfhir::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a sample conversion
///
/// # Example
///
/// ```no_run
/// use hkfhir::log_conversion_start;
/// use hkfhir::domain::SampleId;
///
/// let id = SampleId::generate();
/// log_conversion_start!("HKQuantityTypeIdentifierHeartRate", &id);
/// ```
#[macro_export]
macro_rules! log_conversion_start {
    ($type_identifier:expr, $sample_id:expr) => {
        tracing::debug!(
            type_identifier = %$type_identifier,
            sample_id = %$sample_id,
            "Converting sample"
        );
    };
}

/// Log the completion of a batch of conversions
///
/// # Example
///
/// ```no_run
/// use hkfhir::log_conversion_complete;
/// use std::time::Duration;
///
/// log_conversion_complete!(42, Duration::from_millis(180));
/// ```
#[macro_export]
macro_rules! log_conversion_complete {
    ($count:expr, $duration:expr) => {
        tracing::info!(
            count = $count,
            duration_ms = $duration.as_millis(),
            "Conversion completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use hkfhir::log_error_with_context;
/// use hkfhir::domain::HkFhirError;
///
/// let error = HkFhirError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = %$context,
            "Error occurred"
        );
    };
}

/// Log a metadata entry that could not be represented and was dropped
///
/// # Example
///
/// ```no_run
/// use hkfhir::log_metadata_skipped;
///
/// log_metadata_skipped!("HKMetadataKeyExternalUUID", "unsupported value shape");
/// ```
#[macro_export]
macro_rules! log_metadata_skipped {
    ($key:expr, $reason:expr) => {
        tracing::warn!(
            metadata_key = %$key,
            reason = %$reason,
            "Skipping metadata entry"
        );
    };
}
