//! Domain error types
//!
//! This module defines the error hierarchy for hkfhir. Mapping errors are raised
//! while a mapping document is loaded and are always fatal; conversion errors are
//! raised per sample and are returned to the caller.

use thiserror::Error;

/// Main hkfhir error type
///
/// This is the primary error type used throughout the library. It wraps the
/// load-time [`MappingError`] and the per-sample [`ConversionError`].
#[derive(Debug, Error)]
pub enum HkFhirError {
    /// Application configuration errors (hkfhir.toml)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Mapping document errors
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Sample conversion errors
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors raised while converting a single sample
///
/// None of these are retryable: conversion is a pure function of the sample and
/// the mapping configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The sample type, variant or identifier has no mapping
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// A raw value does not correspond to any known case or cannot be expressed
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// A clinical document declares a format version other than the supported one
    #[error("Unsupported FHIR version '{declared}', expected '{supported}'")]
    UnsupportedFormatVersion {
        /// Version declared by the document
        declared: String,
        /// The only version this crate decodes
        supported: String,
    },

    /// A clinical document payload is absent
    #[error("Invalid clinical document: {0}")]
    InvalidDocument(String),
}

impl ConversionError {
    /// Shorthand for [`ConversionError::NotSupported`]
    pub fn not_supported(message: impl Into<String>) -> Self {
        Self::NotSupported(message.into())
    }

    /// Shorthand for [`ConversionError::InvalidValue`]
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::InvalidValue(message.into())
    }
}

/// Errors raised while loading a mapping document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// A key is not a known type identifier for its record family
    #[error("Unknown type identifier '{identifier}' in {family}")]
    UnknownTypeIdentifier {
        /// Record family table the key was found in
        family: String,
        /// The offending key
        identifier: String,
    },

    /// A unit expression cannot be parsed by the unit algebra
    #[error("Invalid unit expression '{expression}' for {identifier}: {reason}")]
    InvalidUnitExpression {
        /// Entry that declared the unit
        identifier: String,
        /// The unit expression as written
        expression: String,
        /// Parser diagnostic
        reason: String,
    },

    /// An entry is structurally valid JSON but violates a mapping rule
    #[error("Invalid mapping entry {identifier}: {reason}")]
    InvalidEntry {
        /// Entry that failed validation
        identifier: String,
        /// What is wrong with it
        reason: String,
    },

    /// The document is not valid JSON for the mapping schema
    #[error("Failed to parse mapping document: {0}")]
    Parse(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for HkFhirError {
    fn from(err: std::io::Error) -> Self {
        HkFhirError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for HkFhirError {
    fn from(err: serde_json::Error) -> Self {
        HkFhirError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for HkFhirError {
    fn from(err: toml::de::Error) -> Self {
        HkFhirError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hkfhir_error_display() {
        let err = HkFhirError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_conversion_error_conversion() {
        let err = ConversionError::not_supported("HKQuantityTypeIdentifierNikeFuel");
        let wrapped: HkFhirError = err.into();
        assert!(matches!(
            wrapped,
            HkFhirError::Conversion(ConversionError::NotSupported(_))
        ));
    }

    #[test]
    fn test_mapping_error_conversion() {
        let err = MappingError::UnknownTypeIdentifier {
            family: "HKQuantitySample".to_string(),
            identifier: "HKQuantityTypeIdentifierBogus".to_string(),
        };
        let wrapped: HkFhirError = err.into();
        assert!(matches!(wrapped, HkFhirError::Mapping(_)));
        assert!(wrapped
            .to_string()
            .contains("Unknown type identifier 'HKQuantityTypeIdentifierBogus'"));
    }

    #[test]
    fn test_unsupported_format_version_display() {
        let err = ConversionError::UnsupportedFormatVersion {
            declared: "1.0.2".to_string(),
            supported: "4.0.1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported FHIR version '1.0.2', expected '4.0.1'"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: HkFhirError = io_err.into();
        assert!(matches!(err, HkFhirError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: HkFhirError = json_err.into();
        assert!(matches!(err, HkFhirError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: HkFhirError = toml_err.into();
        assert!(matches!(err, HkFhirError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let _: &dyn std::error::Error = &HkFhirError::Validation("x".to_string());
        let _: &dyn std::error::Error = &ConversionError::invalid_value("x");
        let _: &dyn std::error::Error = &MappingError::Parse("x".to_string());
    }
}
