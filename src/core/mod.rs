//! Conversion engine
//!
//! Everything under this module is synchronous and free of I/O. A conversion
//! reads one [`SampleRecord`](crate::domain::SampleRecord) and an immutable
//! [`MappingConfiguration`](crate::mapping::MappingConfiguration) and returns a
//! [`ClinicalRecord`](crate::domain::ClinicalRecord).
//!
//! # Modules
//!
//! - [`units`] - HealthKit unit expressions and quantity resolution
//! - [`enums`] - HealthKit enumeration tables
//! - [`observation`] - Shared Observation shell and timezone handling
//! - [`quantity`], [`category`], [`correlation`], [`electrocardiogram`],
//!   [`workout`], [`state_of_mind`] - Per-family builders
//! - [`waveform`] - Voltage series windowing and SampledData encoding
//! - [`extensions`] - Provenance and metadata extensions
//! - [`document`] - Pre-encoded clinical documents
//! - [`dispatch`] - Routing a sample to its builder
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use chrono::Utc;
//! use hkfhir::core::dispatch::convert_observation;
//! use hkfhir::domain::{QuantitySample, SampleHeader, SampleId, SampleRecord};
//! use hkfhir::mapping::MappingConfiguration;
//!
//! let config = Arc::new(MappingConfiguration::bundled().unwrap());
//! let now = Utc::now();
//! let sample = SampleRecord::Quantity(QuantitySample {
//!     header: SampleHeader::new(SampleId::generate(), "HKQuantityTypeIdentifierHeartRate", now, now),
//!     value: 84.0,
//!     unit: "count/min".to_string(),
//! });
//!
//! let observation = convert_observation(&sample, &config).unwrap();
//! assert_eq!(observation.code.coding[0].code.as_deref(), Some("8867-4"));
//! ```

pub mod category;
pub mod correlation;
pub mod dispatch;
pub mod document;
pub mod electrocardiogram;
pub mod enums;
pub mod extensions;
pub mod observation;
pub mod quantity;
pub mod state_of_mind;
pub mod units;
pub mod waveform;
pub mod workout;

/// HealthKit code system used for identifiers and enumeration strings
pub const HEALTHKIT_SYSTEM: &str = "http://developer.apple.com/documentation/healthkit";

pub use dispatch::{convert, convert_observation, Converter};
pub use document::SUPPORTED_FHIR_VERSION;
pub use extensions::{ExtensionBuilder, ExtensionComposer, ExtensionInput, StandardExtensions};
pub use observation::ConversionOptions;
