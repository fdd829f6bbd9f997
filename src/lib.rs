// HKFHIR - HealthKit sample to FHIR R4 mapping engine
// Copyright (c) 2025 HKFHIR Contributors
// Licensed under the MIT License

//! # hkfhir - HealthKit sample to FHIR R4 mapping engine
//!
//! hkfhir converts fully materialized HealthKit samples into FHIR R4
//! Observations (or, for clinical documents, the resource they already carry).
//!
//! ## Overview
//!
//! - **Mapping** identifiers to codings, units and categories through a
//!   declarative JSON document, bundled by default and overridable per identifier
//! - **Converting** quantities, categories, correlations, electrocardiograms,
//!   workouts and state-of-mind samples
//! - **Annotating** each Observation with provenance extensions (source device,
//!   source revision, absolute time range, metadata)
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Conversion engine (unit algebra, family builders, extensions, dispatch)
//! - [`mapping`] - Mapping document schema and the immutable configuration store
//! - [`domain`] - Input samples, FHIR output model, errors
//! - [`config`] - Application configuration
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use chrono::Utc;
//! use hkfhir::core::Converter;
//! use hkfhir::domain::{QuantitySample, SampleHeader, SampleId, SampleRecord};
//! use hkfhir::mapping::MappingConfiguration;
//!
//! let converter = Converter::new(Arc::new(MappingConfiguration::bundled().unwrap()));
//! let now = Utc::now();
//! let sample = SampleRecord::Quantity(QuantitySample {
//!     header: SampleHeader::new(SampleId::generate(), "HKQuantityTypeIdentifierStepCount", now, now),
//!     value: 1200.0,
//!     unit: "count".to_string(),
//! });
//!
//! let record = converter.convert(&sample).unwrap();
//! let json = record.into_json().unwrap();
//! assert_eq!(json["resourceType"], "Observation");
//! ```
//!
//! ## Error Handling
//!
//! Loading mappings fails with [`domain::MappingError`]; converting a sample
//! fails with [`domain::ConversionError`]. Both convert into
//! [`domain::HkFhirError`] with `?`.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod mapping;
