//! Domain models and types for hkfhir.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Input samples** ([`SampleRecord`] and its payloads, [`SampleHeader`], [`MetadataValue`])
//! - **Output records** ([`ClinicalRecord`], [`Observation`] and the FHIR datatypes it uses)
//! - **Closed identifier vocabularies** ([`QuantityType`], [`CategoryType`], ...)
//! - **Error types** ([`HkFhirError`], [`ConversionError`], [`MappingError`])
//! - **Result type aliases** ([`Result`], [`ConversionResult`])
//!
//! # Error Handling
//!
//! Library operations that touch files or configuration return [`Result<T>`];
//! per-sample conversion returns [`ConversionResult<T>`] so callers can tell a
//! rejected sample apart from a broken setup:
//!
//! ```rust
//! use hkfhir::domain::{ConversionError, HkFhirError};
//!
//! let err: HkFhirError = ConversionError::not_supported("HKQuantityTypeIdentifierNikeFuel").into();
//! assert!(err.to_string().starts_with("Conversion error"));
//! ```

pub mod context;
pub mod errors;
pub mod ids;
pub mod record;
pub mod result;
pub mod sample;
pub mod vocabulary;

// Re-export commonly used types for convenience
pub use context::ResultExt;
pub use errors::{ConversionError, HkFhirError, MappingError};
pub use ids::SampleId;
pub use record::{
    ClinicalRecord, ClinicalResource, CodeableConcept, Coding, ComponentValue, Effective,
    Extension, ExtensionValue, Identifier, Observation, ObservationBuilder, ObservationComponent,
    ObservationStatus, ObservationValue, Period, Quantity, ResourceKind, SampledData,
    UCUM_SYSTEM,
};
pub use result::{ConversionResult, Result};
pub use sample::{
    CategorySample, ClinicalDocumentSample, CorrelationSample, ElectrocardiogramSample,
    FhirResourcePayload, MetadataValue, OperatingSystemVersion, QuantitySample, SampleHeader,
    SampleQuantity, SampleRecord, Source, SourceDevice, SourceRevision, StateOfMindSample,
    VoltageMeasurement, WorkoutSample,
};
pub use vocabulary::{
    CategoryType, CorrelationType, ElectrocardiogramType, QuantityType, SampleFamily,
    StateOfMindType, WorkoutType,
};
