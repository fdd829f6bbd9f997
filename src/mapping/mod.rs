//! Declarative mapping configuration
//!
//! The mapping document decides which codings, units and categories each
//! HealthKit identifier maps to. A default document is bundled with the crate;
//! deployments layer per-identifier overrides on top of it.
//!
//! ```rust
//! use hkfhir::domain::QuantityType;
//! use hkfhir::mapping::MappingConfiguration;
//!
//! let config = MappingConfiguration::bundled().unwrap();
//! let heart_rate = config.quantity(QuantityType::HeartRate).unwrap();
//! assert_eq!(heart_rate.unit.hkunit, "count/min");
//! ```

pub mod schema;
pub mod store;

pub use schema::{
    concept_of, CodedMapping, ElectrocardiogramMapping, MappedCode, MappedUnit, MappingDocument,
    QuantityMapping, StateOfMindMapping,
};
pub use store::{MappingConfiguration, MappingSummary, BUNDLED_MAPPINGS};
