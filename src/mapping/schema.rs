//! Mapping document schema
//!
//! These structs mirror the JSON mapping document one to one. Family tables
//! are keyed by raw identifier strings here; the store resolves every key
//! against the closed vocabularies before anything is looked up.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::record::{CodeableConcept, Coding};

/// A coding as written in a mapping document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedCode {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    pub system: String,
}

impl MappedCode {
    /// The FHIR coding for this entry
    pub fn to_coding(&self) -> Coding {
        Coding {
            system: Some(self.system.clone()),
            code: Some(self.code.clone()),
            display: self.display.clone(),
        }
    }
}

/// Builds a CodeableConcept from a list of mapped codes
pub fn concept_of(codes: &[MappedCode]) -> CodeableConcept {
    CodeableConcept::from_codings(codes.iter().map(MappedCode::to_coding).collect())
}

/// Target unit of a quantity-shaped entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedUnit {
    /// HealthKit unit expression values are converted into
    pub hkunit: String,

    /// Human readable unit written to `Quantity.unit`; defaults to `hkunit`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_alias: Option<String>,

    /// Unit code system, usually UCUM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// Unit code within `system`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl MappedUnit {
    /// The unit string written to `Quantity.unit`
    pub fn display_unit(&self) -> &str {
        self.unit_alias.as_deref().unwrap_or(&self.hkunit)
    }
}

/// A quantity-shaped entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityMapping {
    pub codings: Vec<MappedCode>,
    pub unit: MappedUnit,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<MappedCode>,
}

/// A coded entry without a unit (categories, correlations, sub-components)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodedMapping {
    pub codings: Vec<MappedCode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<MappedCode>,
}

fn default_window_seconds() -> f64 {
    10.0
}

/// Electrocardiogram entry with one sub-entry per fixed component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectrocardiogramMapping {
    pub codings: Vec<MappedCode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<MappedCode>,
    pub classification: CodedMapping,
    pub symptoms_status: CodedMapping,
    pub number_of_voltage_measurements: QuantityMapping,
    pub sampling_frequency: QuantityMapping,
    pub average_heart_rate: QuantityMapping,
    pub voltage_measurements: QuantityMapping,

    /// Decimal places for voltage values; shortest round-trip form when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<usize>,

    /// Duration of one voltage window in seconds
    #[serde(default = "default_window_seconds")]
    pub window_seconds: f64,
}

/// State of mind entry with one sub-entry per component kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateOfMindMapping {
    pub codings: Vec<MappedCode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<MappedCode>,
    pub kind: CodedMapping,
    pub valence: CodedMapping,
    pub valence_classification: CodedMapping,
    pub label: CodedMapping,
    pub association: CodedMapping,
}

/// A complete or partial mapping document
///
/// The bundled document populates every table; override documents may omit
/// any of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingDocument {
    #[serde(rename = "HKQuantitySample", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub quantity: BTreeMap<String, QuantityMapping>,

    #[serde(rename = "HKCategorySample", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub category: BTreeMap<String, CodedMapping>,

    #[serde(rename = "HKCorrelation", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub correlation: BTreeMap<String, CodedMapping>,

    #[serde(rename = "HKElectrocardiogram", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub electrocardiogram: BTreeMap<String, ElectrocardiogramMapping>,

    #[serde(rename = "HKWorkout", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub workout: BTreeMap<String, CodedMapping>,

    #[serde(rename = "HKStateOfMind", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub state_of_mind: BTreeMap<String, StateOfMindMapping>,
}
