//! Validated, immutable mapping configuration
//!
//! A [`MappingConfiguration`] is built once from a [`MappingDocument`] and never
//! mutated. Overrides derive a new instance; callers share instances through
//! `Arc` and swap the `Arc` to reload.

use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use super::schema::{
    CodedMapping, ElectrocardiogramMapping, MappedCode, MappedUnit, MappingDocument,
    QuantityMapping, StateOfMindMapping,
};
use crate::core::units::UnitExpr;
use crate::domain::errors::{HkFhirError, MappingError};
use crate::domain::result::Result;
use crate::domain::vocabulary::{
    CategoryType, CorrelationType, ElectrocardiogramType, QuantityType, SampleFamily,
    StateOfMindType, WorkoutType,
};

/// Mapping document compiled into the crate
pub const BUNDLED_MAPPINGS: &str = include_str!("default_mappings.json");

/// Largest accepted waveform precision
pub const MAX_WAVEFORM_PRECISION: usize = 12;

/// Resolved mapping tables, one per record family
#[derive(Debug, Clone)]
pub struct MappingConfiguration {
    quantity: BTreeMap<QuantityType, QuantityMapping>,
    category: BTreeMap<CategoryType, CodedMapping>,
    correlation: BTreeMap<CorrelationType, CodedMapping>,
    electrocardiogram: BTreeMap<ElectrocardiogramType, ElectrocardiogramMapping>,
    workout: BTreeMap<WorkoutType, CodedMapping>,
    state_of_mind: BTreeMap<StateOfMindType, StateOfMindMapping>,
    document: MappingDocument,
}

/// Entry counts per family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingSummary {
    pub counts: Vec<(SampleFamily, usize)>,
}

impl MappingSummary {
    /// Total number of entries across all families
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    /// Number of entries for one family
    pub fn count(&self, family: SampleFamily) -> usize {
        self.counts
            .iter()
            .find(|(f, _)| *f == family)
            .map_or(0, |(_, n)| *n)
    }
}

impl MappingConfiguration {
    /// Loads the bundled default mappings
    ///
    /// # Errors
    ///
    /// Only fails if the bundled document itself is broken, which the test
    /// suite guards against.
    pub fn bundled() -> std::result::Result<Self, MappingError> {
        Self::from_json_str(BUNDLED_MAPPINGS)
    }

    /// Parses and validates a complete mapping document
    pub fn from_json_str(json: &str) -> std::result::Result<Self, MappingError> {
        let document = parse_document(json)?;
        Self::from_document(document)
    }

    /// Reads, parses and validates a mapping document from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            HkFhirError::Io(format!("Failed to read mapping file {}: {}", path.display(), e))
        })?;
        Ok(Self::from_json_str(&json)?)
    }

    /// Validates a document and resolves every key
    pub fn from_document(document: MappingDocument) -> std::result::Result<Self, MappingError> {
        let quantity = resolve_table(SampleFamily::Quantity, &document.quantity, |id, entry| {
            validate_quantity(id, entry)
        })?;
        let category = resolve_table(SampleFamily::Category, &document.category, |id, entry| {
            validate_coded(id, entry)
        })?;
        let correlation =
            resolve_table(SampleFamily::Correlation, &document.correlation, |id, entry| {
                validate_coded(id, entry)
            })?;
        let electrocardiogram = resolve_table(
            SampleFamily::Electrocardiogram,
            &document.electrocardiogram,
            validate_electrocardiogram,
        )?;
        let workout = resolve_table(SampleFamily::Workout, &document.workout, |id, entry| {
            validate_coded(id, entry)
        })?;
        let state_of_mind = resolve_table(
            SampleFamily::StateOfMind,
            &document.state_of_mind,
            validate_state_of_mind,
        )?;

        Ok(Self {
            quantity,
            category,
            correlation,
            electrocardiogram,
            workout,
            state_of_mind,
            document,
        })
    }

    /// Derives a new configuration with per-identifier replacements applied
    ///
    /// Entries present in `overrides` replace the entry with the same key;
    /// everything else is kept. `self` is left untouched.
    pub fn with_overrides(
        &self,
        overrides: MappingDocument,
    ) -> std::result::Result<Self, MappingError> {
        let mut merged = self.document.clone();
        merged.quantity.extend(overrides.quantity);
        merged.category.extend(overrides.category);
        merged.correlation.extend(overrides.correlation);
        merged.electrocardiogram.extend(overrides.electrocardiogram);
        merged.workout.extend(overrides.workout);
        merged.state_of_mind.extend(overrides.state_of_mind);
        Self::from_document(merged)
    }

    /// Parses an override document and applies it
    pub fn with_overrides_json(&self, json: &str) -> std::result::Result<Self, MappingError> {
        self.with_overrides(parse_document(json)?)
    }

    pub fn quantity(&self, ty: QuantityType) -> Option<&QuantityMapping> {
        self.quantity.get(&ty)
    }

    pub fn category(&self, ty: CategoryType) -> Option<&CodedMapping> {
        self.category.get(&ty)
    }

    pub fn correlation(&self, ty: CorrelationType) -> Option<&CodedMapping> {
        self.correlation.get(&ty)
    }

    pub fn electrocardiogram(&self, ty: ElectrocardiogramType) -> Option<&ElectrocardiogramMapping> {
        self.electrocardiogram.get(&ty)
    }

    pub fn workout(&self, ty: WorkoutType) -> Option<&CodedMapping> {
        self.workout.get(&ty)
    }

    pub fn state_of_mind(&self, ty: StateOfMindType) -> Option<&StateOfMindMapping> {
        self.state_of_mind.get(&ty)
    }

    /// Mapped quantity identifiers, in identifier order
    pub fn quantity_types(&self) -> impl Iterator<Item = QuantityType> + '_ {
        self.quantity.keys().copied()
    }

    /// Mapped category identifiers, in identifier order
    pub fn category_types(&self) -> impl Iterator<Item = CategoryType> + '_ {
        self.category.keys().copied()
    }

    /// Identifier strings that have an entry in the given family
    pub fn mapped_identifiers(&self, family: SampleFamily) -> Vec<&'static str> {
        match family {
            SampleFamily::Quantity => self.quantity.keys().map(|t| t.identifier()).collect(),
            SampleFamily::Category => self.category.keys().map(|t| t.identifier()).collect(),
            SampleFamily::Correlation => {
                self.correlation.keys().map(|t| t.identifier()).collect()
            }
            SampleFamily::Electrocardiogram => {
                self.electrocardiogram.keys().map(|t| t.identifier()).collect()
            }
            SampleFamily::Workout => self.workout.keys().map(|t| t.identifier()).collect(),
            SampleFamily::StateOfMind => {
                self.state_of_mind.keys().map(|t| t.identifier()).collect()
            }
        }
    }

    /// Entry counts per family
    pub fn summary(&self) -> MappingSummary {
        MappingSummary {
            counts: SampleFamily::ALL
                .into_iter()
                .map(|family| (family, self.mapped_identifiers(family).len()))
                .collect(),
        }
    }

    /// The effective document this configuration was built from
    pub fn document(&self) -> &MappingDocument {
        &self.document
    }

    /// SHA-256 of the effective document, hex encoded
    ///
    /// Two configurations with equal fingerprints map every sample the same way.
    pub fn fingerprint(&self) -> String {
        // BTreeMap keys keep the serialization stable
        let bytes = serde_json::to_vec(&self.document).unwrap_or_default();
        format!("{:x}", Sha256::digest(&bytes))
    }
}

fn parse_document(json: &str) -> std::result::Result<MappingDocument, MappingError> {
    serde_json::from_str(json).map_err(|e| MappingError::Parse(e.to_string()))
}

fn resolve_table<K, V, F>(
    family: SampleFamily,
    raw: &BTreeMap<String, V>,
    validate: F,
) -> std::result::Result<BTreeMap<K, V>, MappingError>
where
    K: FromStr + Ord,
    V: Clone,
    F: Fn(&str, &V) -> std::result::Result<(), MappingError>,
{
    let mut resolved = BTreeMap::new();
    for (identifier, entry) in raw {
        let key = identifier
            .parse::<K>()
            .map_err(|_| MappingError::UnknownTypeIdentifier {
                family: family.to_string(),
                identifier: identifier.clone(),
            })?;
        validate(identifier, entry)?;
        resolved.insert(key, entry.clone());
    }
    Ok(resolved)
}

fn invalid_entry(identifier: &str, reason: impl Into<String>) -> MappingError {
    MappingError::InvalidEntry {
        identifier: identifier.to_string(),
        reason: reason.into(),
    }
}

fn validate_codes(
    identifier: &str,
    field: &str,
    codes: &[MappedCode],
    required: bool,
) -> std::result::Result<(), MappingError> {
    if required && codes.is_empty() {
        return Err(invalid_entry(identifier, format!("{field} must not be empty")));
    }
    for code in codes {
        if code.code.trim().is_empty() {
            return Err(invalid_entry(identifier, format!("{field} contains an empty code")));
        }
        validate_system(identifier, &code.system)?;
    }
    Ok(())
}

fn validate_system(identifier: &str, system: &str) -> std::result::Result<(), MappingError> {
    url::Url::parse(system)
        .map(|_| ())
        .map_err(|e| invalid_entry(identifier, format!("system '{system}' is not an absolute URI: {e}")))
}

fn validate_unit(identifier: &str, unit: &MappedUnit) -> std::result::Result<(), MappingError> {
    UnitExpr::parse(&unit.hkunit).map_err(|reason| MappingError::InvalidUnitExpression {
        identifier: identifier.to_string(),
        expression: unit.hkunit.clone(),
        reason,
    })?;
    if let Some(system) = &unit.system {
        validate_system(identifier, system)?;
    }
    Ok(())
}

fn validate_coded(identifier: &str, entry: &CodedMapping) -> std::result::Result<(), MappingError> {
    validate_codes(identifier, "codings", &entry.codings, true)?;
    validate_codes(identifier, "categories", &entry.categories, false)
}

fn validate_quantity(
    identifier: &str,
    entry: &QuantityMapping,
) -> std::result::Result<(), MappingError> {
    validate_codes(identifier, "codings", &entry.codings, true)?;
    validate_codes(identifier, "categories", &entry.categories, false)?;
    validate_unit(identifier, &entry.unit)
}

fn validate_electrocardiogram(
    identifier: &str,
    entry: &ElectrocardiogramMapping,
) -> std::result::Result<(), MappingError> {
    validate_codes(identifier, "codings", &entry.codings, true)?;
    validate_codes(identifier, "categories", &entry.categories, false)?;
    validate_coded(&format!("{identifier}.classification"), &entry.classification)?;
    validate_coded(&format!("{identifier}.symptomsStatus"), &entry.symptoms_status)?;
    for (name, sub) in [
        ("numberOfVoltageMeasurements", &entry.number_of_voltage_measurements),
        ("samplingFrequency", &entry.sampling_frequency),
        ("averageHeartRate", &entry.average_heart_rate),
        ("voltageMeasurements", &entry.voltage_measurements),
    ] {
        validate_quantity(&format!("{identifier}.{name}"), sub)?;
    }
    if let Some(precision) = entry.precision {
        if precision > MAX_WAVEFORM_PRECISION {
            return Err(invalid_entry(
                identifier,
                format!("precision must be at most {MAX_WAVEFORM_PRECISION}, got {precision}"),
            ));
        }
    }
    if !(entry.window_seconds.is_finite() && entry.window_seconds > 0.0) {
        return Err(invalid_entry(
            identifier,
            format!("windowSeconds must be positive, got {}", entry.window_seconds),
        ));
    }
    Ok(())
}

fn validate_state_of_mind(
    identifier: &str,
    entry: &StateOfMindMapping,
) -> std::result::Result<(), MappingError> {
    validate_codes(identifier, "codings", &entry.codings, true)?;
    validate_codes(identifier, "categories", &entry.categories, false)?;
    for (name, sub) in [
        ("kind", &entry.kind),
        ("valence", &entry.valence),
        ("valenceClassification", &entry.valence_classification),
        ("label", &entry.label),
        ("association", &entry.association),
    ] {
        validate_coded(&format!("{identifier}.{name}"), sub)?;
    }
    Ok(())
}
