//! Input sample model
//!
//! A [`SampleRecord`] is the fully materialized form of one HealthKit sample as
//! handed over by acquisition. It deserializes from JSON tagged by `kind`:
//!
//! ```json
//! {
//!   "kind": "quantity",
//!   "id": "7D44B88C-4199-4BAD-97DC-D78268E01398",
//!   "typeIdentifier": "HKQuantityTypeIdentifierHeartRate",
//!   "start": "2024-03-01T08:00:00Z",
//!   "end": "2024-03-01T08:00:00Z",
//!   "value": 84.0,
//!   "unit": "count/min"
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ids::SampleId;

/// Fields shared by every sample variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleHeader {
    /// Stable sample UUID
    pub id: SampleId,

    /// HealthKit type identifier, e.g. `HKQuantityTypeIdentifierHeartRate`
    pub type_identifier: String,

    /// Start of the sample time range
    pub start: DateTime<Utc>,

    /// End of the sample time range; equal to `start` for instantaneous samples
    pub end: DateTime<Utc>,

    /// IANA timezone the sample was recorded in, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// Sample metadata, ordered by key
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, MetadataValue>,

    /// Device that produced the sample
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<SourceDevice>,

    /// App and OS revision that saved the sample
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_revision: Option<SourceRevision>,
}

impl SampleHeader {
    /// Creates a header with an empty metadata map and no provenance
    pub fn new(
        id: SampleId,
        type_identifier: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            type_identifier: type_identifier.into(),
            start,
            end,
            timezone: None,
            metadata: BTreeMap::new(),
            device: None,
            source_revision: None,
        }
    }

    /// Sets the timezone
    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Inserts one metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: MetadataValue) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Sets the source device
    pub fn with_device(mut self, device: SourceDevice) -> Self {
        self.device = Some(device);
        self
    }

    /// Sets the source revision
    pub fn with_source_revision(mut self, revision: SourceRevision) -> Self {
        self.source_revision = Some(revision);
        self
    }

    /// Looks up a metadata entry by key
    pub fn metadata_value(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata.get(key)
    }
}

/// A metadata value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum MetadataValue {
    /// Free text
    String(String),
    /// Any number; integral enum raw values arrive here too
    Number(f64),
    /// An instant
    Date(DateTime<Utc>),
    /// A flag
    Boolean(bool),
    /// A nested quantity
    Quantity(SampleQuantity),
}

impl MetadataValue {
    /// Returns the quantity payload, if this is a quantity
    pub fn as_quantity(&self) -> Option<&SampleQuantity> {
        match self {
            MetadataValue::Quantity(q) => Some(q),
            _ => None,
        }
    }

    /// Returns the boolean payload, if this is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetadataValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the string payload, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// A value with a HealthKit unit expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleQuantity {
    /// Magnitude
    pub value: f64,
    /// HealthKit unit string, e.g. `count/min`
    pub unit: String,
}

impl SampleQuantity {
    /// Creates a quantity
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }
}

/// Hardware descriptor of the producing device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDevice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub software_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udi_device_identifier: Option<String>,
}

/// App that saved the sample
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub name: String,
    pub bundle_identifier: String,
}

/// Operating system version triple
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingSystemVersion {
    pub major_version: u32,
    pub minor_version: u32,
    pub patch_version: u32,
}

impl std::fmt::Display for OperatingSystemVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.major_version, self.minor_version, self.patch_version
        )
    }
}

/// Source app, app version, device product type and OS version
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRevision {
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default)]
    pub operating_system_version: OperatingSystemVersion,
}

/// Quantity sample payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantitySample {
    #[serde(flatten)]
    pub header: SampleHeader,
    pub value: f64,
    pub unit: String,
}

/// Category sample payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySample {
    #[serde(flatten)]
    pub header: SampleHeader,
    pub value: i64,
}

/// Correlation payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationSample {
    #[serde(flatten)]
    pub header: SampleHeader,
    #[serde(default)]
    pub objects: Vec<SampleRecord>,
}

/// One electrocardiogram voltage reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoltageMeasurement {
    /// Seconds elapsed since the start of the recording
    pub time: f64,
    /// Voltage in the sample's voltage unit
    pub value: f64,
}

fn default_voltage_unit() -> String {
    "V".to_string()
}

/// Electrocardiogram payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectrocardiogramSample {
    #[serde(flatten)]
    pub header: SampleHeader,
    pub classification: i64,
    pub symptoms_status: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_heart_rate: Option<SampleQuantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sampling_frequency: Option<SampleQuantity>,
    pub number_of_voltage_measurements: u64,
    #[serde(default)]
    pub voltage_measurements: Vec<VoltageMeasurement>,
    #[serde(default = "default_voltage_unit")]
    pub voltage_unit: String,
    /// Symptom category identifier to severity raw value
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub symptoms: BTreeMap<String, i64>,
}

/// Workout payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSample {
    #[serde(flatten)]
    pub header: SampleHeader,
    pub activity_type: u32,
}

/// State of mind payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateOfMindSample {
    #[serde(flatten)]
    pub header: SampleHeader,
    pub kind: i64,
    pub valence: f64,
    pub valence_classification: i64,
    #[serde(default)]
    pub labels: Vec<i64>,
    #[serde(default)]
    pub associations: Vec<i64>,
}

/// Pre-encoded FHIR resource carried by a clinical record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FhirResourcePayload {
    /// Declared FHIR release, e.g. `4.0.1`
    pub fhir_version: String,
    /// Raw JSON of the resource
    pub data: String,
}

/// Clinical record payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalDocumentSample {
    #[serde(flatten)]
    pub header: SampleHeader,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fhir_resource: Option<FhirResourcePayload>,
}

/// One HealthKit sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SampleRecord {
    Quantity(QuantitySample),
    Category(CategorySample),
    Correlation(CorrelationSample),
    Waveform(ElectrocardiogramSample),
    Workout(WorkoutSample),
    MoodState(StateOfMindSample),
    ClinicalDocument(ClinicalDocumentSample),
}

impl SampleRecord {
    /// The common header of any variant
    pub fn header(&self) -> &SampleHeader {
        match self {
            SampleRecord::Quantity(s) => &s.header,
            SampleRecord::Category(s) => &s.header,
            SampleRecord::Correlation(s) => &s.header,
            SampleRecord::Waveform(s) => &s.header,
            SampleRecord::Workout(s) => &s.header,
            SampleRecord::MoodState(s) => &s.header,
            SampleRecord::ClinicalDocument(s) => &s.header,
        }
    }

    /// Short variant name used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            SampleRecord::Quantity(_) => "quantity",
            SampleRecord::Category(_) => "category",
            SampleRecord::Correlation(_) => "correlation",
            SampleRecord::Waveform(_) => "waveform",
            SampleRecord::Workout(_) => "workout",
            SampleRecord::MoodState(_) => "moodState",
            SampleRecord::ClinicalDocument(_) => "clinicalDocument",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_quantity_sample_deserializes() {
        let json = r#"{
            "kind": "quantity",
            "id": "7d44b88c-4199-4bad-97dc-d78268e01398",
            "typeIdentifier": "HKQuantityTypeIdentifierHeartRate",
            "start": "2024-03-01T08:00:00Z",
            "end": "2024-03-01T08:00:00Z",
            "value": 84.0,
            "unit": "count/min"
        }"#;
        let sample: SampleRecord = serde_json::from_str(json).unwrap();
        match &sample {
            SampleRecord::Quantity(q) => {
                assert_eq!(q.value, 84.0);
                assert_eq!(q.unit, "count/min");
                assert!(q.header.metadata.is_empty());
            }
            other => panic!("unexpected variant {}", other.kind_name()),
        }
        assert_eq!(
            sample.header().type_identifier,
            "HKQuantityTypeIdentifierHeartRate"
        );
    }

    #[test]
    fn test_metadata_values_deserialize() {
        let json = r#"{
            "a": {"type": "string", "value": "x"},
            "b": {"type": "number", "value": 2},
            "c": {"type": "boolean", "value": true},
            "d": {"type": "quantity", "value": {"value": 20.5, "unit": "degC"}},
            "e": {"type": "date", "value": "2024-03-01T08:00:00Z"}
        }"#;
        let map: BTreeMap<String, MetadataValue> = serde_json::from_str(json).unwrap();
        assert_eq!(map["a"].as_str(), Some("x"));
        assert_eq!(map["b"], MetadataValue::Number(2.0));
        assert_eq!(map["c"].as_bool(), Some(true));
        assert_eq!(map["d"].as_quantity().unwrap().unit, "degC");
        assert_eq!(
            map["e"],
            MetadataValue::Date(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_electrocardiogram_defaults() {
        let json = r#"{
            "kind": "waveform",
            "id": "7d44b88c-4199-4bad-97dc-d78268e01398",
            "typeIdentifier": "HKDataTypeIdentifierElectrocardiogram",
            "start": "2024-03-01T08:00:00Z",
            "end": "2024-03-01T08:00:30Z",
            "classification": 1,
            "symptomsStatus": 1,
            "numberOfVoltageMeasurements": 0
        }"#;
        let sample: SampleRecord = serde_json::from_str(json).unwrap();
        let SampleRecord::Waveform(ecg) = sample else {
            panic!("expected waveform");
        };
        assert_eq!(ecg.voltage_unit, "V");
        assert!(ecg.voltage_measurements.is_empty());
        assert!(ecg.sampling_frequency.is_none());
    }

    #[test]
    fn test_os_version_display() {
        let v = OperatingSystemVersion {
            major_version: 17,
            minor_version: 4,
            patch_version: 1,
        };
        assert_eq!(v.to_string(), "17.4.1");
    }

    #[test]
    fn test_header_builder() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let header = SampleHeader::new(SampleId::generate(), "X", start, start)
            .with_timezone("Europe/Berlin")
            .with_metadata("k", MetadataValue::Boolean(false));
        assert_eq!(header.timezone.as_deref(), Some("Europe/Berlin"));
        assert_eq!(header.metadata_value("k"), Some(&MetadataValue::Boolean(false)));
    }
}
