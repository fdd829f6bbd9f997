//! FHIR R4 output model
//!
//! Only the elements the converter writes are modelled. Clinical documents
//! keep their full JSON in [`ClinicalResource`]. FHIR choice elements
//! (`value[x]`, `effective[x]`) are externally tagged enums flattened into the
//! parent, so `ObservationValue::ValueQuantity` serializes as `"valueQuantity"`.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::errors::HkFhirError;
use super::result::Result;

/// UCUM code system
pub const UCUM_SYSTEM: &str = "http://unitsofmeasure.org";

/// A code from a code system
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Coding {
    /// A fully populated coding
    pub fn new(
        system: impl Into<String>,
        code: impl Into<String>,
        display: impl Into<String>,
    ) -> Self {
        Self {
            system: Some(system.into()),
            code: Some(code.into()),
            display: Some(display.into()),
        }
    }

    /// A coding without a display string
    pub fn without_display(system: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            code: Some(code.into()),
            display: None,
        }
    }
}

/// A set of codings meaning the same concept
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coding: Vec<Coding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CodeableConcept {
    /// Wraps a coding list
    pub fn from_codings(coding: Vec<Coding>) -> Self {
        Self { coding, text: None }
    }

    /// Wraps a single coding
    pub fn single(coding: Coding) -> Self {
        Self::from_codings(vec![coding])
    }
}

/// A measured amount
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Quantity {
    /// A bare number with no unit
    pub fn unitless(value: f64) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }
}

/// A time interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<FixedOffset>>,
}

/// Identifier of the source sample
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Identifier {
    /// An identifier carrying only an element id
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

/// Series of measurements taken by a device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampledData {
    pub origin: Quantity,
    /// Milliseconds between samples
    pub period: f64,
    pub dimensions: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// `Observation.effective[x]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Effective {
    EffectiveDateTime(DateTime<FixedOffset>),
    EffectivePeriod(Period),
}

/// `Observation.value[x]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObservationValue {
    ValueQuantity(Quantity),
    ValueCodeableConcept(CodeableConcept),
    ValueString(String),
}

/// `Observation.component.value[x]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentValue {
    ValueQuantity(Quantity),
    ValueCodeableConcept(CodeableConcept),
    ValueString(String),
    ValueBoolean(bool),
    ValueSampledData(SampledData),
}

/// `Extension.value[x]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtensionValue {
    ValueString(String),
    ValueDecimal(f64),
    ValueDateTime(DateTime<FixedOffset>),
    ValueBoolean(bool),
    ValueQuantity(Quantity),
    ValueCoding(Coding),
}

/// A url-keyed extension carrying either a value or nested extensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    pub url: String,
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ExtensionValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
}

impl Extension {
    /// A leaf extension
    pub fn with_value(url: impl Into<String>, value: ExtensionValue) -> Self {
        Self {
            url: url.into(),
            value: Some(value),
            extension: Vec::new(),
        }
    }

    /// A complex extension grouping sub-extensions
    pub fn nested(url: impl Into<String>, extension: Vec<Extension>) -> Self {
        Self {
            url: url.into(),
            value: None,
            extension,
        }
    }

    /// Appends a sub-extension, first dropping any sibling with the same url
    pub fn replace_extension(&mut self, extension: Extension) {
        replace_in(&mut self.extension, extension);
    }
}

/// Removes every entry with the url of `extension`, then appends it
pub(crate) fn replace_in(list: &mut Vec<Extension>, extension: Extension) {
    list.retain(|e| e.url != extension.url);
    list.push(extension);
}

/// One component of an Observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationComponent {
    pub code: CodeableConcept,
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ComponentValue>,
}

impl ObservationComponent {
    /// A coded component with a value
    pub fn new(code: CodeableConcept, value: ComponentValue) -> Self {
        Self {
            code,
            value: Some(value),
        }
    }
}

/// `Observation.status`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObservationStatus {
    Registered,
    Preliminary,
    #[default]
    Final,
    Amended,
    Corrected,
    Cancelled,
    EnteredInError,
    Unknown,
}

fn observation_resource_type() -> String {
    ResourceKind::Observation.as_str().to_string()
}

/// A FHIR R4 Observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    #[serde(default = "observation_resource_type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifier: Vec<Identifier>,
    #[serde(default)]
    pub status: ObservationStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category: Vec<CodeableConcept>,
    pub code: CodeableConcept,
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub effective: Option<Effective>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued: Option<DateTime<Utc>>,
    #[serde(flatten, default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ObservationValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub component: Vec<ObservationComponent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension: Vec<Extension>,
}

impl Observation {
    /// Creates a new builder for constructing an Observation
    pub fn builder() -> ObservationBuilder {
        ObservationBuilder::default()
    }

    /// Finds the first top-level extension with the given url
    pub fn extension_by_url(&self, url: &str) -> Option<&Extension> {
        self.extension.iter().find(|e| e.url == url)
    }

    /// Appends a top-level extension
    ///
    /// With `replace_existing`, every extension with the same url is removed
    /// first, so applying the same extension twice leaves one copy.
    pub fn append_extension(&mut self, extension: Extension, replace_existing: bool) {
        if replace_existing {
            replace_in(&mut self.extension, extension);
        } else {
            self.extension.push(extension);
        }
    }

    /// Removes every top-level extension with the given url
    pub fn remove_extensions(&mut self, url: &str) {
        self.extension.retain(|e| e.url != url);
    }
}

/// Builder for constructing Observation instances
#[derive(Debug, Default)]
pub struct ObservationBuilder {
    identifier: Vec<Identifier>,
    status: ObservationStatus,
    category: Vec<CodeableConcept>,
    code: Option<CodeableConcept>,
    effective: Option<Effective>,
    issued: Option<DateTime<Utc>>,
    value: Option<ObservationValue>,
    component: Vec<ObservationComponent>,
}

impl ObservationBuilder {
    /// Creates a new builder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identifier(mut self, identifier: Identifier) -> Self {
        self.identifier.push(identifier);
        self
    }

    pub fn status(mut self, status: ObservationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn category(mut self, category: CodeableConcept) -> Self {
        self.category.push(category);
        self
    }

    pub fn code(mut self, code: CodeableConcept) -> Self {
        self.code = Some(code);
        self
    }

    pub fn effective(mut self, effective: Effective) -> Self {
        self.effective = Some(effective);
        self
    }

    pub fn issued(mut self, issued: DateTime<Utc>) -> Self {
        self.issued = Some(issued);
        self
    }

    pub fn value(mut self, value: ObservationValue) -> Self {
        self.value = Some(value);
        self
    }

    pub fn components(mut self, components: impl IntoIterator<Item = ObservationComponent>) -> Self {
        self.component.extend(components);
        self
    }

    /// Builds the Observation
    ///
    /// # Errors
    ///
    /// Returns an error if no code was set
    pub fn build(self) -> std::result::Result<Observation, String> {
        let code = self.code.ok_or("Observation code is required")?;
        Ok(Observation {
            resource_type: observation_resource_type(),
            identifier: self.identifier,
            status: self.status,
            category: self.category,
            code,
            effective: self.effective,
            issued: self.issued,
            value: self.value,
            component: self.component,
            extension: Vec::new(),
        })
    }
}

/// FHIR resource types the converter can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    AllergyIntolerance,
    Condition,
    Coverage,
    Immunization,
    MedicationDispense,
    MedicationRequest,
    MedicationStatement,
    Observation,
    Procedure,
}

impl ResourceKind {
    /// Every resource kind
    pub const ALL: [ResourceKind; 9] = [
        ResourceKind::AllergyIntolerance,
        ResourceKind::Condition,
        ResourceKind::Coverage,
        ResourceKind::Immunization,
        ResourceKind::MedicationDispense,
        ResourceKind::MedicationRequest,
        ResourceKind::MedicationStatement,
        ResourceKind::Observation,
        ResourceKind::Procedure,
    ];

    /// The FHIR `resourceType` string
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::AllergyIntolerance => "AllergyIntolerance",
            ResourceKind::Condition => "Condition",
            ResourceKind::Coverage => "Coverage",
            ResourceKind::Immunization => "Immunization",
            ResourceKind::MedicationDispense => "MedicationDispense",
            ResourceKind::MedicationRequest => "MedicationRequest",
            ResourceKind::MedicationStatement => "MedicationStatement",
            ResourceKind::Observation => "Observation",
            ResourceKind::Procedure => "Procedure",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unsupported resource type: {s}"))
    }
}

/// A decoded FHIR resource, kept as validated JSON
#[derive(Debug, Clone, PartialEq)]
pub struct ClinicalResource {
    pub kind: ResourceKind,
    pub body: serde_json::Map<String, serde_json::Value>,
}

impl ClinicalResource {
    /// Reads an Observation resource into the [`Observation`] model
    ///
    /// # Errors
    ///
    /// Returns an error if the resource is not an Observation, does not fit
    /// the model, or carries elements the model does not hold (such as
    /// `subject` or `valueInteger`).
    pub fn to_observation(&self) -> std::result::Result<Observation, String> {
        if self.kind != ResourceKind::Observation {
            return Err(format!("expected an Observation, got {}", self.kind));
        }
        let body = serde_json::Value::Object(self.body.clone());
        let observation: Observation =
            serde_json::from_value(body).map_err(|e| format!("malformed Observation: {e}"))?;

        let modelled = serde_json::to_value(&observation).map_err(|e| e.to_string())?;
        let dropped: Vec<&str> = self
            .body
            .keys()
            .filter(|key| modelled.get(key.as_str()).is_none())
            .map(String::as_str)
            .collect();
        if !dropped.is_empty() {
            return Err(format!(
                "Observation elements not representable: {}",
                dropped.join(", ")
            ));
        }
        Ok(observation)
    }
}

/// Output of a conversion
#[derive(Debug, Clone, PartialEq)]
pub enum ClinicalRecord {
    Observation(Box<Observation>),
    Resource(ClinicalResource),
}

impl ClinicalRecord {
    /// Output resource kind
    pub fn resource_kind(&self) -> ResourceKind {
        match self {
            ClinicalRecord::Observation(_) => ResourceKind::Observation,
            ClinicalRecord::Resource(resource) => resource.kind,
        }
    }

    /// The Observation, if this record was built by the converter
    pub fn as_observation(&self) -> Option<&Observation> {
        match self {
            ClinicalRecord::Observation(obs) => Some(obs),
            ClinicalRecord::Resource(_) => None,
        }
    }

    /// Consumes the record and returns its FHIR JSON
    pub fn into_json(self) -> Result<serde_json::Value> {
        match self {
            ClinicalRecord::Observation(obs) => serde_json::to_value(*obs).map_err(HkFhirError::from),
            ClinicalRecord::Resource(resource) => Ok(serde_json::Value::Object(resource.body)),
        }
    }
}

impl From<Observation> for ClinicalRecord {
    fn from(obs: Observation) -> Self {
        ClinicalRecord::Observation(Box::new(obs))
    }
}

impl Serialize for ClinicalRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            ClinicalRecord::Observation(obs) => obs.serialize(serializer),
            ClinicalRecord::Resource(resource) => resource.body.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn heart_rate_code() -> CodeableConcept {
        CodeableConcept::single(Coding::new("http://loinc.org", "8867-4", "Heart rate"))
    }

    #[test]
    fn test_observation_builder() {
        let obs = Observation::builder()
            .identifier(Identifier::with_id("ABC"))
            .code(heart_rate_code())
            .value(ObservationValue::ValueString("x".to_string()))
            .build()
            .unwrap();
        assert_eq!(obs.resource_type, "Observation");
        assert_eq!(obs.status, ObservationStatus::Final);
        assert!(obs.extension.is_empty());
    }

    #[test]
    fn test_observation_builder_missing_code() {
        let result = Observation::builder().build();
        assert!(result.is_err());
        assert_eq!(result.unwrap_err(), "Observation code is required");
    }

    #[test]
    fn test_observation_serialization_uses_choice_names() {
        let at = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
            .unwrap();
        let obs = Observation::builder()
            .code(heart_rate_code())
            .effective(Effective::EffectiveDateTime(at))
            .value(ObservationValue::ValueQuantity(Quantity {
                value: 84.0,
                unit: Some("beats/minute".to_string()),
                system: Some(UCUM_SYSTEM.to_string()),
                code: Some("/min".to_string()),
            }))
            .build()
            .unwrap();
        let value = serde_json::to_value(&obs).unwrap();
        assert_eq!(value["resourceType"], "Observation");
        assert_eq!(value["status"], "final");
        assert_eq!(value["effectiveDateTime"], "2024-03-01T09:00:00+01:00");
        assert_eq!(value["valueQuantity"]["code"], "/min");
        assert!(value.get("component").is_none());
    }

    fn lab_observation() -> ClinicalResource {
        let value = json!({
            "resourceType": "Observation",
            "id": "lab-1",
            "status": "final",
            "code": {"coding": [{"system": "http://loinc.org", "code": "8867-4"}]},
            "subject": {"reference": "Patient/1"},
            "valueInteger": 7
        });
        ClinicalResource {
            kind: ResourceKind::Observation,
            body: value.as_object().cloned().unwrap(),
        }
    }

    #[test]
    fn test_to_observation_rejects_unmodelled_elements() {
        let err = lab_observation().to_observation().unwrap_err();
        assert!(err.contains("id"));
        assert!(err.contains("subject"));
        assert!(err.contains("valueInteger"));
    }

    #[test]
    fn test_to_observation_reads_modelled_resource() {
        let mut resource = lab_observation();
        for key in ["id", "subject", "valueInteger"] {
            resource.body.remove(key);
        }
        resource
            .body
            .insert("effectivePeriod".to_string(), json!({"start": "2024-03-01T09:00:00+01:00"}));
        let obs = resource.to_observation().unwrap();
        assert!(matches!(obs.effective, Some(Effective::EffectivePeriod(_))));
        assert!(obs.value.is_none());
    }

    #[test]
    fn test_quantity_without_value_is_rejected() {
        let result: std::result::Result<Quantity, _> = serde_json::from_value(json!({"unit": "%"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_extension_serialization() {
        let ext = Extension::nested(
            "https://example.org/a",
            vec![Extension::with_value(
                "https://example.org/a/b",
                ExtensionValue::ValueDecimal(1.5),
            )],
        );
        let value = serde_json::to_value(&ext).unwrap();
        assert_eq!(value["extension"][0]["valueDecimal"], 1.5);
        assert!(value.get("valueString").is_none());
    }

    #[test]
    fn test_clinical_record_kind_and_json() {
        let mut body = serde_json::Map::new();
        body.insert("resourceType".to_string(), json!("Condition"));
        let record = ClinicalRecord::Resource(ClinicalResource {
            kind: ResourceKind::Condition,
            body,
        });
        assert_eq!(record.resource_kind(), ResourceKind::Condition);
        assert!(record.as_observation().is_none());
        assert_eq!(record.into_json().unwrap()["resourceType"], "Condition");
    }

    #[test]
    fn test_resource_kind_from_str() {
        assert_eq!(
            "MedicationRequest".parse::<ResourceKind>().unwrap(),
            ResourceKind::MedicationRequest
        );
        assert!("Patient".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_period_serialization() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap().fixed_offset();
        let period = Period {
            start: Some(start),
            end: None,
        };
        let value = serde_json::to_value(Effective::EffectivePeriod(period)).unwrap();
        assert_eq!(value["effectivePeriod"]["start"], "2024-03-01T08:00:00+00:00");
    }

    #[test]
    fn test_append_extension_replaces_by_url() {
        let mut obs = Observation::builder().code(heart_rate_code()).build().unwrap();
        let ext = |v: bool| Extension::with_value("https://example.org/flag", ExtensionValue::ValueBoolean(v));
        obs.append_extension(ext(false), false);
        obs.append_extension(ext(false), false);
        assert_eq!(obs.extension.len(), 2);
        obs.append_extension(ext(true), true);
        assert_eq!(obs.extension.len(), 1);
        assert_eq!(obs.extension[0].value, Some(ExtensionValue::ValueBoolean(true)));
        obs.remove_extensions("https://example.org/flag");
        assert!(obs.extension.is_empty());
    }
}
