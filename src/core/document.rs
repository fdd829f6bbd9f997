//! Clinical document decoding
//!
//! Clinical documents arrive already encoded as FHIR JSON. They are decoded by
//! `resourceType` and checked for the elements FHIR R4 requires of that
//! resource; nothing is re-mapped and every element is kept, Observations
//! included.

use serde_json::{Map, Value};

use crate::domain::errors::ConversionError;
use crate::domain::record::{ClinicalRecord, ClinicalResource, ResourceKind};
use crate::domain::result::ConversionResult;
use crate::domain::sample::ClinicalDocumentSample;

/// The only FHIR release this crate decodes (R4)
pub const SUPPORTED_FHIR_VERSION: &str = "4.0.1";

/// Elements a resource must carry; each slot lists accepted alternatives
fn required_elements(kind: ResourceKind) -> &'static [&'static [&'static str]] {
    match kind {
        ResourceKind::AllergyIntolerance => &[&["patient"]],
        ResourceKind::Condition => &[&["subject"]],
        ResourceKind::Coverage => &[&["status"], &["beneficiary"], &["payor"]],
        ResourceKind::Immunization => &[
            &["status"],
            &["vaccineCode"],
            &["patient"],
            &["occurrenceDateTime", "occurrenceString"],
        ],
        ResourceKind::MedicationDispense => &[
            &["status"],
            &["medicationCodeableConcept", "medicationReference"],
        ],
        ResourceKind::MedicationRequest => &[
            &["status"],
            &["intent"],
            &["medicationCodeableConcept", "medicationReference"],
            &["subject"],
        ],
        ResourceKind::MedicationStatement => &[
            &["status"],
            &["medicationCodeableConcept", "medicationReference"],
            &["subject"],
        ],
        ResourceKind::Observation => &[&["status"], &["code"]],
        ResourceKind::Procedure => &[&["status"], &["subject"]],
    }
}

fn check_required(kind: ResourceKind, body: &Map<String, Value>) -> ConversionResult<()> {
    for alternatives in required_elements(kind) {
        let present = alternatives
            .iter()
            .any(|name| body.get(*name).is_some_and(|v| !v.is_null()));
        if !present {
            return Err(ConversionError::not_supported(format!(
                "{kind} is missing required element '{}'",
                alternatives.join("' or '")
            )));
        }
    }
    Ok(())
}

/// Decodes a raw FHIR JSON payload
///
/// # Errors
///
/// * [`ConversionError::UnsupportedFormatVersion`] when `declared_version`
///   is not [`SUPPORTED_FHIR_VERSION`]
/// * [`ConversionError::NotSupported`] for malformed JSON, an unknown
///   `resourceType` or a missing required element
pub fn decode(raw: &str, declared_version: &str) -> ConversionResult<ClinicalRecord> {
    if declared_version != SUPPORTED_FHIR_VERSION {
        return Err(ConversionError::UnsupportedFormatVersion {
            declared: declared_version.to_string(),
            supported: SUPPORTED_FHIR_VERSION.to_string(),
        });
    }

    let body: Map<String, Value> = serde_json::from_str(raw)
        .map_err(|e| ConversionError::not_supported(format!("malformed FHIR payload: {e}")))?;
    let resource_type = body
        .get("resourceType")
        .and_then(Value::as_str)
        .ok_or_else(|| ConversionError::not_supported("FHIR payload has no resourceType"))?;
    let kind: ResourceKind = resource_type.parse().map_err(ConversionError::NotSupported)?;
    check_required(kind, &body)?;

    tracing::debug!(resource_type = %kind, "Decoded clinical document");

    Ok(ClinicalRecord::Resource(ClinicalResource { kind, body }))
}

/// Decodes the payload of a clinical document sample
///
/// # Errors
///
/// [`ConversionError::InvalidDocument`] when the sample carries no payload,
/// otherwise whatever [`decode`] returns.
pub fn decode_sample(sample: &ClinicalDocumentSample) -> ConversionResult<ClinicalRecord> {
    let payload = sample.fhir_resource.as_ref().ok_or_else(|| {
        ConversionError::InvalidDocument(format!(
            "clinical document {} has no FHIR resource",
            sample.header.id
        ))
    })?;
    decode(&payload.data, &payload.fhir_version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::SampleId;
    use crate::domain::sample::{FhirResourcePayload, SampleHeader};
    use chrono::Utc;
    use serde_json::json;

    const CONDITION: &str = r#"{
        "resourceType": "Condition",
        "subject": {"reference": "Patient/1"},
        "code": {"text": "Asthma"}
    }"#;

    #[test]
    fn test_decode_condition() {
        let record = decode(CONDITION, "4.0.1").unwrap();
        assert_eq!(record.resource_kind(), ResourceKind::Condition);
        assert_eq!(record.into_json().unwrap()["code"], json!({"text": "Asthma"}));
    }

    #[test]
    fn test_decode_observation() {
        let raw = json!({
            "resourceType": "Observation",
            "status": "final",
            "code": {"coding": [{"system": "http://loinc.org", "code": "4548-4"}]},
            "valueQuantity": {"value": 5.9, "unit": "%"}
        })
        .to_string();
        let record = decode(&raw, SUPPORTED_FHIR_VERSION).unwrap();
        assert_eq!(record.resource_kind(), ResourceKind::Observation);
        assert!(record.as_observation().is_none());
        let ClinicalRecord::Resource(resource) = record else {
            panic!("clinical documents stay as resources");
        };
        let obs = resource.to_observation().unwrap();
        assert_eq!(obs.code.coding[0].code.as_deref(), Some("4548-4"));
    }

    #[test]
    fn test_observation_round_trips_every_element() {
        let lab = json!({
            "resourceType": "Observation",
            "id": "lab-1",
            "status": "final",
            "code": {"coding": [{"system": "http://loinc.org", "code": "2345-7"}]},
            "subject": {"reference": "Patient/1"},
            "effectiveInstant": "2024-03-01T08:00:00Z",
            "valueInteger": 7,
            "referenceRange": [{"low": {"value": 4}, "high": {"value": 9}}],
            "note": [{"text": "fasting"}]
        });
        let record = decode(&lab.to_string(), SUPPORTED_FHIR_VERSION).unwrap();
        assert_eq!(record.into_json().unwrap(), lab);
    }

    #[test]
    fn test_version_mismatch() {
        let err = decode(CONDITION, "3.0.2").unwrap_err();
        assert_eq!(
            err,
            ConversionError::UnsupportedFormatVersion {
                declared: "3.0.2".to_string(),
                supported: "4.0.1".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_kind_and_missing_elements() {
        let patient = json!({"resourceType": "Patient"}).to_string();
        assert!(matches!(
            decode(&patient, "4.0.1").unwrap_err(),
            ConversionError::NotSupported(_)
        ));

        let immunization = json!({
            "resourceType": "Immunization",
            "status": "completed",
            "vaccineCode": {"text": "flu"},
            "patient": {"reference": "Patient/1"}
        })
        .to_string();
        let err = decode(&immunization, "4.0.1").unwrap_err();
        assert!(err.to_string().contains("occurrenceDateTime"));

        assert!(matches!(
            decode("{not json", "4.0.1").unwrap_err(),
            ConversionError::NotSupported(_)
        ));
    }

    #[test]
    fn test_missing_payload() {
        let now = Utc::now();
        let mut sample = ClinicalDocumentSample {
            header: SampleHeader::new(SampleId::generate(), "HKClinicalTypeIdentifierConditionRecord", now, now),
            fhir_resource: None,
        };
        assert!(matches!(
            decode_sample(&sample).unwrap_err(),
            ConversionError::InvalidDocument(_)
        ));

        sample.fhir_resource = Some(FhirResourcePayload {
            fhir_version: "4.0.1".to_string(),
            data: CONDITION.to_string(),
        });
        assert!(decode_sample(&sample).is_ok());
    }
}
