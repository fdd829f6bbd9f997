//! Integration tests for mapping documents and overrides

use hkfhir::core::Converter;
use hkfhir::domain::{MappingError, QuantitySample, SampleFamily, SampleHeader, SampleId, SampleRecord};
use hkfhir::mapping::MappingConfiguration;
use std::sync::Arc;

const HEART_RATE_PER_SECOND: &str = r#"{
  "HKQuantitySample": {
    "HKQuantityTypeIdentifierHeartRate": {
      "codings": [{"system": "http://example.org/vitals", "code": "hr", "display": "Pulse"}],
      "unit": {"hkunit": "count/s", "unitAlias": "beats/second"}
    }
  }
}"#;

fn heart_rate(value: f64) -> SampleRecord {
    let now = chrono::Utc::now();
    SampleRecord::Quantity(QuantitySample {
        header: SampleHeader::new(SampleId::generate(), "HKQuantityTypeIdentifierHeartRate", now, now),
        value,
        unit: "count/min".to_string(),
    })
}

#[test]
fn test_override_changes_conversion() {
    let bundled = MappingConfiguration::bundled().unwrap();
    let overridden = bundled.with_overrides_json(HEART_RATE_PER_SECOND).unwrap();

    let json = Converter::new(Arc::new(overridden))
        .convert(&heart_rate(90.0))
        .unwrap()
        .into_json()
        .unwrap();

    assert_eq!(json["code"]["coding"][0]["code"], "hr");
    let value = json["valueQuantity"]["value"].as_f64().unwrap();
    assert!((value - 1.5).abs() < 1e-9);
    assert_eq!(json["valueQuantity"]["unit"], "beats/second");
    // Entry replaced whole, so the bundled category is gone
    assert!(json.get("category").is_none());
}

#[test]
fn test_override_leaves_other_entries_alone() {
    let bundled = MappingConfiguration::bundled().unwrap();
    let overridden = bundled.with_overrides_json(HEART_RATE_PER_SECOND).unwrap();

    assert_eq!(
        bundled.summary().count(SampleFamily::Quantity),
        overridden.summary().count(SampleFamily::Quantity)
    );
    assert_ne!(bundled.fingerprint(), overridden.fingerprint());
    // The base configuration is untouched
    assert_eq!(
        bundled.quantity(hkfhir::domain::QuantityType::HeartRate).unwrap().unit.hkunit,
        "count/min"
    );
}

#[test]
fn test_unknown_identifier_in_override_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("overrides.json");
    std::fs::write(
        &path,
        r#"{"HKCategorySample": {"HKCategoryTypeIdentifierMadeUp": {"codings": [{"system": "http://example.org", "code": "x"}]}}}"#,
    )
    .unwrap();

    let json = std::fs::read_to_string(&path).unwrap();
    let err = MappingConfiguration::bundled()
        .unwrap()
        .with_overrides_json(&json)
        .unwrap_err();
    assert!(matches!(
        err,
        MappingError::UnknownTypeIdentifier { ref identifier, .. } if identifier == "HKCategoryTypeIdentifierMadeUp"
    ));
}

#[test]
fn test_every_mapped_identifier_is_listed() {
    let config = MappingConfiguration::bundled().unwrap();
    for family in [SampleFamily::Quantity, SampleFamily::Category, SampleFamily::Correlation] {
        let identifiers = config.mapped_identifiers(family);
        assert_eq!(identifiers.len(), config.summary().count(family));
        assert!(!identifiers.is_empty());
    }
}
