//! Sample metadata extension
//!
//! Every metadata entry becomes one sub-extension of `metadata`, keyed by the
//! metadata key. Quantities are only written for keys with a known target
//! unit; numbers under enum-valued keys become codings. A session estimate
//! takes the unit the owning quantity sample is mapped to.

use std::sync::Arc;

use chrono::Utc;

use super::{child_url, extension_url, ExtensionBuilder};
use crate::core::enums::metadata_enum;
use crate::core::units::resolve_quantity;
use crate::domain::record::{Extension, ExtensionValue, Observation, UCUM_SYSTEM};
use crate::domain::result::ConversionResult;
use crate::domain::sample::{MetadataValue, SampleHeader};
use crate::log_metadata_skipped;
use crate::domain::vocabulary::QuantityType;
use crate::mapping::{MappedUnit, MappingConfiguration};

/// (key suffix, HealthKit unit, display unit, UCUM code)
const QUANTITY_KEYS: &[(&str, &str, &str, &str)] = &[
    ("WeatherTemperature", "degC", "C", "Cel"),
    ("WeatherHumidity", "%", "%", "%"),
    ("HeartRateRecoveryActivityDuration", "s", "s", "s"),
    ("HeartRateRecoveryMaxObservedRecoveryHeartRate", "count/min", "beats/minute", "/min"),
    ("AverageSpeed", "m/s", "m/sec", "m/s"),
    ("MaximumSpeed", "m/s", "m/sec", "m/s"),
    ("AlpineSlopeGrade", "%", "%", "%"),
    ("ElevationAscended", "m", "m", "m"),
    ("ElevationDescended", "m", "m", "m"),
    ("IndoorBikeDistance", "m", "m", "m"),
    ("CrossTrainerDistance", "m", "m", "m"),
    ("FitnessMachineDuration", "s", "s", "s"),
    ("HeartRateEventThreshold", "count/min", "beats/min", "/min"),
    ("AverageMETs", "kcal/(kg*hr)", "kcal/(kg*hr)", "kcal/(kg*hr)"),
    ("AudioExposureLevel", "dBASPL", "dB(SPL)", "dB(SPL)"),
    ("AudioExposureDuration", "s", "s", "s"),
    ("BarometricPressure", "mmHg", "mmHg", "mm[Hg]"),
    ("VO2MaxValue", "mL/kg*min", "mL/kg/min", "mL/kg/min"),
    ("LowCardioFitnessEventThreshold", "mL/kg*min", "mL/kg/min", "mL/kg/min"),
    ("HeadphoneGain", "dBASPL", "dB(SPL)", "dB(SPL)"),
    ("MaximumLightIntensity", "lx", "lux", "lux"),
];

const KEY_PREFIX: &str = "HKMetadataKey";

const SESSION_ESTIMATE_KEY: &str = "HKMetadataKeySessionEstimate";

/// Target unit for a quantity-valued metadata key
pub fn metadata_unit(key: &str) -> Option<MappedUnit> {
    let suffix = key.strip_prefix(KEY_PREFIX)?;
    QUANTITY_KEYS
        .iter()
        .find(|(name, ..)| *name == suffix)
        .map(|(_, hkunit, alias, code)| MappedUnit {
            hkunit: (*hkunit).to_string(),
            unit_alias: Some((*alias).to_string()),
            system: Some(UCUM_SYSTEM.to_string()),
            code: Some((*code).to_string()),
        })
}

/// Writes sample metadata under `metadata`
///
/// Entries of an unrecognized shape are skipped and logged. If nothing is
/// left, the extension is removed. Session estimates need the mapping
/// configuration and are skipped without one.
#[derive(Debug, Clone, Default)]
pub struct MetadataExtension {
    mappings: Option<Arc<MappingConfiguration>>,
}

impl MetadataExtension {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves session estimates against `mappings`
    pub fn with_mappings(mappings: Arc<MappingConfiguration>) -> Self {
        Self {
            mappings: Some(mappings),
        }
    }

    /// Unit of the quantity sample that owns a session estimate
    fn session_estimate_unit(&self, header: &SampleHeader) -> Option<MappedUnit> {
        let mappings = self.mappings.as_ref()?;
        let ty = QuantityType::from_identifier(&header.type_identifier)?;
        mappings.quantity(ty).map(|mapping| mapping.unit.clone())
    }

    fn value_of(
        &self,
        header: &SampleHeader,
        key: &str,
        value: &MetadataValue,
    ) -> ConversionResult<Option<ExtensionValue>> {
        let encoded = match value {
            MetadataValue::String(s) => ExtensionValue::ValueString(s.clone()),
            MetadataValue::Boolean(b) => ExtensionValue::ValueBoolean(*b),
            MetadataValue::Date(at) => ExtensionValue::ValueDateTime(at.with_timezone(&Utc).fixed_offset()),
            MetadataValue::Number(n) => {
                let coding = metadata_enum(key)
                    .filter(|_| n.fract() == 0.0)
                    .and_then(|table| table.coding(*n as i64));
                match coding {
                    Some(coding) => ExtensionValue::ValueCoding(coding),
                    None => ExtensionValue::ValueDecimal(*n),
                }
            }
            MetadataValue::Quantity(q) => {
                let unit = if key == SESSION_ESTIMATE_KEY {
                    self.session_estimate_unit(header)
                } else {
                    metadata_unit(key)
                };
                let Some(unit) = unit else {
                    log_metadata_skipped!(key, "quantity under a key with no known unit");
                    return Ok(None);
                };
                ExtensionValue::ValueQuantity(resolve_quantity(q.value, &q.unit, Some(&unit))?)
            }
        };
        Ok(Some(encoded))
    }
}

impl ExtensionBuilder<SampleHeader> for MetadataExtension {
    fn url(&self) -> String {
        extension_url("metadata")
    }

    fn apply(&self, header: &SampleHeader, observation: &mut Observation) -> ConversionResult<()> {
        let url = self.url();
        let mut block = Extension::nested(url.clone(), Vec::new());
        for (key, value) in &header.metadata {
            if let Some(encoded) = self.value_of(header, key, value)? {
                block.replace_extension(Extension::with_value(child_url(&url, &[key.as_str()]), encoded));
            }
        }

        if block.extension.is_empty() {
            observation.remove_extensions(&url);
        } else {
            observation.append_extension(block, true);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ConversionError;
    use crate::domain::ids::SampleId;
    use crate::domain::record::{CodeableConcept, Coding};
    use crate::domain::sample::SampleQuantity;

    fn observation() -> Observation {
        Observation::builder()
            .code(CodeableConcept::single(Coding::without_display("http://loinc.org", "8867-4")))
            .build()
            .unwrap()
    }

    fn header() -> SampleHeader {
        let now = Utc::now();
        SampleHeader::new(SampleId::generate(), "HKQuantityTypeIdentifierHeartRate", now, now)
    }

    fn entry<'a>(obs: &'a Observation, key: &str) -> Option<&'a ExtensionValue> {
        let url = child_url(&extension_url("metadata"), &[key]);
        obs.extension_by_url(&extension_url("metadata"))?
            .extension
            .iter()
            .find(|e| e.url == url)?
            .value
            .as_ref()
    }

    #[test]
    fn test_value_shapes() {
        let h = header()
            .with_metadata("HKMetadataKeyExternalUUID", MetadataValue::String("abc".to_string()))
            .with_metadata("HKMetadataKeyWasUserEntered", MetadataValue::Boolean(true))
            .with_metadata("custom.count", MetadataValue::Number(3.5));
        let mut obs = observation();
        MetadataExtension::new().apply(&h, &mut obs).unwrap();

        assert_eq!(
            entry(&obs, "HKMetadataKeyExternalUUID"),
            Some(&ExtensionValue::ValueString("abc".to_string()))
        );
        assert_eq!(
            entry(&obs, "HKMetadataKeyWasUserEntered"),
            Some(&ExtensionValue::ValueBoolean(true))
        );
        assert_eq!(entry(&obs, "custom.count"), Some(&ExtensionValue::ValueDecimal(3.5)));
    }

    #[test]
    fn test_enum_key_becomes_coding() {
        let h = header()
            .with_metadata("HKMetadataKeyHeartRateMotionContext", MetadataValue::Number(1.0))
            .with_metadata("HKMetadataKeyHeartRateSensorLocation", MetadataValue::Number(99.0));
        let mut obs = observation();
        MetadataExtension::new().apply(&h, &mut obs).unwrap();

        match entry(&obs, "HKMetadataKeyHeartRateMotionContext") {
            Some(ExtensionValue::ValueCoding(coding)) => {
                assert_eq!(coding.code.as_deref(), Some("1"));
                assert_eq!(
                    coding.system.as_deref(),
                    Some("https://developer.apple.com/documentation/healthkit/hkheartratemotioncontext")
                );
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            entry(&obs, "HKMetadataKeyHeartRateSensorLocation"),
            Some(&ExtensionValue::ValueDecimal(99.0))
        );
    }

    #[test]
    fn test_known_quantity_key_converted() {
        let h = header().with_metadata(
            "HKMetadataKeyWeatherTemperature",
            MetadataValue::Quantity(SampleQuantity::new(212.0, "degF")),
        );
        let mut obs = observation();
        MetadataExtension::new().apply(&h, &mut obs).unwrap();
        match entry(&obs, "HKMetadataKeyWeatherTemperature") {
            Some(ExtensionValue::ValueQuantity(q)) => {
                assert!((q.value - 100.0).abs() < 1e-9);
                assert_eq!(q.code.as_deref(), Some("Cel"));
                assert_eq!(q.unit.as_deref(), Some("C"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unknown_quantity_key_skipped() {
        let h = header().with_metadata(
            "custom.weight",
            MetadataValue::Quantity(SampleQuantity::new(1.0, "kg")),
        );
        let mut obs = observation();
        MetadataExtension::new().apply(&h, &mut obs).unwrap();
        assert!(obs.extension.is_empty());
    }

    #[test]
    fn test_incompatible_quantity_unit() {
        let h = header().with_metadata(
            "HKMetadataKeyAverageSpeed",
            MetadataValue::Quantity(SampleQuantity::new(1.0, "kg")),
        );
        let err = MetadataExtension::new().apply(&h, &mut observation()).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidValue(_)));
    }

    #[test]
    fn test_empty_metadata_removes_extension() {
        let mut obs = observation();
        let h = header().with_metadata("k", MetadataValue::Boolean(false));
        MetadataExtension::new().apply(&h, &mut obs).unwrap();
        assert_eq!(obs.extension.len(), 1);
        MetadataExtension::new().apply(&header(), &mut obs).unwrap();
        assert!(obs.extension.is_empty());
    }

    #[test]
    fn test_session_estimate_uses_sample_mapping() {
        let h = header().with_metadata(
            SESSION_ESTIMATE_KEY,
            MetadataValue::Quantity(SampleQuantity::new(1.5, "count/s")),
        );
        let mappings = Arc::new(MappingConfiguration::bundled().unwrap());
        let mut obs = observation();
        MetadataExtension::with_mappings(mappings).apply(&h, &mut obs).unwrap();
        match entry(&obs, SESSION_ESTIMATE_KEY) {
            Some(ExtensionValue::ValueQuantity(q)) => {
                assert!((q.value - 90.0).abs() < 1e-9);
                assert_eq!(q.code.as_deref(), Some("/min"));
                assert_eq!(q.system.as_deref(), Some(UCUM_SYSTEM));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_session_estimate_skipped_without_quantity_mapping() {
        let estimate = MetadataValue::Quantity(SampleQuantity::new(1.5, "count/s"));
        let mut obs = observation();
        MetadataExtension::new()
            .apply(&header().with_metadata(SESSION_ESTIMATE_KEY, estimate.clone()), &mut obs)
            .unwrap();
        assert!(obs.extension.is_empty());

        let now = Utc::now();
        let category = SampleHeader::new(SampleId::generate(), "HKCategoryTypeIdentifierHeadache", now, now)
            .with_metadata(SESSION_ESTIMATE_KEY, estimate);
        let mappings = Arc::new(MappingConfiguration::bundled().unwrap());
        MetadataExtension::with_mappings(mappings)
            .apply(&category, &mut obs)
            .unwrap();
        assert!(obs.extension.is_empty());
    }

    #[test]
    fn test_metadata_unit_lookup() {
        let unit = metadata_unit("HKMetadataKeyBarometricPressure").unwrap();
        assert_eq!(unit.code.as_deref(), Some("mm[Hg]"));
        assert!(metadata_unit("BarometricPressure").is_none());
        assert!(metadata_unit("HKMetadataKeySessionEstimate").is_none());
    }
}
