//! Sample dispatch
//!
//! Routes each [`SampleRecord`] variant to its family builder, then runs the
//! extension chain over the result. Clinical documents are decoded as they
//! are and skip the chain.

use std::sync::Arc;
use std::time::Instant;

use super::extensions::{ExtensionComposer, ExtensionInput, StandardExtensions};
use super::observation::ConversionOptions;
use super::{category, correlation, document, electrocardiogram, quantity, state_of_mind, workout};
use crate::domain::errors::ConversionError;
use crate::domain::record::{ClinicalRecord, Observation};
use crate::domain::result::ConversionResult;
use crate::domain::sample::SampleRecord;
use crate::mapping::MappingConfiguration;
use crate::{log_conversion_complete, log_conversion_start};

/// Converts one sample with the standard extension chain and default options
///
/// # Errors
///
/// Any [`ConversionError`] raised by the family builder or the extension chain.
pub fn convert(sample: &SampleRecord, config: &Arc<MappingConfiguration>) -> ConversionResult<ClinicalRecord> {
    let composer = ExtensionComposer::for_mappings(StandardExtensions::default(), Arc::clone(config));
    convert_with(sample, config, &composer, &ConversionOptions::default())
}

/// Like [`convert`], but only accepts Observation output
///
/// # Errors
///
/// [`ConversionError::NotSupported`] when the sample decodes to another
/// resource kind, or to an Observation document carrying elements the
/// [`Observation`] model does not hold.
pub fn convert_observation(
    sample: &SampleRecord,
    config: &Arc<MappingConfiguration>,
) -> ConversionResult<Observation> {
    into_observation(convert(sample, config)?)
}

fn into_observation(record: ClinicalRecord) -> ConversionResult<Observation> {
    match record {
        ClinicalRecord::Observation(obs) => Ok(*obs),
        ClinicalRecord::Resource(resource) => resource.to_observation().map_err(ConversionError::NotSupported),
    }
}

fn convert_with(
    sample: &SampleRecord,
    config: &MappingConfiguration,
    composer: &ExtensionComposer,
    options: &ConversionOptions,
) -> ConversionResult<ClinicalRecord> {
    let header = sample.header();
    log_conversion_start!(header.type_identifier, header.id);

    let mut observation = match sample {
        SampleRecord::Quantity(s) => quantity::build(s, config, options)?,
        SampleRecord::Category(s) => category::build(s, config, options)?,
        SampleRecord::Correlation(s) => correlation::build(s, config, options)?,
        SampleRecord::Waveform(s) => electrocardiogram::build(s, config, options)?,
        SampleRecord::Workout(s) => workout::build(s, config, options)?,
        SampleRecord::MoodState(s) => state_of_mind::build(s, config, options)?,
        SampleRecord::ClinicalDocument(s) => return document::decode_sample(s),
    };
    composer.apply(ExtensionInput::Header(header), &mut observation)?;
    Ok(observation.into())
}

/// Bundles a shared mapping configuration with an extension chain and options
///
/// Cloning the configuration `Arc` is all it takes to use one converter per
/// worker thread.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use hkfhir::core::dispatch::Converter;
/// use hkfhir::mapping::MappingConfiguration;
///
/// let config = Arc::new(MappingConfiguration::bundled().unwrap());
/// let converter = Converter::new(config);
/// assert_eq!(converter.composer().len(), 4);
/// ```
#[derive(Debug)]
pub struct Converter {
    config: Arc<MappingConfiguration>,
    composer: ExtensionComposer,
    options: ConversionOptions,
}

impl Converter {
    /// A converter with the standard chain and default options
    pub fn new(config: Arc<MappingConfiguration>) -> Self {
        Self {
            composer: ExtensionComposer::for_mappings(StandardExtensions::default(), Arc::clone(&config)),
            config,
            options: ConversionOptions::default(),
        }
    }

    /// Replaces the extension chain
    pub fn with_composer(mut self, composer: ExtensionComposer) -> Self {
        self.composer = composer;
        self
    }

    /// Replaces the conversion options
    pub fn with_options(mut self, options: ConversionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn config(&self) -> &Arc<MappingConfiguration> {
        &self.config
    }

    pub fn composer(&self) -> &ExtensionComposer {
        &self.composer
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Converts one sample
    ///
    /// # Errors
    ///
    /// Any [`ConversionError`] raised by the family builder or the extension chain.
    pub fn convert(&self, sample: &SampleRecord) -> ConversionResult<ClinicalRecord> {
        convert_with(sample, &self.config, &self.composer, &self.options)
    }

    /// Converts one sample that must produce an Observation
    ///
    /// # Errors
    ///
    /// [`ConversionError::NotSupported`] for non-Observation output, plus any
    /// error [`Converter::convert`] returns.
    pub fn convert_observation(&self, sample: &SampleRecord) -> ConversionResult<Observation> {
        into_observation(self.convert(sample)?)
    }

    /// Converts every sample independently, keeping input order
    pub fn convert_all(&self, samples: &[SampleRecord]) -> Vec<ConversionResult<ClinicalRecord>> {
        let started = Instant::now();
        let results: Vec<_> = samples.iter().map(|s| self.convert(s)).collect();
        let converted = results.iter().filter(|r| r.is_ok()).count();
        log_conversion_complete!(converted, started.elapsed());
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extensions::extension_url;
    use crate::domain::ids::SampleId;
    use crate::domain::record::ResourceKind;
    use crate::domain::sample::{
        ClinicalDocumentSample, FhirResourcePayload, QuantitySample, SampleHeader, SourceDevice,
    };
    use chrono::{Duration, Utc};

    fn heart_rate() -> SampleRecord {
        let start = Utc::now();
        SampleRecord::Quantity(QuantitySample {
            header: SampleHeader::new(
                SampleId::generate(),
                "HKQuantityTypeIdentifierHeartRate",
                start,
                start + Duration::seconds(30),
            )
            .with_device(SourceDevice {
                name: Some("Apple Watch".to_string()),
                ..SourceDevice::default()
            }),
            value: 84.0,
            unit: "count/min".to_string(),
        })
    }

    fn condition_document() -> SampleRecord {
        let now = Utc::now();
        SampleRecord::ClinicalDocument(ClinicalDocumentSample {
            header: SampleHeader::new(
                SampleId::generate(),
                "HKClinicalTypeIdentifierConditionRecord",
                now,
                now,
            ),
            fhir_resource: Some(FhirResourcePayload {
                fhir_version: "4.0.1".to_string(),
                data: r#"{"resourceType":"Condition","subject":{"reference":"Patient/1"}}"#
                    .to_string(),
            }),
        })
    }

    #[test]
    fn test_convert_runs_extension_chain() {
        let config = Arc::new(MappingConfiguration::bundled().unwrap());
        let obs = convert_observation(&heart_rate(), &config).unwrap();
        assert!(obs.extension_by_url(&extension_url("sourceDevice")).is_some());
        assert!(obs
            .extension_by_url(&extension_url("absoluteTimeRangeStart"))
            .is_some());
        assert!(obs.extension_by_url(&extension_url("sourceRevision")).is_none());
    }

    #[test]
    fn test_empty_chain() {
        let converter = Converter::new(Arc::new(MappingConfiguration::bundled().unwrap()))
            .with_composer(ExtensionComposer::new());
        let obs = converter.convert_observation(&heart_rate()).unwrap();
        assert!(obs.extension.is_empty());
    }

    #[test]
    fn test_clinical_document_routes_to_decoder() {
        let config = Arc::new(MappingConfiguration::bundled().unwrap());
        let record = convert(&condition_document(), &config).unwrap();
        assert_eq!(record.resource_kind(), ResourceKind::Condition);

        let err = convert_observation(&condition_document(), &config).unwrap_err();
        assert!(matches!(err, ConversionError::NotSupported(_)));
    }

    #[test]
    fn test_convert_all_keeps_order() {
        let converter = Converter::new(Arc::new(MappingConfiguration::bundled().unwrap()));
        let results = converter.convert_all(&[heart_rate(), condition_document()]);
        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0].as_ref().unwrap().resource_kind(),
            ResourceKind::Observation
        );
        assert_eq!(
            results[1].as_ref().unwrap().resource_kind(),
            ResourceKind::Condition
        );
    }
}
