//! Electrocardiogram conversion
//!
//! Component order is fixed: number of voltage measurements, sampling
//! frequency (if known), classification, average heart rate (if known),
//! symptoms status, one component per symptom, then one SampledData
//! component per voltage window.

use super::enums::{ECG_CLASSIFICATION, ECG_SYMPTOMS_STATUS, SEVERITY};
use super::observation::{finish, shell, ConversionOptions};
use super::units::{resolve_quantity, UnitExpr};
use super::waveform::{sampled_data, window};
use crate::domain::errors::ConversionError;
use crate::domain::record::{ComponentValue, Observation, ObservationComponent, Quantity};
use crate::domain::result::ConversionResult;
use crate::domain::sample::{ElectrocardiogramSample, SampleQuantity};
use crate::domain::vocabulary::{CategoryType, ElectrocardiogramType};
use crate::mapping::{
    concept_of, ElectrocardiogramMapping, MappedCode, MappingConfiguration, QuantityMapping,
};

fn quantity_component(
    mapping: &QuantityMapping,
    quantity: &SampleQuantity,
) -> ConversionResult<ObservationComponent> {
    let value = resolve_quantity(quantity.value, &quantity.unit, Some(&mapping.unit))?;
    Ok(ObservationComponent::new(
        concept_of(&mapping.codings),
        ComponentValue::ValueQuantity(value),
    ))
}

fn string_component(codings: &[MappedCode], value: &str) -> ObservationComponent {
    ObservationComponent::new(concept_of(codings), ComponentValue::ValueString(value.to_string()))
}

fn fixed_components(
    sample: &ElectrocardiogramSample,
    mapping: &ElectrocardiogramMapping,
) -> ConversionResult<Vec<ObservationComponent>> {
    let count_mapping = &mapping.number_of_voltage_measurements;
    let mut components = vec![ObservationComponent::new(
        concept_of(&count_mapping.codings),
        ComponentValue::ValueQuantity(Quantity {
            value: sample.number_of_voltage_measurements as f64,
            unit: Some(count_mapping.unit.display_unit().to_string()),
            system: count_mapping.unit.system.clone(),
            code: count_mapping.unit.code.clone(),
        }),
    )];

    if let Some(frequency) = &sample.sampling_frequency {
        components.push(quantity_component(&mapping.sampling_frequency, frequency)?);
    }

    let classification = ECG_CLASSIFICATION.case_name(sample.classification)?;
    components.push(string_component(&mapping.classification.codings, classification));

    if let Some(heart_rate) = &sample.average_heart_rate {
        components.push(quantity_component(&mapping.average_heart_rate, heart_rate)?);
    }

    let symptoms_status = ECG_SYMPTOMS_STATUS.case_name(sample.symptoms_status)?;
    components.push(string_component(&mapping.symptoms_status.codings, symptoms_status));
    Ok(components)
}

fn symptom_components(
    sample: &ElectrocardiogramSample,
    config: &MappingConfiguration,
) -> ConversionResult<Vec<ObservationComponent>> {
    sample
        .symptoms
        .iter()
        .map(|(identifier, severity)| {
            let mapping = CategoryType::from_identifier(identifier)
                .and_then(|ty| config.category(ty))
                .ok_or_else(|| {
                    ConversionError::not_supported(format!(
                        "no category mapping for symptom '{identifier}'"
                    ))
                })?;
            Ok(string_component(&mapping.codings, SEVERITY.describe(*severity)?))
        })
        .collect()
}

fn sampling_frequency_hz(sample: &ElectrocardiogramSample) -> ConversionResult<Option<f64>> {
    let Some(frequency) = &sample.sampling_frequency else {
        return Ok(None);
    };
    let source = UnitExpr::parse(&frequency.unit)
        .map_err(|e| ConversionError::invalid_value(format!("sampling frequency unit: {e}")))?;
    let hertz = UnitExpr::parse("Hz").map_err(ConversionError::invalid_value)?;
    let hz = source.convert(frequency.value, &hertz)?;
    if !(hz.is_finite() && hz > 0.0) {
        return Err(ConversionError::invalid_value(format!(
            "sampling frequency must be positive, got {hz} Hz"
        )));
    }
    Ok(Some(hz))
}

fn voltage_components(
    sample: &ElectrocardiogramSample,
    mapping: &ElectrocardiogramMapping,
) -> ConversionResult<Vec<ObservationComponent>> {
    if sample.voltage_measurements.is_empty() {
        return Ok(Vec::new());
    }
    let voltage = &mapping.voltage_measurements;
    let source = UnitExpr::parse(&sample.voltage_unit)
        .map_err(|e| ConversionError::invalid_value(format!("voltage unit: {e}")))?;
    let target = UnitExpr::parse(&voltage.unit.hkunit)
        .map_err(|e| ConversionError::invalid_value(format!("mapped voltage unit: {e}")))?;

    let windowed = window(
        &sample.voltage_measurements,
        sampling_frequency_hz(sample)?,
        mapping.window_seconds,
    );
    let origin = Quantity {
        value: 0.0,
        unit: Some(voltage.unit.display_unit().to_string()),
        system: voltage.unit.system.clone(),
        code: voltage.unit.code.clone(),
    };

    windowed
        .windows
        .iter()
        .map(|batch| {
            let values = batch
                .iter()
                .map(|m| source.convert(m.value, &target))
                .collect::<ConversionResult<Vec<f64>>>()?;
            Ok(ObservationComponent::new(
                concept_of(&voltage.codings),
                ComponentValue::ValueSampledData(sampled_data(
                    &values,
                    windowed.period_ms,
                    origin.clone(),
                    mapping.precision,
                )),
            ))
        })
        .collect()
}

/// Builds the Observation for an electrocardiogram
///
/// # Errors
///
/// * [`ConversionError::NotSupported`] when the electrocardiogram or a
///   symptom has no mapping
/// * [`ConversionError::InvalidValue`] for an unknown classification,
///   symptoms status or severity, or an unconvertible unit
pub fn build(
    sample: &ElectrocardiogramSample,
    config: &MappingConfiguration,
    options: &ConversionOptions,
) -> ConversionResult<Observation> {
    let identifier = &sample.header.type_identifier;
    let mapping = ElectrocardiogramType::from_identifier(identifier)
        .and_then(|ty| config.electrocardiogram(ty))
        .ok_or_else(|| {
            ConversionError::not_supported(format!("no electrocardiogram mapping for '{identifier}'"))
        })?;

    let mut components = fixed_components(sample, mapping)?;
    components.extend(symptom_components(sample, config)?);
    components.extend(voltage_components(sample, mapping)?);

    finish(shell(&sample.header, &mapping.codings, &mapping.categories, options).components(components))
}
