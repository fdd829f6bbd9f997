//! Correlation samples: one Observation, one component per child quantity

use super::observation::{finish, shell, ConversionOptions};
use super::units::resolve_quantity;
use crate::domain::errors::ConversionError;
use crate::domain::record::{ComponentValue, Observation, ObservationComponent};
use crate::domain::result::ConversionResult;
use crate::domain::sample::{CorrelationSample, SampleRecord};
use crate::domain::vocabulary::{CorrelationType, QuantityType};
use crate::mapping::{concept_of, MappingConfiguration};

/// Builds one component per child sample
///
/// Fails on the first child that cannot be represented; no partial list is
/// ever returned.
///
/// # Errors
///
/// * [`ConversionError::NotSupported`] when a child is not a quantity sample
///   or has no quantity mapping
/// * [`ConversionError::InvalidValue`] when a child unit is incompatible
pub fn components(
    children: &[SampleRecord],
    config: &MappingConfiguration,
) -> ConversionResult<Vec<ObservationComponent>> {
    children
        .iter()
        .map(|child| {
            let SampleRecord::Quantity(sample) = child else {
                return Err(ConversionError::not_supported(format!(
                    "correlation child of kind '{}' is not a quantity",
                    child.kind_name()
                )));
            };
            let identifier = &sample.header.type_identifier;
            let mapping = QuantityType::from_identifier(identifier)
                .and_then(|ty| config.quantity(ty))
                .ok_or_else(|| {
                    ConversionError::not_supported(format!(
                        "no quantity mapping for correlation child '{identifier}'"
                    ))
                })?;
            let quantity = resolve_quantity(sample.value, &sample.unit, Some(&mapping.unit))?;
            Ok(ObservationComponent::new(
                concept_of(&mapping.codings),
                ComponentValue::ValueQuantity(quantity),
            ))
        })
        .collect()
}

/// Builds the Observation for a correlation sample
///
/// # Errors
///
/// [`ConversionError::NotSupported`] for an unknown or unmapped correlation
/// type, plus anything [`components`] rejects.
pub fn build(
    sample: &CorrelationSample,
    config: &MappingConfiguration,
    options: &ConversionOptions,
) -> ConversionResult<Observation> {
    let identifier = &sample.header.type_identifier;
    let mapping = CorrelationType::from_identifier(identifier)
        .and_then(|ty| config.correlation(ty))
        .ok_or_else(|| {
            ConversionError::not_supported(format!("no correlation mapping for '{identifier}'"))
        })?;

    let components = components(&sample.objects, config)?;
    finish(shell(&sample.header, &mapping.codings, &mapping.categories, options).components(components))
}
