//! Quantity sample conversion

use super::observation::{finish, shell, ConversionOptions};
use super::units::resolve_quantity;
use crate::domain::errors::ConversionError;
use crate::domain::record::{Observation, ObservationValue};
use crate::domain::result::ConversionResult;
use crate::domain::sample::QuantitySample;
use crate::domain::vocabulary::QuantityType;
use crate::mapping::MappingConfiguration;

/// Builds the Observation for a quantity sample
///
/// # Errors
///
/// * [`ConversionError::NotSupported`] for an unknown or unmapped identifier
/// * [`ConversionError::InvalidValue`] when the sample unit cannot be
///   converted into the mapped unit
pub fn build(
    sample: &QuantitySample,
    config: &MappingConfiguration,
    options: &ConversionOptions,
) -> ConversionResult<Observation> {
    let identifier = &sample.header.type_identifier;
    let ty = QuantityType::from_identifier(identifier).ok_or_else(|| {
        ConversionError::not_supported(format!("unknown quantity identifier '{identifier}'"))
    })?;
    let mapping = config.quantity(ty).ok_or_else(|| {
        ConversionError::not_supported(format!("no quantity mapping for '{identifier}'"))
    })?;

    let quantity = resolve_quantity(sample.value, &sample.unit, Some(&mapping.unit))?;
    finish(
        shell(&sample.header, &mapping.codings, &mapping.categories, options)
            .value(ObservationValue::ValueQuantity(quantity)),
    )
}
