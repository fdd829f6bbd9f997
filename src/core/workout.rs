//! Workout conversion

use super::enums::WORKOUT_ACTIVITY_TYPE;
use super::observation::{finish, shell, ConversionOptions};
use super::HEALTHKIT_SYSTEM;
use crate::domain::errors::ConversionError;
use crate::domain::record::{CodeableConcept, Coding, Observation, ObservationValue};
use crate::domain::result::ConversionResult;
use crate::domain::sample::WorkoutSample;
use crate::domain::vocabulary::WorkoutType;
use crate::mapping::MappingConfiguration;

/// Builds the Observation for a workout
///
/// The activity type becomes a `valueCodeableConcept` in the HealthKit code
/// system. An activity raw value missing from the activity table is coded
/// `unknown` instead of failing the conversion.
///
/// # Errors
///
/// [`ConversionError::NotSupported`] when no workout mapping exists.
pub fn build(
    sample: &WorkoutSample,
    config: &MappingConfiguration,
    options: &ConversionOptions,
) -> ConversionResult<Observation> {
    let identifier = &sample.header.type_identifier;
    let mapping = WorkoutType::from_identifier(identifier)
        .and_then(|ty| config.workout(ty))
        .ok_or_else(|| {
            ConversionError::not_supported(format!("no workout mapping for '{identifier}'"))
        })?;

    let activity = WORKOUT_ACTIVITY_TYPE.describe_or_unknown(i64::from(sample.activity_type));
    let value = CodeableConcept::single(Coding {
        system: Some(HEALTHKIT_SYSTEM.to_string()),
        code: Some(activity.to_string()),
        display: None,
    });

    finish(
        shell(&sample.header, &mapping.codings, &mapping.categories, options)
            .value(ObservationValue::ValueCodeableConcept(value)),
    )
}
