//! State of mind conversion
//!
//! Enumerated fields map through forward-compatible tables: raw values added
//! by newer HealthKit releases become `"unknown"` instead of failing.

use super::enums::{
    STATE_OF_MIND_ASSOCIATION, STATE_OF_MIND_KIND, STATE_OF_MIND_LABEL, VALENCE_CLASSIFICATION,
};
use super::observation::{finish, shell, ConversionOptions};
use crate::domain::errors::ConversionError;
use crate::domain::record::{ComponentValue, Observation, ObservationComponent, Quantity};
use crate::domain::result::ConversionResult;
use crate::domain::sample::StateOfMindSample;
use crate::domain::vocabulary::StateOfMindType;
use crate::mapping::{concept_of, CodedMapping, MappingConfiguration};

fn text(mapping: &CodedMapping, value: &str) -> ObservationComponent {
    ObservationComponent::new(
        concept_of(&mapping.codings),
        ComponentValue::ValueString(value.to_string()),
    )
}

/// Builds the Observation for a state of mind sample
///
/// # Errors
///
/// [`ConversionError::NotSupported`] when no state of mind mapping exists.
pub fn build(
    sample: &StateOfMindSample,
    config: &MappingConfiguration,
    options: &ConversionOptions,
) -> ConversionResult<Observation> {
    let identifier = &sample.header.type_identifier;
    let mapping = StateOfMindType::from_identifier(identifier)
        .and_then(|ty| config.state_of_mind(ty))
        .ok_or_else(|| {
            ConversionError::not_supported(format!("no state of mind mapping for '{identifier}'"))
        })?;

    let mut components = vec![
        text(&mapping.kind, STATE_OF_MIND_KIND.describe_or_unknown(sample.kind)),
        ObservationComponent::new(
            concept_of(&mapping.valence.codings),
            ComponentValue::ValueQuantity(Quantity::unitless(sample.valence)),
        ),
        text(
            &mapping.valence_classification,
            VALENCE_CLASSIFICATION.describe_or_unknown(sample.valence_classification),
        ),
    ];
    components.extend(
        sample
            .labels
            .iter()
            .map(|raw| text(&mapping.label, STATE_OF_MIND_LABEL.describe_or_unknown(*raw))),
    );
    components.extend(sample.associations.iter().map(|raw| {
        text(
            &mapping.association,
            STATE_OF_MIND_ASSOCIATION.describe_or_unknown(*raw),
        )
    }));

    finish(shell(&sample.header, &mapping.codings, &mapping.categories, options).components(components))
}
