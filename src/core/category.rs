//! Category sample resolution
//!
//! Each category identifier has a fixed descriptor: either the sample carries
//! no value (the identifier itself becomes the value) or its raw integer is a
//! case of one HealthKit enumeration. Some identifiers also surface metadata
//! entries as extra components.

use std::collections::BTreeMap;

use super::enums::{
    EnumTable, APPETITE_CHANGES, APPLE_STAND_HOUR, APPLE_WALKING_STEADINESS_EVENT,
    CERVICAL_MUCUS_QUALITY, CONTRACEPTIVE, ENVIRONMENTAL_AUDIO_EXPOSURE_EVENT,
    HEADPHONE_AUDIO_EXPOSURE_EVENT, LOW_CARDIO_FITNESS_EVENT, MENSTRUAL_FLOW,
    OVULATION_TEST_RESULT, PREGNANCY_TEST_RESULT, PRESENCE, PROGESTERONE_TEST_RESULT, SEVERITY,
    SLEEP_ANALYSIS, VAGINAL_BLEEDING,
};
use super::observation::{finish, shell, ConversionOptions};
use super::extensions::metadata::metadata_unit;
use super::units::resolve_quantity;
use super::HEALTHKIT_SYSTEM;
use crate::domain::errors::ConversionError;
use crate::domain::record::{
    CodeableConcept, Coding, ComponentValue, Observation, ObservationComponent, ObservationValue,
};
use crate::domain::result::ConversionResult;
use crate::domain::sample::{CategorySample, MetadataValue};
use crate::domain::vocabulary::CategoryType;
use crate::log_metadata_skipped;
use crate::mapping::MappingConfiguration;

/// How the raw value of a category sample is interpreted
#[derive(Debug, Clone, Copy)]
pub enum CategoryValueKind {
    /// No meaningful value; the identifier string is written instead
    PresenceOnly,
    /// The raw value is a case of this enumeration
    Enumerated(&'static EnumTable),
}

/// Shape of an auxiliary metadata entry
#[derive(Debug, Clone, Copy)]
pub enum AuxiliaryShape {
    /// A quantity converted into the key's metadata unit
    Quantity,
    Boolean,
}

/// A metadata key surfaced as a component
#[derive(Debug, Clone, Copy)]
pub struct AuxiliaryMetadata {
    pub key: &'static str,
    pub shape: AuxiliaryShape,
}

/// Fixed interpretation of one category identifier
#[derive(Debug, Clone, Copy)]
pub struct CategoryDescriptor {
    pub value: CategoryValueKind,
    pub auxiliary: &'static [AuxiliaryMetadata],
}

const fn quantity(key: &'static str) -> AuxiliaryMetadata {
    AuxiliaryMetadata {
        key,
        shape: AuxiliaryShape::Quantity,
    }
}

const HEART_RATE_THRESHOLD: &[AuxiliaryMetadata] =
    &[quantity("HKMetadataKeyHeartRateEventThreshold")];

const LOW_CARDIO_FITNESS: &[AuxiliaryMetadata] = &[
    quantity("HKMetadataKeyVO2MaxValue"),
    quantity("HKMetadataKeyLowCardioFitnessEventThreshold"),
];

const AUDIO_LEVEL: AuxiliaryMetadata = quantity("HKMetadataKeyAudioExposureLevel");

const ENVIRONMENTAL_AUDIO: &[AuxiliaryMetadata] = &[AUDIO_LEVEL];

const HEADPHONE_AUDIO: &[AuxiliaryMetadata] =
    &[AUDIO_LEVEL, quantity("HKMetadataKeyAudioExposureDuration")];

const MENSTRUAL_CYCLE_START: &[AuxiliaryMetadata] = &[AuxiliaryMetadata {
    key: "HKMetadataKeyMenstrualCycleStart",
    shape: AuxiliaryShape::Boolean,
}];

const PROTECTION_USED: &[AuxiliaryMetadata] = &[AuxiliaryMetadata {
    key: "HKMetadataKeySexualActivityProtectionUsed",
    shape: AuxiliaryShape::Boolean,
}];

const fn enumerated(table: &'static EnumTable) -> CategoryDescriptor {
    CategoryDescriptor {
        value: CategoryValueKind::Enumerated(table),
        auxiliary: &[],
    }
}

const fn presence_only() -> CategoryDescriptor {
    CategoryDescriptor {
        value: CategoryValueKind::PresenceOnly,
        auxiliary: &[],
    }
}

impl CategoryDescriptor {
    const fn with_auxiliary(self, auxiliary: &'static [AuxiliaryMetadata]) -> Self {
        Self {
            value: self.value,
            auxiliary,
        }
    }
}

/// Descriptor for a category identifier
///
/// Adding a variant to [`CategoryType`] fails to compile until it is listed here.
pub fn descriptor(ty: CategoryType) -> CategoryDescriptor {
    use CategoryType::*;
    match ty {
        AppetiteChanges => enumerated(&APPETITE_CHANGES),
        AppleStandHour => enumerated(&APPLE_STAND_HOUR),
        AppleWalkingSteadinessEvent => enumerated(&APPLE_WALKING_STEADINESS_EVENT),
        CervicalMucusQuality => enumerated(&CERVICAL_MUCUS_QUALITY),
        Contraceptive => enumerated(&CONTRACEPTIVE),
        EnvironmentalAudioExposureEvent => {
            enumerated(&ENVIRONMENTAL_AUDIO_EXPOSURE_EVENT).with_auxiliary(ENVIRONMENTAL_AUDIO)
        }
        HeadphoneAudioExposureEvent => {
            enumerated(&HEADPHONE_AUDIO_EXPOSURE_EVENT).with_auxiliary(HEADPHONE_AUDIO)
        }
        LowCardioFitnessEvent => {
            enumerated(&LOW_CARDIO_FITNESS_EVENT).with_auxiliary(LOW_CARDIO_FITNESS)
        }
        MenstrualFlow => enumerated(&MENSTRUAL_FLOW).with_auxiliary(MENSTRUAL_CYCLE_START),
        OvulationTestResult => enumerated(&OVULATION_TEST_RESULT),
        PregnancyTestResult => enumerated(&PREGNANCY_TEST_RESULT),
        ProgesteroneTestResult => enumerated(&PROGESTERONE_TEST_RESULT),
        SleepAnalysis => enumerated(&SLEEP_ANALYSIS),
        BleedingAfterPregnancy | BleedingDuringPregnancy => enumerated(&VAGINAL_BLEEDING),
        SleepChanges => enumerated(&PRESENCE),

        AbdominalCramps | Acne | BladderIncontinence | Bloating | BreastPain
        | ChestTightnessOrPain | Chills | Constipation | Coughing | Diarrhea | Dizziness
        | DrySkin | Fainting | Fatigue | Fever | GeneralizedBodyAche | HairLoss | Headache
        | Heartburn | HotFlashes | LossOfSmell | LossOfTaste | LowerBackPain | MemoryLapse
        | MoodChanges | Nausea | NightSweats | PelvicPain | RapidPoundingOrFlutteringHeartbeat
        | RunnyNose | ShortnessOfBreath | SinusCongestion | SkippedHeartbeat | SoreThroat
        | VaginalDryness | Vomiting | Wheezing => enumerated(&SEVERITY),

        HighHeartRateEvent | LowHeartRateEvent => {
            presence_only().with_auxiliary(HEART_RATE_THRESHOLD)
        }
        SexualActivity => presence_only().with_auxiliary(PROTECTION_USED),
        IrregularHeartRhythmEvent | MindfulSession | ToothbrushingEvent | HandwashingEvent
        | IntermenstrualBleeding | InfrequentMenstrualCycles | IrregularMenstrualCycles
        | PersistentIntermenstrualBleeding | ProlongedMenstrualPeriods | Lactation | Pregnancy
        | SleepApneaEvent => presence_only(),
    }
}

/// Value string and auxiliary components of one category sample
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCategory {
    pub value: String,
    pub components: Vec<ObservationComponent>,
}

/// Resolves a category raw value and its auxiliary metadata
///
/// # Errors
///
/// [`ConversionError::InvalidValue`] when `raw` is not a case of the
/// identifier's enumeration or an auxiliary quantity has an incompatible unit.
pub fn resolve(
    ty: CategoryType,
    raw: i64,
    metadata: &BTreeMap<String, MetadataValue>,
) -> ConversionResult<ResolvedCategory> {
    let descriptor = descriptor(ty);
    let value = match descriptor.value {
        CategoryValueKind::PresenceOnly => ty.identifier().to_string(),
        CategoryValueKind::Enumerated(table) => table.describe(raw)?.to_string(),
    };

    let mut components = Vec::new();
    for aux in descriptor.auxiliary {
        if let Some(component) = auxiliary_component(aux, metadata.get(aux.key))? {
            components.push(component);
        }
    }
    Ok(ResolvedCategory { value, components })
}

fn auxiliary_component(
    aux: &AuxiliaryMetadata,
    value: Option<&MetadataValue>,
) -> ConversionResult<Option<ObservationComponent>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let component_value = match (aux.shape, value) {
        (AuxiliaryShape::Quantity, MetadataValue::Quantity(q)) => {
            let unit = metadata_unit(aux.key);
            ComponentValue::ValueQuantity(resolve_quantity(q.value, &q.unit, unit.as_ref())?)
        }
        (AuxiliaryShape::Boolean, MetadataValue::Boolean(flag)) => ComponentValue::ValueBoolean(*flag),
        (AuxiliaryShape::Boolean, MetadataValue::Number(n)) => ComponentValue::ValueBoolean(*n != 0.0),
        _ => {
            log_metadata_skipped!(aux.key, "unexpected value shape for category component");
            return Ok(None);
        }
    };
    let code = CodeableConcept::single(Coding::without_display(HEALTHKIT_SYSTEM, aux.key));
    Ok(Some(ObservationComponent::new(code, component_value)))
}

/// Builds the Observation for a category sample
///
/// # Errors
///
/// * [`ConversionError::NotSupported`] for an unknown identifier or one
///   without a mapping entry
/// * [`ConversionError::InvalidValue`] for an out-of-range raw value
pub fn build(
    sample: &CategorySample,
    config: &MappingConfiguration,
    options: &ConversionOptions,
) -> ConversionResult<Observation> {
    let identifier = &sample.header.type_identifier;
    let ty = CategoryType::from_identifier(identifier).ok_or_else(|| {
        ConversionError::not_supported(format!("unknown category identifier '{identifier}'"))
    })?;
    let mapping = config.category(ty).ok_or_else(|| {
        ConversionError::not_supported(format!("no category mapping for '{identifier}'"))
    })?;

    let resolved = resolve(ty, sample.value, &sample.header.metadata)?;
    finish(
        shell(&sample.header, &mapping.codings, &mapping.categories, options)
            .value(ObservationValue::ValueString(resolved.value))
            .components(resolved.components),
    )
}
