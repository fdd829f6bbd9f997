//! Observation shell assembly
//!
//! Every family builder starts from the same shell: the sample id as
//! identifier, `final` status, effective time in the sample's timezone, the
//! issued instant, and the mapping's codings and categories.

use chrono::{DateTime, FixedOffset, Local, Utc};
use chrono_tz::Tz;

use crate::domain::errors::ConversionError;
use crate::domain::record::{Effective, Identifier, Observation, ObservationBuilder, Period};
use crate::domain::result::ConversionResult;
use crate::domain::sample::{MetadataValue, SampleHeader};
use crate::mapping::{concept_of, MappedCode};

/// Metadata key HealthKit uses for the recording timezone
pub const TIME_ZONE_METADATA_KEY: &str = "HKMetadataKeyTimeZone";

/// Per-conversion settings that do not come from the mapping document
#[derive(Debug, Clone, Default)]
pub struct ConversionOptions {
    /// Zone used when a sample carries no usable timezone of its own
    pub fallback_timezone: Option<Tz>,
}

impl ConversionOptions {
    /// Options with an IANA fallback timezone
    ///
    /// # Errors
    ///
    /// Returns a message when `name` is not a known IANA zone
    pub fn with_fallback_timezone(name: &str) -> Result<Self, String> {
        let tz = name
            .parse::<Tz>()
            .map_err(|_| format!("Unknown timezone '{name}'"))?;
        Ok(Self {
            fallback_timezone: Some(tz),
        })
    }
}

fn parse_zone(name: &str, source: &str) -> Option<Tz> {
    match name.parse::<Tz>() {
        Ok(tz) => Some(tz),
        Err(_) => {
            tracing::debug!(timezone = name, source, "Ignoring unparseable timezone");
            None
        }
    }
}

/// The zone a sample's instants are rendered in
///
/// Lookup order is the header field, then the `HKMetadataKeyTimeZone`
/// metadata entry, then the configured fallback. `None` means process-local.
pub fn sample_timezone(header: &SampleHeader, options: &ConversionOptions) -> Option<Tz> {
    header
        .timezone
        .as_deref()
        .and_then(|name| parse_zone(name, "header"))
        .or_else(|| match header.metadata_value(TIME_ZONE_METADATA_KEY) {
            Some(MetadataValue::String(name)) => parse_zone(name, "metadata"),
            _ => None,
        })
        .or(options.fallback_timezone)
}

/// Renders an instant with the offset of `zone`, or the local offset
pub fn localize(instant: DateTime<Utc>, zone: Option<Tz>) -> DateTime<FixedOffset> {
    match zone {
        Some(tz) => instant.with_timezone(&tz).fixed_offset(),
        None => instant.with_timezone(&Local).fixed_offset(),
    }
}

/// Instant when start equals end, otherwise a period
pub fn effective_of(header: &SampleHeader, options: &ConversionOptions) -> Effective {
    let zone = sample_timezone(header, options);
    if header.start == header.end {
        Effective::EffectiveDateTime(localize(header.start, zone))
    } else {
        Effective::EffectivePeriod(Period {
            start: Some(localize(header.start, zone)),
            end: Some(localize(header.end, zone)),
        })
    }
}

/// Starts an Observation for `header` coded with `codings`
///
/// Each mapping category becomes its own CodeableConcept.
pub fn shell(
    header: &SampleHeader,
    codings: &[MappedCode],
    categories: &[MappedCode],
    options: &ConversionOptions,
) -> ObservationBuilder {
    let mut builder = Observation::builder()
        .identifier(Identifier::with_id(header.id.to_string()))
        .code(concept_of(codings))
        .effective(effective_of(header, options))
        .issued(Utc::now());
    for category in categories {
        builder = builder.category(concept_of(std::slice::from_ref(category)));
    }
    builder
}

/// Finishes a builder, surfacing a missing code as a conversion error
pub fn finish(builder: ObservationBuilder) -> ConversionResult<Observation> {
    builder.build().map_err(ConversionError::not_supported)
}
