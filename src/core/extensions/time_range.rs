//! Absolute time range extensions
//!
//! Start and end are written as decimal seconds since the Unix epoch under
//! `absoluteTimeRangeStart` and `absoluteTimeRangeEnd`, so consumers can
//! compare samples without parsing zoned date-times.

use chrono::{DateTime, TimeZone};

use super::{extension_url, ExtensionBuilder};
use crate::domain::record::{Effective, Extension, ExtensionValue, Observation};
use crate::domain::result::ConversionResult;
use crate::domain::sample::SampleHeader;

fn unix_seconds<Tz: TimeZone>(instant: &DateTime<Tz>) -> f64 {
    instant.timestamp() as f64 + f64::from(instant.timestamp_subsec_nanos()) / 1e9
}

fn start_url() -> String {
    extension_url("absoluteTimeRangeStart")
}

fn end_url() -> String {
    extension_url("absoluteTimeRangeEnd")
}

fn write_range(observation: &mut Observation, start: Option<f64>, end: Option<f64>) {
    observation.remove_extensions(&start_url());
    observation.remove_extensions(&end_url());
    if let Some(start) = start {
        observation.append_extension(
            Extension::with_value(start_url(), ExtensionValue::ValueDecimal(start)),
            true,
        );
    }
    if let Some(end) = end {
        observation.append_extension(
            Extension::with_value(end_url(), ExtensionValue::ValueDecimal(end)),
            true,
        );
    }
}

/// Writes the sample's start and end instants
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsoluteTimeRangeExtension;

impl ExtensionBuilder<SampleHeader> for AbsoluteTimeRangeExtension {
    fn url(&self) -> String {
        extension_url("absoluteTimeRange")
    }

    fn apply(&self, header: &SampleHeader, observation: &mut Observation) -> ConversionResult<()> {
        write_range(
            observation,
            Some(unix_seconds(&header.start)),
            Some(unix_seconds(&header.end)),
        );
        Ok(())
    }
}

/// Derives the range from the Observation's own effective time
///
/// An instant yields equal start and end; an Observation without an
/// effective time keeps no range extensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct EffectiveTimeRangeExtension;

impl ExtensionBuilder<()> for EffectiveTimeRangeExtension {
    fn url(&self) -> String {
        extension_url("absoluteTimeRange")
    }

    fn apply(&self, _: &(), observation: &mut Observation) -> ConversionResult<()> {
        let (start, end) = match &observation.effective {
            None => (None, None),
            Some(Effective::EffectiveDateTime(at)) => {
                let seconds = unix_seconds(at);
                (Some(seconds), Some(seconds))
            }
            Some(Effective::EffectivePeriod(period)) => (
                period.start.as_ref().map(unix_seconds),
                period.end.as_ref().map(unix_seconds),
            ),
        };
        write_range(observation, start, end);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::SampleId;
    use crate::domain::record::{CodeableConcept, Coding};
    use chrono::Utc;

    fn observation() -> Observation {
        Observation::builder()
            .code(CodeableConcept::single(Coding::without_display("http://loinc.org", "8867-4")))
            .build()
            .unwrap()
    }

    fn decimal(obs: &Observation, url: &str) -> f64 {
        match obs.extension_by_url(url).and_then(|e| e.value.clone()) {
            Some(ExtensionValue::ValueDecimal(v)) => v,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_header_range() {
        let start = Utc.timestamp_opt(1_700_000_000, 500_000_000).unwrap();
        let end = Utc.timestamp_opt(1_700_000_060, 0).unwrap();
        let header = SampleHeader::new(SampleId::generate(), "x", start, end);
        let mut obs = observation();
        AbsoluteTimeRangeExtension.apply(&header, &mut obs).unwrap();
        AbsoluteTimeRangeExtension.apply(&header, &mut obs).unwrap();
        assert_eq!(obs.extension.len(), 2);
        assert_eq!(decimal(&obs, &start_url()), 1_700_000_000.5);
        assert_eq!(decimal(&obs, &end_url()), 1_700_000_060.0);
    }

    #[test]
    fn test_effective_instant() {
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap().fixed_offset();
        let mut obs = observation();
        obs.effective = Some(Effective::EffectiveDateTime(at));
        EffectiveTimeRangeExtension.apply(&(), &mut obs).unwrap();
        assert_eq!(decimal(&obs, &start_url()), decimal(&obs, &end_url()));
    }

    #[test]
    fn test_no_effective_clears_range() {
        let mut obs = observation();
        obs.append_extension(
            Extension::with_value(start_url(), ExtensionValue::ValueDecimal(1.0)),
            true,
        );
        EffectiveTimeRangeExtension.apply(&(), &mut obs).unwrap();
        assert!(obs.extension.is_empty());
    }
}
