//! Waveform windowing
//!
//! A voltage series is cut into windows of roughly `window_seconds` each. A
//! window closes right before the sample at which `t mod window_seconds`
//! wraps around, so window edges line up with multiples of the window length
//! regardless of the sampling rate.

use crate::domain::record::{Quantity, SampledData};
use crate::domain::sample::VoltageMeasurement;

/// Default window length in seconds
pub const DEFAULT_WINDOW_SECONDS: f64 = 10.0;

/// A series cut into consecutive windows
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedSeries {
    /// Milliseconds between consecutive samples
    pub period_ms: f64,
    /// Windows in time order; the last one is always present, possibly empty
    pub windows: Vec<Vec<VoltageMeasurement>>,
}

impl WindowedSeries {
    /// Number of measurements across all windows
    pub fn len(&self) -> usize {
        self.windows.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Milliseconds between samples
///
/// Taken from the nominal sampling frequency when it is known, otherwise
/// derived from the last timestamp and the sample count.
pub fn period_ms(series: &[VoltageMeasurement], sampling_frequency_hz: Option<f64>) -> f64 {
    match sampling_frequency_hz {
        Some(hz) if hz.is_finite() && hz > 0.0 => 1000.0 / hz,
        _ => match series.last() {
            Some(last) => last.time * 1000.0 / series.len() as f64,
            None => 0.0,
        },
    }
}

/// Splits a series into windows
///
/// The series is ordered by time first. Every measurement lands in exactly one
/// window and an empty series yields a single empty window.
pub fn window(
    series: &[VoltageMeasurement],
    sampling_frequency_hz: Option<f64>,
    window_seconds: f64,
) -> WindowedSeries {
    let mut sorted = series.to_vec();
    sorted.sort_by(|a, b| a.time.total_cmp(&b.time));

    let mut windows = Vec::new();
    let mut current: Vec<VoltageMeasurement> = Vec::new();
    let mut previous_remainder: Option<f64> = None;

    for measurement in &sorted {
        let remainder = measurement.time.rem_euclid(window_seconds);
        if let Some(previous) = previous_remainder {
            if remainder < previous && !current.is_empty() {
                windows.push(std::mem::take(&mut current));
            }
        }
        current.push(*measurement);
        previous_remainder = Some(remainder);
    }
    windows.push(current);

    let windowed = WindowedSeries {
        period_ms: period_ms(&sorted, sampling_frequency_hz),
        windows,
    };
    debug_assert_eq!(windowed.len(), series.len());
    windowed
}

/// Space separated values at `precision` decimal places
///
/// `None` writes the shortest representation that reads back to the same
/// value. An empty slice yields `None`.
pub fn encode_values(values: &[f64], precision: Option<usize>) -> Option<String> {
    if values.is_empty() {
        return None;
    }
    let encoded: Vec<String> = values
        .iter()
        .map(|v| match precision {
            Some(p) => format!("{v:.p$}"),
            None => v.to_string(),
        })
        .collect();
    Some(encoded.join(" "))
}

/// One window as FHIR SampledData
pub fn sampled_data(
    values: &[f64],
    period_ms: f64,
    origin: Quantity,
    precision: Option<usize>,
) -> SampledData {
    SampledData {
        origin,
        period: period_ms,
        dimensions: 1,
        data: encode_values(values, precision),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(count: usize, duration: f64) -> Vec<VoltageMeasurement> {
        (0..count)
            .map(|i| VoltageMeasurement {
                time: if count > 1 {
                    duration * i as f64 / (count - 1) as f64
                } else {
                    0.0
                },
                value: i as f64,
            })
            .collect()
    }

    #[test]
    fn test_empty_series_yields_one_empty_window() {
        let w = window(&[], None, DEFAULT_WINDOW_SECONDS);
        assert_eq!(w.windows.len(), 1);
        assert!(w.windows[0].is_empty());
        assert_eq!(w.period_ms, 0.0);
    }

    #[test]
    fn test_95_samples_over_22_seconds() {
        let s = series(95, 22.3);
        let w = window(&s, None, DEFAULT_WINDOW_SECONDS);
        assert_eq!(w.windows.len(), 3);
        assert_eq!(w.len(), 95);
        let first_span = w.windows[0].last().unwrap().time - w.windows[0][0].time;
        assert!(first_span < 10.0 && first_span > 9.5, "{first_span}");
        assert!(w.windows[1][0].time >= 10.0);
        assert!(w.windows[2][0].time >= 20.0);
        assert!((w.period_ms - 22.3 * 1000.0 / 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_period_from_frequency() {
        let s = series(512, 1.0);
        let w = window(&s, Some(512.0), DEFAULT_WINDOW_SECONDS);
        assert!((w.period_ms - 1000.0 / 512.0).abs() < 1e-12);
        assert_eq!(w.windows.len(), 1);
    }

    #[test]
    fn test_unsorted_input_is_ordered() {
        let mut s = series(30, 25.0);
        s.reverse();
        let w = window(&s, None, DEFAULT_WINDOW_SECONDS);
        let times: Vec<f64> = w.windows.iter().flatten().map(|m| m.time).collect();
        assert!(times.windows(2).all(|p| p[0] <= p[1]));
        assert_eq!(w.windows.len(), 3);
    }

    #[test]
    fn test_encode_values() {
        assert_eq!(encode_values(&[], Some(3)), None);
        assert_eq!(encode_values(&[1.0, -0.25], Some(2)).unwrap(), "1.00 -0.25");
        assert_eq!(encode_values(&[1.5, 0.1], None).unwrap(), "1.5 0.1");
    }
}
