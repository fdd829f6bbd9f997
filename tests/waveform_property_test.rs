//! Property tests for voltage windowing

use hkfhir::core::waveform::{encode_values, window, DEFAULT_WINDOW_SECONDS};
use hkfhir::domain::VoltageMeasurement;
use proptest::prelude::*;

fn series(times: &[f64]) -> Vec<VoltageMeasurement> {
    times
        .iter()
        .enumerate()
        .map(|(i, &time)| VoltageMeasurement {
            time,
            value: i as f64 * 0.001,
        })
        .collect()
}

proptest! {
    #[test]
    fn windows_cover_every_measurement(times in prop::collection::vec(0.0f64..120.0, 0..400)) {
        let input = series(&times);
        let windowed = window(&input, None, DEFAULT_WINDOW_SECONDS);
        prop_assert_eq!(windowed.len(), input.len());
        prop_assert!(!windowed.windows.is_empty());
    }

    #[test]
    fn windows_are_time_ordered(times in prop::collection::vec(0.0f64..60.0, 1..200)) {
        let windowed = window(&series(&times), None, DEFAULT_WINDOW_SECONDS);
        let flattened: Vec<f64> = windowed.windows.iter().flatten().map(|m| m.time).collect();
        prop_assert!(flattened.windows(2).all(|pair| pair[0] <= pair[1]));
        prop_assert!(windowed.windows.iter().all(|w| !w.is_empty()));
    }

    #[test]
    fn regular_series_window_count(count in 1usize..8000, hz in 50u32..600) {
        let hz = f64::from(hz);
        let times: Vec<f64> = (0..count).map(|i| i as f64 / hz).collect();
        let windowed = window(&series(&times), Some(hz), DEFAULT_WINDOW_SECONDS);
        let last = times[count - 1];
        let expected = (last / DEFAULT_WINDOW_SECONDS).floor() as usize + 1;
        prop_assert_eq!(windowed.windows.len(), expected);
        prop_assert!((windowed.period_ms - 1000.0 / hz).abs() < 1e-9);
    }

    #[test]
    fn encoded_values_keep_count(values in prop::collection::vec(-5.0f64..5.0, 1..100)) {
        let encoded = encode_values(&values, Some(6)).unwrap();
        prop_assert_eq!(encoded.split(' ').count(), values.len());
    }
}

#[test]
fn test_electrocardiogram_length_example() {
    // 95 samples spread evenly over 22.3 seconds
    let times: Vec<f64> = (0..95).map(|i| i as f64 * 22.3 / 94.0).collect();
    let windowed = window(&series(&times), None, DEFAULT_WINDOW_SECONDS);
    assert_eq!(windowed.windows.len(), 3);
    assert_eq!(windowed.len(), 95);
}
