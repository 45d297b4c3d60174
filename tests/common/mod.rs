//! Shared test fixtures for integration tests.

#![allow(dead_code)]

/// `n` ISO-8601 labels spaced `minutes` apart, starting 2024-03-05 08:00 UTC.
pub fn evenly_spaced_labels(n: usize, minutes: i64) -> Vec<String> {
    (0..n as i64)
        .map(|i| {
            let total = 8 * 60 + i * minutes;
            format!("2024-03-05T{:02}:{:02}:00Z", total / 60, total % 60)
        })
        .collect()
}

/// A steadily falling stock count: 20, 18, ..., 10.
pub fn falling_counts() -> Vec<f64> {
    (0..6).map(|i| 20.0 - 2.0 * i as f64).collect()
}

/// Chart payload with one falling and one flat series.
pub const CHART_PAYLOAD: &str = r##"{
    "3": {
        "labels": [
            "2024-03-05T08:00:00+00:00",
            "2024-03-05T08:30:00+00:00",
            "2024-03-05T09:00:00+00:00",
            "2024-03-05T09:30:00+00:00"
        ],
        "data": [10, 9, 8, 7],
        "alarm_minimum": 5,
        "color": "#ff6384",
        "liters_per_unit": 0.5
    },
    "4": {
        "labels": [
            "2024-03-05T08:00:00+00:00",
            "2024-03-05T08:30:00+00:00",
            "2024-03-05T09:00:00+00:00"
        ],
        "data": [6, 6, 6],
        "alarm_minimum": 2
    }
}"##;
