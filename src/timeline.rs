//! Timestamp handling for chart labels.
//!
//! Real labels are ISO-8601 timestamps. Forecast labels are relative offsets
//! of the form `+<N>min`, counted from the last real timestamp.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta};
use serde::Serialize;
use thiserror::Error;

/// Prefix that marks a label as a relative forecast offset.
pub const FORECAST_PREFIX: &str = "+";
const FORECAST_SUFFIX: &str = "min";

/// Display format for crossing dates (`DD/MM HH:mm`).
pub const CROSSING_DATE_FORMAT: &str = "%d/%m %H:%M";

const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses an ISO-8601 label into an instant.
///
/// Accepts RFC 3339 strings (with `Z` or a numeric offset), naive
/// date-times with `T` or space separators, and bare dates. Naive values are
/// read as UTC. Forecast labels never parse.
///
/// # Examples
///
/// ```
/// use stock_trend::timeline::parse_timestamp;
///
/// assert!(parse_timestamp("2024-01-01T10:30:00+01:00").is_some());
/// assert!(parse_timestamp("2024-01-01T10:30:00").is_some());
/// assert!(parse_timestamp("+30min").is_none());
/// ```
pub fn parse_timestamp(label: &str) -> Option<DateTime<FixedOffset>> {
    let label = label.trim();
    if label.is_empty() || is_forecast_label(label) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(label) {
        return Some(dt);
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(label, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(label, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

/// Returns true when `label` carries the forecast prefix.
pub fn is_forecast_label(label: &str) -> bool {
    label.starts_with(FORECAST_PREFIX)
}

/// Mean spacing in minutes between the last `lookback` labels.
///
/// Falls back to `default_minutes` when fewer than two labels are available
/// or any label in the window fails to parse. A parse failure is logged and
/// never propagated.
pub fn average_interval_minutes<S: AsRef<str>>(
    labels: &[S],
    lookback: usize,
    default_minutes: f64,
) -> f64 {
    let take = lookback.min(labels.len());
    let recent = &labels[labels.len() - take..];

    let mut timestamps = Vec::with_capacity(take);
    for label in recent {
        match parse_timestamp(label.as_ref()) {
            Some(ts) => timestamps.push(ts),
            None => {
                log::warn!(
                    "could not parse timestamp {:?}, using default interval of {default_minutes} min",
                    label.as_ref()
                );
                return default_minutes;
            }
        }
    }

    if timestamps.len() < 2 {
        return default_minutes;
    }

    let total: f64 = timestamps
        .windows(2)
        .map(|pair| minutes_between(pair[0], pair[1]))
        .sum();
    total / (timestamps.len() - 1) as f64
}

fn minutes_between(from: DateTime<FixedOffset>, to: DateTime<FixedOffset>) -> f64 {
    (to - from).num_milliseconds() as f64 / 60_000.0
}

/// Rounds half-way values toward positive infinity.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Relative label of a forecast point: minutes after the last real timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastLabel {
    pub minutes_ahead: i64,
}

impl ForecastLabel {
    /// Label for forecast step `step` (1-based) at the given sampling interval.
    pub fn for_step(step: usize, avg_minutes: f64) -> Self {
        Self {
            minutes_ahead: round_half_up(step as f64 * avg_minutes) as i64,
        }
    }

    /// Absolute instant of this label relative to `last_actual`.
    pub fn resolve(&self, last_actual: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
        last_actual.checked_add_signed(TimeDelta::try_minutes(self.minutes_ahead)?)
    }
}

impl fmt::Display for ForecastLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{FORECAST_PREFIX}{}{FORECAST_SUFFIX}", self.minutes_ahead)
    }
}

/// Error returned when a string is not of the form `+<N>min`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not a forecast label: {0:?}")]
pub struct ParseForecastLabelError(String);

impl FromStr for ForecastLabel {
    type Err = ParseForecastLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(FORECAST_PREFIX)
            .and_then(|rest| rest.strip_suffix(FORECAST_SUFFIX))
            .and_then(|minutes| minutes.trim().parse::<i64>().ok())
            .map(|minutes_ahead| Self { minutes_ahead })
            .ok_or_else(|| ParseForecastLabelError(s.to_string()))
    }
}

/// The last label that is a real timestamp rather than a forecast offset.
pub fn last_actual_label<S: AsRef<str>>(labels: &[S]) -> Option<&str> {
    labels
        .iter()
        .rev()
        .map(|label| label.as_ref())
        .find(|label| !is_forecast_label(label))
}

/// Resolves every label to an instant.
///
/// Forecast labels are offset from `last_actual_label`; all others are
/// parsed directly. Unresolvable labels map to `None`.
pub fn resolve_timestamps<S: AsRef<str>>(
    labels: &[S],
    last_actual_label: &str,
) -> Vec<Option<DateTime<FixedOffset>>> {
    let last_actual = parse_timestamp(last_actual_label);
    labels
        .iter()
        .map(|label| {
            let label = label.as_ref();
            if is_forecast_label(label) {
                let offset = label.parse::<ForecastLabel>().ok()?;
                offset.resolve(last_actual?)
            } else {
                parse_timestamp(label)
            }
        })
        .collect()
}

/// A real observation positioned in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimePoint {
    pub x: DateTime<FixedOffset>,
    pub y: f64,
}

/// Pairs real labels with their values, skipping forecast labels.
pub fn time_series_points<S: AsRef<str>>(labels: &[S], data: &[f64]) -> Vec<TimePoint> {
    labels
        .iter()
        .map(|label| label.as_ref())
        .zip(data)
        .filter(|(label, _)| !is_forecast_label(label))
        .filter_map(|(label, &y)| match parse_timestamp(label) {
            Some(x) => Some(TimePoint { x, y }),
            None => {
                log::debug!("skipping unparsable label {label:?}");
                None
            }
        })
        .collect()
}

/// Instant at a fractional index, interpolated between its neighbours.
pub fn crossing_time(
    timestamps: &[Option<DateTime<FixedOffset>>],
    index: f64,
) -> Option<DateTime<FixedOffset>> {
    if !index.is_finite() || index < 0.0 {
        return None;
    }

    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;
    let start = timestamps.get(lower).copied().flatten()?;
    if lower == upper {
        return Some(start);
    }

    let end = timestamps.get(upper).copied().flatten()?;
    let span_ms = (end - start).num_milliseconds() as f64;
    let offset_ms = (span_ms * (index - lower as f64)).round() as i64;
    start.checked_add_signed(TimeDelta::try_milliseconds(offset_ms)?)
}

/// Formats an instant as `DD/MM HH:mm` in its own offset.
pub fn format_crossing_date(date: &DateTime<FixedOffset>) -> String {
    date.format(CROSSING_DATE_FORMAT).to_string()
}
