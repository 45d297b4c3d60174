//! Result types produced by the trend analyzer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Slope magnitude above which the recent trend counts as rising or falling.
pub const DIRECTION_SLOPE_THRESHOLD: f64 = 0.1;

/// Coarse classification of the slope over the most recent window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Down,
    Stable,
    Up,
}

impl TrendDirection {
    /// Classifies a slope using strict inequality against
    /// [`DIRECTION_SLOPE_THRESHOLD`] on both sides.
    pub fn from_slope(slope: f64) -> Self {
        if slope < -DIRECTION_SLOPE_THRESHOLD {
            Self::Down
        } else if slope > DIRECTION_SLOPE_THRESHOLD {
            Self::Up
        } else {
            Self::Stable
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Down => write!(f, "down"),
            Self::Stable => write!(f, "stable"),
            Self::Up => write!(f, "up"),
        }
    }
}

/// Fractional position where the trendline equals the alarm threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossingPoint {
    /// Index into the (possibly extended) trendline; may lie between samples.
    pub index: f64,
    /// The threshold value at the crossing.
    pub value: f64,
}

/// Output of one trend analysis call.
///
/// `trendline` and `labels` have the input length, plus the forecast horizon
/// when the recent trend is falling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    /// Smoothed values, followed by forecast values when present.
    pub trendline: Vec<f64>,
    /// Input labels, followed by relative `+<N>min` forecast labels.
    pub labels: Vec<String>,
    /// Historical crossings in index order, then at most one forecast crossing.
    pub crossing_points: Vec<CrossingPoint>,
    /// Direction of the most recent window.
    pub trend_direction: TrendDirection,
    /// Least-squares slope of the most recent raw window.
    pub overall_slope: f64,
    /// Mean spacing of the most recent labels, in minutes.
    pub avg_minutes_between_counts: f64,
}

impl TrendAnalysis {
    /// Number of appended forecast points.
    pub fn forecast_len(&self, observed_len: usize) -> usize {
        self.trendline.len().saturating_sub(observed_len)
    }
}
