//! Rolling least-squares trendline with threshold crossings and a short
//! forecast for falling series.

use serde::{Deserialize, Serialize};

use super::regression::LineFit;
use super::types::{CrossingPoint, TrendAnalysis, TrendDirection};
use crate::error::TrendError;
use crate::timeline::{ForecastLabel, average_interval_minutes};

/// Samples per local regression window.
pub const DEFAULT_WINDOW_SIZE: usize = 3;
/// Forecast points appended when the trend is falling.
pub const DEFAULT_FORECAST_HORIZON: usize = 3;
/// Labels considered when averaging the sampling interval.
pub const DEFAULT_INTERVAL_LOOKBACK: usize = 5;
/// Sampling interval used when labels cannot be parsed.
pub const DEFAULT_INTERVAL_MINUTES: f64 = 30.0;

/// Tunables for [`TrendAnalyzer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrendParams {
    /// Samples per local regression window (must be >= 2).
    pub window_size: usize,
    /// Number of forecast points (must be >= 1).
    pub forecast_horizon: usize,
    /// Number of trailing labels used for the interval average (must be >= 2).
    pub interval_lookback: usize,
    /// Fallback sampling interval in minutes (must be > 0).
    pub default_interval_minutes: f64,
}

impl Default for TrendParams {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            forecast_horizon: DEFAULT_FORECAST_HORIZON,
            interval_lookback: DEFAULT_INTERVAL_LOOKBACK,
            default_interval_minutes: DEFAULT_INTERVAL_MINUTES,
        }
    }
}

/// Stateless trend analyzer.
///
/// Each call reads only its arguments, so one analyzer can be shared freely.
///
/// # Examples
///
/// ```
/// use stock_trend::trend::{TrendAnalyzer, TrendDirection};
///
/// let labels = ["2024-01-01T09:00:00", "2024-01-01T09:30:00", "2024-01-01T10:00:00"];
/// let analysis = TrendAnalyzer::default()
///     .analyze(&[10.0, 8.0, 6.0], &labels, 3.0)
///     .unwrap();
/// assert_eq!(analysis.trend_direction, TrendDirection::Down);
/// assert_eq!(analysis.labels[3], "+30min");
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct TrendAnalyzer {
    params: TrendParams,
}

impl TrendAnalyzer {
    pub fn new(params: TrendParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TrendParams {
        &self.params
    }

    /// Analyzes `series` against `alarm_threshold`.
    ///
    /// # Errors
    ///
    /// Returns [`TrendError::LengthMismatch`] if `series` and `labels` differ
    /// in length. No other input is rejected.
    pub fn analyze<S: AsRef<str>>(
        &self,
        series: &[f64],
        labels: &[S],
        alarm_threshold: f64,
    ) -> Result<TrendAnalysis, TrendError> {
        if series.len() != labels.len() {
            return Err(TrendError::LengthMismatch {
                series: series.len(),
                labels: labels.len(),
            });
        }

        let labels: Vec<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
        let n = series.len();
        if n < 2 {
            return Ok(TrendAnalysis {
                trendline: series.to_vec(),
                labels,
                crossing_points: Vec::new(),
                trend_direction: TrendDirection::Stable,
                overall_slope: 0.0,
                avg_minutes_between_counts: self.params.default_interval_minutes,
            });
        }

        let trendline = self.smooth(series);

        let last_window = &series[n - self.params.window_size.min(n)..];
        let overall_slope = LineFit::fit(last_window).map_or(0.0, |fit| fit.slope);
        let trend_direction = TrendDirection::from_slope(overall_slope);

        let mut crossing_points = historical_crossings(&trendline, alarm_threshold);

        let avg_minutes_between_counts = average_interval_minutes(
            &labels,
            self.params.interval_lookback,
            self.params.default_interval_minutes,
        );

        let last_trend_value = trendline[n - 1];
        let mut extended_trendline = trendline;
        let mut extended_labels = labels;

        if overall_slope < 0.0 {
            let horizon = self.params.forecast_horizon;
            for step in 1..=horizon {
                extended_trendline.push(last_trend_value + overall_slope * step as f64);
                extended_labels
                    .push(ForecastLabel::for_step(step, avg_minutes_between_counts).to_string());
            }

            if let Some(crossing) =
                forecast_crossing(n, last_trend_value, overall_slope, horizon, alarm_threshold)
            {
                crossing_points.push(crossing);
            }
        }

        log::debug!(
            "analyzed {n} points: slope {overall_slope:.4} ({trend_direction}), {} crossings",
            crossing_points.len()
        );

        Ok(TrendAnalysis {
            trendline: extended_trendline,
            labels: extended_labels,
            crossing_points,
            trend_direction,
            overall_slope,
            avg_minutes_between_counts,
        })
    }

    /// Per-index value of a least-squares line fitted to the window around it.
    ///
    /// Windows shift inward at the edges instead of shrinking.
    fn smooth(&self, series: &[f64]) -> Vec<f64> {
        let n = series.len();
        let window_size = self.params.window_size;

        (0..n)
            .map(|i| {
                let start = i.saturating_sub(window_size / 2);
                let end = n.min(start + window_size);
                let start = end.saturating_sub(window_size);

                match LineFit::fit(&series[start..end]) {
                    Some(fit) => fit.at((i - start) as f64),
                    None => series[i],
                }
            })
            .collect()
    }
}

/// Crossings between adjacent trendline samples, in index order.
fn historical_crossings(trendline: &[f64], threshold: f64) -> Vec<CrossingPoint> {
    trendline
        .windows(2)
        .enumerate()
        .filter_map(|(offset, pair)| {
            let (prev, curr) = (pair[0], pair[1]);
            let falls = prev > threshold && curr <= threshold;
            let rises = prev < threshold && curr >= threshold;
            if !(falls || rises) {
                return None;
            }

            let ratio = (threshold - prev) / (curr - prev);
            Some(CrossingPoint {
                index: offset as f64 + ratio,
                value: threshold,
            })
        })
        .collect()
}

/// Downward crossing of the projected line within the forecast horizon.
fn forecast_crossing(
    observed_len: usize,
    last_trend_value: f64,
    slope: f64,
    horizon: usize,
    threshold: f64,
) -> Option<CrossingPoint> {
    let steps = (threshold - last_trend_value) / slope;
    let last_projected = last_trend_value + slope * horizon as f64;

    let crosses_from_above = last_trend_value > threshold && last_projected < threshold;
    let within_horizon = steps > 0.0 && steps <= horizon as f64;
    if !(crosses_from_above && within_horizon) {
        return None;
    }

    Some(CrossingPoint {
        index: (observed_len - 1) as f64 + steps,
        value: threshold,
    })
}

/// Analyzes with the default parameters.
///
/// # Errors
///
/// See [`TrendAnalyzer::analyze`].
pub fn analyze_trend<S: AsRef<str>>(
    series: &[f64],
    labels: &[S],
    alarm_threshold: f64,
) -> Result<TrendAnalysis, TrendError> {
    TrendAnalyzer::default().analyze(series, labels, alarm_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn half_hourly(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| format!("2024-01-01T{:02}:{:02}:00", 8 + i / 2, (i % 2) * 30))
            .collect()
    }

    #[test]
    fn single_point_is_returned_unchanged() {
        let analysis = analyze_trend(&[5.0], &["2024-01-01T00:00:00"], 3.0)
            .expect("matching lengths should analyze");
        assert_eq!(analysis.trendline, vec![5.0]);
        assert_eq!(analysis.labels, vec!["2024-01-01T00:00:00".to_string()]);
        assert!(analysis.crossing_points.is_empty());
        assert_eq!(analysis.trend_direction, TrendDirection::Stable);
    }

    #[test]
    fn empty_series_is_returned_unchanged() {
        let labels: [&str; 0] = [];
        let analysis = analyze_trend(&[], &labels, 3.0).expect("empty input should analyze");
        assert!(analysis.trendline.is_empty());
        assert!(analysis.labels.is_empty());
        assert_eq!(analysis.trend_direction, TrendDirection::Stable);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = analyze_trend(&[1.0, 2.0], &["2024-01-01T00:00:00"], 3.0);
        assert_eq!(
            err,
            Err(TrendError::LengthMismatch {
                series: 2,
                labels: 1
            })
        );
    }

    #[test]
    fn linear_series_is_unchanged_by_smoothing() {
        let series = [1.0, 2.0, 3.0, 4.0, 5.0];
        let analysis =
            analyze_trend(&series, &half_hourly(5), 0.0).expect("matching lengths should analyze");
        assert_eq!(analysis.trendline.len(), 5);
        for (smoothed, raw) in analysis.trendline.iter().zip(series) {
            assert!((smoothed - raw).abs() < EPS);
        }
        assert_eq!(analysis.trend_direction, TrendDirection::Up);
    }

    #[test]
    fn edge_windows_shift_inward() {
        // Index 0 uses window [0, 3), evaluated at local 0.
        // y = [1, 5, 3] fits slope 1, intercept 2.
        let analyzer = TrendAnalyzer::default();
        let smoothed = analyzer.smooth(&[1.0, 5.0, 3.0]);
        assert!((smoothed[0] - 2.0).abs() < EPS);
        assert!((smoothed[1] - 3.0).abs() < EPS);
        assert!((smoothed[2] - 4.0).abs() < EPS);
    }

    #[test]
    fn two_points_use_the_exact_line() {
        let analysis = analyze_trend(&[4.0, 2.0], &half_hourly(2), 0.0)
            .expect("matching lengths should analyze");
        assert!((analysis.trendline[0] - 4.0).abs() < EPS);
        assert!((analysis.trendline[1] - 2.0).abs() < EPS);
        assert!((analysis.overall_slope + 2.0).abs() < EPS);
    }

    #[test]
    fn crossing_is_interpolated_between_samples() {
        let trendline = [9.0, 8.0, 7.0, 6.0, 4.0, 2.0];
        let crossings = historical_crossings(&trendline, 3.0);
        assert_eq!(crossings.len(), 1);
        assert!((crossings[0].index - 4.5).abs() < EPS);
        assert_eq!(crossings[0].value, 3.0);
    }

    #[test]
    fn crossings_in_both_directions_are_kept_in_order() {
        let trendline = [5.0, 1.0, 5.0, 1.0];
        let crossings = historical_crossings(&trendline, 3.0);
        let indices: Vec<f64> = crossings.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0.5, 1.5, 2.5]);
    }

    #[test]
    fn touching_from_below_counts_but_leaving_the_threshold_does_not() {
        // 2 -> 3 reaches the threshold from below; 3 -> 4 starts on it.
        let crossings = historical_crossings(&[2.0, 3.0, 4.0], 3.0);
        assert_eq!(crossings.len(), 1);
        assert!((crossings[0].index - 1.0).abs() < EPS);
    }

    #[test]
    fn falling_series_gets_forecast_points_and_labels() {
        let series = [10.0, 9.0, 8.0, 7.0];
        let analysis =
            analyze_trend(&series, &half_hourly(4), 0.0).expect("matching lengths should analyze");
        assert_eq!(analysis.trendline.len(), 7);
        assert_eq!(analysis.labels.len(), 7);
        assert_eq!(&analysis.labels[4..], ["+30min", "+60min", "+90min"]);
        assert!((analysis.trendline[4] - 6.0).abs() < EPS);
        assert!((analysis.trendline[6] - 4.0).abs() < EPS);
        assert_eq!(analysis.trend_direction, TrendDirection::Down);
        assert_eq!(analysis.forecast_len(series.len()), 3);
    }

    #[test]
    fn flat_or_rising_series_gets_no_forecast() {
        let flat = analyze_trend(&[5.0, 5.0, 5.0, 5.0], &half_hourly(4), 100.0)
            .expect("matching lengths should analyze");
        assert_eq!(flat.trendline.len(), 4);
        assert_eq!(flat.labels.len(), 4);

        let rising = analyze_trend(&[1.0, 2.0, 4.0, 8.0], &half_hourly(4), 100.0)
            .expect("matching lengths should analyze");
        assert_eq!(rising.trendline.len(), 4);
        assert_eq!(rising.forecast_len(4), 0);
    }

    #[test]
    fn forecast_crossing_is_appended_after_historical_ones() {
        // Smoothed [10, 9, 8, 7], slope -1; threshold 5.5 is hit at step 1.5.
        let series = [10.0, 9.0, 8.0, 7.0];
        let analysis =
            analyze_trend(&series, &half_hourly(4), 5.5).expect("matching lengths should analyze");
        assert_eq!(analysis.crossing_points.len(), 1);
        assert!((analysis.crossing_points[0].index - 4.5).abs() < EPS);
        assert_eq!(analysis.crossing_points[0].value, 5.5);
    }

    #[test]
    fn forecast_crossing_beyond_horizon_is_dropped() {
        let series = [10.0, 9.0, 8.0, 7.0];
        let analysis =
            analyze_trend(&series, &half_hourly(4), 2.0).expect("matching lengths should analyze");
        assert!(analysis.crossing_points.is_empty());
    }

    #[test]
    fn already_below_threshold_gets_no_forecast_crossing() {
        let series = [4.0, 3.0, 2.0, 1.0];
        let analysis =
            analyze_trend(&series, &half_hourly(4), 6.0).expect("matching lengths should analyze");
        assert!(analysis.crossing_points.is_empty());
        assert_eq!(analysis.trendline.len(), 7);
    }

    #[test]
    fn unparsable_labels_use_default_interval() {
        let labels = ["a", "b", "c", "d"];
        let analysis = analyze_trend(&[10.0, 9.0, 8.0, 7.0], &labels, 0.0)
            .expect("bad labels must not abort analysis");
        assert_eq!(analysis.avg_minutes_between_counts, DEFAULT_INTERVAL_MINUTES);
        assert_eq!(&analysis.labels[4..], ["+30min", "+60min", "+90min"]);
    }

    #[test]
    fn analysis_is_repeatable() {
        let series = [12.0, 11.5, 9.0, 9.5, 7.0, 6.5];
        let labels = half_hourly(6);
        let first = analyze_trend(&series, &labels, 7.5).expect("first run");
        let second = analyze_trend(&series, &labels, 7.5).expect("second run");
        assert_eq!(first, second);
    }
}
