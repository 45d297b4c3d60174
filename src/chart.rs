//! Per-item chart payloads and their analysed reports.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, TrendError};
use crate::timeline::{
    TimePoint, crossing_time, format_crossing_date, last_actual_label, resolve_timestamps,
    time_series_points,
};
use crate::trend::{TrendAnalysis, TrendAnalyzer};

/// Time series for one stocked item, oldest observation first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// ISO-8601 timestamps of each count.
    pub labels: Vec<String>,
    /// Counted quantity at each timestamp.
    pub data: Vec<f64>,
    /// Low-stock alarm level.
    #[serde(default)]
    pub alarm_minimum: f64,
    /// Display colour, passed through untouched.
    #[serde(default)]
    pub color: Option<String>,
    /// Volume of one unit in litres, when known.
    #[serde(default)]
    pub liters_per_unit: Option<f64>,
}

/// A crossing point positioned in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossingReport {
    pub index: f64,
    pub value: f64,
    /// Interpolated instant, when the surrounding labels resolve.
    pub at: Option<DateTime<FixedOffset>>,
    /// `at` formatted as `DD/MM HH:mm`.
    pub display: Option<String>,
}

/// Analysis of one chart series plus derived display values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartReport {
    pub id: String,
    pub color: Option<String>,
    pub alarm_minimum: f64,
    pub observed_points: usize,
    pub forecast_points: usize,
    pub latest_units: Option<f64>,
    /// Latest quantity in litres, floored to the configured decimals.
    /// Absent when the series carries no unit volume.
    pub latest_liters: Option<f64>,
    /// Observed counts positioned in time; forecast points excluded.
    pub points: Vec<TimePoint>,
    pub crossings: Vec<CrossingReport>,
    pub analysis: TrendAnalysis,
}

impl ChartSeries {
    /// Runs the analyzer with `alarm_minimum` as threshold and resolves every
    /// crossing to an instant.
    ///
    /// # Errors
    ///
    /// Returns [`TrendError::LengthMismatch`] if `labels` and `data` differ in
    /// length.
    pub fn analyze(
        &self,
        id: &str,
        analyzer: &TrendAnalyzer,
        decimals: u32,
    ) -> std::result::Result<ChartReport, TrendError> {
        let analysis = analyzer.analyze(&self.data, &self.labels, self.alarm_minimum)?;

        let timestamps = last_actual_label(&analysis.labels)
            .map(|last| resolve_timestamps(&analysis.labels, last))
            .unwrap_or_default();

        let crossings = analysis
            .crossing_points
            .iter()
            .map(|point| {
                let at = crossing_time(&timestamps, point.index);
                CrossingReport {
                    index: point.index,
                    value: point.value,
                    at,
                    display: at.as_ref().map(format_crossing_date),
                }
            })
            .collect();

        let latest_units = self.data.last().copied();
        Ok(ChartReport {
            id: id.to_string(),
            color: self.color.clone(),
            alarm_minimum: self.alarm_minimum,
            observed_points: self.data.len(),
            forecast_points: analysis.forecast_len(self.data.len()),
            latest_units,
            latest_liters: latest_units
                .zip(self.liters_per_unit)
                .map(|(units, liters)| floor_decimal(units * liters, decimals)),
            points: time_series_points(&self.labels, &self.data),
            crossings,
            analysis,
        })
    }
}

/// Floors `value` to `decimals` decimal places.
///
/// # Examples
///
/// ```
/// use stock_trend::chart::floor_decimal;
///
/// assert_eq!(floor_decimal(2.379, 2), 2.37);
/// assert_eq!(floor_decimal(-0.5, 0), -1.0);
/// ```
pub fn floor_decimal(value: f64, decimals: u32) -> f64 {
    let multiplier = 10_f64.powi(decimals as i32);
    (value * multiplier).floor() / multiplier
}

/// Parses a chart payload: a JSON object of series keyed by item id.
///
/// # Errors
///
/// Returns an error if the JSON is malformed.
pub fn parse_charts(json: &str) -> Result<BTreeMap<String, ChartSeries>> {
    Ok(serde_json::from_str(json)?)
}

/// Reads a chart payload from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its JSON is malformed.
pub fn load_chart_file(path: &Path) -> Result<BTreeMap<String, ChartSeries>> {
    let content = fs::read_to_string(path)?;
    parse_charts(&content)
}

/// Analyses every series in id order.
///
/// # Errors
///
/// Stops at the first series whose labels and data differ in length.
pub fn analyze_charts(
    charts: &BTreeMap<String, ChartSeries>,
    analyzer: &TrendAnalyzer,
    decimals: u32,
) -> Result<Vec<ChartReport>> {
    charts
        .iter()
        .map(|(id, series)| {
            series.analyze(id, analyzer, decimals).map_err(|e| {
                log::error!("series {id}: {e}");
                Error::from(e)
            })
        })
        .collect()
}

impl fmt::Display for ChartReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {} ---", self.id)?;
        match (self.latest_units, self.latest_liters) {
            (Some(units), Some(liters)) => {
                writeln!(f, "Latest count:     {units:.2} units ({liters} L)")?
            }
            (Some(units), None) => writeln!(f, "Latest count:     {units:.2} units")?,
            (None, _) => writeln!(f, "Latest count:     none")?,
        }
        writeln!(
            f,
            "Trend:            {} (slope {:.3} per count)",
            self.analysis.trend_direction, self.analysis.overall_slope
        )?;
        writeln!(
            f,
            "Forecast:         {} points, {:.1} min apart",
            self.forecast_points, self.analysis.avg_minutes_between_counts
        )?;
        writeln!(f, "Alarm minimum:    {}", self.alarm_minimum)?;
        write!(f, "Crossings:        {}", self.crossings.len())?;
        for crossing in &self.crossings {
            match &crossing.display {
                Some(date) => write!(f, "\n  index {:.2} at {date}", crossing.index)?,
                None => write!(f, "\n  index {:.2}", crossing.index)?,
            }
        }
        Ok(())
    }
}
