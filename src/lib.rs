//! Trendline smoothing, alarm-threshold crossings, and short-horizon
//! forecasts for stock count time series.

#[cfg(feature = "api")]
pub mod api;
/// Chart payloads and per-item reports.
pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod timeline;
/// Trend analysis core.
pub mod trend;

pub use error::{Error, Result, TrendError};
pub use trend::{CrossingPoint, TrendAnalysis, TrendAnalyzer, TrendDirection, analyze_trend};
