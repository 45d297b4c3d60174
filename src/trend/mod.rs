//! Trendline smoothing, crossing detection, and short-horizon forecasting.

pub mod analyzer;
/// Closed-form least-squares line fitting.
pub mod regression;
pub mod types;

pub use analyzer::{TrendAnalyzer, TrendParams, analyze_trend};
pub use types::{CrossingPoint, TrendAnalysis, TrendDirection};
