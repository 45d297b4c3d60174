//! API request and error types.

use serde::{Deserialize, Serialize};

/// Body of `POST /analyze`, using the chart helper's field names.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    /// Observed values, oldest first.
    pub series: Vec<f64>,
    /// ISO-8601 timestamps, one per value.
    pub labels: Vec<String>,
    /// Low-value alarm level.
    pub alarm_threshold: f64,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
