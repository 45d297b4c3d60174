use thiserror::Error;

use crate::config::ConfigError;

/// Input-shape violations rejected by the trend analyzer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrendError {
    #[error("series has {series} values but {labels} labels")]
    LengthMismatch { series: usize, labels: usize },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Trend error: {0}")]
    Trend(#[from] TrendError),

    #[error("Unknown series: {0}")]
    UnknownSeries(String),

    #[error("Usage error: {0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, Error>;
