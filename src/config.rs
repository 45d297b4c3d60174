//! TOML-based analyzer configuration.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::trend::TrendParams;

/// Largest number of decimals accepted for litre figures.
const MAX_REPORT_DECIMALS: u32 = 6;
/// Largest number of forecast points accepted.
const MAX_FORECAST_HORIZON: usize = 100;

/// Top-level configuration parsed from TOML.
///
/// Every field has a default. Load from TOML with
/// [`AnalyzerConfig::from_toml_file`] or use [`AnalyzerConfig::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Trendline and forecast tunables.
    #[serde(default)]
    pub trend: TrendParams,
    /// Report formatting.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Report formatting options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Decimals kept (floored) when printing litre figures.
    pub decimals: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { decimals: 2 }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"trend.window_size"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl AnalyzerConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let t = &self.trend;

        if t.window_size < 2 {
            errors.push(ConfigError {
                field: "trend.window_size".into(),
                message: "must be >= 2".into(),
            });
        }
        if t.forecast_horizon == 0 || t.forecast_horizon > MAX_FORECAST_HORIZON {
            errors.push(ConfigError {
                field: "trend.forecast_horizon".into(),
                message: format!("must be in 1..={MAX_FORECAST_HORIZON}"),
            });
        }
        if t.interval_lookback < 2 {
            errors.push(ConfigError {
                field: "trend.interval_lookback".into(),
                message: "must be >= 2".into(),
            });
        }
        if !t.default_interval_minutes.is_finite() || t.default_interval_minutes <= 0.0 {
            errors.push(ConfigError {
                field: "trend.default_interval_minutes".into(),
                message: format!("must be > 0, got {}", t.default_interval_minutes),
            });
        }

        if self.report.decimals > MAX_REPORT_DECIMALS {
            errors.push(ConfigError {
                field: "report.decimals".into(),
                message: format!("must be <= {MAX_REPORT_DECIMALS}"),
            });
        }

        errors
    }
}
