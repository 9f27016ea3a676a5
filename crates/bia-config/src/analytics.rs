//! Analytics engine configuration types.
//!
//! Every field has a default so a partial analytics.json only overrides what
//! it names.

use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub schema_version: String,
    pub thresholds: Thresholds,
    pub forecast: ForecastSettings,
    pub correlation: CorrelationSettings,
    pub seasonality: SeasonalitySettings,
    pub isolation: IsolationSettings,
    pub cache: CacheSettings,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            thresholds: Thresholds::default(),
            forecast: ForecastSettings::default(),
            correlation: CorrelationSettings::default(),
            seasonality: SeasonalitySettings::default(),
            isolation: IsolationSettings::default(),
            cache: CacheSettings::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Load a config from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }
}

/// Decision cutoffs that depend on the value scale of the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// `|slope|` below this is a stable trend.
    pub trend_stable_threshold: f64,
    /// `|z|` above this is an anomaly.
    pub zscore_threshold: f64,
    /// Tukey fence distance in IQR units.
    pub iqr_multiplier: f64,
    /// Isolation-forest anomaly score cutoff, in (0, 1).
    pub isolation_threshold: f64,
    /// Minimum one-sided DFT amplitude for a seasonal pattern.
    pub seasonality_min_amplitude: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            trend_stable_threshold: 0.01,
            zscore_threshold: 2.5,
            iqr_multiplier: 1.5,
            isolation_threshold: 0.6,
            seasonality_min_amplitude: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    pub default_periods: usize,
    /// Smoothing factor for the exponential method.
    pub exponential_alpha: f64,
    /// Minimum series length for forecast dispatch.
    pub min_points: usize,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            default_periods: 10,
            exponential_alpha: 0.3,
            min_points: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationSettings {
    /// Two points pair up when their timestamps differ by at most this much.
    pub alignment_tolerance_ms: i64,
    pub min_pairs: usize,
}

impl Default for CorrelationSettings {
    fn default() -> Self {
        Self {
            alignment_tolerance_ms: 60_000,
            min_pairs: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonalitySettings {
    pub min_points: usize,
    pub max_patterns: usize,
}

impl Default for SeasonalitySettings {
    fn default() -> Self {
        Self {
            min_points: 24,
            max_patterns: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsolationSettings {
    pub trees: usize,
    /// Sub-sample size per tree (capped at the series length).
    pub sample_size: usize,
    /// Seed for tree construction; identical input gives identical scores.
    pub seed: u64,
}

impl Default for IsolationSettings {
    fn default() -> Self {
        Self {
            trees: 100,
            sample_size: 256,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Maximum number of memoized results; 0 disables caching.
    pub capacity: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.thresholds.trend_stable_threshold, 0.01);
        assert_eq!(config.thresholds.zscore_threshold, 2.5);
        assert_eq!(config.thresholds.iqr_multiplier, 1.5);
        assert_eq!(config.thresholds.seasonality_min_amplitude, 0.1);
        assert_eq!(config.correlation.alignment_tolerance_ms, 60_000);
        assert_eq!(config.seasonality.min_points, 24);
        assert_eq!(config.forecast.exponential_alpha, 0.3);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config = AnalyticsConfig::from_json(
            r#"{ "thresholds": { "zscore_threshold": 3.0 }, "cache": { "capacity": 8 } }"#,
        )
        .unwrap();
        assert_eq!(config.thresholds.zscore_threshold, 3.0);
        assert_eq!(config.thresholds.iqr_multiplier, 1.5);
        assert_eq!(config.cache.capacity, 8);
        assert_eq!(config.schema_version, crate::CONFIG_SCHEMA_VERSION);
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = AnalyticsConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    }
}
