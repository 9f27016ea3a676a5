//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::analytics::AnalyticsConfig;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

fn invalid(field: &str, message: String) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        message,
    }
}

fn positive(field: &str, value: f64) -> ValidationResult<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid(field, format!("Must be positive and finite, got {}", value)));
    }
    Ok(())
}

fn at_least(field: &str, value: usize, min: usize) -> ValidationResult<()> {
    if value < min {
        return Err(invalid(field, format!("Must be at least {}, got {}", min, value)));
    }
    Ok(())
}

/// Validate an analytics configuration semantically.
pub fn validate_config(config: &AnalyticsConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    let t = &config.thresholds;
    positive("thresholds.trend_stable_threshold", t.trend_stable_threshold)?;
    positive("thresholds.zscore_threshold", t.zscore_threshold)?;
    positive("thresholds.iqr_multiplier", t.iqr_multiplier)?;
    positive("thresholds.seasonality_min_amplitude", t.seasonality_min_amplitude)?;
    if !(t.isolation_threshold > 0.0 && t.isolation_threshold < 1.0) {
        return Err(invalid(
            "thresholds.isolation_threshold",
            format!("Must be in (0, 1), got {}", t.isolation_threshold),
        ));
    }

    let alpha = config.forecast.exponential_alpha;
    if !(alpha > 0.0 && alpha <= 1.0) {
        return Err(invalid(
            "forecast.exponential_alpha",
            format!("Must be in (0, 1], got {}", alpha),
        ));
    }
    at_least("forecast.min_points", config.forecast.min_points, 2)?;

    if config.correlation.alignment_tolerance_ms < 0 {
        return Err(invalid(
            "correlation.alignment_tolerance_ms",
            format!(
                "Must be non-negative, got {}",
                config.correlation.alignment_tolerance_ms
            ),
        ));
    }
    // The t-test needs at least one degree of freedom.
    at_least("correlation.min_pairs", config.correlation.min_pairs, 3)?;

    at_least("seasonality.min_points", config.seasonality.min_points, 4)?;
    at_least("seasonality.max_patterns", config.seasonality.max_patterns, 1)?;

    at_least("isolation.trees", config.isolation.trees, 1)?;
    at_least("isolation.sample_size", config.isolation.sample_size, 2)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        validate_config(&AnalyticsConfig::default()).unwrap();
    }

    #[test]
    fn rejects_non_positive_threshold() {
        let mut config = AnalyticsConfig::default();
        config.thresholds.zscore_threshold = 0.0;
        let err = validate_config(&config).unwrap_err();
        match err {
            ValidationError::InvalidValue { field, .. } => {
                assert_eq!(field, "thresholds.zscore_threshold")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_alpha_out_of_range() {
        let mut config = AnalyticsConfig::default();
        config.forecast.exponential_alpha = 1.5;
        assert!(validate_config(&config).is_err());
        config.forecast.exponential_alpha = 1.0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_too_few_pairs() {
        let mut config = AnalyticsConfig::default();
        config.correlation.min_pairs = 2;
        assert_eq!(validate_config(&config).unwrap_err().code(), 65);
    }

    #[test]
    fn rejects_schema_mismatch() {
        let config = AnalyticsConfig {
            schema_version: "0.9.0".to_string(),
            ..AnalyticsConfig::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn zero_cache_capacity_is_allowed() {
        let mut config = AnalyticsConfig::default();
        config.cache.capacity = 0;
        assert!(validate_config(&config).is_ok());
    }
}
