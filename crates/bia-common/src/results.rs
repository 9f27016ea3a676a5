//! Analysis result records and method selectors.
//!
//! Results are plain values built once by the engine and never mutated.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::series::DataPoint;

// ============================================================================
// Statistical summary
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

/// Descriptive statistics over the values of one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Every value reaching the maximum frequency.
    pub mode: Vec<f64>,
    /// Population standard deviation.
    pub std_dev: f64,
    /// Population variance.
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub quartiles: Quartiles,
    /// `None` for fewer than 3 points or zero spread.
    pub skewness: Option<f64>,
    /// Excess kurtosis; `None` for fewer than 4 points or zero spread.
    pub kurtosis: Option<f64>,
}

// ============================================================================
// Trend
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    /// `|slope| < stable_threshold` is stable, otherwise the sign decides.
    pub fn classify(slope: f64, stable_threshold: f64) -> TrendDirection {
        if slope.abs() < stable_threshold {
            TrendDirection::Stable
        } else if slope > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Increasing => write!(f, "increasing"),
            TrendDirection::Decreasing => write!(f, "decreasing"),
            TrendDirection::Stable => write!(f, "stable"),
        }
    }
}

/// Linear trend over point index with a straight-line forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub trend: TrendDirection,
    /// Change in value per point.
    pub slope: f64,
    pub intercept: f64,
    pub correlation: f64,
    /// `|correlation|`.
    pub confidence: f64,
    pub forecast: Vec<DataPoint>,
}

// ============================================================================
// Anomalies
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyMethod {
    #[default]
    Zscore,
    Iqr,
    Isolation,
}

impl std::fmt::Display for AnomalyMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnomalyMethod::Zscore => write!(f, "zscore"),
            AnomalyMethod::Iqr => write!(f, "iqr"),
            AnomalyMethod::Isolation => write!(f, "isolation"),
        }
    }
}

impl std::str::FromStr for AnomalyMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zscore" | "z-score" | "z" => Ok(AnomalyMethod::Zscore),
            "iqr" | "tukey" => Ok(AnomalyMethod::Iqr),
            "isolation" | "iforest" => Ok(AnomalyMethod::Isolation),
            _ => Err(format!("unknown anomaly method: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Shared bucketing for every detector: below 1.5x the threshold is low,
    /// below 2x is medium, anything further out is high.
    pub fn classify(score: f64, threshold: f64) -> Severity {
        if score < threshold * 1.5 {
            Severity::Low
        } else if score < threshold * 2.0 {
            Severity::Medium
        } else {
            Severity::High
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub timestamp: i64,
    pub value: f64,
    pub severity: Severity,
    /// Detector-specific score the severity was derived from. Always finite;
    /// IQR reports `f64::MAX` for points off a zero-width interquartile range.
    pub score: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyDetection {
    pub anomalies: Vec<Anomaly>,
    pub threshold: f64,
    pub method: AnomalyMethod,
}

// ============================================================================
// Correlation
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Significance {
    Weak,
    Moderate,
    Strong,
}

impl Significance {
    /// `|r| < 0.3` weak, `< 0.7` moderate, otherwise strong.
    pub fn from_coefficient(r: f64) -> Significance {
        let magnitude = r.abs();
        if magnitude < 0.3 {
            Significance::Weak
        } else if magnitude < 0.7 {
            Significance::Moderate
        } else {
            Significance::Strong
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Positive,
    Negative,
    None,
}

impl Relationship {
    /// Positive above 0.1, negative below -0.1, none in between.
    pub fn from_coefficient(r: f64) -> Relationship {
        if r > 0.1 {
            Relationship::Positive
        } else if r < -0.1 {
            Relationship::Negative
        } else {
            Relationship::None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationAnalysis {
    pub coefficient: f64,
    pub p_value: f64,
    pub significance: Significance,
    pub relationship: Relationship,
    /// Number of timestamp-aligned pairs the coefficient was computed over.
    pub sample_size: usize,
}

// ============================================================================
// Seasonality
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalPattern {
    /// Display label: daily, weekly, monthly, yearly, or custom.
    pub period: String,
    /// Period length in points.
    pub period_points: f64,
    pub amplitude: f64,
    pub phase: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityAnalysis {
    pub has_seasonality: bool,
    /// Period of the strongest pattern in points (0 when none).
    pub dominant_period: usize,
    /// Amplitude of the strongest pattern (0 when none).
    pub strength: f64,
    pub patterns: Vec<SeasonalPattern>,
}

// ============================================================================
// Aggregation and forecasting selectors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationType {
    #[default]
    Sum,
    Avg,
    Min,
    Max,
    Count,
}

impl std::fmt::Display for AggregationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregationType::Sum => write!(f, "sum"),
            AggregationType::Avg => write!(f, "avg"),
            AggregationType::Min => write!(f, "min"),
            AggregationType::Max => write!(f, "max"),
            AggregationType::Count => write!(f, "count"),
        }
    }
}

impl std::str::FromStr for AggregationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sum" => Ok(AggregationType::Sum),
            "avg" | "mean" | "average" => Ok(AggregationType::Avg),
            "min" => Ok(AggregationType::Min),
            "max" => Ok(AggregationType::Max),
            "count" => Ok(AggregationType::Count),
            _ => Err(format!("unknown aggregation type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastMethod {
    #[default]
    Linear,
    Exponential,
    Seasonal,
}

impl std::fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForecastMethod::Linear => write!(f, "linear"),
            ForecastMethod::Exponential => write!(f, "exponential"),
            ForecastMethod::Seasonal => write!(f, "seasonal"),
        }
    }
}

impl std::str::FromStr for ForecastMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(ForecastMethod::Linear),
            "exponential" | "ses" => Ok(ForecastMethod::Exponential),
            "seasonal" => Ok(ForecastMethod::Seasonal),
            _ => Err(format!("unknown forecast method: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_classification_uses_absolute_cutoff() {
        assert_eq!(TrendDirection::classify(0.009, 0.01), TrendDirection::Stable);
        assert_eq!(TrendDirection::classify(-0.009, 0.01), TrendDirection::Stable);
        assert_eq!(TrendDirection::classify(0.01, 0.01), TrendDirection::Increasing);
        assert_eq!(TrendDirection::classify(-2.0, 0.01), TrendDirection::Decreasing);
    }

    #[test]
    fn severity_buckets() {
        assert_eq!(Severity::classify(2.6, 2.5), Severity::Low);
        assert_eq!(Severity::classify(3.75, 2.5), Severity::Medium);
        assert_eq!(Severity::classify(4.99, 2.5), Severity::Medium);
        assert_eq!(Severity::classify(5.0, 2.5), Severity::High);
        assert_eq!(Severity::classify(f64::INFINITY, 1.5), Severity::High);
    }

    #[test]
    fn correlation_buckets() {
        assert_eq!(Significance::from_coefficient(0.29), Significance::Weak);
        assert_eq!(Significance::from_coefficient(-0.5), Significance::Moderate);
        assert_eq!(Significance::from_coefficient(0.7), Significance::Strong);
        assert_eq!(Relationship::from_coefficient(0.11), Relationship::Positive);
        assert_eq!(Relationship::from_coefficient(-0.11), Relationship::Negative);
        assert_eq!(Relationship::from_coefficient(0.1), Relationship::None);
    }

    #[test]
    fn selectors_parse_and_serialize() {
        assert_eq!("IQR".parse::<AnomalyMethod>().unwrap(), AnomalyMethod::Iqr);
        assert_eq!("mean".parse::<AggregationType>().unwrap(), AggregationType::Avg);
        assert_eq!("seasonal".parse::<ForecastMethod>().unwrap(), ForecastMethod::Seasonal);
        assert!("arima".parse::<ForecastMethod>().is_err());
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
        assert_eq!(AnomalyMethod::default(), AnomalyMethod::Zscore);
        assert_eq!(AggregationType::default(), AggregationType::Sum);
        assert_eq!(ForecastMethod::default(), ForecastMethod::Linear);
    }
}
