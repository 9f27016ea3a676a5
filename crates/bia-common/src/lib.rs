//! bi-analytics common types and errors.
//!
//! This crate provides foundational types shared across the engine crates:
//! - Time-series data model (points, series, intervals)
//! - Analysis result records and method selectors
//! - Common error types with stable codes
//! - Output format specifications

pub mod error;
pub mod output;
pub mod results;
pub mod series;

pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use output::OutputFormat;
pub use results::{
    AggregationType, Anomaly, AnomalyDetection, AnomalyMethod, CorrelationAnalysis,
    ForecastMethod, Quartiles, Relationship, SeasonalPattern, SeasonalityAnalysis, Severity,
    Significance, StatisticalSummary, TrendAnalysis, TrendDirection,
};
pub use series::{DataPoint, Interval, Metadata, TimeSeries};
