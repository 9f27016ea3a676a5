//! bi-analytics engine library.
//!
//! This crate provides the analysis engine behind the `bia` CLI:
//! - Named dataset store with a bounded, dependency-aware result cache
//! - Statistical summary, trend, anomaly, correlation, and seasonality analyses
//! - Aggregation and forecasting
//! - Sample generation and CSV import/export
//! - Structured logging and exit codes

pub mod analysis;
pub mod cache;
pub mod csv;
pub mod engine;
pub mod exit_codes;
pub mod logging;
pub mod output;
pub mod sample;

pub use cache::{AnalysisCache, AnalysisKind, CacheKey, CacheStats};
pub use csv::{export_to_csv, parse_csv, read_csv_file};
pub use engine::{AnalyticsEngine, SharedAnalyticsEngine};
pub use exit_codes::ExitCode;
pub use sample::{generate_sample_data, SampleParams};

pub use bia_common::{
    AggregationType, AnomalyMethod, DataPoint, ForecastMethod, Interval, TimeSeries,
};
pub use bia_config::AnalyticsConfig;
