//! bi-analytics configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for analytics.json
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation
//! - Config snapshots for provenance in logs and output

pub mod analytics;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use analytics::{
    AnalyticsConfig, CacheSettings, CorrelationSettings, ForecastSettings, IsolationSettings,
    SeasonalitySettings, Thresholds,
};
pub use resolve::{load_config, resolve_config_path, ConfigSource, LoadedConfig};
pub use snapshot::ConfigSnapshot;
pub use validate::{validate_config, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
