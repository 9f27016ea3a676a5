//! Analysis kernels over in-memory series.
//!
//! Each function is pure: it reads a series (and settings) and builds a
//! result. Caching and dataset lookup live in [`crate::engine`].

pub mod aggregate;
pub mod anomaly;
pub mod correlation;
pub mod forecast;
pub mod isolation;
pub mod seasonality;
pub mod summary;
pub mod trend;

pub use aggregate::aggregate;
pub use anomaly::detect_anomalies;
pub use correlation::analyze_correlation;
pub use forecast::{exponential_forecast, seasonal_forecast};
pub use seasonality::analyze_seasonality;
pub use summary::statistical_summary;
pub use trend::analyze_trend;
