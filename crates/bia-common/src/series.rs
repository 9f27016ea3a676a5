//! Time-series data model.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Open key-value map attached to a point.
pub type Metadata = BTreeMap<String, serde_json::Value>;

const HOUR_MS: i64 = 60 * 60 * 1000;
const DAY_MS: i64 = 24 * HOUR_MS;

/// A single observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Epoch milliseconds.
    pub timestamp: i64,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl DataPoint {
    pub fn new(timestamp: i64, value: f64) -> Self {
        DataPoint {
            timestamp,
            value,
            category: None,
            metadata: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Attach one metadata entry, creating the map on first use.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata
            .get_or_insert_with(Metadata::new)
            .insert(key.into(), value.into());
        self
    }

    /// Look up a metadata entry.
    pub fn metadata_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.metadata.as_ref().and_then(|m| m.get(key))
    }
}

/// Sampling interval of a series (also the target of aggregation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Hour,
    Day,
    Week,
    /// Fixed 30-day window.
    Month,
    /// Fixed 365-day window.
    Year,
}

impl Interval {
    pub const ALL: [Interval; 5] = [
        Interval::Hour,
        Interval::Day,
        Interval::Week,
        Interval::Month,
        Interval::Year,
    ];

    /// Fixed window width in milliseconds.
    pub fn as_millis(&self) -> i64 {
        match self {
            Interval::Hour => HOUR_MS,
            Interval::Day => DAY_MS,
            Interval::Week => 7 * DAY_MS,
            Interval::Month => 30 * DAY_MS,
            Interval::Year => 365 * DAY_MS,
        }
    }

    /// Nearest interval (in log distance) to an observed spacing.
    pub fn infer(step_ms: i64) -> Interval {
        if step_ms <= 0 {
            return Interval::Day;
        }
        let step = (step_ms as f64).ln();
        Interval::ALL
            .iter()
            .copied()
            .min_by(|a, b| {
                let da = ((a.as_millis() as f64).ln() - step).abs();
                let db = ((b.as_millis() as f64).ln() - step).abs();
                da.total_cmp(&db)
            })
            .unwrap_or(Interval::Day)
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interval::Hour => write!(f, "hour"),
            Interval::Day => write!(f, "day"),
            Interval::Week => write!(f, "week"),
            Interval::Month => write!(f, "month"),
            Interval::Year => write!(f, "year"),
        }
    }
}

impl std::str::FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hour" | "hourly" => Ok(Interval::Hour),
            "day" | "daily" => Ok(Interval::Day),
            "week" | "weekly" => Ok(Interval::Week),
            "month" | "monthly" => Ok(Interval::Month),
            "year" | "yearly" => Ok(Interval::Year),
            _ => Err(format!("unknown interval: {}", s)),
        }
    }
}

/// An ordered sequence of points with an interval descriptor and time bounds.
///
/// Ordering by timestamp is expected but not enforced; operations that need
/// order sort a copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub points: Vec<DataPoint>,
    pub interval: Interval,
    pub start_time: i64,
    pub end_time: i64,
}

impl TimeSeries {
    /// Build a series, deriving the time bounds from the points.
    pub fn new(points: Vec<DataPoint>, interval: Interval) -> Self {
        let start_time = points.iter().map(|p| p.timestamp).min().unwrap_or(0);
        let end_time = points.iter().map(|p| p.timestamp).max().unwrap_or(0);
        TimeSeries {
            points,
            interval,
            start_time,
            end_time,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Values in stored order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Copy of the points sorted by timestamp (stable for equal timestamps).
    pub fn sorted_points(&self) -> Vec<DataPoint> {
        let mut points = self.points.clone();
        points.sort_by_key(|p| p.timestamp);
        points
    }
}
