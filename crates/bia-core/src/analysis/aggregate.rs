//! Fixed-window resampling.

use std::collections::BTreeMap;

use bia_common::{AggregationType, DataPoint, Interval, TimeSeries};

/// Metadata key carrying how many source points a bucket folded.
pub const ORIGINAL_COUNT_KEY: &str = "originalCount";

/// Window start for `timestamp`: `floor(timestamp / width) * width`, saturating
/// at the low end of the range.
pub fn bucket_start(timestamp: i64, width_ms: i64) -> i64 {
    timestamp.saturating_sub(timestamp.rem_euclid(width_ms))
}

fn reduce(values: &[f64], op: AggregationType) -> f64 {
    match op {
        AggregationType::Sum => values.iter().sum(),
        AggregationType::Avg => values.iter().sum::<f64>() / values.len() as f64,
        AggregationType::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        AggregationType::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        AggregationType::Count => values.len() as f64,
    }
}

/// Fold `series` into `interval`-wide buckets, one output point per
/// non-empty bucket in time order. Empty windows produce no point.
pub fn aggregate(series: &TimeSeries, interval: Interval, op: AggregationType) -> TimeSeries {
    let width = interval.as_millis();
    let mut buckets: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for point in &series.points {
        buckets
            .entry(bucket_start(point.timestamp, width))
            .or_default()
            .push(point.value);
    }

    let points = buckets
        .into_iter()
        .map(|(start, values)| {
            DataPoint::new(start, reduce(&values, op)).with_metadata(ORIGINAL_COUNT_KEY, values.len())
        })
        .collect();

    TimeSeries::new(points, interval)
}
