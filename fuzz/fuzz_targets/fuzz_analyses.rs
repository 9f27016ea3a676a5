//! Fuzz target for the analyses over arbitrary values, including NaN and
//! infinities, and arbitrary timestamps.

#![no_main]

use arbitrary::Arbitrary;
use bia_common::{
    AggregationType, AnomalyMethod, DataPoint, ForecastMethod, Interval, TimeSeries,
};
use bia_core::engine::AnalyticsEngine;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    points: Vec<(i64, f64)>,
    other: Vec<(i64, f64)>,
    periods: u8,
}

fn series(points: &[(i64, f64)]) -> TimeSeries {
    TimeSeries::new(
        points.iter().map(|(t, v)| DataPoint::new(*t, *v)).collect(),
        Interval::Hour,
    )
}

fuzz_target!(|input: Input| {
    let mut engine = AnalyticsEngine::default();
    engine.add_dataset("a", series(&input.points));
    engine.add_dataset("b", series(&input.other));
    let periods = usize::from(input.periods);

    let _ = engine.statistical_summary("a");
    let _ = engine.analyze_trend("a", periods);
    for method in [AnomalyMethod::Zscore, AnomalyMethod::Iqr, AnomalyMethod::Isolation] {
        let _ = engine.detect_anomalies("a", method);
    }
    let _ = engine.analyze_correlation("a", "b");
    let _ = engine.analyze_seasonality("a");
    let _ = engine.aggregate_data("a", Interval::Day, AggregationType::Avg);
    for method in [ForecastMethod::Linear, ForecastMethod::Exponential, ForecastMethod::Seasonal] {
        let _ = engine.forecast("a", periods, method);
    }
});
