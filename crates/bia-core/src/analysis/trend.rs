//! Linear trend over point index, with straight-line extrapolation.

use bia_common::{DataPoint, TimeSeries, TrendAnalysis, TrendDirection};
use bia_math::linear_regression;

/// Spacing used for forecast timestamps: the gap between the first two
/// sorted points, or the series interval when that gap is not positive.
pub fn forecast_step(sorted: &[DataPoint], series: &TimeSeries) -> i64 {
    match sorted {
        [first, second, ..] if second.timestamp > first.timestamp => {
            second.timestamp.saturating_sub(first.timestamp)
        }
        _ => series.interval.as_millis(),
    }
}

/// Future timestamps `last + step * (i + 1)` for `periods` steps.
pub fn future_timestamps(sorted: &[DataPoint], step: i64, periods: usize) -> Vec<i64> {
    let last = sorted.last().map(|p| p.timestamp).unwrap_or(0);
    (1..=periods as i64)
        .map(|i| last.saturating_add(step.saturating_mul(i)))
        .collect()
}

/// Regress values on their position in timestamp order.
///
/// The independent variable is the index `0..n`, not the timestamp, so
/// irregular spacing does not change the slope. Requires two points.
pub fn analyze_trend(
    series: &TimeSeries,
    periods: usize,
    stable_threshold: f64,
) -> Option<TrendAnalysis> {
    if series.len() < 2 {
        return None;
    }

    let sorted = series.sorted_points();
    let n = sorted.len();
    let xs: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let ys: Vec<f64> = sorted.iter().map(|p| p.value).collect();
    let fit = linear_regression(&xs, &ys)?;

    let step = forecast_step(&sorted, series);
    let forecast = future_timestamps(&sorted, step, periods)
        .into_iter()
        .enumerate()
        .map(|(i, ts)| DataPoint::new(ts, fit.predict((n + i) as f64)))
        .collect();

    Some(TrendAnalysis {
        trend: TrendDirection::classify(fit.slope, stable_threshold),
        slope: fit.slope,
        intercept: fit.intercept,
        correlation: fit.correlation,
        confidence: fit.correlation.abs(),
        forecast,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bia_common::Interval;

    const HOUR: i64 = 3_600_000;

    fn series_from(values: impl IntoIterator<Item = f64>) -> TimeSeries {
        let points = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| DataPoint::new(1_700_000_000_000 + i as i64 * HOUR, v))
            .collect();
        TimeSeries::new(points, Interval::Hour)
    }

    #[test]
    fn perfect_line_is_increasing() {
        let series = series_from((0..20).map(|i| 2.0 * i as f64 + 5.0));
        let trend = analyze_trend(&series, 10, 0.01).unwrap();
        assert_eq!(trend.trend, TrendDirection::Increasing);
        assert!((trend.slope - 2.0).abs() < 1e-9);
        assert!((trend.correlation - 1.0).abs() < 1e-9);
        assert!((trend.confidence - 1.0).abs() < 1e-9);
        assert_eq!(trend.forecast.len(), 10);
        assert!((trend.forecast[0].value - 45.0).abs() < 1e-9);
        assert_eq!(
            trend.forecast[0].timestamp,
            series.points[19].timestamp + HOUR
        );
    }

    #[test]
    fn constant_series_is_stable_with_zero_correlation() {
        let trend = analyze_trend(&series_from([50.0; 12]), 3, 0.01).unwrap();
        assert_eq!(trend.trend, TrendDirection::Stable);
        assert_eq!(trend.slope, 0.0);
        assert_eq!(trend.correlation, 0.0);
        assert_eq!(trend.confidence, 0.0);
        assert!(trend.forecast.iter().all(|p| p.value == 50.0));
    }

    #[test]
    fn decreasing_series() {
        let trend = analyze_trend(&series_from((0..10).map(|i| 100.0 - i as f64)), 0, 0.01).unwrap();
        assert_eq!(trend.trend, TrendDirection::Decreasing);
        assert!(trend.forecast.is_empty());
    }

    #[test]
    fn unsorted_points_are_ordered_first() {
        let mut series = series_from((0..6).map(|i| i as f64));
        series.points.reverse();
        let trend = analyze_trend(&series, 1, 0.01).unwrap();
        assert!((trend.slope - 1.0).abs() < 1e-12);
    }

    #[test]
    fn single_point_has_no_trend() {
        assert!(analyze_trend(&series_from([1.0]), 5, 0.01).is_none());
    }

    #[test]
    fn duplicate_first_timestamps_fall_back_to_interval() {
        let series = TimeSeries::new(
            vec![DataPoint::new(0, 1.0), DataPoint::new(0, 2.0), DataPoint::new(HOUR, 3.0)],
            Interval::Day,
        );
        let sorted = series.sorted_points();
        assert_eq!(forecast_step(&sorted, &series), Interval::Day.as_millis());
    }
}
