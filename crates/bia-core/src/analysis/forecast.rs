//! Exponential and seasonal-naive forecasts.
//!
//! Linear forecasts come from the trend analysis; the engine dispatches
//! between the three so the trend and seasonality results stay cached.

use bia_common::{DataPoint, TimeSeries};

use super::trend::{forecast_step, future_timestamps};

/// Simple exponential smoothing level after consuming all values.
pub fn smoothed_level(values: &[f64], alpha: f64) -> Option<f64> {
    let (first, rest) = values.split_first()?;
    Some(
        rest.iter()
            .fold(*first, |level, value| alpha * value + (1.0 - alpha) * level),
    )
}

/// Flat forecast at the smoothed level.
pub fn exponential_forecast(series: &TimeSeries, periods: usize, alpha: f64) -> Option<Vec<DataPoint>> {
    let sorted = series.sorted_points();
    let values: Vec<f64> = sorted.iter().map(|p| p.value).collect();
    let level = smoothed_level(&values, alpha)?;
    let step = forecast_step(&sorted, series);
    Some(
        future_timestamps(&sorted, step, periods)
            .into_iter()
            .map(|ts| DataPoint::new(ts, level))
            .collect(),
    )
}

/// Repeat the last observed cycle of length `period`.
///
/// `None` when the period is zero or longer than the series.
pub fn seasonal_forecast(series: &TimeSeries, periods: usize, period: usize) -> Option<Vec<DataPoint>> {
    let sorted = series.sorted_points();
    let n = sorted.len();
    if period == 0 || period > n {
        return None;
    }
    let step = forecast_step(&sorted, series);
    let cycle = &sorted[n - period..];
    Some(
        future_timestamps(&sorted, step, periods)
            .into_iter()
            .enumerate()
            .map(|(i, ts)| DataPoint::new(ts, cycle[i % period].value))
            .collect(),
    )
}
