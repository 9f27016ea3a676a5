//! Descriptive statistics over plain value slices.
//!
//! Variance and standard deviation are population moments (divide by n).
//! Skewness and kurtosis use the small-sample adjusted formulas and are only
//! defined for n > 2 and n > 3 respectively; outside that range, or when the
//! spread is zero, they return `None` instead of dividing by zero.

/// Arithmetic mean. NaN for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance around a precomputed mean. NaN for empty input.
pub fn population_variance(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation around a precomputed mean.
pub fn population_std(values: &[f64], mean: f64) -> f64 {
    population_variance(values, mean).sqrt()
}

/// Copy and sort ascending using a total order (NaN sorts last).
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Percentile of an ascending slice with linear interpolation.
///
/// `p` is in percent. The fractional index is `p/100 * (n - 1)`; the result
/// interpolates between the floor and ceil elements.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || p.is_nan() {
        return None;
    }
    let p = p.clamp(0.0, 100.0);
    let index = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let weight = index - lower as f64;
    Some(sorted[lower] * (1.0 - weight) + sorted[upper] * weight)
}

/// Median of an ascending slice: the middle element, or the average of the
/// two middle elements for an even count.
pub fn median(sorted: &[f64]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Every value reaching the maximum observed frequency, ascending.
///
/// Values are compared exactly. When all values are distinct every value is
/// a mode.
pub fn modes(sorted: &[f64]) -> Vec<f64> {
    let mut runs: Vec<(f64, usize)> = Vec::new();
    for &value in sorted {
        match runs.last_mut() {
            Some((last, count)) if *last == value => *count += 1,
            _ => runs.push((value, 1)),
        }
    }
    let max_count = runs.iter().map(|(_, c)| *c).max().unwrap_or(0);
    runs.into_iter()
        .filter(|(_, c)| *c == max_count)
        .map(|(v, _)| v)
        .collect()
}

/// Adjusted sample skewness `n / ((n-1)(n-2)) * Σ z³`.
pub fn skewness(values: &[f64], mean: f64, std: f64) -> Option<f64> {
    let n = values.len();
    if n < 3 || !(std.is_finite() && std > 0.0) {
        return None;
    }
    let n_f = n as f64;
    let sum_cubed: f64 = values.iter().map(|v| ((v - mean) / std).powi(3)).sum();
    Some(n_f / ((n_f - 1.0) * (n_f - 2.0)) * sum_cubed)
}

/// Adjusted excess kurtosis.
///
/// `n(n+1) / ((n-1)(n-2)(n-3)) * Σ z⁴ - 3(n-1)² / ((n-2)(n-3))`
pub fn kurtosis(values: &[f64], mean: f64, std: f64) -> Option<f64> {
    let n = values.len();
    if n < 4 || !(std.is_finite() && std > 0.0) {
        return None;
    }
    let n_f = n as f64;
    let sum_fourth: f64 = values.iter().map(|v| ((v - mean) / std).powi(4)).sum();
    let scale = n_f * (n_f + 1.0) / ((n_f - 1.0) * (n_f - 2.0) * (n_f - 3.0));
    let correction = 3.0 * (n_f - 1.0).powi(2) / ((n_f - 2.0) * (n_f - 3.0));
    Some(scale * sum_fourth - correction)
}
