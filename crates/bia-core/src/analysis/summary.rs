//! Descriptive statistics for a single series.

use bia_common::{Quartiles, StatisticalSummary, TimeSeries};
use bia_math::{kurtosis, mean, median, modes, percentile, population_variance, skewness, sorted_copy};

/// Summarize the values of `series`. `None` for an empty series.
pub fn statistical_summary(series: &TimeSeries) -> Option<StatisticalSummary> {
    if series.is_empty() {
        return None;
    }

    let values = series.values();
    let sorted = sorted_copy(&values);
    let count = sorted.len();

    let mean = mean(&values);
    let variance = population_variance(&values, mean);
    let std_dev = variance.sqrt();
    let min = sorted[0];
    let max = sorted[count - 1];

    let quartiles = Quartiles {
        q1: percentile(&sorted, 25.0)?,
        q2: percentile(&sorted, 50.0)?,
        q3: percentile(&sorted, 75.0)?,
    };

    Some(StatisticalSummary {
        count,
        mean,
        median: median(&sorted)?,
        mode: modes(&sorted),
        std_dev,
        variance,
        min,
        max,
        range: max - min,
        quartiles,
        skewness: skewness(&values, mean, std_dev),
        kurtosis: kurtosis(&values, mean, std_dev),
    })
}
