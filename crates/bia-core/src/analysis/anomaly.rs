//! Anomaly detection: z-score, Tukey fences, and isolation forest.
//!
//! Every detector reduces a point to a non-negative score and flags it when
//! the score exceeds the detector's threshold. Severity uses the shared
//! bucketing in [`Severity::classify`].

use bia_common::{Anomaly, AnomalyDetection, AnomalyMethod, DataPoint, Severity, TimeSeries};
use bia_config::AnalyticsConfig;
use bia_math::{mean, percentile, population_std, sorted_copy};

use super::isolation::IsolationForest;

/// Score of an isolation forest for a point that is neither normal nor
/// anomalous.
const ISOLATION_NEUTRAL_SCORE: f64 = 0.5;

/// Run `method` over `series`. Anomalies are reported in timestamp order.
pub fn detect_anomalies(
    series: &TimeSeries,
    method: AnomalyMethod,
    config: &AnalyticsConfig,
) -> AnomalyDetection {
    let points = series.sorted_points();
    let thresholds = &config.thresholds;

    let (threshold, anomalies) = match method {
        AnomalyMethod::Zscore => (
            thresholds.zscore_threshold,
            zscore(&points, thresholds.zscore_threshold),
        ),
        AnomalyMethod::Iqr => (
            thresholds.iqr_multiplier,
            tukey(&points, thresholds.iqr_multiplier),
        ),
        AnomalyMethod::Isolation => (
            thresholds.isolation_threshold,
            isolation(&points, thresholds.isolation_threshold, config),
        ),
    };

    AnomalyDetection {
        anomalies,
        threshold,
        method,
    }
}

fn zscore(points: &[DataPoint], threshold: f64) -> Vec<Anomaly> {
    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    let mean = mean(&values);
    let std = population_std(&values, mean);
    // Zero spread: nothing deviates.
    if !(std.is_finite() && std > 0.0) {
        return Vec::new();
    }

    points
        .iter()
        .filter_map(|p| {
            let z = (p.value - mean) / std;
            let score = z.abs();
            (score > threshold).then(|| Anomaly {
                timestamp: p.timestamp,
                value: p.value,
                severity: Severity::classify(score, threshold),
                score,
                reason: format!(
                    "Z-score {:.2} exceeds threshold {} (mean {:.2}, std {:.2})",
                    z, threshold, mean, std
                ),
            })
        })
        .collect()
}

/// Distance outside `[q1, q3]` in IQR units. When the IQR is zero, any value
/// off the quartiles scores `f64::MAX` so the score stays finite in JSON.
fn iqr_score(value: f64, q1: f64, q3: f64) -> f64 {
    let iqr = q3 - q1;
    let distance = if value < q1 {
        q1 - value
    } else if value > q3 {
        value - q3
    } else {
        return 0.0;
    };
    if iqr > 0.0 {
        distance / iqr
    } else {
        f64::MAX
    }
}

fn tukey(points: &[DataPoint], multiplier: f64) -> Vec<Anomaly> {
    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    let sorted = sorted_copy(&values);
    let (Some(q1), Some(q3)) = (percentile(&sorted, 25.0), percentile(&sorted, 75.0)) else {
        return Vec::new();
    };
    let iqr = q3 - q1;
    let lower = q1 - multiplier * iqr;
    let upper = q3 + multiplier * iqr;

    points
        .iter()
        .filter_map(|p| {
            let score = iqr_score(p.value, q1, q3);
            (score > multiplier).then(|| Anomaly {
                timestamp: p.timestamp,
                value: p.value,
                severity: Severity::classify(score, multiplier),
                score,
                reason: format!(
                    "Value {:.2} outside IQR fences [{:.2}, {:.2}]",
                    p.value, lower, upper
                ),
            })
        })
        .collect()
}

fn isolation(points: &[DataPoint], threshold: f64, config: &AnalyticsConfig) -> Vec<Anomaly> {
    if points.is_empty() {
        return Vec::new();
    }
    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    let settings = &config.isolation;
    let forest = IsolationForest::fit(&values, settings.trees, settings.sample_size, settings.seed);

    // Severity is measured as excess over the neutral score, in units of the
    // threshold's own excess.
    let margin = threshold - ISOLATION_NEUTRAL_SCORE;

    points
        .iter()
        .filter_map(|p| {
            let score = forest.score(p.value);
            if score <= threshold {
                return None;
            }
            let severity = if margin > 0.0 {
                Severity::classify((score - ISOLATION_NEUTRAL_SCORE) / margin, 1.0)
            } else {
                Severity::classify(score, threshold)
            };
            Some(Anomaly {
                timestamp: p.timestamp,
                value: p.value,
                severity,
                score,
                reason: format!(
                    "Isolation score {:.3} exceeds threshold {}",
                    score, threshold
                ),
            })
        })
        .collect()
}
