//! Pearson correlation between two timestamp-aligned series.

use bia_common::{CorrelationAnalysis, DataPoint, Relationship, Significance, TimeSeries};
use bia_config::CorrelationSettings;
use bia_math::{correlation_p_value, pearson};

/// Pair each point of `left` with the nearest-in-time point of `right`
/// within `tolerance_ms`. Both slices must be sorted by timestamp.
pub fn align_pairs(left: &[DataPoint], right: &[DataPoint], tolerance_ms: i64) -> Vec<(f64, f64)> {
    if right.is_empty() {
        return Vec::new();
    }

    left.iter()
        .filter_map(|p| {
            let idx = right.partition_point(|q| q.timestamp < p.timestamp);
            let before = idx.checked_sub(1).map(|i| &right[i]);
            let after = right.get(idx);
            let nearest = match (before, after) {
                (Some(b), Some(a)) => {
                    if p.timestamp.abs_diff(b.timestamp) <= p.timestamp.abs_diff(a.timestamp) {
                        b
                    } else {
                        a
                    }
                }
                (Some(b), None) => b,
                (None, Some(a)) => a,
                (None, None) => return None,
            };
            (p.timestamp.abs_diff(nearest.timestamp) <= tolerance_ms.unsigned_abs())
                .then_some((p.value, nearest.value))
        })
        .collect()
}

/// Correlate `first` against `second`. `None` when fewer than
/// `settings.min_pairs` points align.
pub fn analyze_correlation(
    first: &TimeSeries,
    second: &TimeSeries,
    settings: &CorrelationSettings,
) -> Option<CorrelationAnalysis> {
    let left = first.sorted_points();
    let right = second.sorted_points();
    let pairs = align_pairs(&left, &right, settings.alignment_tolerance_ms);
    if pairs.len() < settings.min_pairs.max(3) {
        return None;
    }

    let (xs, ys): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
    let coefficient = pearson(&xs, &ys)?;
    let sample_size = xs.len();

    Some(CorrelationAnalysis {
        coefficient,
        p_value: correlation_p_value(coefficient, sample_size),
        significance: Significance::from_coefficient(coefficient),
        relationship: Relationship::from_coefficient(coefficient),
        sample_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bia_common::Interval;

    const MINUTE: i64 = 60_000;

    fn series(points: &[(i64, f64)]) -> TimeSeries {
        TimeSeries::new(
            points.iter().map(|(t, v)| DataPoint::new(*t, *v)).collect(),
            Interval::Hour,
        )
    }

    fn hourly(values: impl IntoIterator<Item = f64>) -> TimeSeries {
        let points: Vec<(i64, f64)> = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i as i64 * 60 * MINUTE, v))
            .collect();
        series(&points)
    }

    #[test]
    fn self_correlation_is_strong_positive() {
        let s = hourly([3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]);
        let result = analyze_correlation(&s, &s, &CorrelationSettings::default()).unwrap();
        assert!((result.coefficient - 1.0).abs() < 1e-12);
        assert_eq!(result.significance, Significance::Strong);
        assert_eq!(result.relationship, Relationship::Positive);
        assert_eq!(result.sample_size, 8);
        assert!(result.p_value < 1e-6);
    }

    #[test]
    fn inverse_series_is_negative() {
        let a = hourly((0..10).map(f64::from));
        let b = hourly((0..10).map(|i| -2.0 * f64::from(i)));
        let result = analyze_correlation(&a, &b, &CorrelationSettings::default()).unwrap();
        assert!((result.coefficient + 1.0).abs() < 1e-12);
        assert_eq!(result.relationship, Relationship::Negative);
    }

    #[test]
    fn alignment_respects_tolerance() {
        let left = [DataPoint::new(0, 1.0), DataPoint::new(10 * MINUTE, 2.0)];
        let right = [
            DataPoint::new(30_000, 10.0),
            DataPoint::new(10 * MINUTE + 2 * MINUTE, 20.0),
        ];
        let pairs = align_pairs(&left, &right, MINUTE);
        assert_eq!(pairs, vec![(1.0, 10.0)]);
    }

    #[test]
    fn alignment_picks_nearest() {
        let left = [DataPoint::new(100, 1.0)];
        let right = [DataPoint::new(0, 5.0), DataPoint::new(120, 7.0)];
        assert_eq!(align_pairs(&left, &right, MINUTE), vec![(1.0, 7.0)]);
    }

    #[test]
    fn too_few_aligned_pairs_is_none() {
        let a = hourly([1.0, 2.0, 3.0, 4.0]);
        // Offset by 30 minutes: nothing lines up within a minute.
        let b = series(&[(30 * MINUTE, 1.0), (90 * MINUTE, 2.0), (150 * MINUTE, 3.0)]);
        assert!(analyze_correlation(&a, &b, &CorrelationSettings::default()).is_none());
    }

    #[test]
    fn constant_operand_has_zero_coefficient() {
        let a = hourly([1.0, 2.0, 3.0, 4.0]);
        let b = hourly([5.0; 4]);
        let result = analyze_correlation(&a, &b, &CorrelationSettings::default()).unwrap();
        assert_eq!(result.coefficient, 0.0);
        assert_eq!(result.relationship, Relationship::None);
        assert!((result.p_value - 1.0).abs() < 1e-9);
    }
}
