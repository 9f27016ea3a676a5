//! Seasonality from the dominant bins of a direct DFT.

use bia_common::{SeasonalPattern, SeasonalityAnalysis, TimeSeries};
use bia_config::{SeasonalitySettings, Thresholds};
use bia_math::dft;

/// Display label for a period measured in points.
///
/// Labels assume hourly sampling for "daily" and daily sampling for the rest,
/// which is how the dashboards feed series in.
pub fn period_label(period_points: f64) -> &'static str {
    let p = period_points.round();
    if (23.0..=25.0).contains(&p) {
        "daily"
    } else if (6.0..=8.0).contains(&p) {
        "weekly"
    } else if (28.0..=31.0).contains(&p) {
        "monthly"
    } else if (360.0..=370.0).contains(&p) {
        "yearly"
    } else {
        "custom"
    }
}

/// Detect periodic components. `None` below `settings.min_points` points.
pub fn analyze_seasonality(
    series: &TimeSeries,
    settings: &SeasonalitySettings,
    thresholds: &Thresholds,
) -> Option<SeasonalityAnalysis> {
    if series.len() < settings.min_points {
        return None;
    }

    let values: Vec<f64> = series.sorted_points().iter().map(|p| p.value).collect();
    let n = values.len();

    let mut bins: Vec<_> = dft(&values)
        .into_iter()
        .filter(|bin| bin.index > 0 && bin.amplitude > thresholds.seasonality_min_amplitude)
        .collect();
    bins.sort_by(|a, b| b.amplitude.total_cmp(&a.amplitude));
    bins.truncate(settings.max_patterns);

    let patterns: Vec<SeasonalPattern> = bins
        .iter()
        .filter_map(|bin| {
            let period_points = bin.period(n)?;
            Some(SeasonalPattern {
                period: period_label(period_points).to_string(),
                period_points,
                amplitude: bin.amplitude,
                phase: bin.phase,
            })
        })
        .collect();

    let (dominant_period, strength) = patterns
        .first()
        .map(|p| (p.period_points.round() as usize, p.amplitude))
        .unwrap_or((0, 0.0));

    Some(SeasonalityAnalysis {
        has_seasonality: !patterns.is_empty(),
        dominant_period,
        strength,
        patterns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bia_common::{DataPoint, Interval};
    use std::f64::consts::PI;

    fn hourly(values: impl IntoIterator<Item = f64>) -> TimeSeries {
        TimeSeries::new(
            values
                .into_iter()
                .enumerate()
                .map(|(i, v)| DataPoint::new(i as i64 * 3_600_000, v))
                .collect(),
            Interval::Hour,
        )
    }

    #[test]
    fn daily_cycle_in_hourly_data() {
        let series = hourly((0..96).map(|i| 50.0 + 10.0 * (2.0 * PI * i as f64 / 24.0).sin()));
        let result = analyze_seasonality(
            &series,
            &SeasonalitySettings::default(),
            &Thresholds::default(),
        )
        .unwrap();
        assert!(result.has_seasonality);
        assert_eq!(result.dominant_period, 24);
        assert!((result.strength - 10.0).abs() < 1e-6);
        assert_eq!(result.patterns[0].period, "daily");
        assert!(result.patterns.len() <= 3);
    }

    #[test]
    fn flat_series_has_no_seasonality() {
        let result = analyze_seasonality(
            &hourly([5.0; 48]),
            &SeasonalitySettings::default(),
            &Thresholds::default(),
        )
        .unwrap();
        assert!(!result.has_seasonality);
        assert_eq!(result.dominant_period, 0);
        assert_eq!(result.strength, 0.0);
        assert!(result.patterns.is_empty());
    }

    #[test]
    fn too_short_is_none() {
        let series = hourly((0..23).map(f64::from));
        assert!(analyze_seasonality(
            &series,
            &SeasonalitySettings::default(),
            &Thresholds::default()
        )
        .is_none());
    }

    #[test]
    fn patterns_sorted_by_amplitude() {
        let series = hourly((0..168).map(|i| {
            let t = i as f64;
            3.0 * (2.0 * PI * t / 24.0).sin() + 8.0 * (2.0 * PI * t / 7.0).cos()
        }));
        let result = analyze_seasonality(
            &series,
            &SeasonalitySettings::default(),
            &Thresholds::default(),
        )
        .unwrap();
        assert_eq!(result.patterns[0].period, "weekly");
        assert_eq!(result.patterns[1].period, "daily");
        assert!(result.patterns[0].amplitude >= result.patterns[1].amplitude);
    }

    #[test]
    fn labels() {
        assert_eq!(period_label(24.0), "daily");
        assert_eq!(period_label(7.0), "weekly");
        assert_eq!(period_label(30.4), "monthly");
        assert_eq!(period_label(365.0), "yearly");
        assert_eq!(period_label(12.0), "custom");
    }
}
