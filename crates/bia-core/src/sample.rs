//! Synthetic series for demos, benchmarks, and tests.

use std::f64::consts::PI;

use bia_common::{DataPoint, Interval, TimeSeries};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// A sinusoidal component: `amplitude * sin(2π i / period)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalComponent {
    /// Cycle length in points.
    pub period: f64,
    pub amplitude: f64,
}

/// Parameters for [`generate_sample_data`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleParams {
    pub count: usize,
    /// Epoch milliseconds of the first point.
    pub start_time: i64,
    pub interval: Interval,
    pub base_value: f64,
    /// Added per point.
    pub trend: f64,
    /// Uniform noise in `[-noise, noise]`.
    pub noise: f64,
    pub seasonality: Option<SeasonalComponent>,
    /// Fixed seed for reproducible noise; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl SampleParams {
    pub fn new(count: usize, start_time: i64, interval: Interval) -> Self {
        SampleParams {
            count,
            start_time,
            interval,
            base_value: 100.0,
            trend: 0.0,
            noise: 0.0,
            seasonality: None,
            seed: None,
        }
    }

    pub fn with_base(mut self, base_value: f64) -> Self {
        self.base_value = base_value;
        self
    }

    pub fn with_trend(mut self, trend: f64) -> Self {
        self.trend = trend;
        self
    }

    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    pub fn with_seasonality(mut self, period: f64, amplitude: f64) -> Self {
        self.seasonality = Some(SeasonalComponent { period, amplitude });
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Build `base + trend·i + seasonal(i) + noise` at evenly spaced timestamps.
pub fn generate_sample_data(params: &SampleParams) -> TimeSeries {
    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let step = params.interval.as_millis();

    let points = (0..params.count)
        .map(|i| {
            let x = i as f64;
            let mut value = params.base_value + params.trend * x;
            if let Some(season) = params.seasonality.filter(|s| s.period > 0.0) {
                value += season.amplitude * (2.0 * PI * x / season.period).sin();
            }
            if params.noise > 0.0 {
                value += params.noise * (2.0 * rng.random::<f64>() - 1.0);
            }
            DataPoint::new(params.start_time.saturating_add(step.saturating_mul(i as i64)), value)
        })
        .collect();

    TimeSeries::new(points, params.interval)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noiseless_series_is_exact() {
        let params = SampleParams::new(5, 1_000, Interval::Hour).with_trend(2.0);
        let series = generate_sample_data(&params);
        assert_eq!(series.values(), vec![100.0, 102.0, 104.0, 106.0, 108.0]);
        assert_eq!(series.start_time, 1_000);
        assert_eq!(series.end_time, 1_000 + 4 * 3_600_000);
        assert_eq!(series.interval, Interval::Hour);
    }

    #[test]
    fn seeded_noise_is_reproducible() {
        let params = SampleParams::new(50, 0, Interval::Day)
            .with_noise(5.0)
            .with_seed(9);
        let a = generate_sample_data(&params);
        let b = generate_sample_data(&params);
        assert_eq!(a, b);
        assert!(a.values().iter().all(|v| (95.0..=105.0).contains(v)));
    }

    #[test]
    fn seasonality_adds_cycle() {
        let params = SampleParams::new(24, 0, Interval::Hour).with_seasonality(24.0, 10.0);
        let values = generate_sample_data(&params).values();
        assert!((values[6] - 110.0).abs() < 1e-9);
        assert!((values[18] - 90.0).abs() < 1e-9);
    }

    #[test]
    fn extreme_noise_stays_in_band() {
        for noise in [1e308, f64::MAX] {
            let params = SampleParams::new(3, 0, Interval::Day)
                .with_base(0.0)
                .with_noise(noise)
                .with_seed(1);
            let values = generate_sample_data(&params).values();
            assert_eq!(values.len(), 3);
            assert!(values.iter().all(|v| v.abs() <= noise));
        }
    }

    #[test]
    fn zero_count_is_empty() {
        let series = generate_sample_data(&SampleParams::new(0, 0, Interval::Day));
        assert!(series.is_empty());
    }
}
