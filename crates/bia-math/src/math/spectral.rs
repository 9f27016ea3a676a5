//! Direct discrete Fourier transform.
//!
//! O(n²) evaluation of the one-sided spectrum. Series handled by the engine
//! are small enough that an FFT is not worth the padding and reordering.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A single frequency bin of a real-valued signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyBin {
    /// Bin index `k`; the implied period is `n / k` samples.
    pub index: usize,
    /// One-sided amplitude: `|X_0| / n` for DC, `2|X_k| / n` otherwise
    /// (`|X_k| / n` at the Nyquist bin of an even-length signal).
    pub amplitude: f64,
    /// Phase angle in radians, `atan2(im, re)`.
    pub phase: f64,
}

impl FrequencyBin {
    /// Period in samples implied by this bin for a signal of length `n`.
    pub fn period(&self, n: usize) -> Option<f64> {
        if self.index == 0 {
            return None;
        }
        Some(n as f64 / self.index as f64)
    }
}

/// Compute bins `0..=n/2` of the DFT of `values`.
pub fn dft(values: &[f64]) -> Vec<FrequencyBin> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let n_f = n as f64;
    let half = n / 2;
    (0..=half)
        .map(|k| {
            let mut re = 0.0;
            let mut im = 0.0;
            for (t, value) in values.iter().enumerate() {
                let angle = 2.0 * PI * (k * t % n) as f64 / n_f;
                re += value * angle.cos();
                im -= value * angle.sin();
            }
            let magnitude = (re * re + im * im).sqrt();
            let one_sided = if k == 0 || (n % 2 == 0 && k == half) {
                magnitude / n_f
            } else {
                2.0 * magnitude / n_f
            };
            FrequencyBin {
                index: k,
                amplitude: one_sided,
                phase: im.atan2(re),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn empty_signal_has_no_bins() {
        assert!(dft(&[]).is_empty());
    }

    #[test]
    fn dc_component_is_mean() {
        let bins = dft(&[3.0; 8]);
        assert_eq!(bins.len(), 5);
        assert!(approx_eq(bins[0].amplitude, 3.0, 1e-12));
        for bin in &bins[1..] {
            assert!(bin.amplitude < 1e-12);
        }
    }

    #[test]
    fn pure_sine_recovers_amplitude_and_period() {
        let n = 48;
        let period = 12.0;
        let values: Vec<f64> = (0..n)
            .map(|t| 5.0 * (2.0 * PI * t as f64 / period).sin())
            .collect();
        let bins = dft(&values);
        let peak = bins
            .iter()
            .skip(1)
            .max_by(|a, b| a.amplitude.total_cmp(&b.amplitude))
            .unwrap();
        assert_eq!(peak.index, 4);
        assert!(approx_eq(peak.amplitude, 5.0, 1e-9));
        assert!(approx_eq(peak.period(n).unwrap(), 12.0, 1e-12));
        // sine = cosine shifted by -pi/2
        assert!(approx_eq(peak.phase, -PI / 2.0, 1e-9));
    }

    #[test]
    fn dc_bin_has_no_period() {
        let bin = FrequencyBin {
            index: 0,
            amplitude: 1.0,
            phase: 0.0,
        };
        assert_eq!(bin.period(10), None);
    }
}
