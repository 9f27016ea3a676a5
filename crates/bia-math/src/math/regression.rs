//! Ordinary least squares and Pearson correlation.

use serde::{Deserialize, Serialize};

/// Result of a simple linear regression `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation between x and y (0 when either is constant).
    pub correlation: f64,
}

impl LinearFit {
    /// Evaluate the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Centered sums of squares and cross products.
struct Moments {
    mean_x: f64,
    mean_y: f64,
    sxx: f64,
    syy: f64,
    sxy: f64,
}

fn moments(xs: &[f64], ys: &[f64]) -> Moments {
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    let mut sxy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }
    Moments {
        mean_x,
        mean_y,
        sxx,
        syy,
        sxy,
    }
}

fn correlation_from(m: &Moments) -> f64 {
    let denom = (m.sxx * m.syy).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return 0.0;
    }
    (m.sxy / denom).clamp(-1.0, 1.0)
}

/// Fit `ys` against `xs` by least squares.
///
/// Returns `None` when the slices differ in length, hold fewer than two
/// points, or `xs` is constant (the slope is undefined).
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let m = moments(xs, ys);
    if m.sxx == 0.0 {
        return None;
    }
    let slope = m.sxy / m.sxx;
    Some(LinearFit {
        slope,
        intercept: m.mean_y - slope * m.mean_x,
        correlation: correlation_from(&m),
    })
}

/// Pearson product-moment correlation.
///
/// Returns `None` for mismatched lengths or fewer than two pairs; a constant
/// input yields 0.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    Some(correlation_from(&moments(xs, ys)))
}
