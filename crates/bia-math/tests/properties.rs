//! Property-based tests for bia-math numerical functions.
//!
//! Uses proptest to verify mathematical properties hold across many random inputs.

use proptest::prelude::*;
use bia_math::{
    beta_cdf, correlation_p_value, dft, linear_regression, mean, median, pearson, percentile,
    population_std, sorted_copy, student_t_cdf,
};

/// Tolerance for floating point comparisons.
const TOL: f64 = 1e-9;

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol.max(tol * a.abs().max(b.abs()))
}

// ============================================================================
// Order statistics
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Quartiles are ordered and bracketed by the extremes.
    #[test]
    fn quartiles_are_ordered(values in prop::collection::vec(-1_000_000i64..1_000_000, 1..200)) {
        let values: Vec<f64> = values.into_iter().map(|v| v as f64).collect();
        let sorted = sorted_copy(&values);
        let q1 = percentile(&sorted, 25.0).unwrap();
        let q2 = percentile(&sorted, 50.0).unwrap();
        let q3 = percentile(&sorted, 75.0).unwrap();
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        prop_assert!(min <= q1 && q1 <= q2 && q2 <= q3 && q3 <= max,
            "min={} q1={} q2={} q3={} max={}", min, q1, q2, q3, max);
    }

    /// The 50th percentile and the median agree.
    #[test]
    fn median_matches_p50(values in prop::collection::vec(-1e6..1e6f64, 1..200)) {
        let sorted = sorted_copy(&values);
        let p50 = percentile(&sorted, 50.0).unwrap();
        let med = median(&sorted).unwrap();
        prop_assert!(approx_eq(p50, med, TOL), "p50={} median={}", p50, med);
    }

    /// Population std is invariant under shifting.
    #[test]
    fn std_shift_invariant(values in prop::collection::vec(-1e3..1e3f64, 2..100), shift in -1e3..1e3f64) {
        let shifted: Vec<f64> = values.iter().map(|v| v + shift).collect();
        let a = population_std(&values, mean(&values));
        let b = population_std(&shifted, mean(&shifted));
        prop_assert!(approx_eq(a, b, 1e-6), "std={} shifted std={}", a, b);
    }
}

// ============================================================================
// Regression and correlation
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Correlation always lands in [-1, 1].
    #[test]
    fn pearson_is_bounded(pairs in prop::collection::vec((-1e4..1e4f64, -1e4..1e4f64), 2..100)) {
        let (xs, ys): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let r = pearson(&xs, &ys).unwrap();
        prop_assert!((-1.0..=1.0).contains(&r), "r={}", r);
    }

    /// Noise-free lines are fitted exactly.
    #[test]
    fn regression_recovers_line(slope in -100.0..100.0f64, intercept in -1e3..1e3f64, n in 2usize..60) {
        let xs: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|x| slope * x + intercept).collect();
        let fit = linear_regression(&xs, &ys).unwrap();
        prop_assert!(approx_eq(fit.slope, slope, 1e-6), "slope {} vs {}", fit.slope, slope);
        prop_assert!(approx_eq(fit.intercept, intercept, 1e-6), "intercept {} vs {}", fit.intercept, intercept);
    }

    /// p-values are probabilities and shrink as |r| grows.
    #[test]
    fn p_value_monotone_in_r(r in 0.0..0.99f64, n in 3usize..200) {
        let p_small = correlation_p_value(r, n);
        let p_large = correlation_p_value((r + 0.01).min(0.999), n);
        prop_assert!((0.0..=1.0).contains(&p_small));
        prop_assert!(p_large <= p_small + 1e-9, "p({})={} p({})={}", r, p_small, r + 0.01, p_large);
    }
}

// ============================================================================
// Special functions
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// The incomplete beta is a CDF: bounded and non-decreasing in x.
    #[test]
    fn beta_cdf_monotone(a in 0.1..20.0f64, b in 0.1..20.0f64, x in 0.0..0.99f64) {
        let lo = beta_cdf(x, a, b);
        let hi = beta_cdf(x + 0.01, a, b);
        prop_assert!((0.0..=1.0).contains(&lo));
        prop_assert!(hi + 1e-9 >= lo, "I_{}({},{})={} > I_{}={}", x, a, b, lo, x + 0.01, hi);
    }

    /// The t distribution is symmetric about zero.
    #[test]
    fn student_t_symmetric(t in -20.0..20.0f64, df in 1.0..100.0f64) {
        let sum = student_t_cdf(t, df) + student_t_cdf(-t, df);
        prop_assert!(approx_eq(sum, 1.0, 1e-9), "cdf(t)+cdf(-t)={}", sum);
    }
}

// ============================================================================
// Spectral
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The DC bin equals the mean magnitude of the signal.
    #[test]
    fn dft_dc_is_mean(values in prop::collection::vec(0.0..1e3f64, 1..64)) {
        let bins = dft(&values);
        prop_assert_eq!(bins.len(), values.len() / 2 + 1);
        prop_assert!(approx_eq(bins[0].amplitude, mean(&values).abs(), 1e-9));
    }
}
