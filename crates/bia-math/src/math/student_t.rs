//! Student-t distribution helpers for correlation significance.
//!
//! The CDF is expressed through the regularized incomplete beta function:
//! for `x = df / (df + t²)`, the two-tailed tail mass is `I_x(df/2, 1/2)`.

use super::beta::beta_cdf;

/// Two-tailed p-value `P(|T| >= |t|)` for `T ~ t(df)`.
///
/// Infinite `t` yields 0, `t = 0` yields 1. Returns NaN for `df <= 0`.
pub fn t_two_tailed_p(t: f64, df: f64) -> f64 {
    if t.is_nan() || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if t.is_infinite() {
        return 0.0;
    }
    let x = df / (df + t * t);
    beta_cdf(x, df / 2.0, 0.5)
}

/// CDF of the Student-t distribution with `df` degrees of freedom.
pub fn student_t_cdf(t: f64, df: f64) -> f64 {
    let tail = t_two_tailed_p(t, df);
    if tail.is_nan() {
        return f64::NAN;
    }
    if t >= 0.0 {
        1.0 - tail / 2.0
    } else {
        tail / 2.0
    }
}

/// t statistic for testing a Pearson coefficient `r` over `n` pairs.
///
/// `t = r * sqrt((n - 2) / (1 - r²))`; a perfect correlation maps to ±∞.
pub fn correlation_t_statistic(r: f64, n: usize) -> f64 {
    if r.is_nan() || n < 3 {
        return f64::NAN;
    }
    let denom = 1.0 - r * r;
    if denom <= 0.0 {
        return if r >= 0.0 {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        };
    }
    r * ((n as f64 - 2.0) / denom).sqrt()
}

/// Two-tailed p-value for a Pearson coefficient over `n` pairs.
pub fn correlation_p_value(r: f64, n: usize) -> f64 {
    let t = correlation_t_statistic(r, n);
    t_two_tailed_p(t, n as f64 - 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return false;
        }
        (a - b).abs() <= tol
    }

    #[test]
    fn cdf_is_half_at_zero() {
        assert!(approx_eq(student_t_cdf(0.0, 5.0), 0.5, 1e-12));
    }

    #[test]
    fn cauchy_special_case() {
        // df = 1 is the Cauchy distribution: CDF(1) = 0.75
        assert!(approx_eq(student_t_cdf(1.0, 1.0), 0.75, 1e-9));
    }

    #[test]
    fn df2_closed_form() {
        // CDF for df = 2: 0.5 + t / (2 * sqrt(2 + t^2))
        let t: f64 = 1.7;
        let expected = 0.5 + t / (2.0 * (2.0 + t * t).sqrt());
        assert!(approx_eq(student_t_cdf(t, 2.0), expected, 1e-9));
    }

    #[test]
    fn critical_value_df10() {
        // t_{0.975, 10} = 2.228139
        let p = t_two_tailed_p(2.228_139, 10.0);
        assert!(approx_eq(p, 0.05, 1e-5));
    }

    #[test]
    fn cdf_symmetry() {
        let lower = student_t_cdf(-1.3, 7.0);
        let upper = student_t_cdf(1.3, 7.0);
        assert!(approx_eq(lower + upper, 1.0, 1e-12));
    }

    #[test]
    fn perfect_correlation_has_zero_p_value() {
        assert_eq!(correlation_t_statistic(1.0, 10), f64::INFINITY);
        assert_eq!(correlation_p_value(1.0, 10), 0.0);
        assert_eq!(correlation_p_value(-1.0, 10), 0.0);
    }

    #[test]
    fn zero_correlation_has_unit_p_value() {
        assert!(approx_eq(correlation_p_value(0.0, 20), 1.0, 1e-12));
    }

    #[test]
    fn too_few_pairs_is_nan() {
        assert!(correlation_t_statistic(0.5, 2).is_nan());
        assert!(t_two_tailed_p(1.0, 0.0).is_nan());
    }
}
