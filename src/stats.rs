//! Two-sample statistics used by the group comparisons.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Result of Welch's two-sample t-test.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WelchTest {
    /// t-statistic.
    pub statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// Welch–Satterthwaite degrees of freedom (f64, not integer).
    pub df: f64,
}

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Unbiased sample variance (n − 1 denominator); NaN for fewer than 2 values.
pub fn sample_variance(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64
}

/// Perform Welch's two-sample t-test (unequal variances), two-sided.
///
/// Tests H0: mean_a = mean_b without assuming equal group variances. The
/// statistic is t = (mean_a − mean_b) / se with se² = s²_a/n_a + s²_b/n_b,
/// compared to a t-distribution with Welch–Satterthwaite degrees of freedom.
///
/// Returns `None` when either group has fewer than 2 observations. The
/// statistic and p-value are NaN when the pooled standard error is zero.
pub fn welch_t_test(group_a: &[f64], group_b: &[f64]) -> Option<WelchTest> {
    if group_a.len() < 2 || group_b.len() < 2 {
        return None;
    }

    let n_a = group_a.len() as f64;
    let n_b = group_b.len() as f64;
    let var_mean_a = sample_variance(group_a) / n_a;
    let var_mean_b = sample_variance(group_b) / n_b;
    let se_sq = var_mean_a + var_mean_b;

    let statistic = if se_sq > 0.0 {
        (mean(group_a) - mean(group_b)) / se_sq.sqrt()
    } else {
        f64::NAN
    };

    let df = if se_sq > 0.0 {
        se_sq.powi(2) / (var_mean_a.powi(2) / (n_a - 1.0) + var_mean_b.powi(2) / (n_b - 1.0))
    } else {
        f64::NAN
    };

    // Calculate two-sided p-value
    let p_value = if !statistic.is_nan() && df > 0.0 {
        let t_dist = StudentsT::new(0.0, 1.0, df).unwrap();
        2.0 * (1.0 - t_dist.cdf(statistic.abs()))
    } else {
        f64::NAN
    };

    Some(WelchTest {
        statistic,
        p_value,
        df,
    })
}

/// Round to `digits` decimal places. NaN passes through.
pub fn round_dp(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean() {
        assert_relative_eq!(mean(&[10.0, 20.0]), 15.0);
        assert_relative_eq!(mean(&[5.0]), 5.0);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn test_sample_variance() {
        assert_relative_eq!(sample_variance(&[10.0, 20.0]), 50.0);
        assert_relative_eq!(sample_variance(&[1.0, 2.0, 3.0]), 1.0);
        assert!(sample_variance(&[5.0]).is_nan());
        assert!(sample_variance(&[]).is_nan());
    }

    #[test]
    fn test_welch_known_values() {
        // Equal within-group spacing: se² = 50/2 + 50/2 = 50
        let test = welch_t_test(&[10.0, 20.0], &[30.0, 40.0]).unwrap();
        assert_relative_eq!(test.statistic, -20.0 / 50f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(test.df, 2.0, epsilon = 1e-12);
        assert_relative_eq!(test.p_value, 0.10557280900008403, epsilon = 1e-9);
    }

    #[test]
    fn test_welch_symmetry() {
        let forward = welch_t_test(&[10.0, 20.0], &[30.0, 40.0]).unwrap();
        let reverse = welch_t_test(&[30.0, 40.0], &[10.0, 20.0]).unwrap();
        assert_relative_eq!(forward.statistic, -reverse.statistic);
        assert_relative_eq!(forward.p_value, reverse.p_value);
    }

    #[test]
    fn test_welch_insufficient_observations() {
        assert!(welch_t_test(&[10.0], &[30.0, 40.0]).is_none());
        assert!(welch_t_test(&[10.0, 20.0], &[30.0]).is_none());
        assert!(welch_t_test(&[], &[]).is_none());
    }

    #[test]
    fn test_welch_zero_variance() {
        // Identical values in both groups: zero pooled standard error
        let test = welch_t_test(&[5.0, 5.0], &[5.0, 5.0]).unwrap();
        assert!(test.statistic.is_nan());
        assert!(test.p_value.is_nan());
    }

    #[test]
    fn test_welch_p_value_bounds() {
        let test = welch_t_test(&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]).unwrap();
        assert!(test.p_value >= 0.0 && test.p_value <= 1.0);
    }

    #[test]
    fn test_round_dp() {
        assert_relative_eq!(round_dp(33.333333, 2), 33.33);
        assert_relative_eq!(round_dp(2.82842712, 4), 2.8284);
        assert_relative_eq!(round_dp(0.10557, 4), 0.1056);
        assert!(round_dp(f64::NAN, 2).is_nan());
    }
}
