//! Standard normal distribution functions

use statrs::function::erf::erfc;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Standard normal CDF
///
/// Evaluated through the complementary error function so both tails keep
/// full relative precision (N(-10) is ~7.6e-24, not 0 or a negative number).
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x * FRAC_1_SQRT_2)
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_norm_cdf() {
        assert_abs_diff_eq!(norm_cdf(0.0), 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(norm_cdf(1.96), 0.975_002_104_851_780, epsilon = 1e-12);
        assert_abs_diff_eq!(norm_cdf(-1.96), 0.024_997_895_148_220, epsilon = 1e-12);
        assert_abs_diff_eq!(norm_cdf(1.0), 0.841_344_746_068_543, epsilon = 1e-12);
    }

    #[test]
    fn test_norm_cdf_tails() {
        // Far tails must stay in [0, 1] and keep symmetry
        for &x in &[6.0, 8.0, 12.0, 38.0] {
            let hi = norm_cdf(x);
            let lo = norm_cdf(-x);
            assert!(lo >= 0.0 && hi <= 1.0);
            assert_abs_diff_eq!(hi + lo, 1.0, epsilon = 1e-15);
        }
        assert!(norm_cdf(-10.0) > 0.0);
        assert!((norm_cdf(-10.0) / 7.619_853_024_160_527e-24 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_norm_pdf() {
        assert_abs_diff_eq!(norm_pdf(0.0), 0.398_942_280_401_433, epsilon = 1e-14);
        assert_abs_diff_eq!(norm_pdf(1.5), norm_pdf(-1.5), epsilon = 1e-16);
    }
}
