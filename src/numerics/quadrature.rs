//! Adaptive Gauss-Kronrod quadrature
//!
//! Globally adaptive 7/15-point Gauss-Kronrod: the panel with the largest
//! error estimate is bisected until the summed estimate meets the tolerance
//! or the subdivision budget runs out. Nodes are interior, so integrands with
//! a removable singularity at an endpoint (the Heston integrands at u = 0)
//! are never evaluated there.
//!
//! Semi-infinite integrals are truncated with [`truncation_bound`], which
//! walks outward from a decay-based starting point until the integrand's
//! envelope is negligible.

use super::error::{NumericError, NumericResult};

/// Kronrod abscissae on [-1, 1] (non-negative half, descending)
const XGK: [f64; 8] = [
    0.991_455_371_120_812_639_206_854_697_526_329,
    0.949_107_912_342_758_524_526_189_684_047_851,
    0.864_864_423_359_769_072_789_712_788_640_926,
    0.741_531_185_599_394_439_863_864_773_280_788,
    0.586_087_235_467_691_130_294_144_845_693_013,
    0.405_845_151_377_397_166_906_606_412_076_961,
    0.207_784_955_007_898_467_600_689_403_773_245,
    0.0,
];

/// Kronrod weights matching `XGK`
const WGK: [f64; 8] = [
    0.022_935_322_010_529_224_963_732_008_058_970,
    0.063_092_092_629_978_553_290_700_663_189_204,
    0.104_790_010_322_250_183_839_876_322_541_518,
    0.140_653_259_715_525_918_745_189_590_510_238,
    0.169_004_726_639_267_902_826_583_426_598_550,
    0.190_350_578_064_785_409_913_256_402_421_014,
    0.204_432_940_075_298_892_414_161_999_234_649,
    0.209_482_141_084_727_828_012_999_174_891_714,
];

/// Gauss weights for the odd Kronrod nodes XGK[1], XGK[3], XGK[5], XGK[7]
const WG: [f64; 4] = [
    0.129_484_966_168_869_693_270_611_432_679_082,
    0.279_705_391_489_276_667_901_467_771_423_780,
    0.381_830_050_505_118_944_950_369_775_488_975,
    0.417_959_183_673_469_387_755_102_040_816_327,
];

/// Result of an adaptive integration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrature {
    pub value: f64,
    /// Summed |Kronrod - Gauss| estimate over all panels
    pub error: f64,
    /// Number of bisections performed
    pub subdivisions: usize,
    pub evaluations: usize,
}

#[derive(Debug, Clone, Copy)]
struct Panel {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

fn gauss_kronrod_15<F: Fn(f64) -> f64>(f: &F, a: f64, b: f64) -> NumericResult<Panel> {
    let center = 0.5 * (a + b);
    let half = 0.5 * (b - a);

    let eval = |x: f64| -> NumericResult<f64> {
        let y = f(x);
        if y.is_finite() {
            Ok(y)
        } else {
            Err(NumericError::NonFinite { at: x })
        }
    };

    let fc = eval(center)?;
    let mut kronrod = WGK[7] * fc;
    let mut gauss = WG[3] * fc;

    for j in 0..7 {
        let dx = half * XGK[j];
        let pair = eval(center - dx)? + eval(center + dx)?;
        kronrod += WGK[j] * pair;
        if j % 2 == 1 {
            gauss += WG[j / 2] * pair;
        }
    }

    Ok(Panel {
        a,
        b,
        value: kronrod * half,
        error: ((kronrod - gauss) * half).abs(),
    })
}

/// Integrate `f` over `[lower, upper]` to an absolute `tolerance`.
///
/// Fails with `SubdivisionLimit` rather than returning a value whose error
/// estimate is above tolerance.
pub fn integrate<F>(
    f: F,
    lower: f64,
    upper: f64,
    tolerance: f64,
    max_subdivisions: usize,
) -> NumericResult<Quadrature>
where
    F: Fn(f64) -> f64,
{
    integrate_split(f, lower, upper, 1, tolerance, max_subdivisions)
}

/// Like [`integrate`], starting from `panels` equal panels.
///
/// Pre-splitting keeps a long, oscillating range from being judged by a
/// single 15-point rule whose error estimate can be accidentally small.
pub fn integrate_split<F>(
    f: F,
    lower: f64,
    upper: f64,
    panels: usize,
    tolerance: f64,
    max_subdivisions: usize,
) -> NumericResult<Quadrature>
where
    F: Fn(f64) -> f64,
{
    if !(lower.is_finite() && upper.is_finite()) {
        return Err(NumericError::InvalidInput(format!(
            "integration bounds must be finite: [{}, {}]",
            lower, upper
        )));
    }
    if tolerance.is_nan() || tolerance <= 0.0 {
        return Err(NumericError::InvalidInput("tolerance must be positive".into()));
    }
    if lower == upper {
        return Ok(Quadrature { value: 0.0, error: 0.0, subdivisions: 0, evaluations: 0 });
    }
    if lower > upper {
        let q = integrate_split(f, upper, lower, panels, tolerance, max_subdivisions)?;
        return Ok(Quadrature { value: -q.value, ..q });
    }

    let panels = panels.max(1);
    let width = (upper - lower) / panels as f64;
    let mut work: Vec<Panel> = Vec::with_capacity(panels + max_subdivisions.min(4096) + 1);
    for p in 0..panels {
        let a = lower + p as f64 * width;
        let b = if p + 1 == panels { upper } else { a + width };
        work.push(gauss_kronrod_15(&f, a, b)?);
    }

    let mut evaluations = 15 * panels;
    let mut subdivisions = 0;

    loop {
        let total_error: f64 = work.iter().map(|p| p.error).sum();
        if total_error <= tolerance {
            let value = work.iter().map(|p| p.value).sum();
            return Ok(Quadrature { value, error: total_error, subdivisions, evaluations });
        }
        if subdivisions >= max_subdivisions {
            return Err(NumericError::SubdivisionLimit {
                subdivisions,
                error: total_error,
                tolerance,
            });
        }

        let (worst, _) = work
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |(bi, be), (i, p)| {
                if p.error > be {
                    (i, p.error)
                } else {
                    (bi, be)
                }
            });

        let panel = work.swap_remove(worst);
        let mid = 0.5 * (panel.a + panel.b);
        work.push(gauss_kronrod_15(&f, panel.a, mid)?);
        work.push(gauss_kronrod_15(&f, mid, panel.b)?);
        evaluations += 30;
        subdivisions += 1;
    }
}

/// Find an upper integration limit beyond which `envelope` is negligible.
///
/// Starting at `start`, checks `envelope` on a few points of `[x, 2x]` and
/// doubles `x` until every sample is below `threshold`. `envelope` should
/// bound the integrand's magnitude (for an oscillating integrand, pass its
/// modulus rather than its real part, which has zeros).
pub fn truncation_bound<F>(
    envelope: F,
    start: f64,
    threshold: f64,
    max_doublings: usize,
) -> NumericResult<f64>
where
    F: Fn(f64) -> f64,
{
    if !(start.is_finite() && start > 0.0) {
        return Err(NumericError::InvalidInput(format!(
            "truncation start must be positive, got {}",
            start
        )));
    }

    let mut x = start;
    for _ in 0..=max_doublings {
        let mut negligible = true;
        for frac in [1.0, 1.25, 1.5, 1.75, 2.0] {
            let at = x * frac;
            let y = envelope(at);
            if !y.is_finite() {
                return Err(NumericError::NonFinite { at });
            }
            if y.abs() > threshold {
                negligible = false;
                break;
            }
        }
        if negligible {
            return Ok(x);
        }
        x *= 2.0;
    }

    Err(NumericError::TailNotNegligible { bound: x / 2.0, threshold })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_polynomial_is_exact() {
        let q = integrate(|x| 3.0 * x * x + 2.0 * x - 1.0, 0.0, 2.0, 1e-12, 10).unwrap();
        assert_abs_diff_eq!(q.value, 10.0, epsilon = 1e-12);
        assert_eq!(q.subdivisions, 0);
    }

    #[test]
    fn test_sine() {
        let q = integrate(|x: f64| x.sin(), 0.0, PI, 1e-12, 50).unwrap();
        assert_abs_diff_eq!(q.value, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_oscillating_with_split() {
        // ∫_0^50 cos(3x) e^{-x/10} dx
        let exact = {
            let a = 0.1_f64;
            let w = 3.0_f64;
            let e = (-a * 50.0).exp();
            (a + e * (w * (w * 50.0).sin() - a * (w * 50.0).cos())) / (a * a + w * w)
        };
        let f = |x: f64| (3.0 * x).cos() * (-x / 10.0).exp();
        let q = integrate_split(f, 0.0, 50.0, 16, 1e-11, 500).unwrap();
        assert_abs_diff_eq!(q.value, exact, epsilon = 1e-10);
    }

    #[test]
    fn test_removable_endpoint_singularity() {
        // sin(x)/x is 0/0 at the endpoint, which the rule never touches
        let q = integrate(|x: f64| x.sin() / x, 0.0, 1.0, 1e-13, 50).unwrap();
        assert_abs_diff_eq!(q.value, 0.946_083_070_367_183, epsilon = 1e-12);
    }

    #[test]
    fn test_reversed_bounds() {
        let q = integrate(|x| x, 1.0, 0.0, 1e-12, 10).unwrap();
        assert_abs_diff_eq!(q.value, -0.5, epsilon = 1e-14);
    }

    #[test]
    fn test_subdivision_limit() {
        let err = integrate(|x: f64| (1.0 / (x + 1e-6)).sin(), 0.0, 1.0, 1e-14, 3).unwrap_err();
        assert!(matches!(err, NumericError::SubdivisionLimit { subdivisions: 3, .. }));
    }

    #[test]
    fn test_non_finite_integrand() {
        let err = integrate(|x: f64| if x > 0.5 { f64::NAN } else { x }, 0.0, 1.0, 1e-10, 10)
            .unwrap_err();
        assert!(matches!(err, NumericError::NonFinite { .. }));
    }

    #[test]
    fn test_truncation_bound() {
        let bound = truncation_bound(|x: f64| (-x).exp(), 1.0, 1e-10, 10).unwrap();
        assert!((-bound).exp() <= 1e-10);
        assert!(bound <= 32.0);

        let err = truncation_bound(|x: f64| 1.0 / x, 1.0, 1e-10, 5).unwrap_err();
        assert!(matches!(err, NumericError::TailNotNegligible { .. }));
    }
}
