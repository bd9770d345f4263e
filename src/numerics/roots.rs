//! Brent's method root finder
//!
//! Combines bisection, secant and inverse quadratic interpolation. Every
//! iterate stays inside the current bracket, so the result is never an
//! extrapolated or out-of-bracket value. The objective may fail: its error
//! type is threaded through, which lets pricing closures surface their own
//! failures (e.g. a quadrature that did not converge) unchanged.

use super::error::NumericError;

/// A converged root
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    pub x: f64,
    /// f(x) at the returned root
    pub residual: f64,
    pub iterations: usize,
}

/// Check that `f(lo)` and `f(hi)` straddle zero.
pub fn brackets(f_lo: f64, f_hi: f64) -> bool {
    f_lo == 0.0 || f_hi == 0.0 || (f_lo < 0.0) != (f_hi < 0.0)
}

/// Find a root of `f` on `[lo, hi]`.
///
/// Convergence is declared when the bracket half-width drops below
/// `tolerance` (plus a few ulps of the iterate) or `f` hits exactly zero.
///
/// # Errors
///
/// * `NoBracket` - `f(lo)` and `f(hi)` have the same sign
/// * `MaxIterations` - the bracket did not shrink enough in `max_iterations`
/// * `NonFinite` - `f` returned NaN or an infinity
/// * anything `f` itself returns
pub fn find_root<F, E>(
    mut f: F,
    lo: f64,
    hi: f64,
    tolerance: f64,
    max_iterations: usize,
) -> Result<Root, E>
where
    F: FnMut(f64) -> Result<f64, E>,
    E: From<NumericError>,
{
    if !(lo.is_finite() && hi.is_finite()) || lo >= hi {
        return Err(NumericError::InvalidInput(format!("invalid bracket [{}, {}]", lo, hi)).into());
    }
    if tolerance.is_nan() || tolerance <= 0.0 {
        return Err(NumericError::InvalidInput("tolerance must be positive".into()).into());
    }

    let mut eval = |x: f64| -> Result<f64, E> {
        let y = f(x)?;
        if y.is_finite() {
            Ok(y)
        } else {
            Err(NumericError::NonFinite { at: x }.into())
        }
    };

    let mut a = lo;
    let mut b = hi;
    let mut fa = eval(a)?;
    let mut fb = eval(b)?;

    if fa == 0.0 {
        return Ok(Root { x: a, residual: fa, iterations: 0 });
    }
    if fb == 0.0 {
        return Ok(Root { x: b, residual: fb, iterations: 0 });
    }
    if !brackets(fa, fb) {
        return Err(NumericError::NoBracket { lo, hi }.into());
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for iteration in 1..=max_iterations {
        // Keep the root between b and c
        if (fb > 0.0) == (fc > 0.0) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        // b is the best estimate so far
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * tolerance;
        let m = 0.5 * (c - b);

        if m.abs() <= tol || fb == 0.0 {
            return Ok(Root { x: b, residual: fb, iterations: iteration });
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let mut p;
            let mut q;
            if a == c {
                // Secant
                p = 2.0 * m * s;
                q = 1.0 - s;
            } else {
                // Inverse quadratic interpolation
                let qq = fa / fc;
                let r = fb / fc;
                p = s * (2.0 * m * qq * (qq - r) - (b - a) * (r - 1.0));
                q = (qq - 1.0) * (r - 1.0) * (s - 1.0);
            }
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();

            let min1 = 3.0 * m * q - (tol * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = m;
                e = d;
            }
        } else {
            d = m;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(m) };
        fb = eval(b)?;
    }

    Err(NumericError::MaxIterations { iterations: max_iterations }.into())
}
