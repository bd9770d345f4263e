//! Complex arithmetic helpers
//!
//! Thin wrappers over `num_complex` for the characteristic-function code,
//! where a near-zero denominator must collapse to zero instead of producing
//! an infinity that later poisons a whole integral.

use num_complex::Complex64;

/// Below this modulus a denominator is treated as zero.
pub const COMPLEX_EPS: f64 = 1e-12;

/// The imaginary unit
#[inline]
pub fn imag_unit() -> Complex64 {
    Complex64::i()
}

/// Build `re + i·im`
#[inline]
pub fn cplx(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// `num / den`, or zero when `den` is numerically zero
#[inline]
pub fn safe_div(num: Complex64, den: Complex64) -> Complex64 {
    if den.norm() < COMPLEX_EPS {
        Complex64::new(0.0, 0.0)
    } else {
        num / den
    }
}

/// ln(1 + z) / z, accurate for small |z| and equal to 1 at z = 0
pub fn ln_1p_ratio(z: Complex64) -> Complex64 {
    if z.norm() < 1e-3 {
        // Alternating series; the first omitted term is below 1e-15
        1.0 - z * (0.5 - z * (1.0 / 3.0 - z * (0.25 - z * 0.2)))
    } else {
        (1.0 + z).ln() / z
    }
}

/// Both components finite
#[inline]
pub fn is_finite_complex(z: Complex64) -> bool {
    z.re.is_finite() && z.im.is_finite()
}
