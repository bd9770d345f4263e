//! Heston characteristic function
//!
//! φ(u) = E[exp(iu·ln(S_T/S_0))] in the "little trap" form of Albrecher et
//! al.: the branch of the complex logarithm never jumps as u grows, so the
//! function is continuous along the whole integration path.
//!
//! β - d is never formed directly. With w = iu + u², β² - d² = -ξ²w gives
//! (β - d)/ξ² = -w/(β + d), so nothing is divided by ξ² after a
//! cancellation and small vol-of-vol stays accurate.

use num_complex::Complex64;

use super::params::HestonParams;
use crate::numerics::{imag_unit, ln_1p_ratio, safe_div};

/// Characteristic function of the log-return over a fixed horizon
#[derive(Debug, Clone, Copy)]
pub struct CharacteristicFunction {
    params: HestonParams,
    /// r - q
    drift: f64,
    time: f64,
}

impl CharacteristicFunction {
    pub fn new(params: HestonParams, rate: f64, dividend: f64, time: f64) -> Self {
        Self { params, drift: rate - dividend, time }
    }

    /// φ(-i) = E[S_T/S_0]
    pub fn forward_factor(&self) -> f64 {
        (self.drift * self.time).exp()
    }

    /// Evaluate φ at a complex argument
    pub fn eval(&self, u: Complex64) -> Complex64 {
        let p = &self.params;
        let i = imag_unit();
        let t = self.time;

        let sigma2 = p.sigma * p.sigma;
        let iu = i * u;
        let w = iu + u * u;

        // β = κ - ρξiu
        let beta = p.kappa - p.rho * p.sigma * iu;
        // d = sqrt(β² + ξ²w), principal branch (Re d >= 0)
        let d = (beta * beta + sigma2 * w).sqrt();
        let beta_plus_d = beta + d;

        // m = (β - d)/ξ²,  g = (β - d)/(β + d) = ξ²m/(β + d)
        let m = -safe_div(w, beta_plus_d);
        let g = sigma2 * safe_div(m, beta_plus_d);
        let exp_neg_dt = (-d * t).exp();

        // (1 - g e^{-dT})/(1 - g) = 1 + z with z = ξ²·m(1 - e^{-dT})/((β + d)(1 - g))
        let z_scaled = safe_div(m * (1.0 - exp_neg_dt), beta_plus_d * (1.0 - g));
        let log_term = z_scaled * ln_1p_ratio(sigma2 * z_scaled);

        // C = (r-q)iuT + κθ[mT - 2 ln(1 + z)/ξ²]
        let c = self.drift * iu * t + p.kappa * p.theta * (m * t - 2.0 * log_term);

        // D = m(1 - e^{-dT}) / (1 - g e^{-dT})
        let big_d = safe_div(m * (1.0 - exp_neg_dt), 1.0 - g * exp_neg_dt);

        (c + big_d * p.v0).exp()
    }

    pub fn eval_real(&self, u: f64) -> Complex64 {
        self.eval(Complex64::new(u, 0.0))
    }
}
