//! Heston pricing by direct integration
//!
//! Call = S·e^{-qT}·Π1 - K·e^{-rT}·Π2 with
//!
//! Π1 = 1/2 + 1/π ∫₀^∞ Re[e^{-iuk} φ(u - i) / (iu φ(-i))] du
//! Π2 = 1/2 + 1/π ∫₀^∞ Re[e^{-iuk} φ(u) / (iu)] du
//!
//! where k = ln(K/S) and φ is the log-return characteristic function. The
//! infinite range is cut where the integrands' envelope falls below the
//! tolerance; both the cut and the adaptive integration fail loudly instead
//! of returning an unconverged number.

use std::f64::consts::PI;

use num_complex::Complex64;

use super::char_fn::CharacteristicFunction;
use super::params::HestonParams;
use crate::core::{ContractSpec, KernelError, KernelResult, OptionType, QuadratureConfig};
use crate::numerics::{imag_unit, integrate_split, truncation_bound};

/// In-the-money probabilities under the share and money-market measures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probabilities {
    pub p1: f64,
    pub p2: f64,
}

/// Starting guess for the truncation point of the transform variable.
///
/// Far out, |φ(u)| decays like exp(-c·u) with
/// c = √(1-ρ²)(v0 + κθT)/ξ; before that the decay is close to Gaussian,
/// exp(-v̄T u²/2). The smaller of the two cut-offs is a lower estimate the
/// tail search then verifies.
fn initial_upper_bound(params: &HestonParams, time: f64, tolerance: f64) -> f64 {
    let log_tol = (1.0 / tolerance).ln().max(1.0);

    let c = (1.0 - params.rho * params.rho).max(0.0).sqrt()
        * (params.v0 + params.kappa * params.theta * time)
        / params.sigma;
    let exponential = if c > 0.0 { log_tol / c } else { f64::INFINITY };

    let variance = params.v0.min(params.theta) * time;
    let gaussian = (2.0 * log_tol / variance).sqrt();

    exponential.min(gaussian).max(1.0)
}

/// Π1 and Π2 for one contract
pub fn probabilities(
    params: &HestonParams,
    contract: &ContractSpec,
    config: &QuadratureConfig,
) -> KernelResult<Probabilities> {
    let cf = CharacteristicFunction::new(*params, contract.rate, contract.dividend, contract.time);
    let k = contract.log_moneyness();
    let fwd = cf.forward_factor();
    let i = imag_unit();

    let integrand_1 = |u: f64| -> f64 {
        let phi = cf.eval(Complex64::new(u, -1.0));
        ((-i * u * k).exp() * phi / (i * u * fwd)).re
    };
    let integrand_2 = |u: f64| -> f64 {
        let phi = cf.eval_real(u);
        ((-i * u * k).exp() * phi / (i * u)).re
    };
    let envelope = |u: f64| -> f64 {
        let e1 = cf.eval(Complex64::new(u, -1.0)).norm() / fwd;
        let e2 = cf.eval_real(u).norm();
        e1.max(e2) / u
    };

    let mut start = initial_upper_bound(params, contract.time, config.tolerance);
    if start > config.max_upper_bound {
        tracing::warn!(
            "Heston quadrature: truncation estimate {:.1} capped at {:.1}",
            start,
            config.max_upper_bound
        );
        start = config.max_upper_bound;
    }

    let upper = truncation_bound(envelope, start, config.tolerance, config.max_tail_doublings)?;
    if upper > config.max_upper_bound {
        return Err(KernelError::non_convergence(format!(
            "Heston integrand not negligible before u = {:.1} (limit {:.1})",
            upper, config.max_upper_bound
        )));
    }
    tracing::debug!("Heston quadrature: k={:.4} T={} upper bound {:.2}", k, contract.time, upper);

    let q1 = integrate_split(
        integrand_1,
        0.0,
        upper,
        config.initial_panels,
        config.tolerance,
        config.max_subdivisions,
    )?;
    let q2 = integrate_split(
        integrand_2,
        0.0,
        upper,
        config.initial_panels,
        config.tolerance,
        config.max_subdivisions,
    )?;

    Ok(Probabilities {
        p1: 0.5 + q1.value / PI,
        p2: 0.5 + q2.value / PI,
    })
}

/// European price for T > 0
pub fn price(
    params: &HestonParams,
    contract: &ContractSpec,
    config: &QuadratureConfig,
) -> KernelResult<f64> {
    let Probabilities { p1, p2 } = probabilities(params, contract, config)?;

    let s = contract.spot * contract.dividend_discount();
    let k = contract.strike * contract.discount();

    // Put from the same probabilities keeps parity exact
    let value = match contract.option_type {
        OptionType::Call => s * p1 - k * p2,
        OptionType::Put => k * (1.0 - p2) - s * (1.0 - p1),
    };
    Ok(value.max(0.0))
}
