//! Monte Carlo reference pricer
//!
//! Euler scheme with full truncation of the variance and a log-Euler step for
//! the spot. Slow and noisy; it exists to check the transform prices
//! independently.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};

use super::params::HestonParams;
use crate::core::{ContractSpec, KernelError, KernelResult};

/// One simulated point: (time, spot, variance)
pub type PathPoint = (f64, f64, f64);

/// Simulate a Heston path
pub fn simulate_path<R: Rng + ?Sized>(
    params: &HestonParams,
    contract: &ContractSpec,
    n_steps: usize,
    rng: &mut R,
) -> Vec<PathPoint> {
    let dt = contract.time / n_steps as f64;
    let sqrt_dt = dt.sqrt();
    let drift = contract.rate - contract.dividend;
    let rho_bar = (1.0 - params.rho * params.rho).max(0.0).sqrt();

    let mut path = Vec::with_capacity(n_steps + 1);
    let mut s = contract.spot;
    let mut v = params.v0;
    let mut t = 0.0;
    path.push((t, s, v));

    for _ in 0..n_steps {
        // Correlated Brownians
        let z1: f64 = StandardNormal.sample(rng);
        let z2: f64 = StandardNormal.sample(rng);
        let dw_s = z1 * sqrt_dt;
        let dw_v = (params.rho * z1 + rho_bar * z2) * sqrt_dt;

        // Full truncation: the drift and diffusion see max(v, 0)
        let v_pos = v.max(0.0);
        let v_sqrt = v_pos.sqrt();

        s *= ((drift - 0.5 * v_pos) * dt + v_sqrt * dw_s).exp();
        v += params.kappa * (params.theta - v_pos) * dt + params.sigma * v_sqrt * dw_v;

        t += dt;
        path.push((t, s, v.max(0.0)));
    }

    path
}

/// Discounted mean payoff over `n_paths` seeded paths
pub fn mc_price(
    params: &HestonParams,
    contract: &ContractSpec,
    n_paths: usize,
    n_steps: usize,
    seed: u64,
) -> KernelResult<f64> {
    contract.validate()?;
    params.validate()?;
    if n_paths == 0 || n_steps == 0 {
        return Err(KernelError::invalid_parameter(
            "Monte Carlo needs at least one path and one step",
        ));
    }
    if contract.time <= 0.0 {
        return Ok(contract.intrinsic());
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut payoffs = 0.0;
    for _ in 0..n_paths {
        let path = simulate_path(params, contract, n_steps, &mut rng);
        let final_spot = path.last().map(|p| p.1).unwrap_or(contract.spot);
        payoffs += contract.option_type.intrinsic(final_spot, contract.strike);
    }

    Ok(contract.discount() * payoffs / n_paths as f64)
}
