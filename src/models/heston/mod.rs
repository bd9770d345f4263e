//! Heston Stochastic Volatility Model
//!
//! The Heston model assumes variance follows a mean-reverting square-root process:
//!
//! dS = (r - q) * S * dt + √v * S * dW_S
//! dv = κ(θ - v) * dt + ξ * √v * dW_v
//!
//! where:
//! - S: spot price
//! - v: instantaneous variance
//! - κ: mean reversion speed
//! - θ: long-term variance
//! - ξ: volatility of volatility (vol-of-vol)
//! - ρ: correlation between spot and variance Brownians
//!
//! Prices come from the closed-form characteristic function through one of
//! two backends: direct quadrature for a single strike, or a Carr-Madan FFT
//! that prices a whole strike grid at once.

pub mod char_fn;
pub mod fft;
pub mod greeks;
pub mod monte_carlo;
pub mod params;
pub mod quadrature;

pub use char_fn::CharacteristicFunction;
pub use fft::FftGrid;
pub use params::HestonParams;

use crate::core::{
    ContractSpec, Greeks, GreeksRequest, KernelConfig, KernelError, KernelResult, NumericalMethod,
};
use crate::implied_vol::{check_attainable, solve_implied_volatility, VolatilityBracket};

/// Heston pricing engine bound to one parameter set and backend
#[derive(Debug, Clone, PartialEq)]
pub struct HestonEngine {
    params: HestonParams,
    method: NumericalMethod,
    config: KernelConfig,
}

impl HestonEngine {
    pub fn new(
        params: HestonParams,
        method: NumericalMethod,
        config: KernelConfig,
    ) -> KernelResult<Self> {
        params.validate()?;
        match method {
            NumericalMethod::Quadrature | NumericalMethod::Fft => {}
            NumericalMethod::Analytic => {
                return Err(KernelError::unsupported("Heston has no closed-form price"));
            }
        }
        if !params.feller_condition() {
            tracing::warn!(
                "Feller condition violated: 2κθ = {:.4} <= ξ² = {:.4}",
                2.0 * params.kappa * params.theta,
                params.sigma * params.sigma
            );
        }
        Ok(Self { params, method, config })
    }

    pub fn params(&self) -> &HestonParams {
        &self.params
    }

    pub fn method(&self) -> NumericalMethod {
        self.method
    }

    /// Price with explicit parameters and, for FFT, an explicit primary grid
    fn price_with(
        &self,
        contract: &ContractSpec,
        params: &HestonParams,
        grid: Option<FftGrid>,
    ) -> KernelResult<f64> {
        contract.validate()?;
        if contract.time <= 0.0 {
            return Ok(contract.intrinsic());
        }

        match self.method {
            NumericalMethod::Fft => {
                let cf = CharacteristicFunction::new(
                    *params,
                    contract.rate,
                    contract.dividend,
                    contract.time,
                );
                let grid = grid.unwrap_or_else(|| {
                    let m = contract.strike / contract.spot;
                    FftGrid::adapted(&self.config.fft, m, m, contract.time)
                });
                fft::price_on(&cf, contract, grid)
            }
            _ => quadrature::price(params, contract, &self.config.quadrature),
        }
    }

    /// European option price
    pub fn price(&self, contract: &ContractSpec) -> KernelResult<f64> {
        self.price_with(contract, &self.params, None)
    }

    /// Prices for several strikes of otherwise identical contracts.
    ///
    /// The FFT backend prices all strikes off one grid; quadrature prices
    /// them one at a time.
    pub fn price_strikes(
        &self,
        contract: &ContractSpec,
        strikes: &[f64],
    ) -> KernelResult<Vec<f64>> {
        contract.validate()?;
        match self.method {
            NumericalMethod::Fft if contract.time > 0.0 => {
                fft::price_strikes(&self.params, contract, strikes, &self.config.fft)
            }
            _ => strikes
                .iter()
                .map(|&strike| {
                    let c = contract.with_strike(strike);
                    c.validate()?;
                    self.price(&c)
                })
                .collect(),
        }
    }

    /// Finite-difference Greeks on the selected backend
    pub fn greeks(&self, contract: &ContractSpec, request: GreeksRequest) -> KernelResult<Greeks> {
        contract.validate()?;

        // Bumped prices share the unbumped contract's FFT grid so that no bump
        // crosses an adaptation threshold
        let grid = match self.method {
            NumericalMethod::Fft => {
                let m = contract.strike / contract.spot;
                Some(FftGrid::adapted(&self.config.fft, m, m, contract.time))
            }
            _ => None,
        };

        greeks::finite_difference_greeks(
            |c: &ContractSpec, p: &HestonParams| self.price_with(c, p, grid),
            contract,
            &self.params,
            request,
            &self.config.bumps,
        )
    }

    /// Initial volatility √v0 that reproduces `market_price`, with κ, θ, ξ
    /// and ρ held fixed
    pub fn implied_volatility(
        &self,
        contract: &ContractSpec,
        market_price: f64,
    ) -> KernelResult<f64> {
        contract.validate()?;
        check_attainable(contract, market_price)?;

        let solver = &self.config.solver;
        let vol = solve_implied_volatility(
            |vol| self.price_with(contract, &self.params.with_initial_vol(vol), None),
            market_price,
            VolatilityBracket::from_config(solver),
            solver,
        )?;
        Ok(vol)
    }

    /// Seeded Monte Carlo reference price
    pub fn mc_price(
        &self,
        contract: &ContractSpec,
        n_paths: usize,
        n_steps: usize,
        seed: u64,
    ) -> KernelResult<f64> {
        monte_carlo::mc_price(&self.params, contract, n_paths, n_steps, seed)
    }
}
