//! Black-Scholes Model
//!
//! Provides:
//! - European option pricing (closed form)
//! - Analytic Greeks
//! - Implied volatility via the shared bracketing solver
//!
//! Degenerate inputs are boundary cases, not errors: T = 0 prices at the
//! intrinsic payoff and σ = 0 at the discounted deterministic forward payoff.

use crate::core::{
    ContractSpec, Greek, Greeks, GreeksRequest, KernelError, KernelResult, OptionType,
    SolverConfig,
};
use crate::implied_vol::{check_attainable, solve_implied_volatility, VolatilityBracket};
use crate::numerics::{norm_cdf, norm_pdf};

/// Black-Scholes d1 parameter
pub fn d1(spot: f64, strike: f64, rate: f64, div: f64, vol: f64, time: f64) -> f64 {
    ((spot / strike).ln() + (rate - div + 0.5 * vol * vol) * time) / (vol * time.sqrt())
}

/// Black-Scholes d2 parameter
pub fn d2(spot: f64, strike: f64, rate: f64, div: f64, vol: f64, time: f64) -> f64 {
    d1(spot, strike, rate, div, vol, time) - vol * time.sqrt()
}

fn check_vol(vol: f64) -> KernelResult<()> {
    if !vol.is_finite() || vol < 0.0 {
        return Err(KernelError::invalid_parameter(format!(
            "volatility must be finite and non-negative, got {}",
            vol
        )));
    }
    Ok(())
}

/// σ√T too small for d1 to be meaningful
fn is_degenerate(c: &ContractSpec, vol: f64) -> bool {
    c.time <= 0.0 || vol * c.time.sqrt() < 1e-300
}

/// Black-Scholes European option price
pub fn price(contract: &ContractSpec, vol: f64) -> KernelResult<f64> {
    contract.validate()?;
    check_vol(vol)?;
    Ok(price_unchecked(contract, vol))
}

fn price_unchecked(c: &ContractSpec, vol: f64) -> f64 {
    if c.time <= 0.0 {
        return c.intrinsic();
    }

    let df = c.discount();
    let qf = c.dividend_discount();

    if is_degenerate(c, vol) {
        // Zero vol: the forward is reached with certainty
        return c.option_type.intrinsic(c.spot * qf, c.strike * df);
    }

    let d1 = d1(c.spot, c.strike, c.rate, c.dividend, vol, c.time);
    let d2 = d1 - vol * c.time.sqrt();

    match c.option_type {
        OptionType::Call => c.spot * qf * norm_cdf(d1) - c.strike * df * norm_cdf(d2),
        OptionType::Put => c.strike * df * norm_cdf(-d2) - c.spot * qf * norm_cdf(-d1),
    }
}

/// Black-Scholes Greeks
///
/// Only the Greeks in `request` are evaluated; the rest are 0.
pub fn greeks(contract: &ContractSpec, vol: f64, request: GreeksRequest) -> KernelResult<Greeks> {
    contract.validate()?;
    check_vol(vol)?;

    if request.is_empty() {
        return Ok(Greeks::default());
    }
    if is_degenerate(contract, vol) {
        return Ok(degenerate_greeks(contract).masked(request));
    }

    let c = contract;
    let sqrt_t = c.time.sqrt();
    let d1 = d1(c.spot, c.strike, c.rate, c.dividend, vol, c.time);
    let d2 = d1 - vol * sqrt_t;
    let df = c.discount();
    let qf = c.dividend_discount();
    let pdf_d1 = norm_pdf(d1);

    let mut g = Greeks::default();
    for greek in request.iter() {
        let value = match greek {
            Greek::Delta => match c.option_type {
                OptionType::Call => qf * norm_cdf(d1),
                OptionType::Put => qf * (norm_cdf(d1) - 1.0),
            },
            // Same for call and put
            Greek::Gamma => qf * pdf_d1 / (c.spot * vol * sqrt_t),
            Greek::Vega => c.spot * qf * pdf_d1 * sqrt_t,
            Greek::Theta => {
                let term1 = -c.spot * qf * pdf_d1 * vol / (2.0 * sqrt_t);
                match c.option_type {
                    OptionType::Call => {
                        term1 - c.rate * c.strike * df * norm_cdf(d2)
                            + c.dividend * c.spot * qf * norm_cdf(d1)
                    }
                    OptionType::Put => {
                        term1 + c.rate * c.strike * df * norm_cdf(-d2)
                            - c.dividend * c.spot * qf * norm_cdf(-d1)
                    }
                }
            }
            Greek::Rho => match c.option_type {
                OptionType::Call => c.strike * c.time * df * norm_cdf(d2),
                OptionType::Put => -c.strike * c.time * df * norm_cdf(-d2),
            },
        };
        g.set(greek, value);
    }

    Ok(g)
}

/// Greeks of the deterministic payoff (T = 0 or σ = 0)
fn degenerate_greeks(c: &ContractSpec) -> Greeks {
    if c.time <= 0.0 {
        let delta = match c.option_type {
            OptionType::Call if c.spot > c.strike => 1.0,
            OptionType::Put if c.spot < c.strike => -1.0,
            _ => 0.0,
        };
        return Greeks::new(delta, 0.0, 0.0, 0.0, 0.0);
    }

    let s = c.spot * c.dividend_discount();
    let k = c.strike * c.discount();
    let in_the_money = match c.option_type {
        OptionType::Call => s > k,
        OptionType::Put => k > s,
    };
    if !in_the_money {
        return Greeks::default();
    }

    // V = φ(S·e^{-qT} - K·e^{-rT})
    let phi = c.option_type.phi();
    Greeks {
        delta: phi * c.dividend_discount(),
        gamma: 0.0,
        theta: phi * (c.dividend * s - c.rate * k),
        vega: 0.0,
        rho: phi * c.time * k,
    }
}

/// Implied volatility from a market price
///
/// Fails with `DomainInfeasible` when the price lies outside the
/// no-arbitrage bounds or no volatility in the (expanded) bracket
/// reproduces it.
pub fn implied_volatility(
    contract: &ContractSpec,
    market_price: f64,
    config: &SolverConfig,
) -> KernelResult<f64> {
    contract.validate()?;
    check_attainable(contract, market_price)?;

    let bracket = VolatilityBracket::from_config(config);
    let vol = solve_implied_volatility(
        |vol| Ok(price_unchecked(contract, vol)),
        market_price,
        bracket,
        config,
    )?;
    Ok(vol)
}

/// Black-Scholes engine with a flat volatility
#[derive(Debug, Clone, PartialEq)]
pub struct BlackScholesEngine {
    pub volatility: f64,
    pub solver: SolverConfig,
}

impl BlackScholesEngine {
    pub fn new(volatility: f64) -> KernelResult<Self> {
        check_vol(volatility)?;
        Ok(Self { volatility, solver: SolverConfig::default() })
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn price(&self, contract: &ContractSpec) -> KernelResult<f64> {
        price(contract, self.volatility)
    }

    pub fn greeks(&self, contract: &ContractSpec, request: GreeksRequest) -> KernelResult<Greeks> {
        greeks(contract, self.volatility, request)
    }

    /// Flat volatility reproducing `market_price`; the engine's own
    /// volatility plays no part
    pub fn implied_volatility(
        &self,
        contract: &ContractSpec,
        market_price: f64,
    ) -> KernelResult<f64> {
        implied_volatility(contract, market_price, &self.solver)
    }
}
