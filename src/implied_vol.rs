//! Implied volatility
//!
//! Inverts any pricing function `f(vol) -> price` that is increasing in its
//! volatility argument. The search starts on the configured bracket and is
//! widened a bounded number of times; if no sign change is found the solver
//! reports [`ImpliedVolError::VolatilityNotFound`] instead of returning a
//! bracket end point. A root that lands on a bracket end means the price is
//! flat in volatility there and is reported as
//! [`ImpliedVolError::NotIdentifiable`].

use thiserror::Error;

use crate::core::{ContractSpec, KernelError, KernelResult, SolverConfig};
use crate::numerics::{brackets, find_root, NumericError};

/// Market prices closer than this to the lower no-arbitrage bound, relative
/// to max(spot, strike), carry no volatility information
pub const LOWER_BOUND_SLACK: f64 = 1e-12;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImpliedVolError {
    #[error("no volatility in [{lo:.3e}, {hi:.3e}] reproduces the market price")]
    VolatilityNotFound { lo: f64, hi: f64 },

    #[error("volatility not identifiable: price is flat in volatility near {vol:.3e}")]
    NotIdentifiable { vol: f64 },

    #[error("implied volatility search did not converge: {0}")]
    NotConverged(String),

    /// The pricing function itself failed
    #[error(transparent)]
    Pricing(KernelError),
}

impl From<NumericError> for ImpliedVolError {
    fn from(err: NumericError) -> Self {
        match err {
            NumericError::NoBracket { lo, hi } => Self::VolatilityNotFound { lo, hi },
            NumericError::InvalidInput(msg) => Self::Pricing(KernelError::invalid_parameter(msg)),
            other => Self::NotConverged(other.to_string()),
        }
    }
}

impl From<ImpliedVolError> for KernelError {
    fn from(err: ImpliedVolError) -> Self {
        match err {
            ImpliedVolError::VolatilityNotFound { .. }
            | ImpliedVolError::NotIdentifiable { .. } => KernelError::infeasible(err.to_string()),
            ImpliedVolError::NotConverged(_) => KernelError::non_convergence(err.to_string()),
            ImpliedVolError::Pricing(e) => e,
        }
    }
}

/// Volatility search interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilityBracket {
    pub lo: f64,
    pub hi: f64,
}

impl VolatilityBracket {
    pub fn new(lo: f64, hi: f64) -> KernelResult<Self> {
        if !(lo.is_finite() && hi.is_finite()) || lo <= 0.0 || lo >= hi {
            return Err(KernelError::invalid_parameter(format!(
                "volatility bracket must satisfy 0 < lo < hi, got [{}, {}]",
                lo, hi
            )));
        }
        Ok(Self { lo, hi })
    }

    pub fn from_config(config: &SolverConfig) -> Self {
        Self { lo: config.lower_vol, hi: config.upper_vol }
    }
}

/// Reject market prices no volatility can explain.
///
/// Outside the no-arbitrage bounds, at expiry, or within rounding of the
/// lower bound (deep in the money at low volatility every σ below some level
/// gives the same price) the answer is `DomainInfeasible`.
pub fn check_attainable(contract: &ContractSpec, market_price: f64) -> KernelResult<()> {
    if !market_price.is_finite() || market_price <= 0.0 {
        return Err(KernelError::invalid_parameter("market price must be positive and finite"));
    }
    if contract.time <= 0.0 {
        return Err(KernelError::infeasible("price at expiry does not depend on volatility"));
    }

    let (lower, upper) = contract.price_bounds();
    if market_price < lower || market_price >= upper {
        return Err(KernelError::infeasible(format!(
            "market price {} outside no-arbitrage bounds [{:.6}, {:.6})",
            market_price, lower, upper
        )));
    }
    if market_price - lower <= LOWER_BOUND_SLACK * contract.spot.max(contract.strike) {
        return Err(KernelError::infeasible(format!(
            "volatility not identifiable: market price {} sits on the lower bound {}",
            market_price, lower
        )));
    }
    Ok(())
}

/// Solve `f(vol) = market_price` for `vol`.
///
/// `f` must be increasing in `vol`. When the bracket does not straddle the
/// target, `hi` is doubled (price too high for the bracket) or `lo` divided
/// by ten (price too low) up to `config.max_bracket_expansions` times.
pub fn solve_implied_volatility<F>(
    mut f: F,
    market_price: f64,
    bracket: VolatilityBracket,
    config: &SolverConfig,
) -> Result<f64, ImpliedVolError>
where
    F: FnMut(f64) -> KernelResult<f64>,
{
    if !market_price.is_finite() || market_price <= 0.0 {
        return Err(ImpliedVolError::Pricing(KernelError::invalid_parameter(
            "market price must be positive and finite",
        )));
    }

    let mut objective = |vol: f64| -> Result<f64, ImpliedVolError> {
        Ok(f(vol).map_err(ImpliedVolError::Pricing)? - market_price)
    };

    let VolatilityBracket { mut lo, mut hi } = bracket;
    let mut f_lo = objective(lo)?;
    let mut f_hi = objective(hi)?;

    let mut expansions = 0;
    while !brackets(f_lo, f_hi) {
        if expansions >= config.max_bracket_expansions {
            return Err(ImpliedVolError::VolatilityNotFound { lo, hi });
        }
        expansions += 1;

        if f_hi < 0.0 {
            // Even the highest volatility prices below market
            lo = hi;
            f_lo = f_hi;
            hi *= 2.0;
            f_hi = objective(hi)?;
        } else {
            hi = lo;
            f_hi = f_lo;
            lo /= 10.0;
            f_lo = objective(lo)?;
        }
        tracing::debug!("Implied vol bracket expanded to [{:.3e}, {:.3e}]", lo, hi);
    }

    let root = find_root(objective, lo, hi, config.tolerance, config.max_iterations)?;
    if root.x - lo <= config.tolerance || hi - root.x <= config.tolerance {
        return Err(ImpliedVolError::NotIdentifiable { vol: root.x });
    }
    Ok(root.x)
}
