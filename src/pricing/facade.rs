//! Pricing facade
//!
//! The single entry point: validates inputs, builds the engine the model
//! selector names and hands back typed results.
//!
//! Market-price convention: `price` and `evaluate` take an observed market
//! price. Zero means "no market price" and skips the implied-volatility step;
//! any positive value requests it. Negative or non-finite values are
//! rejected.

use super::engine::PricingEngine;
use crate::core::{
    ContractSpec, Greeks, GreeksRequest, KernelConfig, KernelError, KernelResult, ModelParams,
    ModelSelector, PricingRequest, PricingResult,
};
use crate::models::{BlackScholesEngine, HestonEngine};

fn check_market_price(market_price: f64) -> KernelResult<()> {
    if !market_price.is_finite() || market_price < 0.0 {
        return Err(KernelError::invalid_parameter(format!(
            "market price must be zero (none) or positive, got {}",
            market_price
        )));
    }
    Ok(())
}

/// Uniform entry point over every model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingFacade {
    config: KernelConfig,
}

impl PricingFacade {
    pub fn new(config: KernelConfig) -> KernelResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Engine for `model`, after checking that `params` belong to it
    pub fn engine(
        &self,
        model: ModelSelector,
        params: &ModelParams,
    ) -> KernelResult<Box<dyn PricingEngine>> {
        if params.model() != model {
            return Err(KernelError::invalid_parameter(format!(
                "{:?} parameters passed for {:?}",
                params.model(),
                model
            )));
        }
        params.validate()?;

        tracing::debug!("Dispatching {:?} / {:?}", model, params.method());

        let engine: Box<dyn PricingEngine> = match *params {
            ModelParams::BlackScholes { volatility, .. } => {
                let bs = BlackScholesEngine::new(volatility)?;
                Box::new(bs.with_solver(self.config.solver.clone()))
            }
            ModelParams::Heston { params, method } => {
                Box::new(HestonEngine::new(params, method, self.config.clone())?)
            }
        };
        Ok(engine)
    }

    /// Price, plus implied volatility when `market_price` is positive
    pub fn price(
        &self,
        model: ModelSelector,
        contract: &ContractSpec,
        params: &ModelParams,
        market_price: f64,
    ) -> KernelResult<PricingResult> {
        check_market_price(market_price)?;
        contract.validate()?;
        let engine = self.engine(model, params)?;

        let mut result = PricingResult::priced(engine.price(contract)?);
        if market_price > 0.0 {
            result.implied_volatility = Some(engine.implied_volatility(contract, market_price)?);
        }
        Ok(result)
    }

    /// Requested Greeks
    pub fn greeks(
        &self,
        model: ModelSelector,
        contract: &ContractSpec,
        params: &ModelParams,
        request: GreeksRequest,
    ) -> KernelResult<Greeks> {
        contract.validate()?;
        let engine = self.engine(model, params)?;
        engine.greeks(contract, request)
    }

    /// Volatility level reproducing `market_price`: σ for Black-Scholes,
    /// √v0 (other Heston parameters fixed) for Heston.
    ///
    /// Never returns a bracket end point; an unreachable price is
    /// `DomainInfeasible`.
    pub fn implied_volatility(
        &self,
        model: ModelSelector,
        market_price: f64,
        contract: &ContractSpec,
        params: &ModelParams,
    ) -> KernelResult<f64> {
        contract.validate()?;
        let engine = self.engine(model, params)?;
        engine.implied_volatility(contract, market_price)
    }

    /// Prices for many strikes of otherwise identical contracts
    pub fn price_strikes(
        &self,
        model: ModelSelector,
        contract: &ContractSpec,
        params: &ModelParams,
        strikes: &[f64],
    ) -> KernelResult<Vec<f64>> {
        contract.validate()?;
        let engine = self.engine(model, params)?;
        engine.price_strikes(contract, strikes)
    }

    /// Price, implied volatility and Greeks in one call.
    ///
    /// Never fails: the first error lands in `PricingResult::error`, values
    /// computed before it are kept and the rest stay zero.
    pub fn evaluate(&self, request: &PricingRequest) -> PricingResult {
        let mut result = PricingResult::default();
        if let Err(e) = self.evaluate_into(request, &mut result) {
            tracing::debug!("Evaluation stopped: {}", e);
            result.error = Some(e);
        }
        result
    }

    fn evaluate_into(
        &self,
        request: &PricingRequest,
        result: &mut PricingResult,
    ) -> KernelResult<()> {
        check_market_price(request.market_price)?;
        request.contract.validate()?;
        let engine = self.engine(request.model, &request.params)?;

        result.price = engine.price(&request.contract)?;
        if request.market_price > 0.0 {
            let iv = engine.implied_volatility(&request.contract, request.market_price)?;
            result.implied_volatility = Some(iv);
        }
        if !request.greeks.is_empty() {
            result.greeks = engine.greeks(&request.contract, request.greeks)?;
        }
        Ok(())
    }
}
