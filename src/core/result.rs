//! Request and result records for combined evaluation

use super::error::{KernelError, KernelResult};
use super::greeks::{Greeks, GreeksRequest};
use super::model::{ModelParams, ModelSelector};
use super::option::ContractSpec;

/// Everything a single combined evaluation needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingRequest {
    pub model: ModelSelector,
    pub contract: ContractSpec,
    pub params: ModelParams,
    /// Observed market price. 0 skips the implied-volatility step; any
    /// positive value requests it.
    pub market_price: f64,
    pub greeks: GreeksRequest,
}

impl PricingRequest {
    pub fn new(contract: ContractSpec, params: ModelParams) -> Self {
        Self {
            model: params.model(),
            contract,
            params,
            market_price: 0.0,
            greeks: GreeksRequest::none(),
        }
    }

    pub fn with_market_price(mut self, market_price: f64) -> Self {
        self.market_price = market_price;
        self
    }

    pub fn with_greeks(mut self, greeks: GreeksRequest) -> Self {
        self.greeks = greeks;
        self
    }
}

/// Outcome of a pricing call, always fully populated.
///
/// Anything not computed (not requested, or skipped after an earlier
/// failure) is zero / `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingResult {
    pub price: f64,
    /// Filled only when a market price was supplied
    pub implied_volatility: Option<f64>,
    /// Only the requested Greeks are non-zero
    pub greeks: Greeks,
    pub error: Option<KernelError>,
}

impl PricingResult {
    pub fn priced(price: f64) -> Self {
        Self { price, ..Default::default() }
    }

    pub fn failed(error: KernelError) -> Self {
        Self { error: Some(error), ..Default::default() }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Convert to a `Result`, dropping partial values on failure
    pub fn into_result(self) -> KernelResult<Self> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self),
        }
    }
}
