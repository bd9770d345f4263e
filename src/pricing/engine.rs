//! The capability every model engine provides

use crate::core::{ContractSpec, Greeks, GreeksRequest, KernelResult, ModelSelector};
use crate::models::{BlackScholesEngine, HestonEngine};

/// Price, Greeks and implied volatility for one model
pub trait PricingEngine {
    fn model(&self) -> ModelSelector;

    fn price(&self, contract: &ContractSpec) -> KernelResult<f64>;

    /// Only the requested Greeks are computed; the rest are 0
    fn greeks(&self, contract: &ContractSpec, request: GreeksRequest) -> KernelResult<Greeks>;

    /// Volatility level reproducing `market_price` (σ for Black-Scholes,
    /// √v0 for Heston)
    fn implied_volatility(&self, contract: &ContractSpec, market_price: f64) -> KernelResult<f64>;

    /// Prices for several strikes of otherwise identical contracts
    fn price_strikes(&self, contract: &ContractSpec, strikes: &[f64]) -> KernelResult<Vec<f64>> {
        strikes
            .iter()
            .map(|&strike| {
                let c = contract.with_strike(strike);
                c.validate()?;
                self.price(&c)
            })
            .collect()
    }
}

impl PricingEngine for BlackScholesEngine {
    fn model(&self) -> ModelSelector {
        ModelSelector::BlackScholes
    }

    fn price(&self, contract: &ContractSpec) -> KernelResult<f64> {
        BlackScholesEngine::price(self, contract)
    }

    fn greeks(&self, contract: &ContractSpec, request: GreeksRequest) -> KernelResult<Greeks> {
        BlackScholesEngine::greeks(self, contract, request)
    }

    fn implied_volatility(&self, contract: &ContractSpec, market_price: f64) -> KernelResult<f64> {
        BlackScholesEngine::implied_volatility(self, contract, market_price)
    }
}

impl PricingEngine for HestonEngine {
    fn model(&self) -> ModelSelector {
        ModelSelector::Heston
    }

    fn price(&self, contract: &ContractSpec) -> KernelResult<f64> {
        HestonEngine::price(self, contract)
    }

    fn greeks(&self, contract: &ContractSpec, request: GreeksRequest) -> KernelResult<Greeks> {
        HestonEngine::greeks(self, contract, request)
    }

    fn implied_volatility(&self, contract: &ContractSpec, market_price: f64) -> KernelResult<f64> {
        HestonEngine::implied_volatility(self, contract, market_price)
    }

    fn price_strikes(&self, contract: &ContractSpec, strikes: &[f64]) -> KernelResult<Vec<f64>> {
        HestonEngine::price_strikes(self, contract, strikes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{KernelConfig, KernelError, NumericalMethod};
    use crate::models::HestonParams;

    #[test]
    fn test_default_price_strikes() {
        let engine = BlackScholesEngine::new(0.2).unwrap();
        let c = ContractSpec::call(100.0, 100.0, 1.0, 0.05, 0.0).unwrap();
        let prices = engine.price_strikes(&c, &[90.0, 100.0, 110.0]).unwrap();
        assert_eq!(prices.len(), 3);
        assert!((prices[1] - 10.450_583_572_185_565).abs() < 1e-9);
        assert!(prices[0] > prices[1] && prices[1] > prices[2]);

        assert!(matches!(
            engine.price_strikes(&c, &[100.0, 0.0]),
            Err(KernelError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_trait_objects() {
        let engines: Vec<Box<dyn PricingEngine>> = vec![
            Box::new(BlackScholesEngine::new(0.2).unwrap()),
            Box::new(
                HestonEngine::new(
                    HestonParams::typical_equity(),
                    NumericalMethod::Quadrature,
                    KernelConfig::default(),
                )
                .unwrap(),
            ),
        ];
        let c = ContractSpec::put(100.0, 100.0, 0.5, 0.03, 0.0).unwrap();
        for e in &engines {
            let p = e.price(&c).unwrap();
            assert!(p > 0.0 && p < 100.0, "{:?}: {}", e.model(), p);
        }
        assert_eq!(engines[0].model(), ModelSelector::BlackScholes);
        assert_eq!(engines[1].model(), ModelSelector::Heston);
    }
}
