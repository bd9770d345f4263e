//! # Option Kernel - European Option Pricing
//!
//! A pricing kernel for European options under two models, behind one
//! facade.
//!
//! ## Overview
//!
//! - **Black-Scholes**: closed-form price, analytic Greeks, implied volatility
//! - **Heston**: stochastic volatility priced from its characteristic
//!   function, either by adaptive quadrature (one strike) or by Carr-Madan
//!   FFT (many strikes from one grid); Greeks by finite differences
//!
//! Every call is a pure function of its arguments: no global state, no I/O,
//! and every iterative routine runs under an explicit iteration or
//! subdivision limit.
//!
//! ## Key Components
//!
//! - **core**: contracts, model parameters, Greeks, errors, configuration and
//!   the market-data provider interface
//! - **numerics**: normal distribution, Brent root-finder, Gauss-Kronrod
//!   quadrature, FFT
//! - **models**: Black-Scholes and Heston engines
//! - **implied_vol**: bracketing implied-volatility solver shared by both
//!   engines
//! - **pricing**: the `PricingEngine` trait and `PricingFacade`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use option_kernel::prelude::*;
//!
//! let facade = PricingFacade::default();
//! let contract = ContractSpec::call(100.0, 100.0, 1.0, 0.05, 0.0).unwrap();
//!
//! // Black-Scholes price; a market price of 0 skips implied volatility
//! let params = ModelParams::black_scholes(0.2).unwrap();
//! let result = facade.price(ModelSelector::BlackScholes, &contract, &params, 0.0).unwrap();
//! println!("price = {:.4}", result.price);
//!
//! // Heston through the FFT backend, with Greeks
//! let heston = ModelParams::heston(HestonParams::typical_equity(), NumericalMethod::Fft).unwrap();
//! let greeks = facade
//!     .greeks(ModelSelector::Heston, &contract, &heston, GreeksRequest::all())
//!     .unwrap();
//! println!("delta = {:.4}", greeks.delta);
//! ```
//!
//! ## What This Crate Does NOT Do
//!
//! - Fetch market data (callers implement `MarketDataProvider`)
//! - Price American or path-dependent options
//! - Calibrate Heston parameters to a surface

pub mod core;
pub mod implied_vol;
pub mod models;
pub mod numerics;
pub mod pricing;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        ContractSpec, ErrorKind, Greek, Greeks, GreeksRequest, KernelConfig, KernelError,
        KernelResult, MarketDataProvider, MarketSnapshot, ModelParams, ModelSelector,
        NumericalMethod, OptionType, PricingRequest, PricingResult, RateTerm,
    };

    // Models
    pub use crate::models::{BlackScholesEngine, HestonEngine, HestonParams};

    // Entry points
    pub use crate::pricing::{PricingEngine, PricingFacade};
}

// Re-export main types at crate root
pub use crate::core::{KernelError, KernelResult};
pub use crate::pricing::PricingFacade;
