//! Core data types for the pricing kernel
//!
//! Defines fundamental types:
//! - ContractSpec: spot, strike, expiry, rates, side
//! - ModelSelector / ModelParams: which model and its inputs
//! - Greeks / GreeksRequest: sensitivities and which ones to compute
//! - PricingRequest / PricingResult: combined evaluation records
//! - KernelError: the shared failure taxonomy
//! - KernelConfig: numerical settings
//! - MarketDataProvider: the market-data collaborator interface

pub mod config;
pub mod error;
pub mod greeks;
pub mod market;
pub mod model;
pub mod option;
pub mod result;

pub use config::*;
pub use error::*;
pub use greeks::*;
pub use market::*;
pub use model::*;
pub use option::*;
pub use result::*;
