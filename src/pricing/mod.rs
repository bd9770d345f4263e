//! Pricing entry points
//!
//! - PricingEngine: the price / Greeks / implied-volatility capability each
//!   model implements
//! - PricingFacade: validates requests and dispatches on the model selector

pub mod engine;
pub mod facade;

pub use engine::PricingEngine;
pub use facade::PricingFacade;
