//! Pricing Models
//!
//! Implements:
//! - Black-Scholes (closed form, analytic Greeks)
//! - Heston Stochastic Volatility (quadrature and FFT backends)

pub mod black_scholes;
pub mod heston;

pub use black_scholes::BlackScholesEngine;
pub use heston::{HestonEngine, HestonParams};
