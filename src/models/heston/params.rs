//! Heston model parameters

use serde::{Deserialize, Serialize};

use crate::core::{ensure_finite, KernelError, KernelResult};

/// Heston model parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HestonParams {
    /// Initial variance (v0)
    pub v0: f64,
    /// Mean reversion speed (κ)
    pub kappa: f64,
    /// Long-term variance (θ)
    pub theta: f64,
    /// Volatility of volatility (ξ)
    pub sigma: f64,
    /// Correlation between spot and variance (ρ)
    pub rho: f64,
}

impl HestonParams {
    /// Create new Heston parameters
    pub fn new(v0: f64, kappa: f64, theta: f64, sigma: f64, rho: f64) -> Self {
        Self { v0, kappa, theta, sigma, rho }
    }

    /// Typical parameters for equity index (SPX/NDX-like)
    pub fn typical_equity() -> Self {
        Self {
            v0: 0.04,    // 20% initial vol
            kappa: 2.0,  // Mean reversion
            theta: 0.04, // 20% long-term vol
            sigma: 0.3,  // Vol-of-vol
            rho: -0.7,   // Leverage effect
        }
    }

    /// Check Feller condition: 2κθ > ξ² (variance stays strictly positive)
    pub fn feller_condition(&self) -> bool {
        2.0 * self.kappa * self.theta > self.sigma * self.sigma
    }

    /// Validate parameters
    pub fn validate(&self) -> KernelResult<()> {
        ensure_finite("v0", self.v0)?;
        ensure_finite("kappa", self.kappa)?;
        ensure_finite("theta", self.theta)?;
        ensure_finite("sigma", self.sigma)?;
        ensure_finite("rho", self.rho)?;

        if self.v0 <= 0.0 {
            return Err(KernelError::invalid_parameter("v0 must be positive"));
        }
        if self.kappa <= 0.0 {
            return Err(KernelError::invalid_parameter("kappa must be positive"));
        }
        if self.theta <= 0.0 {
            return Err(KernelError::invalid_parameter("theta must be positive"));
        }
        if self.sigma <= 0.0 {
            return Err(KernelError::invalid_parameter("sigma must be positive"));
        }
        if !(-1.0..=1.0).contains(&self.rho) {
            return Err(KernelError::invalid_parameter("rho must be in [-1, 1]"));
        }
        Ok(())
    }

    /// Long-term volatility
    pub fn long_term_vol(&self) -> f64 {
        self.theta.sqrt()
    }

    /// Initial volatility
    pub fn initial_vol(&self) -> f64 {
        self.v0.sqrt()
    }

    /// Same parameters with initial volatility `vol` (v0 = vol²)
    pub fn with_initial_vol(&self, vol: f64) -> Self {
        Self { v0: vol * vol, ..*self }
    }
}

impl Default for HestonParams {
    fn default() -> Self {
        Self::typical_equity()
    }
}
