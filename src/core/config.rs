//! Numerical settings for the pricing kernel
//!
//! One immutable [`KernelConfig`] is handed to the facade; engines read the
//! parts they need. Nothing here is global.

use serde::{Deserialize, Serialize};

use super::error::{KernelError, KernelResult};

/// Settings for every numerical routine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Heston quadrature backend
    pub quadrature: QuadratureConfig,
    /// Heston FFT backend
    pub fft: FftConfig,
    /// Implied-volatility root search
    pub solver: SolverConfig,
    /// Finite-difference bumps for Heston Greeks
    pub bumps: BumpConfig,
}

impl KernelConfig {
    /// Tighter tolerances and a larger FFT grid
    pub fn precise() -> Self {
        Self {
            quadrature: QuadratureConfig {
                tolerance: 1e-12,
                max_subdivisions: 4000,
                ..Default::default()
            },
            fft: FftConfig {
                grid_size: 32768,
                ..Default::default()
            },
            solver: SolverConfig {
                tolerance: 1e-13,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Looser tolerances and a smaller FFT grid
    pub fn fast() -> Self {
        Self {
            quadrature: QuadratureConfig {
                tolerance: 1e-8,
                max_subdivisions: 400,
                ..Default::default()
            },
            fft: FftConfig {
                grid_size: 4096,
                eta: 0.15,
                ..Default::default()
            },
            solver: SolverConfig {
                tolerance: 1e-9,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Parse a JSON document; absent fields take their defaults.
    pub fn from_json(json: &str) -> KernelResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| KernelError::invalid_parameter(format!("config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> KernelResult<()> {
        self.quadrature.validate()?;
        self.fft.validate()?;
        self.solver.validate()?;
        self.bumps.validate()
    }
}

fn positive(name: &str, value: f64) -> KernelResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(KernelError::invalid_parameter(format!(
            "config: {} must be positive and finite, got {}",
            name, value
        )))
    }
}

/// Quadrature backend configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadratureConfig {
    /// Absolute tolerance on each probability integral
    /// Default: 1e-10
    pub tolerance: f64,

    /// Maximum number of panel bisections per integral
    /// Default: 2000
    pub max_subdivisions: usize,

    /// Equal panels the range is split into before adapting
    /// Default: 16
    pub initial_panels: usize,

    /// How many times the truncation bound may double while searching for a
    /// negligible tail
    /// Default: 8
    pub max_tail_doublings: usize,

    /// Hard cap on the truncated upper limit of the transform variable
    /// Default: 5000
    pub max_upper_bound: f64,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_subdivisions: 2000,
            initial_panels: 16,
            max_tail_doublings: 8,
            max_upper_bound: 5000.0,
        }
    }
}

impl QuadratureConfig {
    pub fn validate(&self) -> KernelResult<()> {
        positive("quadrature.tolerance", self.tolerance)?;
        positive("quadrature.max_upper_bound", self.max_upper_bound)?;
        if self.initial_panels == 0 {
            return Err(KernelError::invalid_parameter(
                "config: quadrature.initial_panels must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Carr-Madan FFT configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FftConfig {
    /// Number of grid points (power of two); N·η is where the transform
    /// integral is truncated
    /// Default: 16384
    pub grid_size: usize,

    /// Spacing of the transform variable; log-strike spacing is 2π/(N·η).
    /// Simpson weights alias the price from k ± π/η back onto k, which
    /// biases every strike by about e^{-απ/η}/3 of the forward, so η must
    /// stay small.
    /// Default: 0.1
    pub eta: f64,

    /// Damping exponent applied to the call price
    /// Default: 1.5
    pub alpha: f64,

    /// Adapt grid to extreme moneyness and very short expiries
    /// Default: true
    pub adaptive: bool,
}

impl Default for FftConfig {
    fn default() -> Self {
        Self {
            grid_size: 16384,
            eta: 0.1,
            alpha: 1.5,
            adaptive: true,
        }
    }
}

impl FftConfig {
    pub fn validate(&self) -> KernelResult<()> {
        if self.grid_size < 16 || !self.grid_size.is_power_of_two() {
            return Err(KernelError::invalid_parameter(format!(
                "config: fft.grid_size must be a power of two >= 16, got {}",
                self.grid_size
            )));
        }
        positive("fft.eta", self.eta)?;
        positive("fft.alpha", self.alpha)
    }

    /// Log-strike spacing λ = 2π/(N·η)
    pub fn lambda(&self) -> f64 {
        2.0 * std::f64::consts::PI / (self.grid_size as f64 * self.eta)
    }
}

/// Implied-volatility solver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Bracket width at which the root is accepted
    /// Default: 1e-12
    pub tolerance: f64,

    /// Brent iterations per bracket
    /// Default: 200
    pub max_iterations: usize,

    /// Lower end of the initial volatility bracket
    /// Default: 1e-6
    pub lower_vol: f64,

    /// Upper end of the initial volatility bracket (500% annualised)
    /// Default: 5.0
    pub upper_vol: f64,

    /// Times the bracket may be widened before giving up
    /// Default: 3
    pub max_bracket_expansions: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            max_iterations: 200,
            lower_vol: 1e-6,
            upper_vol: 5.0,
            max_bracket_expansions: 3,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> KernelResult<()> {
        positive("solver.tolerance", self.tolerance)?;
        positive("solver.lower_vol", self.lower_vol)?;
        positive("solver.upper_vol", self.upper_vol)?;
        if self.lower_vol >= self.upper_vol {
            return Err(KernelError::invalid_parameter(
                "config: solver.lower_vol must be below solver.upper_vol",
            ));
        }
        if self.max_iterations == 0 {
            return Err(KernelError::invalid_parameter(
                "config: solver.max_iterations must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Finite-difference bump sizes for Greeks without a closed form.
///
/// Too small amplifies integration noise, too large adds truncation bias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BumpConfig {
    /// Spot bump as a fraction of spot
    /// Default: 1e-3
    pub spot_relative: f64,

    /// Absolute bump of the volatility level (√v0 for Heston)
    /// Default: 1e-3
    pub volatility: f64,

    /// Absolute rate bump
    /// Default: 1e-4
    pub rate: f64,

    /// Time bump in years
    /// Default: 1e-4
    pub time: f64,
}

impl Default for BumpConfig {
    fn default() -> Self {
        Self {
            spot_relative: 1e-3,
            volatility: 1e-3,
            rate: 1e-4,
            time: 1e-4,
        }
    }
}

impl BumpConfig {
    pub fn validate(&self) -> KernelResult<()> {
        positive("bumps.spot_relative", self.spot_relative)?;
        positive("bumps.volatility", self.volatility)?;
        positive("bumps.rate", self.rate)?;
        positive("bumps.time", self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(KernelConfig::default().validate().is_ok());
        assert!(KernelConfig::precise().validate().is_ok());
        assert!(KernelConfig::fast().validate().is_ok());
        let (precise, fast) = (KernelConfig::precise(), KernelConfig::fast());
        assert!(precise.quadrature.tolerance < fast.quadrature.tolerance);
        assert!(precise.fft.grid_size > fast.fft.grid_size);
    }

    #[test]
    fn test_from_json_partial() {
        let json = r#"{ "fft": { "grid_size": 8192 }, "solver": { "max_iterations": 50 } }"#;
        let cfg = KernelConfig::from_json(json).unwrap();
        assert_eq!(cfg.fft.grid_size, 8192);
        assert_eq!(cfg.fft.alpha, 1.5);
        assert_eq!(cfg.fft.eta, 0.1);
        assert_eq!(cfg.solver.max_iterations, 50);
        assert_eq!(cfg.quadrature, QuadratureConfig::default());
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        assert!(matches!(
            KernelConfig::from_json(r#"{ "fft": { "grid_size": 1000 } }"#),
            Err(KernelError::InvalidParameter(_))
        ));
        assert!(matches!(
            KernelConfig::from_json(r#"{ "solver": { "lower_vol": 2.0, "upper_vol": 1.0 } }"#),
            Err(KernelError::InvalidParameter(_))
        ));
        assert!(matches!(
            KernelConfig::from_json("not json"),
            Err(KernelError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_grid_alias_is_negligible() {
        // Simpson leak from k - π/η, as a fraction of the forward
        for fft in [FftConfig::default(), KernelConfig::fast().fft, KernelConfig::precise().fft] {
            let leak = (-fft.alpha * std::f64::consts::PI / fft.eta).exp() / 3.0;
            assert!(leak < 1e-13, "eta={} leak={:e}", fft.eta, leak);
            assert!(fft.grid_size as f64 * fft.eta >= 600.0);
        }
    }

    #[test]
    fn test_lambda() {
        let fft = FftConfig::default();
        let product = fft.lambda() * fft.eta * fft.grid_size as f64;
        assert!((product - 2.0 * std::f64::consts::PI).abs() < 1e-12);
    }
}
