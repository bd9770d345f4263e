//! Model selection and model-specific parameters

use serde::{Deserialize, Serialize};

use super::error::{ensure_finite, KernelError, KernelResult};
use crate::models::HestonParams;

/// Pricing model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelSelector {
    BlackScholes,
    Heston,
}

/// Numerical method used by an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericalMethod {
    /// Closed form (Black-Scholes only)
    Analytic,
    /// Direct integration of the pricing integral (Heston only)
    Quadrature,
    /// Carr-Madan transform over a strike grid (Heston only)
    Fft,
}

impl ModelSelector {
    /// Methods an engine for this model implements
    pub fn supports(&self, method: NumericalMethod) -> bool {
        matches!(
            (self, method),
            (ModelSelector::BlackScholes, NumericalMethod::Analytic)
                | (ModelSelector::Heston, NumericalMethod::Quadrature)
                | (ModelSelector::Heston, NumericalMethod::Fft)
        )
    }

    pub fn default_method(&self) -> NumericalMethod {
        match self {
            ModelSelector::BlackScholes => NumericalMethod::Analytic,
            ModelSelector::Heston => NumericalMethod::Quadrature,
        }
    }
}

/// Model-specific inputs, tagged by model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ModelParams {
    BlackScholes {
        /// Flat annualised volatility (>= 0)
        volatility: f64,
        method: NumericalMethod,
    },
    Heston {
        params: HestonParams,
        method: NumericalMethod,
    },
}

impl ModelParams {
    /// Black-Scholes with the analytic method
    pub fn black_scholes(volatility: f64) -> KernelResult<Self> {
        Self::black_scholes_with_method(volatility, NumericalMethod::Analytic)
    }

    pub fn black_scholes_with_method(
        volatility: f64,
        method: NumericalMethod,
    ) -> KernelResult<Self> {
        let p = Self::BlackScholes { volatility, method };
        p.validate()?;
        Ok(p)
    }

    pub fn heston(params: HestonParams, method: NumericalMethod) -> KernelResult<Self> {
        let p = Self::Heston { params, method };
        p.validate()?;
        Ok(p)
    }

    pub fn model(&self) -> ModelSelector {
        match self {
            Self::BlackScholes { .. } => ModelSelector::BlackScholes,
            Self::Heston { .. } => ModelSelector::Heston,
        }
    }

    pub fn method(&self) -> NumericalMethod {
        match self {
            Self::BlackScholes { method, .. } | Self::Heston { method, .. } => *method,
        }
    }

    /// Volatility-like level: σ for Black-Scholes, √v0 for Heston
    pub fn volatility(&self) -> f64 {
        match self {
            Self::BlackScholes { volatility, .. } => *volatility,
            Self::Heston { params, .. } => params.initial_vol(),
        }
    }

    /// Check ranges and that the method belongs to the model
    pub fn validate(&self) -> KernelResult<()> {
        let model = self.model();
        let method = self.method();
        if !model.supports(method) {
            return Err(KernelError::unsupported(format!(
                "{:?} has no {:?} backend",
                model, method
            )));
        }

        match self {
            Self::BlackScholes { volatility, .. } => {
                ensure_finite("volatility", *volatility)?;
                if *volatility < 0.0 {
                    return Err(KernelError::invalid_parameter("volatility must be non-negative"));
                }
                Ok(())
            }
            Self::Heston { params, .. } => params.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports() {
        assert!(ModelSelector::BlackScholes.supports(NumericalMethod::Analytic));
        assert!(!ModelSelector::BlackScholes.supports(NumericalMethod::Fft));
        assert!(!ModelSelector::BlackScholes.supports(NumericalMethod::Quadrature));
        assert!(ModelSelector::Heston.supports(NumericalMethod::Fft));
        assert!(ModelSelector::Heston.supports(NumericalMethod::Quadrature));
        assert!(!ModelSelector::Heston.supports(NumericalMethod::Analytic));
    }

    #[test]
    fn test_black_scholes_params() {
        let p = ModelParams::black_scholes(0.2).unwrap();
        assert_eq!(p.model(), ModelSelector::BlackScholes);
        assert_eq!(p.method(), NumericalMethod::Analytic);
        assert_eq!(p.volatility(), 0.2);

        assert!(ModelParams::black_scholes(0.0).is_ok());
        assert!(matches!(
            ModelParams::black_scholes(-0.1),
            Err(KernelError::InvalidParameter(_))
        ));
        assert!(matches!(
            ModelParams::black_scholes(f64::NAN),
            Err(KernelError::InvalidParameter(_))
        ));
        assert!(matches!(
            ModelParams::black_scholes_with_method(0.2, NumericalMethod::Fft),
            Err(KernelError::UnsupportedModelOrMethod(_))
        ));
    }

    #[test]
    fn test_heston_params() {
        let p = ModelParams::heston(HestonParams::typical_equity(), NumericalMethod::Fft).unwrap();
        assert_eq!(p.model(), ModelSelector::Heston);
        assert!((p.volatility() - 0.2).abs() < 1e-12);

        assert!(matches!(
            ModelParams::heston(HestonParams::typical_equity(), NumericalMethod::Analytic),
            Err(KernelError::UnsupportedModelOrMethod(_))
        ));

        let bad = HestonParams::new(-0.04, 2.0, 0.04, 0.3, -0.7);
        assert!(matches!(
            ModelParams::heston(bad, NumericalMethod::Quadrature),
            Err(KernelError::InvalidParameter(_))
        ));
    }
}
