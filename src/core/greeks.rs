//! Option Greeks
//!
//! First and second order sensitivities, and the set of Greeks a caller
//! asks for. Greeks that were not requested are never computed and stay 0.

use serde::{Deserialize, Serialize};

/// A single sensitivity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Greek {
    Delta,
    Gamma,
    Theta,
    Vega,
    Rho,
}

impl Greek {
    pub const ALL: [Greek; 5] = [Greek::Delta, Greek::Gamma, Greek::Theta, Greek::Vega, Greek::Rho];

    fn bit(self) -> u8 {
        match self {
            Greek::Delta => 1,
            Greek::Gamma => 1 << 1,
            Greek::Theta => 1 << 2,
            Greek::Vega => 1 << 3,
            Greek::Rho => 1 << 4,
        }
    }
}

/// Set of requested Greeks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GreeksRequest {
    mask: u8,
}

impl GreeksRequest {
    /// Nothing requested
    pub fn none() -> Self {
        Self { mask: 0 }
    }

    /// All five Greeks
    pub fn all() -> Self {
        Greek::ALL.into_iter().collect()
    }

    pub fn with(mut self, greek: Greek) -> Self {
        self.mask |= greek.bit();
        self
    }

    pub fn without(mut self, greek: Greek) -> Self {
        self.mask &= !greek.bit();
        self
    }

    pub fn contains(&self, greek: Greek) -> bool {
        self.mask & greek.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    /// Requested Greeks in a fixed order
    pub fn iter(&self) -> impl Iterator<Item = Greek> + '_ {
        Greek::ALL.into_iter().filter(move |g| self.contains(*g))
    }
}

impl FromIterator<Greek> for GreeksRequest {
    fn from_iter<I: IntoIterator<Item = Greek>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), |req, g| req.with(g))
    }
}

impl From<&[Greek]> for GreeksRequest {
    fn from(greeks: &[Greek]) -> Self {
        greeks.iter().copied().collect()
    }
}

/// Option Greeks (sensitivities)
///
/// Raw derivatives: theta is per year, vega per unit of volatility and rho per
/// unit of rate. See [`Greeks::market_convention`] for desk units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta: dV/dS (sensitivity to spot)
    pub delta: f64,
    /// Gamma: d²V/dS² (sensitivity of delta to spot)
    pub gamma: f64,
    /// Theta: dV/dt = -dV/dT (time decay, per year)
    pub theta: f64,
    /// Vega: dV/dσ (sensitivity to volatility)
    pub vega: f64,
    /// Rho: dV/dr (sensitivity to interest rate)
    pub rho: f64,
}

impl Greeks {
    pub fn new(delta: f64, gamma: f64, theta: f64, vega: f64, rho: f64) -> Self {
        Self { delta, gamma, theta, vega, rho }
    }

    pub fn get(&self, greek: Greek) -> f64 {
        match greek {
            Greek::Delta => self.delta,
            Greek::Gamma => self.gamma,
            Greek::Theta => self.theta,
            Greek::Vega => self.vega,
            Greek::Rho => self.rho,
        }
    }

    pub fn set(&mut self, greek: Greek, value: f64) {
        match greek {
            Greek::Delta => self.delta = value,
            Greek::Gamma => self.gamma = value,
            Greek::Theta => self.theta = value,
            Greek::Vega => self.vega = value,
            Greek::Rho => self.rho = value,
        }
    }

    /// Zero every Greek that is not in `request`
    pub fn masked(mut self, request: GreeksRequest) -> Self {
        for g in Greek::ALL {
            if !request.contains(g) {
                self.set(g, 0.0);
            }
        }
        self
    }

    /// Theta per calendar day, vega and rho per 1% move
    pub fn market_convention(&self) -> Self {
        Self {
            delta: self.delta,
            gamma: self.gamma,
            theta: self.theta / 365.0,
            vega: self.vega / 100.0,
            rho: self.rho / 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_set_semantics() {
        let req = GreeksRequest::none().with(Greek::Delta).with(Greek::Vega);
        assert!(req.contains(Greek::Delta));
        assert!(req.contains(Greek::Vega));
        assert!(!req.contains(Greek::Gamma));
        assert_eq!(req.iter().collect::<Vec<_>>(), vec![Greek::Delta, Greek::Vega]);

        // Adding twice is idempotent
        assert_eq!(req.with(Greek::Delta), req);
        assert!(req.without(Greek::Delta).without(Greek::Vega).is_empty());

        let all = GreeksRequest::all();
        assert_eq!(all.iter().count(), 5);
        assert_eq!(GreeksRequest::from(&[Greek::Rho, Greek::Theta][..]).iter().count(), 2);
    }

    #[test]
    fn test_masked() {
        let g = Greeks::new(0.5, 0.02, -6.0, 37.0, 53.0);
        let m = g.masked(GreeksRequest::none().with(Greek::Gamma));
        assert_eq!(m, Greeks::new(0.0, 0.02, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_market_convention() {
        let g = Greeks::new(0.5, 0.02, -365.0, 40.0, 50.0).market_convention();
        assert_eq!(g.theta, -1.0);
        assert_eq!(g.vega, 0.4);
        assert_eq!(g.rho, 0.5);
        assert_eq!(g.delta, 0.5);
    }
}
