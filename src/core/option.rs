//! Option contract definitions
//!
//! A European vanilla contract together with the market inputs every engine
//! needs. Values are plain numbers already resolved by the caller (see
//! [`crate::core::market`] for the collaborator that supplies them).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{ensure_finite, KernelError, KernelResult};

/// Days per year used for date-based year fractions
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Payoff direction: +1 for call, -1 for put
    pub fn phi(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }

    /// Intrinsic value at given spot
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }
}

/// Contract and market inputs for a single European option
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContractSpec {
    /// Spot price of the underlying (> 0)
    pub spot: f64,
    /// Strike price (> 0)
    pub strike: f64,
    /// Time to expiry in years (>= 0; 0 prices at intrinsic)
    pub time: f64,
    /// Continuously compounded risk-free rate
    pub rate: f64,
    /// Continuous dividend yield
    pub dividend: f64,
    pub option_type: OptionType,
}

impl ContractSpec {
    /// Create a validated contract
    pub fn new(
        spot: f64,
        strike: f64,
        time: f64,
        rate: f64,
        dividend: f64,
        option_type: OptionType,
    ) -> KernelResult<Self> {
        let spec = Self { spot, strike, time, rate, dividend, option_type };
        spec.validate()?;
        Ok(spec)
    }

    pub fn call(spot: f64, strike: f64, time: f64, rate: f64, dividend: f64) -> KernelResult<Self> {
        Self::new(spot, strike, time, rate, dividend, OptionType::Call)
    }

    pub fn put(spot: f64, strike: f64, time: f64, rate: f64, dividend: f64) -> KernelResult<Self> {
        Self::new(spot, strike, time, rate, dividend, OptionType::Put)
    }

    /// Validate
    pub fn validate(&self) -> KernelResult<()> {
        ensure_finite("spot", self.spot)?;
        ensure_finite("strike", self.strike)?;
        ensure_finite("time to expiry", self.time)?;
        ensure_finite("rate", self.rate)?;
        ensure_finite("dividend yield", self.dividend)?;

        if self.spot <= 0.0 {
            return Err(KernelError::invalid_parameter("spot must be positive"));
        }
        if self.strike <= 0.0 {
            return Err(KernelError::invalid_parameter("strike must be positive"));
        }
        if self.time < 0.0 {
            return Err(KernelError::invalid_parameter("time to expiry must be non-negative"));
        }
        Ok(())
    }

    /// ACT/365.25 year fraction between two dates
    pub fn year_fraction(from: NaiveDate, expiry: NaiveDate) -> KernelResult<f64> {
        let days = (expiry - from).num_days();
        if days < 0 {
            return Err(KernelError::invalid_parameter(format!(
                "expiry {} is before valuation date {}",
                expiry, from
            )));
        }
        Ok(days as f64 / DAYS_PER_YEAR)
    }

    /// Same contract with a different option side
    pub fn with_type(&self, option_type: OptionType) -> Self {
        Self { option_type, ..*self }
    }

    pub fn with_spot(&self, spot: f64) -> Self {
        Self { spot, ..*self }
    }

    pub fn with_strike(&self, strike: f64) -> Self {
        Self { strike, ..*self }
    }

    pub fn with_time(&self, time: f64) -> Self {
        Self { time, ..*self }
    }

    pub fn with_rate(&self, rate: f64) -> Self {
        Self { rate, ..*self }
    }

    /// Discount factor e^{-rT}
    pub fn discount(&self) -> f64 {
        (-self.rate * self.time).exp()
    }

    /// Dividend discount factor e^{-qT}
    pub fn dividend_discount(&self) -> f64 {
        (-self.dividend * self.time).exp()
    }

    /// Forward F = S·e^{(r-q)T}
    pub fn forward(&self) -> f64 {
        self.spot * ((self.rate - self.dividend) * self.time).exp()
    }

    /// Log-moneyness: ln(K/S)
    pub fn log_moneyness(&self) -> f64 {
        (self.strike / self.spot).ln()
    }

    /// Intrinsic value at the current spot
    pub fn intrinsic(&self) -> f64 {
        self.option_type.intrinsic(self.spot, self.strike)
    }

    /// Model-free no-arbitrage bounds on a European price.
    ///
    /// Call: [max(S·e^{-qT} - K·e^{-rT}, 0), S·e^{-qT}]
    /// Put:  [max(K·e^{-rT} - S·e^{-qT}, 0), K·e^{-rT}]
    pub fn price_bounds(&self) -> (f64, f64) {
        let s = self.spot * self.dividend_discount();
        let k = self.strike * self.discount();
        match self.option_type {
            OptionType::Call => ((s - k).max(0.0), s),
            OptionType::Put => ((k - s).max(0.0), k),
        }
    }

    /// Is this option in the money?
    pub fn is_itm(&self) -> bool {
        match self.option_type {
            OptionType::Call => self.spot > self.strike,
            OptionType::Put => self.spot < self.strike,
        }
    }
}
