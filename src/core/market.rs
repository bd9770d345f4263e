//! Market-data collaborator interface
//!
//! The kernel never fetches data itself. Callers plug in a
//! [`MarketDataProvider`]; every value it returns is treated as untrusted and
//! range-checked before it can reach an engine.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use thiserror::Error;

use super::error::{KernelError, KernelResult};
use super::option::{ContractSpec, OptionType};

/// Failure reported by a market-data provider
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    #[error("{0} not available")]
    Unavailable(String),

    #[error("provider error: {0}")]
    Provider(String),
}

/// Treasury curve tenors a provider can quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RateTerm {
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    TenYears,
    ThirtyYears,
}

impl RateTerm {
    pub const ALL: [RateTerm; 8] = [
        RateTerm::OneMonth,
        RateTerm::ThreeMonths,
        RateTerm::SixMonths,
        RateTerm::OneYear,
        RateTerm::TwoYears,
        RateTerm::FiveYears,
        RateTerm::TenYears,
        RateTerm::ThirtyYears,
    ];

    /// Tenor length in years
    pub fn years(&self) -> f64 {
        match self {
            RateTerm::OneMonth => 1.0 / 12.0,
            RateTerm::ThreeMonths => 0.25,
            RateTerm::SixMonths => 0.5,
            RateTerm::OneYear => 1.0,
            RateTerm::TwoYears => 2.0,
            RateTerm::FiveYears => 5.0,
            RateTerm::TenYears => 10.0,
            RateTerm::ThirtyYears => 30.0,
        }
    }

    /// Shortest tenor covering the expiry (30Y beyond that)
    pub fn for_time_to_expiry(years: f64) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| years <= t.years() + 1e-9)
            .unwrap_or(RateTerm::ThirtyYears)
    }
}

/// Historical-volatility lookback matched to the option's horizon
pub fn volatility_lookback_days(days_to_expiry: u32) -> u32 {
    match days_to_expiry {
        0..=7 => 10,
        8..=30 => 20,
        31..=90 => 60,
        91..=180 => 90,
        _ => 180,
    }
}

/// Source of already-resolved market inputs
pub trait MarketDataProvider {
    fn spot_price(&self, symbol: &str) -> Result<f64, MarketDataError>;

    fn dividend_yield(&self, symbol: &str) -> Result<f64, MarketDataError>;

    fn risk_free_rate(&self, term: RateTerm) -> Result<f64, MarketDataError>;

    /// Annualised historical volatility over `lookback_days`
    fn historical_volatility(
        &self,
        symbol: &str,
        lookback_days: u32,
    ) -> Result<f64, MarketDataError>;
}

/// Validated market inputs for one underlying and horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub spot: f64,
    pub dividend_yield: f64,
    pub rate: f64,
    pub rate_term: RateTerm,
    pub historical_volatility: f64,
}

fn check_range(name: &str, value: f64, lo: f64, hi: f64, lo_inclusive: bool) -> KernelResult<f64> {
    let above_lo = if lo_inclusive { value >= lo } else { value > lo };
    if value.is_finite() && above_lo && value <= hi {
        Ok(value)
    } else {
        Err(KernelError::invalid_parameter(format!(
            "market data: {} = {} outside accepted range",
            name, value
        )))
    }
}

fn provider_value(name: &str, value: Result<f64, MarketDataError>) -> KernelResult<f64> {
    value.map_err(|e| KernelError::invalid_parameter(format!("market data: {}: {}", name, e)))
}

impl MarketSnapshot {
    /// Pull spot, dividend yield, rate and historical volatility for
    /// `symbol`, then validate every value.
    pub fn resolve<P: MarketDataProvider + ?Sized>(
        provider: &P,
        symbol: &str,
        time_to_expiry: f64,
    ) -> KernelResult<Self> {
        if !time_to_expiry.is_finite() || time_to_expiry < 0.0 {
            return Err(KernelError::invalid_parameter("time to expiry must be non-negative"));
        }

        let rate_term = RateTerm::for_time_to_expiry(time_to_expiry);
        let days = (time_to_expiry * 365.0).ceil().min(u32::MAX as f64) as u32;
        let lookback = volatility_lookback_days(days);

        let spot = provider_value("spot", provider.spot_price(symbol))?;
        let dividend_yield = provider_value("dividend yield", provider.dividend_yield(symbol))?;
        let rate = provider_value("rate", provider.risk_free_rate(rate_term))?;
        let vol = provider_value(
            "historical volatility",
            provider.historical_volatility(symbol, lookback),
        )?;

        let snapshot = Self {
            symbol: symbol.to_string(),
            spot: check_range("spot", spot, 0.0, f64::MAX, false)?,
            dividend_yield: check_range("dividend yield", dividend_yield, 0.0, 1.0 - 1e-12, true)?,
            rate: check_range("rate", rate, -1.0 + 1e-12, 1.0 - 1e-12, false)?,
            rate_term,
            historical_volatility: check_range("historical volatility", vol, 0.0, 5.0, false)?,
        };

        tracing::debug!(
            "Resolved {}: spot={} q={} r={} ({:?}) hv={}",
            snapshot.symbol,
            snapshot.spot,
            snapshot.dividend_yield,
            snapshot.rate,
            snapshot.rate_term,
            snapshot.historical_volatility
        );
        Ok(snapshot)
    }
}

impl ContractSpec {
    /// Contract on a resolved snapshot
    pub fn from_snapshot(
        snapshot: &MarketSnapshot,
        strike: f64,
        time: f64,
        option_type: OptionType,
    ) -> KernelResult<Self> {
        Self::new(snapshot.spot, strike, time, snapshot.rate, snapshot.dividend_yield, option_type)
    }
}

/// Annualised close-to-close volatility of a price series
pub fn historical_volatility(closes: &[f64], periods_per_year: f64) -> KernelResult<f64> {
    if closes.len() < 3 {
        return Err(KernelError::invalid_parameter(
            "historical volatility needs at least three prices",
        ));
    }
    if !periods_per_year.is_finite() || periods_per_year <= 0.0 {
        return Err(KernelError::invalid_parameter("periods per year must be positive"));
    }
    if closes.iter().any(|p| !p.is_finite() || *p <= 0.0) {
        return Err(KernelError::invalid_parameter("prices must be positive and finite"));
    }

    let returns: Vec<f64> = closes.windows(2).map(|w| (w[1] / w[0]).ln()).collect();
    Ok(returns.iter().std_dev() * periods_per_year.sqrt())
}
