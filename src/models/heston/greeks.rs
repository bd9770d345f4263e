//! Finite-difference Greeks for the Heston engine
//!
//! Each requested Greek re-prices with one input bumped, using the same
//! backend as the price itself. Bump sizes come from [`BumpConfig`].

use super::params::HestonParams;
use crate::core::{BumpConfig, ContractSpec, Greek, Greeks, GreeksRequest, KernelResult};

/// Greeks of `price` by central differences.
///
/// Vega is taken with respect to √v0. Theta and vega fall back to forward
/// differences when the backward bump would leave the domain (T - h <= 0,
/// √v0 - h <= 0).
pub fn finite_difference_greeks<F>(
    mut price: F,
    contract: &ContractSpec,
    params: &HestonParams,
    request: GreeksRequest,
    bumps: &BumpConfig,
) -> KernelResult<Greeks>
where
    F: FnMut(&ContractSpec, &HestonParams) -> KernelResult<f64>,
{
    let mut greeks = Greeks::default();
    if request.is_empty() {
        return Ok(greeks);
    }

    let mut base_value: Option<f64> = None;
    let mut base = |price: &mut F| -> KernelResult<f64> {
        match base_value {
            Some(v) => Ok(v),
            None => {
                let v = price(contract, params)?;
                base_value = Some(v);
                Ok(v)
            }
        }
    };

    if request.contains(Greek::Delta) || request.contains(Greek::Gamma) {
        let h = bumps.spot_relative * contract.spot;
        let up = price(&contract.with_spot(contract.spot + h), params)?;
        let down = price(&contract.with_spot(contract.spot - h), params)?;

        if request.contains(Greek::Delta) {
            greeks.delta = (up - down) / (2.0 * h);
        }
        if request.contains(Greek::Gamma) {
            let mid = base(&mut price)?;
            greeks.gamma = (up - 2.0 * mid + down) / (h * h);
        }
    }

    if request.contains(Greek::Vega) {
        let h = bumps.volatility;
        let vol = params.initial_vol();
        let up = price(contract, &params.with_initial_vol(vol + h))?;
        greeks.vega = if vol > h {
            let down = price(contract, &params.with_initial_vol(vol - h))?;
            (up - down) / (2.0 * h)
        } else {
            (up - base(&mut price)?) / h
        };
    }

    if request.contains(Greek::Rho) {
        let h = bumps.rate;
        let up = price(&contract.with_rate(contract.rate + h), params)?;
        let down = price(&contract.with_rate(contract.rate - h), params)?;
        greeks.rho = (up - down) / (2.0 * h);
    }

    if request.contains(Greek::Theta) {
        let h = bumps.time;
        let later = price(&contract.with_time(contract.time + h), params)?;
        // Theta is -dV/dT
        greeks.theta = if contract.time > h {
            let earlier = price(&contract.with_time(contract.time - h), params)?;
            -(later - earlier) / (2.0 * h)
        } else {
            -(later - base(&mut price)?) / h
        };
    }

    Ok(greeks)
}
