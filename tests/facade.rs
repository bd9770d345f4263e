//! End-to-end checks through the pricing facade

use approx::assert_relative_eq;
use option_kernel::core::{ErrorKind, Greek};
use option_kernel::prelude::*;

fn facade() -> PricingFacade {
    PricingFacade::default()
}

#[test]
fn textbook_black_scholes_call() {
    let contract = ContractSpec::call(100.0, 100.0, 1.0, 0.05, 0.0).unwrap();
    let params = ModelParams::black_scholes(0.2).unwrap();
    let result = facade()
        .price(ModelSelector::BlackScholes, &contract, &params, 0.0)
        .unwrap();
    assert!((result.price - 10.4506).abs() < 1e-4, "price = {}", result.price);
}

#[test]
fn deep_itm_market_price_is_infeasible() {
    let contract = ContractSpec::call(100.0, 50.0, 1.0, 0.05, 0.0).unwrap();
    let params = ModelParams::black_scholes(0.2).unwrap();
    let err = facade()
        .implied_volatility(ModelSelector::BlackScholes, 0.01, &contract, &params)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DomainInfeasible);
    assert!(!err.is_fatal());
}

#[test]
fn implied_vol_on_lower_bound_is_not_identifiable() {
    // Deep in the money at tiny volatility the price equals S - K·e^{-rT}
    let contract = ContractSpec::call(100.0, 60.0, 0.5, 0.05, 0.0).unwrap();
    let params = ModelParams::black_scholes(0.02).unwrap();
    let f = facade();
    let market = f.price(ModelSelector::BlackScholes, &contract, &params, 0.0).unwrap().price;

    let err = f
        .implied_volatility(ModelSelector::BlackScholes, market, &contract, &params)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DomainInfeasible);

    let result = f.evaluate(&PricingRequest::new(contract, params).with_market_price(market));
    assert_eq!(result.implied_volatility, None);
    assert!(matches!(result.error, Some(KernelError::DomainInfeasible(_))));
}

#[test]
fn heston_backends_agree() {
    let contract = ContractSpec::call(100.0, 100.0, 1.0, 0.05, 0.0).unwrap();
    let quad =
        ModelParams::heston(HestonParams::typical_equity(), NumericalMethod::Quadrature).unwrap();
    let fft = ModelParams::heston(HestonParams::typical_equity(), NumericalMethod::Fft).unwrap();

    let f = facade();
    let by_quad = f.price(ModelSelector::Heston, &contract, &quad, 0.0).unwrap().price;
    let by_fft = f.price(ModelSelector::Heston, &contract, &fft, 0.0).unwrap().price;
    assert!(((by_quad - by_fft) / by_quad).abs() < 1e-4, "quad={} fft={}", by_quad, by_fft);
}

#[test]
fn heston_backends_agree_away_from_the_money() {
    let f = facade();
    let skewed = HestonParams::new(0.09, 0.5, 0.04, 1.0, -0.9);
    let cases = [
        (HestonParams::typical_equity(), OptionType::Put, 70.0, 1.0),
        (HestonParams::typical_equity(), OptionType::Call, 150.0, 1.5),
        (skewed, OptionType::Call, 200.0, 2.0),
        (skewed, OptionType::Put, 75.0, 0.25),
    ];

    for (heston, side, strike, time) in cases {
        let contract = ContractSpec::new(100.0, strike, time, 0.03, 0.01, side).unwrap();
        let quad = ModelParams::heston(heston, NumericalMethod::Quadrature).unwrap();
        let fft = ModelParams::heston(heston, NumericalMethod::Fft).unwrap();

        let by_quad = f.price(ModelSelector::Heston, &contract, &quad, 0.0).unwrap().price;
        let by_fft = f.price(ModelSelector::Heston, &contract, &fft, 0.0).unwrap().price;
        assert!(
            ((by_quad - by_fft) / by_quad).abs() < 1e-4,
            "{:?} K={} T={}: quad={} fft={}",
            side,
            strike,
            time,
            by_quad,
            by_fft
        );
    }
}

#[test]
fn heston_put_call_parity() {
    let f = facade();
    let call = ContractSpec::call(100.0, 90.0, 0.5, 0.03, 0.02).unwrap();
    let put = call.with_type(OptionType::Put);
    let rhs = 100.0 * call.dividend_discount() - 90.0 * call.discount();

    for method in [NumericalMethod::Quadrature, NumericalMethod::Fft] {
        let params = ModelParams::heston(HestonParams::typical_equity(), method).unwrap();
        let c = f.price(ModelSelector::Heston, &call, &params, 0.0).unwrap().price;
        let p = f.price(ModelSelector::Heston, &put, &params, 0.0).unwrap().price;
        assert!((c - p - rhs).abs() < 1e-8, "{:?}: {}", method, c - p - rhs);
    }
}

#[test]
fn heston_implied_vol_round_trip() {
    let f = facade();
    let contract = ContractSpec::put(100.0, 105.0, 0.5, 0.02, 0.0).unwrap();
    let true_params = HestonParams::typical_equity().with_initial_vol(0.35);
    let priced = ModelParams::heston(true_params, NumericalMethod::Quadrature).unwrap();
    let market = f.price(ModelSelector::Heston, &contract, &priced, 0.0).unwrap().price;

    let start =
        ModelParams::heston(HestonParams::typical_equity(), NumericalMethod::Quadrature).unwrap();
    let result = f.price(ModelSelector::Heston, &contract, &start, market).unwrap();
    let iv = result.implied_volatility.unwrap();
    assert!((iv - 0.35).abs() < 1e-4, "iv = {}", iv);
}

#[test]
fn unsupported_method_is_typed() {
    let contract = ContractSpec::call(100.0, 100.0, 1.0, 0.05, 0.0).unwrap();
    let err = ModelParams::black_scholes_with_method(0.2, NumericalMethod::Fft).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedModelOrMethod);

    let raw = ModelParams::Heston {
        params: HestonParams::typical_equity(),
        method: NumericalMethod::Analytic,
    };
    let err = facade()
        .greeks(ModelSelector::Heston, &contract, &raw, GreeksRequest::all())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedModelOrMethod);
    assert!(err.is_fatal());
}

#[test]
fn invalid_inputs_are_rejected() {
    assert_eq!(
        ContractSpec::call(f64::NAN, 100.0, 1.0, 0.05, 0.0).unwrap_err().kind(),
        ErrorKind::InvalidParameter
    );
    assert_eq!(
        ContractSpec::call(100.0, -1.0, 1.0, 0.05, 0.0).unwrap_err().kind(),
        ErrorKind::InvalidParameter
    );
    assert_eq!(
        ContractSpec::call(100.0, 100.0, -0.5, 0.05, 0.0).unwrap_err().kind(),
        ErrorKind::InvalidParameter
    );

    let bad_variance = HestonParams::new(0.0, 2.0, 0.04, 0.3, -0.7);
    assert_eq!(
        ModelParams::heston(bad_variance, NumericalMethod::Quadrature).unwrap_err().kind(),
        ErrorKind::InvalidParameter
    );
}

#[test]
fn evaluate_combines_everything() {
    let contract = ContractSpec::call(100.0, 110.0, 0.5, 0.03, 0.0).unwrap();
    let params = ModelParams::heston(HestonParams::typical_equity(), NumericalMethod::Fft).unwrap();
    let request = PricingRequest::new(contract, params)
        .with_market_price(3.0)
        .with_greeks(GreeksRequest::none().with(Greek::Delta).with(Greek::Gamma));

    let result = facade().evaluate(&request);
    assert!(result.is_ok(), "{:?}", result.error);
    assert!(result.price > 0.0);
    let iv = result.implied_volatility.unwrap();
    assert!(iv > 0.0 && iv < 1.0);
    assert!(result.greeks.delta > 0.0 && result.greeks.delta < 1.0);
    assert!(result.greeks.gamma > 0.0);
    assert_eq!(result.greeks.vega, 0.0);
}

#[test]
fn batch_strikes_match_single_prices() {
    let f = facade();
    let contract = ContractSpec::call(100.0, 100.0, 1.0, 0.05, 0.0).unwrap();
    let params = ModelParams::heston(HestonParams::typical_equity(), NumericalMethod::Fft).unwrap();
    let strikes = [80.0, 90.0, 100.0, 110.0, 120.0];
    let batch = f
        .price_strikes(ModelSelector::Heston, &contract, &params, &strikes)
        .unwrap();

    let quad =
        ModelParams::heston(HestonParams::typical_equity(), NumericalMethod::Quadrature).unwrap();
    for (&strike, &price) in strikes.iter().zip(&batch) {
        let single = f
            .price(ModelSelector::Heston, &contract.with_strike(strike), &quad, 0.0)
            .unwrap()
            .price;
        assert!((price - single).abs() < 2e-3, "K={} batch={} single={}", strike, price, single);
    }
}

#[test]
fn config_from_json_drives_facade() {
    let json = r#"{ "fft": { "grid_size": 8192 }, "bumps": { "spot_relative": 0.002 } }"#;
    let config = KernelConfig::from_json(json).unwrap();
    let f = PricingFacade::new(config).unwrap();
    assert_eq!(f.config().fft.grid_size, 8192);

    let contract = ContractSpec::call(100.0, 100.0, 1.0, 0.05, 0.0).unwrap();
    let params = ModelParams::heston(HestonParams::typical_equity(), NumericalMethod::Fft).unwrap();
    let precise = f.price(ModelSelector::Heston, &contract, &params, 0.0).unwrap().price;
    let default = facade().price(ModelSelector::Heston, &contract, &params, 0.0).unwrap().price;
    assert_relative_eq!(precise, default, max_relative = 1e-6);
}
