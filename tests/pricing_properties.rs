//! Property tests: parity, implied-volatility round trips, monotonicity and
//! the expiry boundary

use option_kernel::models::black_scholes;
use option_kernel::prelude::*;
use proptest::prelude::*;

fn contract(
    spot: f64,
    moneyness: f64,
    time: f64,
    rate: f64,
    dividend: f64,
    option_type: OptionType,
) -> ContractSpec {
    ContractSpec::new(spot, spot * moneyness, time, rate, dividend, option_type).unwrap()
}

fn option_type() -> impl Strategy<Value = OptionType> {
    prop_oneof![Just(OptionType::Call), Just(OptionType::Put)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn black_scholes_put_call_parity(
        spot in 20.0..500.0f64,
        moneyness in 0.5..2.0f64,
        time in 0.01..5.0f64,
        rate in -0.01..0.1f64,
        dividend in 0.0..0.05f64,
        vol in 0.01..3.0f64,
    ) {
        let call = contract(spot, moneyness, time, rate, dividend, OptionType::Call);
        let put = call.with_type(OptionType::Put);
        let c = black_scholes::price(&call, vol).unwrap();
        let p = black_scholes::price(&put, vol).unwrap();
        let rhs = spot * call.dividend_discount() - call.strike * call.discount();
        prop_assert!((c - p - rhs).abs() < 1e-8 * spot.max(1.0), "residual {}", c - p - rhs);
    }

    #[test]
    fn black_scholes_implied_vol_round_trip(
        moneyness in 0.8..1.25f64,
        time in 0.5..2.0f64,
        rate in 0.0..0.08f64,
        dividend in 0.0..0.04f64,
        vol in 0.1..2.9f64,
        side in option_type(),
    ) {
        let c = contract(100.0, moneyness, time, rate, dividend, side);
        let market = black_scholes::price(&c, vol).unwrap();
        let solver = KernelConfig::default().solver;
        let iv = black_scholes::implied_volatility(&c, market, &solver).unwrap();
        prop_assert!((iv - vol).abs() < 1e-4, "vol {} recovered {}", vol, iv);
    }

    #[test]
    fn black_scholes_call_increasing_in_vol(
        moneyness in 0.8..1.25f64,
        time in 0.25..3.0f64,
        vol in 0.1..2.5f64,
        bump in 0.01..0.5f64,
    ) {
        let c = contract(100.0, moneyness, time, 0.03, 0.0, OptionType::Call);
        let low = black_scholes::price(&c, vol).unwrap();
        let high = black_scholes::price(&c, vol + bump).unwrap();
        prop_assert!(high > low);
    }

    #[test]
    fn expiry_prices_intrinsic(
        spot in 50.0..150.0f64,
        strike in 50.0..150.0f64,
        side in option_type(),
    ) {
        let c = ContractSpec::new(spot, strike, 0.0, 0.05, 0.01, side).unwrap();
        let facade = PricingFacade::default();
        let bs = ModelParams::black_scholes(0.3).unwrap();
        let heston =
            ModelParams::heston(HestonParams::typical_equity(), NumericalMethod::Fft).unwrap();
        let intrinsic = side.intrinsic(spot, strike);

        let by_bs = facade.price(ModelSelector::BlackScholes, &c, &bs, 0.0).unwrap().price;
        let by_heston = facade.price(ModelSelector::Heston, &c, &heston, 0.0).unwrap().price;
        prop_assert_eq!(by_bs, intrinsic);
        prop_assert_eq!(by_heston, intrinsic);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn heston_put_call_parity(
        moneyness in 0.8..1.25f64,
        time in 0.25..2.0f64,
        rate in 0.0..0.06f64,
        rho in -0.9..0.5f64,
        fft in any::<bool>(),
    ) {
        let method = if fft { NumericalMethod::Fft } else { NumericalMethod::Quadrature };
        let params = HestonParams { rho, ..HestonParams::typical_equity() };
        let engine = HestonEngine::new(params, method, KernelConfig::default()).unwrap();

        let call = contract(100.0, moneyness, time, rate, 0.01, OptionType::Call);
        let c = engine.price(&call).unwrap();
        let p = engine.price(&call.with_type(OptionType::Put)).unwrap();
        let rhs = 100.0 * call.dividend_discount() - call.strike * call.discount();
        prop_assert!((c - p - rhs).abs() < 1e-8, "residual {}", c - p - rhs);
    }

    #[test]
    fn heston_implied_vol_round_trip(
        moneyness in 0.85..1.15f64,
        time in 0.5..1.5f64,
        vol in 0.1..0.8f64,
    ) {
        let base = HestonParams::typical_equity();
        let method = NumericalMethod::Quadrature;
        let engine = HestonEngine::new(base, method, KernelConfig::default()).unwrap();
        let truth =
            HestonEngine::new(base.with_initial_vol(vol), method, KernelConfig::default()).unwrap();

        let c = contract(100.0, moneyness, time, 0.03, 0.0, OptionType::Call);
        let market = truth.price(&c).unwrap();
        let iv = engine.implied_volatility(&c, market).unwrap();
        prop_assert!((iv - vol).abs() < 1e-4, "vol {} recovered {}", vol, iv);
    }
}
