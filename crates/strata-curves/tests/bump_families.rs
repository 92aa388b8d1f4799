//! Integration test: bumped funding, govvie and credit families.

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use strata_config::BumpConfig;
use strata_core::{Currency, Date, Frequency, Tenor};
use strata_curves::builders::{CreditCurveBuilder, ScenarioDiscountCurveBuilder, ScenarioGovvieCurveBuilder};
use strata_curves::bumping::{
    CreditCalibration, ForwardFundingCalibration, FundingCalibration, GovvieCalibration, QuoteCalibrator,
    ScenarioGenerator,
};
use strata_curves::calibration::{CalibrationLeg, LatentStateKind, LatentStateStretchSpec};
use strata_curves::instruments::{
    CalibrationInstrument, CreditDefaultSwap, Deposit, QuoteMeasure, Swap, TreasuryBond,
};
use strata_curves::market::{BumpedMarketStates, MarketStateBuilder};
use strata_curves::{Curve, DiscretelyCompoundedFlatRate, GovvieYieldSource};

fn valuation() -> Date {
    Date::from_ymd(2025, 1, 15).unwrap()
}

fn spot() -> Date {
    valuation().add_business_days(2)
}

fn leg<F>(tenors: &[&str], quotes: &[f64], measure: QuoteMeasure, make: F) -> CalibrationLeg
where
    F: Fn(Tenor) -> Arc<dyn CalibrationInstrument>,
{
    let instruments = tenors.iter().map(|t| make(t.parse().unwrap())).collect();
    CalibrationLeg::uniform(instruments, quotes.to_vec(), measure).unwrap()
}

fn funding_spec() -> LatentStateStretchSpec {
    let deposits = leg(&["3M", "6M"], &[0.0435, 0.0440], QuoteMeasure::Rate, |t| {
        Arc::new(Deposit::from_tenor(spot(), t, Currency::USD).unwrap())
    });
    let swaps = leg(
        &["1Y", "2Y", "5Y", "10Y"],
        &[0.0420, 0.0405, 0.0395, 0.0410],
        QuoteMeasure::SwapRate,
        |t| Arc::new(Swap::from_tenor(spot(), t, Currency::USD).unwrap()),
    );
    LatentStateStretchSpec::new("USD", LatentStateKind::DiscountFactor, vec![deposits, swaps]).unwrap()
}

#[test]
fn test_funding_family_shape_and_locality() {
    let calibration = FundingCalibration::new(ScenarioDiscountCurveBuilder::new(valuation()), funding_spec()).unwrap();
    let family = ScenarioGenerator::new(BumpConfig::standard()).generate(&calibration).unwrap();

    assert_eq!(family.up().labels(), vec!["3M", "6M", "1Y", "2Y", "5Y", "10Y", "bump"]);
    assert_eq!(family.tenor_labels().len(), 6);

    let knots = family.base().knots().to_vec();
    // bumping the 5Y swap leaves everything up to the 2Y knot untouched
    let up_5y = family.up().get("5Y").unwrap();
    for i in 1..100 {
        let t = knots[4] * f64::from(i) / 100.0;
        assert_eq!(up_5y.discount_factor(t).unwrap(), family.base().discount_factor(t).unwrap());
    }
    // and moves the 5Y discount factor down by roughly duration × 1bp
    let base_5y = family.base().discount_factor(knots[5]).unwrap();
    let shift = base_5y - up_5y.discount_factor(knots[5]).unwrap();
    assert!(shift > 0.0 && shift < 10.0 * 1e-4, "shift {shift}");

    // up and down moves are symmetric to first order
    let down_5y = family.down().get("5Y").unwrap();
    let up_move = up_5y.discount_factor(knots[5]).unwrap() - base_5y;
    let down_move = down_5y.discount_factor(knots[5]).unwrap() - base_5y;
    assert_abs_diff_eq!(up_move, -down_move, epsilon = 1e-6);

    // a short bump stays short: later knots only absorb the annuity change
    let up_6m = family.up().get("6M").unwrap();
    let move_at = |t: f64| up_6m.discount_factor(t).unwrap() - family.base().discount_factor(t).unwrap();
    let at_6m = move_at(knots[2]);
    assert!(at_6m < 0.0);
    assert_eq!(move_at(knots[1]), 0.0);
    for &t in &knots[3..] {
        assert!(move_at(t).abs() < 0.05 * at_6m.abs(), "{t}: {}", move_at(t));
    }
}

#[test]
fn test_parallel_and_sequential_generation_agree() {
    let calibration = FundingCalibration::new(ScenarioDiscountCurveBuilder::new(valuation()), funding_spec()).unwrap();
    let parallel = ScenarioGenerator::new(BumpConfig::standard()).generate(&calibration).unwrap();
    let sequential = ScenarioGenerator::new(BumpConfig {
        parallel_execution: false,
        ..BumpConfig::standard()
    })
    .generate(&calibration)
    .unwrap();
    for ((la, a), (lb, b)) in parallel.up().iter().zip(sequential.up().iter()) {
        assert_eq!(la, lb);
        for t in [0.3, 1.7, 4.2, 9.9] {
            assert_eq!(a.discount_factor(t).unwrap(), b.discount_factor(t).unwrap());
        }
    }
}

#[test]
fn test_forward_funding_family() {
    let calibration =
        ForwardFundingCalibration::new(ScenarioDiscountCurveBuilder::new(valuation()), funding_spec()).unwrap();
    let family = ScenarioGenerator::new(BumpConfig::standard()).generate(&calibration).unwrap();
    let parallel_up = family.up().parallel().unwrap();
    for t in [1.0, 5.0, 9.0] {
        assert!(parallel_up.discount_factor(t).unwrap() < family.base().discount_factor(t).unwrap());
    }
}

#[test]
fn test_govvie_and_credit_families() {
    let bonds = [(2, 0.040, 0.0410), (5, 0.0375, 0.0400), (10, 0.0425, 0.0420)];
    let govvie_leg = CalibrationLeg::uniform(
        bonds
            .iter()
            .map(|&(y, c, _)| {
                Arc::new(TreasuryBond::from_tenor(spot(), Tenor::years(y).unwrap(), c, Currency::USD).unwrap())
                    as Arc<dyn CalibrationInstrument>
            })
            .collect(),
        bonds.iter().map(|b| b.2).collect(),
        QuoteMeasure::Yield,
    )
    .unwrap();
    let govvie_spec = LatentStateStretchSpec::new("UST", LatentStateKind::GovvieYield, vec![govvie_leg]).unwrap();
    let govvie = GovvieCalibration::new(
        ScenarioGovvieCurveBuilder::new(valuation(), Frequency::SemiAnnual),
        govvie_spec,
        Some(0.041),
    )
    .unwrap();
    let generator = ScenarioGenerator::new(BumpConfig::standard());
    let govvie_family = generator.generate(&govvie).unwrap();
    assert_eq!(govvie_family.tenor_labels(), vec!["2Y", "5Y", "10Y"]);

    let funding: Arc<dyn Curve> =
        Arc::new(DiscretelyCompoundedFlatRate::new(valuation(), Currency::USD, 0.04, Frequency::Annual).unwrap());
    let cds = leg(&["1Y", "3Y", "5Y"], &[0.006, 0.009, 0.011], QuoteMeasure::ParSpread, |t| {
        Arc::new(CreditDefaultSwap::from_tenor(spot(), t, Currency::USD).unwrap())
    });
    let credit_spec = LatentStateStretchSpec::new("ACME", LatentStateKind::HazardRate, vec![cds]).unwrap();
    let credit = CreditCalibration::new(
        CreditCurveBuilder::new(valuation(), Arc::clone(&funding), 0.4).unwrap(),
        credit_spec,
    )
    .unwrap();
    assert_eq!(credit.base_quotes(), vec![0.006, 0.009, 0.011]);
    let credit_family = generator.generate(&credit).unwrap();

    let base = MarketStateBuilder::new(valuation())
        .funding(funding)
        .govvie(Arc::clone(govvie_family.base()) as Arc<dyn GovvieYieldSource>)
        .credit(Arc::clone(credit_family.base()))
        .build();
    let states = BumpedMarketStates::credit(&base, &credit_family);
    let pillars = credit_family.base().times().to_vec();
    assert_eq!(pillars.len(), 3);
    for (i, (label, down, up)) in states.tenors().enumerate() {
        // a wider spread lowers survival to its own pillar and leaves earlier pieces alone
        let t = pillars[i];
        let s_up = up.credit().unwrap().survival_probability(t);
        let s_down = down.credit().unwrap().survival_probability(t);
        assert!(s_up < s_down, "{label}: {s_up} vs {s_down}");
        if i > 0 {
            let earlier = pillars[i - 1];
            assert_eq!(
                up.credit().unwrap().survival_probability(earlier),
                credit_family.base().survival_probability(earlier),
                "{label}"
            );
        }
        // the other curves are carried over
        assert!(up.context().govvie().is_ok());
    }
    let (up, down) = states.parallel().unwrap();
    for t in [0.5, 2.0, 4.0, 8.0] {
        assert!(up.credit().unwrap().survival_probability(t) < down.credit().unwrap().survival_probability(t));
    }
}
