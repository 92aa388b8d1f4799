//! Integration test: bond replication over calibrated funding, govvie and
//! credit families.

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use strata_analytics::pricing::{credit_risky_price, flows_to_workout};
use strata_analytics::prelude::*;
use strata_config::CalibrationConfig;
use strata_core::{Currency, Date, Frequency, Tenor};
use strata_curves::builders::{CreditCurveBuilder, ScenarioDiscountCurveBuilder, ScenarioGovvieCurveBuilder};
use strata_curves::bumping::{CreditCalibration, FundingCalibration, GovvieCalibration};
use strata_curves::calibration::{CalibrationLeg, LatentStateKind, LatentStateStretchSpec};
use strata_curves::instruments::{
    CalibrationInstrument, CreditDefaultSwap, Deposit, QuoteMeasure, Swap, TreasuryBond,
};
use strata_curves::market::MarketState;
use strata_curves::{Curve, DiscretelyCompoundedFlatRate};

fn d(y: i32, m: u32, day: u32) -> Date {
    Date::from_ymd(y, m, day).unwrap()
}

fn valuation() -> Date {
    d(2025, 1, 15)
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

fn funding() -> FundingCalibration {
    let deposits = leg(&["3M", "6M"], &[0.0435, 0.0440], QuoteMeasure::Rate, |t| {
        Arc::new(Deposit::from_tenor(spot(), t, Currency::USD).unwrap())
    });
    let swaps = leg(
        &["1Y", "2Y", "5Y", "10Y"],
        &[0.0420, 0.0405, 0.0395, 0.0410],
        QuoteMeasure::SwapRate,
        |t| Arc::new(Swap::from_tenor(spot(), t, Currency::USD).unwrap()),
    );
    let spec = LatentStateStretchSpec::new("USD", LatentStateKind::DiscountFactor, vec![deposits, swaps]).unwrap();
    let builder = ScenarioDiscountCurveBuilder::new(valuation()).with_config(CalibrationConfig::high_precision());
    FundingCalibration::new(builder, spec).unwrap()
}

fn govvie() -> GovvieCalibration {
    let bonds = [(2, 0.040, 0.0410), (5, 0.0375, 0.0400), (10, 0.0425, 0.0420)];
    let instruments = bonds
        .iter()
        .map(|&(y, c, _)| {
            Arc::new(TreasuryBond::from_tenor(spot(), Tenor::years(y).unwrap(), c, Currency::USD).unwrap())
                as Arc<dyn CalibrationInstrument>
        })
        .collect();
    let leg = CalibrationLeg::uniform(instruments, bonds.iter().map(|b| b.2).collect(), QuoteMeasure::Yield).unwrap();
    let spec = LatentStateStretchSpec::new("UST", LatentStateKind::GovvieYield, vec![leg]).unwrap();
    GovvieCalibration::new(ScenarioGovvieCurveBuilder::new(valuation(), Frequency::SemiAnnual), spec, None).unwrap()
}

fn credit() -> CreditCalibration {
    let discount: Arc<dyn Curve> =
        Arc::new(DiscretelyCompoundedFlatRate::new(valuation(), Currency::USD, 0.04, Frequency::Annual).unwrap());
    let cds = leg(&["1Y", "3Y", "5Y"], &[0.006, 0.009, 0.011], QuoteMeasure::ParSpread, |t| {
        Arc::new(CreditDefaultSwap::from_tenor(spot(), t, Currency::USD).unwrap())
    });
    let spec = LatentStateStretchSpec::new("ACME", LatentStateKind::HazardRate, vec![cds]).unwrap();
    CreditCalibration::new(CreditCurveBuilder::new(valuation(), discount, 0.4).unwrap(), spec).unwrap()
}

/// Semi-annual 5% bullet paying on the 10Y swap's fixed schedule.
fn premium_bullet() -> Bond {
    Bond::builder("ACME 5 35", spot(), spot().add_years(10).unwrap())
        .fixed(0.05)
        .frequency(Frequency::SemiAnnual)
        .build()
        .unwrap()
}

#[test]
fn test_mandatory_fields_lead_the_report() {
    let replicator = BondReplicator::builder(premium_bullet(), spot(), 104.0, funding())
        .build()
        .unwrap();
    let run = replicator.generate_run().unwrap();
    let names: Vec<&str> = run.fields().names().collect();
    assert_eq!(
        &names[..6],
        &[
            fields::WORKOUT_DATE,
            fields::WORKOUT_FACTOR,
            fields::ACCRUED,
            fields::CLEAN_PRICE,
            fields::DIRTY_PRICE,
            fields::YIELD_TO_WORKOUT
        ]
    );
    let report = run.fields();
    assert_eq!(report.date(fields::WORKOUT_DATE), Some(premium_bullet().maturity()));
    assert_eq!(report.scalar(fields::WORKOUT_FACTOR), Some(1.0));
    assert_abs_diff_eq!(report.scalar(fields::ACCRUED).unwrap(), 0.0);
    assert_abs_diff_eq!(report.scalar(fields::DIRTY_PRICE).unwrap(), 104.0, epsilon = 1e-12);
    let y = report.scalar(fields::YIELD_TO_WORKOUT).unwrap();
    assert!(y > 0.04 && y < 0.05, "yield {y}");
    assert_eq!(report.scalar(fields::YIELD_TO_MATURITY), Some(y));
}

#[test]
fn test_premium_bullet_key_rate_durations() {
    let replicator = BondReplicator::builder(premium_bullet(), spot(), 104.0, funding())
        .build()
        .unwrap();
    let run = replicator.generate_run().unwrap();
    let report = run.fields();

    let krd = report.tenor_map(fields::FUNDING_KRD).unwrap();
    let labels: Vec<&str> = krd.iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(labels, vec!["3M", "6M", "1Y", "2Y", "5Y", "10Y"]);
    for (label, value) in krd {
        assert!(*value >= -1e-10, "{label}: {value}");
    }
    // a 3M bump rescales every discount factor past spot, which settlement discounting cancels
    let three_month = krd.iter().find(|(l, _)| l == "3M").unwrap().1;
    assert_abs_diff_eq!(three_month, 0.0, epsilon = 1e-8);
    for label in ["6M", "1Y", "2Y", "5Y"] {
        let value = krd.iter().find(|(l, _)| l == label).unwrap().1;
        assert!(value > 1e-6, "{label}: {value}");
    }
    let ten_year = krd.iter().find(|(l, _)| l == "10Y").unwrap().1;
    assert!(krd.iter().all(|(_, v)| *v <= ten_year));

    let effective = report.scalar(fields::EFFECTIVE_DURATION).unwrap();
    assert!(effective > 6.0 && effective < 9.0, "effective duration {effective}");
    let mult = report.scalar(fields::OAD_MULT).unwrap();
    assert!(mult > 0.8 && mult < 1.25, "OAD MULT {mult}");
    let parallel = report.scalar(fields::FUNDING_PARALLEL_DURATION).unwrap();
    assert!(parallel > 0.0);

    // per 100 per bp, roughly duration × price × 1e-4
    let kprd = report.tenor_map(fields::FUNDING_KPRD).unwrap();
    let ten_year_kprd = kprd.iter().find(|(l, _)| l == "10Y").unwrap().1;
    assert_abs_diff_eq!(ten_year_kprd, ten_year * 104.0 * 1e-4, epsilon = 5e-3);
}

#[test]
fn test_runs_are_deterministic() {
    let replicator = BondReplicator::builder(premium_bullet(), spot(), 104.0, funding())
        .govvie(govvie())
        .credit(credit())
        .build()
        .unwrap();
    assert_eq!(replicator.generate_run().unwrap(), replicator.generate_run().unwrap());
}

#[test]
fn test_govvie_and_credit_fields() {
    let replicator = BondReplicator::builder(premium_bullet(), spot(), 104.0, funding())
        .govvie(govvie())
        .credit(credit())
        .build()
        .unwrap();
    let run = replicator.generate_run().unwrap();
    let report = run.fields();

    assert!(report.scalar(fields::G_SPREAD).is_some());
    let govvie_krd = report.tenor_map(fields::GOVVIE_KRD).unwrap();
    assert_eq!(govvie_krd.len(), 3);

    let credit_krd = report.tenor_map(fields::CREDIT_KRD).unwrap();
    let labels: Vec<&str> = credit_krd.iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(labels, vec!["1Y", "3Y", "5Y"]);
    // the last hazard runs flat to maturity, so the 5Y spread carries most of the risk
    let five_year = credit_krd.iter().find(|(l, _)| l == "5Y").unwrap().1;
    assert!(credit_krd.iter().all(|(_, v)| *v <= five_year));
    let spread_duration: f64 = credit_krd.iter().map(|(_, v)| v).sum();
    assert!(spread_duration > 4.0 && spread_duration < 10.0, "{spread_duration}");

    // wider spreads everywhere lower the risky price
    let bond = premium_bullet();
    let risky = |state: &MarketState| {
        let ctx = state.context();
        let flows = flows_to_workout(&bond, spot(), bond.maturity(), 1.0, &ctx).unwrap();
        credit_risky_price(&flows, spot(), ctx.funding().unwrap(), ctx.credit().unwrap()).unwrap()
    };
    let (up, down) = replicator.credit_states().unwrap().parallel().unwrap();
    assert!(risky(up) < risky(down));
    assert!(report.scalar(fields::CREDIT_BASIS).unwrap().is_finite());
    assert!(report.scalar(fields::CREDIT_ADJUSTED_EFFECTIVE_DURATION).unwrap() > 0.0);
}

#[test]
fn test_missing_credit_degrades_gracefully() {
    let replicator = BondReplicator::builder(premium_bullet(), spot(), 104.0, funding())
        .build()
        .unwrap();
    assert!(replicator.credit_states().is_none());
    let run = replicator.generate_run().unwrap();
    assert!(run.fields().get(fields::CREDIT_KRD).is_none());
    assert!(run.fields().get(fields::CREDIT_BASIS).is_none());
    assert!(run.fields().get(fields::G_SPREAD).is_none());
    assert!(run.fields().scalar(fields::Z_SPREAD).is_some());
    // implied from the price on a flat hazard, so no credit family is needed
    assert!(run.fields().scalar(fields::CREDIT_ADJUSTED_EFFECTIVE_DURATION).unwrap() > 0.0);
}

#[test]
fn test_callable_works_out_to_call() {
    let call_date = spot().add_years(5).unwrap();
    let bond = Bond::builder("ACME 6 35 C30", spot(), spot().add_years(10).unwrap())
        .fixed(0.06)
        .frequency(Frequency::Annual)
        .call(call_date, 100.0)
        .build()
        .unwrap();
    let replicator = BondReplicator::builder(bond, spot(), 106.0, funding()).build().unwrap();
    let run = replicator.generate_run().unwrap();
    let report = run.fields();
    assert_eq!(report.date(fields::WORKOUT_DATE), Some(call_date));
    let ytw = report.scalar(fields::YIELD_TO_WORKOUT).unwrap();
    let ytm = report.scalar(fields::YIELD_TO_MATURITY).unwrap();
    assert!(ytw < ytm);
    // nothing past the call date matters
    let krd = report.tenor_map(fields::FUNDING_KRD).unwrap();
    let ten_year = krd.iter().find(|(l, _)| l == "10Y").unwrap().1;
    assert_abs_diff_eq!(ten_year, 0.0, epsilon = 1e-6);
}

#[test]
fn test_floater_needs_its_current_fixing() {
    let bond = Bond::builder("ACME FRN 29", d(2024, 10, 15), d(2029, 10, 15))
        .floating("SOFR3M", 0.01)
        .frequency(Frequency::Quarterly)
        .build()
        .unwrap();
    let settlement = d(2025, 2, 14);

    let unfixed = BondReplicator::builder(bond.clone(), settlement, 100.5, funding())
        .build()
        .unwrap();
    assert!(matches!(
        unfixed.generate_run(),
        Err(AnalyticsError::MandatoryField { .. })
    ));

    let fixed = BondReplicator::builder(bond, settlement, 100.5, funding())
        .fixing(d(2025, 1, 15), "SOFR3M", 0.043)
        .build()
        .unwrap();
    let run = fixed.generate_run().unwrap();
    // 30 of 90 days at 5.3%
    assert_abs_diff_eq!(run.fields().scalar(fields::ACCRUED).unwrap(), 100.0 * 0.053 / 4.0 * 30.0 / 90.0, epsilon = 1e-10);
    assert!(run.fields().tenor_map(fields::FUNDING_KRD).is_some());
}

#[test]
fn test_rejects_bad_inputs() {
    assert!(BondReplicator::builder(premium_bullet(), spot(), -1.0, funding()).build().is_err());
    let late = premium_bullet().maturity();
    assert!(BondReplicator::builder(premium_bullet(), late, 100.0, funding()).build().is_err());
}
