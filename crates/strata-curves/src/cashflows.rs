//! Fixed cash flow streams: yield and curve discounting.

use strata_core::{Compounding, Date, Frequency};
use strata_math::solvers::{find_root, SolverConfig};

use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// A dated amount per unit notional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CashFlow {
    /// Payment date.
    pub date: Date,
    /// Amount paid.
    pub amount: f64,
}

impl CashFlow {
    /// Creates a cash flow.
    #[must_use]
    pub fn new(date: Date, amount: f64) -> Self {
        Self { date, amount }
    }
}

fn years(from: Date, to: Date) -> f64 {
    from.days_between(&to) as f64 / 365.0
}

/// Value at `settlement` of the flows paid after it, discounted at yield `y`.
///
/// Times are ACT/365F from settlement and the yield compounds at `frequency`.
#[must_use]
pub fn price_from_yield(flows: &[CashFlow], settlement: Date, y: f64, frequency: Frequency) -> f64 {
    let compounding = Compounding::from(frequency);
    flows
        .iter()
        .filter(|cf| cf.date > settlement)
        .map(|cf| cf.amount * compounding.discount_factor(y, years(settlement, cf.date)))
        .sum()
}

/// Yield that reprices the flows to `dirty_price` at `settlement`.
pub fn yield_from_price(
    flows: &[CashFlow],
    settlement: Date,
    dirty_price: f64,
    frequency: Frequency,
    config: &SolverConfig,
) -> CurveResult<f64> {
    if !(dirty_price.is_finite() && dirty_price > 0.0) {
        return Err(CurveError::invalid_input(format!("price {dirty_price} is not positive")));
    }
    if flows.iter().all(|cf| cf.date <= settlement) {
        return Err(CurveError::invalid_input("no cash flows after settlement"));
    }
    let floor = -f64::from(frequency.periods_per_year()) + 1e-6;
    let objective = |y: f64| {
        if y <= floor {
            return f64::NAN;
        }
        price_from_yield(flows, settlement, y, frequency) - dirty_price
    };
    Ok(find_root(objective, 0.05, config)?.root)
}

/// Value at `settlement` of the flows, discounted off `curve` with a
/// continuously compounded spread `spread` over curve time.
pub fn price_from_curve<C: Curve + ?Sized>(
    flows: &[CashFlow],
    settlement: Date,
    curve: &C,
    spread: f64,
) -> CurveResult<f64> {
    let t_settle = curve.year_fraction(settlement);
    let df_settle = curve.discount_factor(t_settle)? * (-spread * t_settle).exp();
    let mut pv = 0.0;
    for cf in flows.iter().filter(|cf| cf.date > settlement) {
        let t = curve.year_fraction(cf.date);
        pv += cf.amount * curve.discount_factor(t)? * (-spread * t).exp();
    }
    Ok(pv / df_settle)
}

/// Spread over `curve` that reprices the flows to `dirty_price`.
pub fn spread_from_price<C: Curve + ?Sized>(
    flows: &[CashFlow],
    settlement: Date,
    curve: &C,
    dirty_price: f64,
    config: &SolverConfig,
) -> CurveResult<f64> {
    let objective = |z: f64| {
        price_from_curve(flows, settlement, curve, z).map_or(f64::NAN, |p| p - dirty_price)
    };
    Ok(find_root(objective, 0.0, config)?.root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::DiscretelyCompoundedFlatRate;
    use approx::assert_relative_eq;
    use strata_core::Currency;

    fn bullet(settle: Date, coupon: f64, years_to_maturity: i32) -> Vec<CashFlow> {
        (1..=years_to_maturity)
            .map(|k| {
                let date = settle.add_years(k).unwrap();
                let amount = if k == years_to_maturity { 1.0 + coupon } else { coupon };
                CashFlow::new(date, amount)
            })
            .collect()
    }

    #[test]
    fn test_par_bond_yields_coupon() {
        let settle = Date::from_ymd(2025, 1, 2).unwrap();
        // 365-day years keep the ACT/365F times integral.
        let flows: Vec<CashFlow> = (1..=3)
            .map(|k| CashFlow::new(settle.add_days(365 * k), if k == 3 { 1.05 } else { 0.05 }))
            .collect();
        let price = price_from_yield(&flows, settle, 0.05, Frequency::Annual);
        assert_relative_eq!(price, 1.0, epsilon = 1e-14);
        let y = yield_from_price(&flows, settle, 1.0, Frequency::Annual, &SolverConfig::default()).unwrap();
        assert_relative_eq!(y, 0.05, epsilon = 1e-10);
    }

    #[test]
    fn test_curve_price_and_spread() {
        let settle = Date::from_ymd(2025, 1, 2).unwrap();
        let curve = DiscretelyCompoundedFlatRate::new(settle, Currency::USD, 0.04, Frequency::Annual).unwrap();
        let flows = bullet(settle, 0.05, 5);
        let base = price_from_curve(&flows, settle, &curve, 0.0).unwrap();
        assert!(base > 1.0);
        let target = base - 0.01;
        let z = spread_from_price(&flows, settle, &curve, target, &SolverConfig::default()).unwrap();
        assert!(z > 0.0);
        assert_relative_eq!(price_from_curve(&flows, settle, &curve, z).unwrap(), target, epsilon = 1e-10);
    }

    #[test]
    fn test_rejects_expired_flows() {
        let settle = Date::from_ymd(2025, 1, 2).unwrap();
        let flows = vec![CashFlow::new(settle, 1.0)];
        assert!(yield_from_price(&flows, settle, 1.0, Frequency::Annual, &SolverConfig::default()).is_err());
    }
}
