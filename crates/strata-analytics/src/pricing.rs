//! Bond cash flows, yield measures and curve-based prices.
//!
//! Everything here works per unit of original face. Times are ACT/365F
//! years from settlement, matching the curve crate.
//!
//! ## Formulas
//!
//! ```text
//! D_mac  = Σ t·CF·DF(y, t) / P
//! D_mod  = D_mac / (1 + y/f)
//! C      = (P₋ + P₊ - 2×P₀) / (P₀ × Δy²)
//! D_eff  = (P₋ - P₊) / (2 × P₀ × Δy)
//! ```

use strata_core::{Compounding, Date, Frequency};
use strata_curves::cashflows::{price_from_yield, CashFlow};
use strata_curves::context::PricingContext;
use strata_curves::{CreditCurve, Curve};
use strata_math::solvers::{find_root, SolverConfig};

use crate::bond::{Bond, CouponPeriod, CouponSpec};
use crate::error::{AnalyticsError, AnalyticsResult};

/// A bond payment split into its parts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondFlow {
    /// Payment date.
    pub date: Date,
    /// Coupon paid.
    pub coupon: f64,
    /// Principal paid, including any redemption premium.
    pub principal: f64,
    /// Face outstanding over the period ending here.
    pub outstanding: f64,
}

impl BondFlow {
    /// Total amount paid.
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.coupon + self.principal
    }
}

/// Plain dated amounts for the yield and curve helpers.
#[must_use]
pub fn cash_flows(flows: &[BondFlow]) -> Vec<CashFlow> {
    flows.iter().map(|f| CashFlow::new(f.date, f.amount())).collect()
}

fn years(from: Date, to: Date) -> f64 {
    from.days_between(&to) as f64 / 365.0
}

/// Fraction of a regular coupon earned over `period`; below one for a short stub.
fn regular_fraction(bond: &Bond, period: &CouponPeriod) -> AnalyticsResult<f64> {
    let months = i32::try_from(bond.frequency().months_per_period())
        .map_err(|_| AnalyticsError::invalid_input("coupon period too long"))?;
    let regular_start = period.end.add_months(-months)?;
    let regular = regular_start.days_between(&period.end) as f64;
    Ok((period.days() as f64 / regular).min(1.0))
}

/// Annual coupon rate for `period`.
///
/// Floating coupons fixed on or before the valuation date need a fixing in
/// the context. Later ones are projected off the forward source, or off
/// the funding curve's simple forward when there is none.
pub fn coupon_rate(bond: &Bond, period: &CouponPeriod, ctx: &PricingContext<'_>) -> AnalyticsResult<f64> {
    match bond.coupon() {
        CouponSpec::Fixed { rate } => Ok(*rate),
        CouponSpec::Floating { index, spread } => {
            let index_rate = if period.start <= ctx.valuation_date() {
                ctx.fixing(period.start, index)
                    .ok_or_else(|| AnalyticsError::MissingFixing {
                        index: index.clone(),
                        date: period.start,
                    })?
            } else if let Some(forward) = ctx.forward() {
                forward.forward_rate_on(period.start)?
            } else {
                let funding = ctx.funding()?;
                funding.forward_rate(funding.year_fraction(period.start), funding.year_fraction(period.end))?
            };
            Ok(index_rate + spread)
        }
    }
}

fn period_coupon(bond: &Bond, period: &CouponPeriod, ctx: &PricingContext<'_>) -> AnalyticsResult<f64> {
    let per_period = coupon_rate(bond, period, ctx)? / f64::from(bond.frequency().periods_per_year());
    Ok(per_period * regular_fraction(bond, period)? * bond.principal_factor(period.start))
}

/// Accrued interest per unit face at `settlement`.
pub fn accrued(bond: &Bond, settlement: Date, ctx: &PricingContext<'_>) -> AnalyticsResult<f64> {
    let Some(period) = bond.period_containing(settlement)? else {
        return Ok(0.0);
    };
    let elapsed = period.start.days_between(&settlement) as f64;
    Ok(period_coupon(bond, &period, ctx)? * elapsed / period.days() as f64)
}

/// Payments after `settlement` up to a workout on `workout_date`.
///
/// The bond is redeemed on the workout date at `redemption` (a fraction of
/// par) of the face then outstanding. A workout inside a period pays the
/// coupon accrued to that date.
pub fn flows_to_workout(
    bond: &Bond,
    settlement: Date,
    workout_date: Date,
    redemption: f64,
    ctx: &PricingContext<'_>,
) -> AnalyticsResult<Vec<BondFlow>> {
    if workout_date <= settlement || workout_date > bond.maturity() {
        return Err(AnalyticsError::invalid_input(format!(
            "{}: workout {workout_date} must fall after settlement {settlement} and by maturity {}",
            bond.label(),
            bond.maturity()
        )));
    }
    let mut flows = Vec::new();
    for period in bond.periods()? {
        if period.end <= settlement {
            continue;
        }
        if period.start >= workout_date {
            break;
        }
        let outstanding = bond.principal_factor(period.start);
        let end = period.end.min(workout_date);
        let mut coupon = period_coupon(bond, &period, ctx)?;
        if end < period.end {
            coupon *= period.start.days_between(&end) as f64 / period.days() as f64;
        }
        let redeemed = end == workout_date;
        let principal = if redeemed {
            outstanding * redemption
        } else {
            outstanding - bond.principal_factor(end)
        };
        flows.push(BondFlow {
            date: end,
            coupon,
            principal,
            outstanding,
        });
        if redeemed {
            break;
        }
    }
    Ok(flows)
}

/// Macaulay duration at yield `y`.
pub fn macaulay_duration(flows: &[CashFlow], settlement: Date, y: f64, frequency: Frequency) -> AnalyticsResult<f64> {
    let compounding = Compounding::from(frequency);
    let (mut price, mut weighted) = (0.0, 0.0);
    for cf in flows.iter().filter(|cf| cf.date > settlement) {
        let t = years(settlement, cf.date);
        let pv = cf.amount * compounding.discount_factor(y, t);
        price += pv;
        weighted += t * pv;
    }
    if price.abs() < 1e-12 {
        return Err(AnalyticsError::invalid_input("price is zero"));
    }
    Ok(weighted / price)
}

/// Modified duration at yield `y`.
pub fn modified_duration(flows: &[CashFlow], settlement: Date, y: f64, frequency: Frequency) -> AnalyticsResult<f64> {
    let mac = macaulay_duration(flows, settlement, y, frequency)?;
    Ok(mac / (1.0 + y / f64::from(frequency.periods_per_year())))
}

/// Effective duration for a parallel yield bump of `bump`.
pub fn effective_duration(
    flows: &[CashFlow],
    settlement: Date,
    y: f64,
    frequency: Frequency,
    bump: f64,
) -> AnalyticsResult<f64> {
    if bump.abs() < 1e-12 {
        return Err(AnalyticsError::invalid_input("bump size too small"));
    }
    let base = price_from_yield(flows, settlement, y, frequency);
    if base.abs() < 1e-12 {
        return Err(AnalyticsError::invalid_input("price is zero"));
    }
    let up = price_from_yield(flows, settlement, y + bump, frequency);
    let down = price_from_yield(flows, settlement, y - bump, frequency);
    Ok((down - up) / (2.0 * base * bump))
}

/// Effective convexity for a parallel yield bump of `bump`.
pub fn convexity(flows: &[CashFlow], settlement: Date, y: f64, frequency: Frequency, bump: f64) -> AnalyticsResult<f64> {
    if bump.abs() < 1e-12 {
        return Err(AnalyticsError::invalid_input("bump size too small"));
    }
    let base = price_from_yield(flows, settlement, y, frequency);
    if base.abs() < 1e-12 {
        return Err(AnalyticsError::invalid_input("price is zero"));
    }
    let up = price_from_yield(flows, settlement, y + bump, frequency);
    let down = price_from_yield(flows, settlement, y - bump, frequency);
    Ok((down + up - 2.0 * base) / (base * bump * bump))
}

/// Value at `settlement` of risky flows, conditional on survival to settlement.
///
/// Each flow is weighted by survival to its date. Default between two
/// payment dates recovers `credit.recovery()` of the face outstanding,
/// paid at the midpoint.
pub fn credit_risky_price<C: Curve + ?Sized>(
    flows: &[BondFlow],
    settlement: Date,
    funding: &C,
    credit: &CreditCurve,
) -> AnalyticsResult<f64> {
    let df_settle = funding.discount_factor_at(settlement)?;
    let s_settle = credit.survival_at(settlement);
    if !(df_settle > 0.0 && s_settle > 0.0) {
        return Err(AnalyticsError::invalid_input("no survival or discounting to settlement"));
    }
    let recovery = credit.recovery();
    let mut previous = settlement;
    let mut s_previous = s_settle;
    let mut pv = 0.0;
    for flow in flows.iter().filter(|f| f.date > settlement) {
        let s = credit.survival_at(flow.date);
        let mid = previous.add_days(previous.days_between(&flow.date) / 2);
        pv += flow.amount() * funding.discount_factor_at(flow.date)? * s;
        pv += recovery * flow.outstanding * funding.discount_factor_at(mid)? * (s_previous - s);
        previous = flow.date;
        s_previous = s;
    }
    Ok(pv / (df_settle * s_settle))
}

/// Hazard shift that reprices the risky flows to `dirty_price`.
pub fn credit_basis<C: Curve + ?Sized>(
    flows: &[BondFlow],
    settlement: Date,
    funding: &C,
    credit: &CreditCurve,
    dirty_price: f64,
    config: &SolverConfig,
) -> AnalyticsResult<f64> {
    let objective = |basis: f64| {
        credit_risky_price(flows, settlement, funding, &credit.shifted(basis)).map_or(f64::NAN, |p| p - dirty_price)
    };
    Ok(find_root(objective, 0.0, config)?.root)
}

/// Principal-weighted average time to repayment, in years.
pub fn weighted_average_life(flows: &[BondFlow], settlement: Date) -> AnalyticsResult<f64> {
    let (mut principal, mut weighted) = (0.0, 0.0);
    for flow in flows.iter().filter(|f| f.date > settlement) {
        principal += flow.principal;
        weighted += flow.principal * years(settlement, flow.date);
    }
    if principal <= 0.0 {
        return Err(AnalyticsError::invalid_input("no principal repaid after settlement"));
    }
    Ok(weighted / principal)
}
