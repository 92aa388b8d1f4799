//! Government coupon bonds.

use std::sync::Arc;

use strata_core::{Currency, Date, Frequency, Tenor};
use strata_math::solvers::SolverConfig;

use super::{check_dates, CalibrationInstrument, InstrumentKind, QuoteMeasure};
use crate::cashflows::{price_from_curve, yield_from_price, CashFlow};
use crate::context::PricingContext;
use crate::error::{CurveError, CurveResult};

/// A bullet government bond settling on its effective date.
///
/// Prices come off the govvie curve in the context. `Price` is the clean
/// price per 100; `Yield` is the yield to maturity of the dirty price,
/// compounded at the coupon frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct TreasuryBond {
    label: String,
    currency: Currency,
    settlement: Date,
    maturity: Date,
    coupon: f64,
    frequency: Frequency,
}

impl TreasuryBond {
    /// Creates a bond settling on `settlement`.
    pub fn new(
        label: impl Into<String>,
        currency: Currency,
        settlement: Date,
        maturity: Date,
        coupon: f64,
        frequency: Frequency,
    ) -> CurveResult<Self> {
        let label = label.into();
        check_dates(&label, settlement, maturity)?;
        if !coupon.is_finite() || coupon < 0.0 {
            return Err(CurveError::invalid_input(format!("{label}: coupon {coupon} is invalid")));
        }
        Ok(Self {
            label,
            currency,
            settlement,
            maturity,
            coupon,
            frequency,
        })
    }

    /// A semi-annual bond of `tenor` from `settlement`.
    pub fn from_tenor(settlement: Date, tenor: Tenor, coupon: f64, currency: Currency) -> CurveResult<Self> {
        Self::new(
            tenor.to_string(),
            currency,
            settlement,
            tenor.add_to(settlement)?,
            coupon,
            Frequency::SemiAnnual,
        )
    }

    /// Annual coupon rate.
    #[must_use]
    pub fn coupon(&self) -> f64 {
        self.coupon
    }

    /// Coupon dates rolled back from maturity, plus the last coupon date
    /// on or before settlement as the first entry.
    fn coupon_dates(&self) -> CurveResult<Vec<Date>> {
        let step = i32::try_from(self.frequency.months_per_period())
            .map_err(|_| CurveError::invalid_input("coupon period too long"))?;
        let mut dates = vec![self.maturity];
        let mut k = 1;
        loop {
            let date = self.maturity.add_months(-step * k)?;
            dates.push(date);
            if date <= self.settlement {
                break;
            }
            k += 1;
        }
        dates.reverse();
        Ok(dates)
    }

    /// Cash flows after settlement per unit face.
    pub fn cash_flows(&self) -> CurveResult<Vec<CashFlow>> {
        let per_period = self.coupon / f64::from(self.frequency.periods_per_year());
        let dates = self.coupon_dates()?;
        Ok(dates[1..]
            .iter()
            .map(|&d| {
                let principal = if d == self.maturity { 1.0 } else { 0.0 };
                CashFlow::new(d, per_period + principal)
            })
            .collect())
    }

    /// Accrued interest per unit face at settlement, actual/actual in period.
    pub fn accrued(&self) -> CurveResult<f64> {
        let dates = self.coupon_dates()?;
        let (previous, next) = (dates[0], dates[1]);
        let per_period = self.coupon / f64::from(self.frequency.periods_per_year());
        let elapsed = previous.days_between(&self.settlement) as f64;
        let length = previous.days_between(&next) as f64;
        Ok(per_period * elapsed / length)
    }

    fn dirty_price(&self, ctx: &PricingContext<'_>) -> CurveResult<f64> {
        price_from_curve(&self.cash_flows()?, self.settlement, ctx.govvie()?, 0.0)
    }
}

impl CalibrationInstrument for TreasuryBond {
    fn effective_date(&self) -> Date {
        self.settlement
    }

    fn maturity_date(&self) -> Date {
        self.maturity
    }

    fn currency(&self) -> Currency {
        self.currency
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> InstrumentKind {
        InstrumentKind::TreasuryBond
    }

    fn measure(&self, ctx: &PricingContext<'_>, measure: QuoteMeasure) -> CurveResult<f64> {
        match measure {
            QuoteMeasure::Price => Ok(100.0 * (self.dirty_price(ctx)? - self.accrued()?)),
            QuoteMeasure::Yield => {
                let dirty = self.dirty_price(ctx)?;
                let config = SolverConfig::new(1e-14, 100);
                yield_from_price(&self.cash_flows()?, self.settlement, dirty, self.frequency, &config)
            }
            other => Err(CurveError::unsupported_measure(&self.label, other)),
        }
    }

    fn with_maturity(&self, maturity: Date) -> CurveResult<Arc<dyn CalibrationInstrument>> {
        Ok(Arc::new(Self::new(
            maturity.to_string(),
            self.currency,
            self.settlement,
            maturity,
            self.coupon,
            self.frequency,
        )?))
    }
}
