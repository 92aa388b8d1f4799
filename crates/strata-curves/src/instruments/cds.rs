//! Credit default swaps.

use std::sync::Arc;

use strata_core::daycounts::DayCount;
use strata_core::schedule::backward_schedule;
use strata_core::{Currency, Date, Frequency, Tenor};

use super::{check_dates, CalibrationInstrument, InstrumentKind, QuoteMeasure};
use crate::context::PricingContext;
use crate::error::{CurveError, CurveResult};

/// A CDS quoted by its par spread.
///
/// Premium accrues on ACT/360 over quarterly periods rolled back from
/// maturity, with half-period accrual on default. Protection pays
/// `1 - recovery` discounted from each period midpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditDefaultSwap {
    label: String,
    currency: Currency,
    effective: Date,
    maturity: Date,
    premium_frequency: Frequency,
}

impl CreditDefaultSwap {
    /// Creates a CDS with quarterly premiums.
    pub fn new(label: impl Into<String>, currency: Currency, effective: Date, maturity: Date) -> CurveResult<Self> {
        let label = label.into();
        check_dates(&label, effective, maturity)?;
        Ok(Self {
            label,
            currency,
            effective,
            maturity,
            premium_frequency: Frequency::Quarterly,
        })
    }

    /// A CDS of `tenor` from `effective`.
    pub fn from_tenor(effective: Date, tenor: Tenor, currency: Currency) -> CurveResult<Self> {
        Self::new(tenor.to_string(), currency, effective, tenor.add_to(effective)?)
    }

    /// Risky annuity and protection leg value per unit notional.
    pub fn legs(&self, ctx: &PricingContext<'_>) -> CurveResult<(f64, f64)> {
        let funding = ctx.funding()?;
        let credit = ctx.credit()?;
        let loss = 1.0 - credit.recovery();
        let dates = backward_schedule(self.effective, self.maturity, self.premium_frequency.months_per_period())?;

        let (mut annuity, mut protection) = (0.0, 0.0);
        for period in dates.windows(2) {
            let (start, end) = (period[0], period[1]);
            let tau = DayCount::Act360.year_fraction(start, end);
            let s_start = credit.survival_at(start);
            let s_end = credit.survival_at(end);
            let df_end = funding.discount_factor_at(end)?;
            let mid = start.add_days(start.days_between(&end) / 2);
            let df_mid = funding.discount_factor_at(mid)?;
            annuity += tau * df_end * 0.5 * (s_start + s_end);
            protection += loss * df_mid * (s_start - s_end);
        }
        Ok((annuity, protection))
    }
}

impl CalibrationInstrument for CreditDefaultSwap {
    fn effective_date(&self) -> Date {
        self.effective
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
        InstrumentKind::CreditDefaultSwap
    }

    fn measure(&self, ctx: &PricingContext<'_>, measure: QuoteMeasure) -> CurveResult<f64> {
        match measure {
            QuoteMeasure::ParSpread => {
                let (annuity, protection) = self.legs(ctx)?;
                if annuity <= 0.0 {
                    return Err(CurveError::invalid_input(format!("{}: risky annuity is zero", self.label)));
                }
                Ok(protection / annuity)
            }
            other => Err(CurveError::unsupported_measure(&self.label, other)),
        }
    }

    fn with_maturity(&self, maturity: Date) -> CurveResult<Arc<dyn CalibrationInstrument>> {
        Ok(Arc::new(Self::new(maturity.to_string(), self.currency, self.effective, maturity)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::{CreditCurve, DiscretelyCompoundedFlatRate};
    use approx::assert_relative_eq;

    #[test]
    fn test_credit_triangle() {
        let today = Date::from_ymd(2025, 3, 20).unwrap();
        let cds = CreditDefaultSwap::from_tenor(today, Tenor::years(5).unwrap(), Currency::USD).unwrap();
        let funding = DiscretelyCompoundedFlatRate::new(today, Currency::USD, 0.03, Frequency::Annual).unwrap();
        let credit = CreditCurve::flat(today, 0.02, 0.4).unwrap();
        let ctx = PricingContext::new(today).with_funding(&funding).with_credit(&credit);
        let spread = cds.measure(&ctx, QuoteMeasure::ParSpread).unwrap();
        // Roughly hazard × loss, scaled by the ACT/360 premium basis.
        assert_relative_eq!(spread, 0.02 * 0.6 * 360.0 / 365.0, epsilon = 5e-4);
    }

    #[test]
    fn test_needs_credit_curve() {
        let today = Date::from_ymd(2025, 3, 20).unwrap();
        let cds = CreditDefaultSwap::from_tenor(today, Tenor::years(1).unwrap(), Currency::USD).unwrap();
        let funding = DiscretelyCompoundedFlatRate::new(today, Currency::USD, 0.03, Frequency::Annual).unwrap();
        let ctx = PricingContext::new(today).with_funding(&funding);
        assert!(matches!(
            cds.measure(&ctx, QuoteMeasure::ParSpread),
            Err(CurveError::MissingCurve { curve: "credit" })
        ));
    }
}
