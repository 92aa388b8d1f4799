//! Money market deposits.

use std::sync::Arc;

use strata_core::daycounts::DayCount;
use strata_core::{BusinessDayConvention, Currency, Date, Tenor};

use super::{check_dates, simple_forward, CalibrationInstrument, InstrumentKind, QuoteMeasure};
use crate::context::PricingContext;
use crate::error::{CurveError, CurveResult};

/// A simple-interest deposit from `start` to `end`.
///
/// The quoted rate satisfies `DF(end) = DF(start) / (1 + rate × τ)`, with
/// τ on the deposit day count (ACT/360 unless set otherwise).
#[derive(Debug, Clone, PartialEq)]
pub struct Deposit {
    label: String,
    currency: Currency,
    start: Date,
    end: Date,
    day_count: DayCount,
}

impl Deposit {
    /// Creates a deposit.
    pub fn new(label: impl Into<String>, currency: Currency, start: Date, end: Date) -> CurveResult<Self> {
        let label = label.into();
        check_dates(&label, start, end)?;
        Ok(Self {
            label,
            currency,
            start,
            end,
            day_count: DayCount::Act360,
        })
    }

    /// A deposit of `tenor` from `spot`, maturity rolled modified-following.
    pub fn from_tenor(spot: Date, tenor: Tenor, currency: Currency) -> CurveResult<Self> {
        let end = tenor.add_adjusted(spot, BusinessDayConvention::ModifiedFollowing)?;
        Self::new(tenor.to_string(), currency, spot, end)
    }

    /// Sets the accrual day count.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCount) -> Self {
        self.day_count = day_count;
        self
    }

    /// Accrual fraction of the deposit.
    #[must_use]
    pub fn accrual(&self) -> f64 {
        self.day_count.year_fraction(self.start, self.end)
    }
}

impl CalibrationInstrument for Deposit {
    fn effective_date(&self) -> Date {
        self.start
    }

    fn maturity_date(&self) -> Date {
        self.end
    }

    fn currency(&self) -> Currency {
        self.currency
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> InstrumentKind {
        InstrumentKind::Deposit
    }

    fn measure(&self, ctx: &PricingContext<'_>, measure: QuoteMeasure) -> CurveResult<f64> {
        match measure {
            QuoteMeasure::Rate | QuoteMeasure::ForwardRate => {
                simple_forward(ctx.funding()?, self.start, self.end, self.accrual())
            }
            other => Err(CurveError::unsupported_measure(&self.label, other)),
        }
    }

    fn with_maturity(&self, maturity: Date) -> CurveResult<Arc<dyn CalibrationInstrument>> {
        let sibling = Self::new(maturity.to_string(), self.currency, self.start, maturity)?
            .with_day_count(self.day_count);
        Ok(Arc::new(sibling))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::DiscretelyCompoundedFlatRate;
    use approx::assert_relative_eq;
    use strata_core::Frequency;

    #[test]
    fn test_rate_off_flat_curve() {
        let spot = Date::from_ymd(2025, 1, 6).unwrap();
        let deposit = Deposit::from_tenor(spot, "6M".parse().unwrap(), Currency::USD).unwrap();
        assert_eq!(deposit.label(), "6M");
        assert_eq!(deposit.maturity_date(), Date::from_ymd(2025, 7, 7).unwrap());

        let curve = DiscretelyCompoundedFlatRate::new(spot, Currency::USD, 0.04, Frequency::Annual).unwrap();
        let ctx = PricingContext::new(spot).with_funding(&curve);
        let rate = deposit.measure(&ctx, QuoteMeasure::Rate).unwrap();
        let days = spot.days_between(&deposit.maturity_date()) as f64;
        let expected = (1.04f64.powf(days / 365.0) - 1.0) * 360.0 / days;
        assert_relative_eq!(rate, expected, epsilon = 1e-14);
        assert!(deposit.measure(&ctx, QuoteMeasure::Price).is_err());
    }

    #[test]
    fn test_missing_funding_curve() {
        let spot = Date::from_ymd(2025, 1, 6).unwrap();
        let deposit = Deposit::from_tenor(spot, Tenor::THREE_MONTHS, Currency::USD).unwrap();
        let err = deposit.measure(&PricingContext::new(spot), QuoteMeasure::Rate).unwrap_err();
        assert!(matches!(err, CurveError::MissingCurve { curve: "funding" }));
    }

    #[test]
    fn test_sibling_keeps_start() {
        let spot = Date::from_ymd(2025, 1, 6).unwrap();
        let deposit = Deposit::from_tenor(spot, Tenor::THREE_MONTHS, Currency::GBP).unwrap();
        let sibling = deposit.with_maturity(Date::from_ymd(2025, 2, 6).unwrap()).unwrap();
        assert_eq!(sibling.effective_date(), spot);
        assert_eq!(sibling.label(), "2025-02-06");
        assert_eq!(sibling.currency(), Currency::GBP);
        assert!(deposit.with_maturity(spot).is_err());
    }
}
