//! Three-month rate futures.

use std::sync::Arc;

use strata_core::daycounts::DayCount;
use strata_core::{Currency, Date, Tenor};

use super::{check_dates, simple_forward, CalibrationInstrument, InstrumentKind, QuoteMeasure};
use crate::calibration::LatentStateKind;
use crate::context::PricingContext;
use crate::error::{CurveError, CurveResult};

/// A rate future on the period `start` to `end`.
///
/// Quoted either as the implied rate or as `100 × (1 - rate)`. No convexity
/// adjustment is applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RateFuture {
    label: String,
    currency: Currency,
    start: Date,
    end: Date,
    day_count: DayCount,
}

impl RateFuture {
    /// Creates a future on an explicit period.
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

    /// A three-month contract starting on `start`.
    pub fn three_month(label: impl Into<String>, currency: Currency, start: Date) -> CurveResult<Self> {
        Self::new(label, currency, start, Tenor::THREE_MONTHS.add_to(start)?)
    }

    fn implied_rate(&self, ctx: &PricingContext<'_>) -> CurveResult<f64> {
        match ctx.forward() {
            Some(forward) => forward.forward_rate_on(self.start),
            None => simple_forward(
                ctx.funding()?,
                self.start,
                self.end,
                self.day_count.year_fraction(self.start, self.end),
            ),
        }
    }
}

impl CalibrationInstrument for RateFuture {
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
        InstrumentKind::Future
    }

    fn pillar_date(&self, kind: LatentStateKind) -> Date {
        match kind {
            LatentStateKind::ForwardRate => self.start,
            _ => self.end,
        }
    }

    fn measure(&self, ctx: &PricingContext<'_>, measure: QuoteMeasure) -> CurveResult<f64> {
        match measure {
            QuoteMeasure::Rate | QuoteMeasure::ForwardRate => self.implied_rate(ctx),
            QuoteMeasure::Price => Ok(100.0 * (1.0 - self.implied_rate(ctx)?)),
            other => Err(CurveError::unsupported_measure(&self.label, other)),
        }
    }

    fn with_maturity(&self, maturity: Date) -> CurveResult<Arc<dyn CalibrationInstrument>> {
        Ok(Arc::new(Self::new(maturity.to_string(), self.currency, self.start, maturity)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::DiscretelyCompoundedFlatRate;
    use approx::assert_relative_eq;
    use strata_core::Frequency;

    #[test]
    fn test_price_quote() {
        let today = Date::from_ymd(2025, 1, 6).unwrap();
        let future = RateFuture::three_month("MAR25", Currency::USD, Date::from_ymd(2025, 3, 19).unwrap()).unwrap();
        assert_eq!(future.maturity_date(), Date::from_ymd(2025, 6, 19).unwrap());

        let funding = DiscretelyCompoundedFlatRate::new(today, Currency::USD, 0.04, Frequency::Annual).unwrap();
        let ctx = PricingContext::new(today).with_funding(&funding);
        let rate = future.measure(&ctx, QuoteMeasure::Rate).unwrap();
        let price = future.measure(&ctx, QuoteMeasure::Price).unwrap();
        assert_relative_eq!(price, 100.0 * (1.0 - rate), epsilon = 1e-12);
        assert!(future.measure(&ctx, QuoteMeasure::Yield).is_err());
    }
}
