//! Fixed-for-floating interest rate swaps.

use std::sync::Arc;

use strata_core::daycounts::DayCount;
use strata_core::schedule::backward_schedule;
use strata_core::{Currency, Date, Frequency, Tenor, TenorUnit};

use super::{check_dates, CalibrationInstrument, InstrumentKind, QuoteMeasure};
use crate::context::PricingContext;
use crate::error::{CurveError, CurveResult};

/// A vanilla swap quoted by its par fixed rate.
///
/// Schedules are unadjusted and rolled backward from maturity. Without a
/// forward source the floating leg telescopes to `DF(effective) - DF(maturity)`;
/// with one, each floating period is projected at its fixing date.
#[derive(Debug, Clone, PartialEq)]
pub struct Swap {
    label: String,
    currency: Currency,
    effective: Date,
    maturity: Date,
    fixed_frequency: Frequency,
    fixed_day_count: DayCount,
    float_tenor: Tenor,
    float_day_count: DayCount,
}

impl Swap {
    /// Creates a swap with semi-annual 30/360 fixed and 3M ACT/360 floating legs.
    pub fn new(label: impl Into<String>, currency: Currency, effective: Date, maturity: Date) -> CurveResult<Self> {
        let label = label.into();
        check_dates(&label, effective, maturity)?;
        Ok(Self {
            label,
            currency,
            effective,
            maturity,
            fixed_frequency: Frequency::SemiAnnual,
            fixed_day_count: DayCount::Thirty360,
            float_tenor: Tenor::THREE_MONTHS,
            float_day_count: DayCount::Act360,
        })
    }

    /// A swap of `tenor` from `spot`, maturity unadjusted.
    pub fn from_tenor(spot: Date, tenor: Tenor, currency: Currency) -> CurveResult<Self> {
        Self::new(tenor.to_string(), currency, spot, tenor.add_to(spot)?)
    }

    /// Sets the fixed leg frequency and day count.
    #[must_use]
    pub fn with_fixed_leg(mut self, frequency: Frequency, day_count: DayCount) -> Self {
        self.fixed_frequency = frequency;
        self.fixed_day_count = day_count;
        self
    }

    /// Sets the floating index tenor.
    #[must_use]
    pub fn with_float_tenor(mut self, tenor: Tenor) -> Self {
        self.float_tenor = tenor;
        self
    }

    /// Fixed leg frequency.
    #[must_use]
    pub fn fixed_frequency(&self) -> Frequency {
        self.fixed_frequency
    }

    /// Fixed leg period dates, effective date first.
    pub fn fixed_schedule(&self) -> CurveResult<Vec<Date>> {
        Ok(backward_schedule(
            self.effective,
            self.maturity,
            self.fixed_frequency.months_per_period(),
        )?)
    }

    /// `Σ τᵢ DF(dᵢ)` over the fixed leg.
    pub fn annuity(&self, ctx: &PricingContext<'_>) -> CurveResult<f64> {
        let funding = ctx.funding()?;
        let mut annuity = 0.0;
        for period in self.fixed_schedule()?.windows(2) {
            let tau = self.fixed_day_count.year_fraction(period[0], period[1]);
            annuity += tau * funding.discount_factor_at(period[1])?;
        }
        Ok(annuity)
    }

    /// Present value of the floating leg per unit notional.
    pub fn floating_leg_pv(&self, ctx: &PricingContext<'_>) -> CurveResult<f64> {
        let funding = ctx.funding()?;
        match ctx.forward() {
            None => Ok(funding.discount_factor_at(self.effective)? - funding.discount_factor_at(self.maturity)?),
            Some(forward) => {
                let dates = backward_schedule(self.effective, self.maturity, tenor_months(self.float_tenor)?)?;
                let mut pv = 0.0;
                for period in dates.windows(2) {
                    let tau = self.float_day_count.year_fraction(period[0], period[1]);
                    let rate = forward.forward_rate_on(period[0])?;
                    pv += rate * tau * funding.discount_factor_at(period[1])?;
                }
                Ok(pv)
            }
        }
    }
}

fn tenor_months(tenor: Tenor) -> CurveResult<u32> {
    match tenor.unit() {
        TenorUnit::Month => Ok(tenor.count()),
        TenorUnit::Year => Ok(12 * tenor.count()),
        _ => Err(CurveError::invalid_input(format!(
            "floating tenor {tenor} is not a whole number of months"
        ))),
    }
}

impl CalibrationInstrument for Swap {
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
        InstrumentKind::Swap
    }

    fn measure(&self, ctx: &PricingContext<'_>, measure: QuoteMeasure) -> CurveResult<f64> {
        match measure {
            QuoteMeasure::SwapRate | QuoteMeasure::Rate => {
                let annuity = self.annuity(ctx)?;
                if annuity <= 0.0 {
                    return Err(CurveError::invalid_input(format!("{}: annuity is not positive", self.label)));
                }
                Ok(self.floating_leg_pv(ctx)? / annuity)
            }
            other => Err(CurveError::unsupported_measure(&self.label, other)),
        }
    }

    fn with_maturity(&self, maturity: Date) -> CurveResult<Arc<dyn CalibrationInstrument>> {
        check_dates(&self.label, self.effective, maturity)?;
        let mut sibling = self.clone();
        sibling.label = maturity.to_string();
        sibling.maturity = maturity;
        Ok(Arc::new(sibling))
    }
}
