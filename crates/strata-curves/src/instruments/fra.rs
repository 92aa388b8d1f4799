//! Forward rate agreements.

use std::sync::Arc;

use strata_core::daycounts::DayCount;
use strata_core::{Currency, Date, Tenor};

use super::{check_dates, simple_forward, CalibrationInstrument, InstrumentKind, QuoteMeasure};
use crate::calibration::LatentStateKind;
use crate::context::PricingContext;
use crate::error::{CurveError, CurveResult};

/// A FRA on the period `start` to `end`.
///
/// With a forward source in the context the rate is the index forward fixing
/// at `start`; otherwise it is the simple forward implied by the funding curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Fra {
    label: String,
    currency: Currency,
    start: Date,
    end: Date,
    day_count: DayCount,
}

impl Fra {
    /// Creates a FRA.
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

    /// A "start x end" FRA from spot, e.g. 3x6 for `(3M, 6M)`.
    pub fn from_tenors(spot: Date, start: Tenor, end: Tenor, currency: Currency) -> CurveResult<Self> {
        let label = format!("{}x{}", start, end);
        Self::new(label, currency, start.add_to(spot)?, end.add_to(spot)?)
    }

    /// Fixing and accrual start.
    #[must_use]
    pub fn start(&self) -> Date {
        self.start
    }
}

impl CalibrationInstrument for Fra {
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
        InstrumentKind::Fra
    }

    fn pillar_date(&self, kind: LatentStateKind) -> Date {
        match kind {
            LatentStateKind::ForwardRate => self.start,
            _ => self.end,
        }
    }

    fn measure(&self, ctx: &PricingContext<'_>, measure: QuoteMeasure) -> CurveResult<f64> {
        match measure {
            QuoteMeasure::ForwardRate | QuoteMeasure::Rate => match ctx.forward() {
                Some(forward) => forward.forward_rate_on(self.start),
                None => simple_forward(
                    ctx.funding()?,
                    self.start,
                    self.end,
                    self.day_count.year_fraction(self.start, self.end),
                ),
            },
            other => Err(CurveError::unsupported_measure(&self.label, other)),
        }
    }

    fn with_maturity(&self, maturity: Date) -> CurveResult<Arc<dyn CalibrationInstrument>> {
        Ok(Arc::new(Self::new(maturity.to_string(), self.currency, self.start, maturity)?))
    }
}
