//! Index forward curves.

use strata_core::{Currency, Date, Tenor};
use strata_math::spline::Stretch;

use crate::error::{CurveError, CurveResult};
use crate::traits::ForwardRateSource;

/// Forward rates of one index, as a stretch over fixing time.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardCurve<S = Stretch> {
    reference_date: Date,
    currency: Currency,
    index_tenor: Tenor,
    stretch: S,
}

impl<S: AsRef<Stretch>> ForwardCurve<S> {
    /// Wraps a stretch of forward rates.
    #[must_use]
    pub fn new(reference_date: Date, currency: Currency, index_tenor: Tenor, stretch: S) -> Self {
        Self {
            reference_date,
            currency,
            index_tenor,
            stretch,
        }
    }

    /// Currency of the index.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Accrual tenor of the index.
    #[must_use]
    pub fn index_tenor(&self) -> Tenor {
        self.index_tenor
    }

    /// The underlying stretch.
    #[must_use]
    pub fn stretch(&self) -> &Stretch {
        self.stretch.as_ref()
    }

    /// Forward rate at fixing time `t`.
    #[must_use]
    pub fn response(&self, t: f64) -> f64 {
        self.stretch().response(t)
    }

    /// Integral of the forward rate over `[a, b]`.
    #[must_use]
    pub fn integral(&self, a: f64, b: f64) -> f64 {
        self.stretch().integral(a, b)
    }
}

impl<S: AsRef<Stretch> + Send + Sync> ForwardRateSource for ForwardCurve<S> {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn forward_rate_at(&self, t: f64) -> CurveResult<f64> {
        let rate = self.response(t);
        if rate.is_finite() {
            Ok(rate)
        } else {
            Err(CurveError::invalid_input(format!("forward rate at t = {t:.6} is not finite")))
        }
    }
}
