//! Government yield curves.

use strata_core::{Compounding, Currency, Date, Frequency};
use strata_math::spline::Stretch;

use crate::error::{CurveError, CurveResult};
use crate::traits::{Curve, GovvieYieldSource};

/// Government bond yields as a stretch over maturity time.
///
/// Discount factors compound the yield to `t` at the curve frequency:
/// `DF(t) = (1 + y(t)/f)^(-f t)`.
#[derive(Debug, Clone, PartialEq)]
pub struct GovvieCurve<S = Stretch> {
    reference_date: Date,
    currency: Currency,
    frequency: Frequency,
    stretch: S,
}

impl<S: AsRef<Stretch>> GovvieCurve<S> {
    /// Wraps a stretch of yields.
    #[must_use]
    pub fn new(reference_date: Date, currency: Currency, frequency: Frequency, stretch: S) -> Self {
        Self {
            reference_date,
            currency,
            frequency,
            stretch,
        }
    }

    /// Currency of the issuer.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// The underlying stretch.
    #[must_use]
    pub fn stretch(&self) -> &Stretch {
        self.stretch.as_ref()
    }

    /// Yield at maturity time `t`.
    #[must_use]
    pub fn response(&self, t: f64) -> f64 {
        self.stretch().response(t)
    }

    /// Integral of the yield over `[a, b]`.
    #[must_use]
    pub fn integral(&self, a: f64, b: f64) -> f64 {
        self.stretch().integral(a, b)
    }
}

impl<S: AsRef<Stretch> + Send + Sync> Curve for GovvieCurve<S> {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        let y = self.yield_at(t)?;
        let df = Compounding::from(self.frequency).discount_factor(y, t);
        if df.is_finite() && df > 0.0 {
            Ok(df)
        } else {
            Err(CurveError::invalid_input(format!(
                "govvie yield {y} gives no discount factor at t = {t:.6}"
            )))
        }
    }
}

impl<S: AsRef<Stretch> + Send + Sync> GovvieYieldSource for GovvieCurve<S> {
    fn frequency(&self) -> Frequency {
        self.frequency
    }

    fn yield_at(&self, t: f64) -> CurveResult<f64> {
        let y = self.response(t);
        if y.is_finite() {
            Ok(y)
        } else {
            Err(CurveError::invalid_input(format!("govvie yield at t = {t:.6} is not finite")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strata_math::spline::LocalControl;

    #[test]
    fn test_discount_factor_compounds_yield() {
        let date = Date::from_ymd(2025, 1, 2).unwrap();
        let stretch = Stretch::local_fit(&[0.0, 10.0], &[0.04, 0.04], &LocalControl::default()).unwrap();
        let curve = GovvieCurve::new(date, Currency::USD, Frequency::SemiAnnual, stretch);
        assert_relative_eq!(curve.discount_factor(3.0).unwrap(), 1.02f64.powf(-6.0), epsilon = 1e-14);
        assert_eq!(curve.frequency(), Frequency::SemiAnnual);
        assert_relative_eq!(curve.yield_at(5.0).unwrap(), 0.04);
    }
}
