//! Borrowed market view handed to every instrument pricing call.

use std::collections::BTreeMap;

use strata_core::Date;

use crate::curves::CreditCurve;
use crate::error::{CurveError, CurveResult};
use crate::traits::{Curve, ForwardRateSource, GovvieYieldSource};

/// Index fixings keyed by fixing date and index label.
pub type Fixings = BTreeMap<(Date, String), f64>;

/// Curves and fixings visible to one pricing call.
///
/// The context only borrows; calibration swaps in views of partially built
/// curves without copying anything.
#[derive(Clone, Copy)]
pub struct PricingContext<'a> {
    valuation_date: Date,
    funding: Option<&'a dyn Curve>,
    forward: Option<&'a dyn ForwardRateSource>,
    govvie: Option<&'a dyn GovvieYieldSource>,
    credit: Option<&'a CreditCurve>,
    fixings: Option<&'a Fixings>,
}

impl<'a> PricingContext<'a> {
    /// An empty context at `valuation_date`.
    #[must_use]
    pub fn new(valuation_date: Date) -> Self {
        Self {
            valuation_date,
            funding: None,
            forward: None,
            govvie: None,
            credit: None,
            fixings: None,
        }
    }

    /// Sets the discounting curve.
    #[must_use]
    pub fn with_funding(mut self, curve: &'a dyn Curve) -> Self {
        self.funding = Some(curve);
        self
    }

    /// Sets the index projection curve.
    #[must_use]
    pub fn with_forward(mut self, curve: &'a dyn ForwardRateSource) -> Self {
        self.forward = Some(curve);
        self
    }

    /// Sets the government yield curve.
    #[must_use]
    pub fn with_govvie(mut self, curve: &'a dyn GovvieYieldSource) -> Self {
        self.govvie = Some(curve);
        self
    }

    /// Sets the credit curve.
    #[must_use]
    pub fn with_credit(mut self, curve: &'a CreditCurve) -> Self {
        self.credit = Some(curve);
        self
    }

    /// Sets the fixing table.
    #[must_use]
    pub fn with_fixings(mut self, fixings: &'a Fixings) -> Self {
        self.fixings = Some(fixings);
        self
    }

    /// The valuation date.
    #[must_use]
    pub fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    /// The discounting curve, or an error if none was supplied.
    pub fn funding(&self) -> CurveResult<&'a dyn Curve> {
        self.funding.ok_or_else(|| CurveError::missing_curve("funding"))
    }

    /// The projection curve, if any.
    #[must_use]
    pub fn forward(&self) -> Option<&'a dyn ForwardRateSource> {
        self.forward
    }

    /// The government yield curve, or an error if none was supplied.
    pub fn govvie(&self) -> CurveResult<&'a dyn GovvieYieldSource> {
        self.govvie.ok_or_else(|| CurveError::missing_curve("govvie"))
    }

    /// The credit curve, or an error if none was supplied.
    pub fn credit(&self) -> CurveResult<&'a CreditCurve> {
        self.credit.ok_or_else(|| CurveError::missing_curve("credit"))
    }

    /// A stored fixing.
    #[must_use]
    pub fn fixing(&self, date: Date, label: &str) -> Option<f64> {
        self.fixings
            .and_then(|f| f.get(&(date, label.to_string())))
            .copied()
    }
}

impl std::fmt::Debug for PricingContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PricingContext")
            .field("valuation_date", &self.valuation_date)
            .field("funding", &self.funding.is_some())
            .field("forward", &self.forward.is_some())
            .field("govvie", &self.govvie.is_some())
            .field("credit", &self.credit.is_some())
            .finish_non_exhaustive()
    }
}
