//! Flat discretely compounded rate curve.

use strata_core::{Compounding, Currency, Date, Frequency};

use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// A single rate compounded at a fixed frequency.
///
/// ```rust
/// use strata_core::{Currency, Date, Frequency};
/// use strata_curves::{Curve, DiscretelyCompoundedFlatRate};
///
/// let start = Date::from_ymd(2025, 1, 2).unwrap();
/// let curve = DiscretelyCompoundedFlatRate::new(start, Currency::USD, 0.05, Frequency::Annual).unwrap();
/// let df = curve.discount_factor_at(start.add_days(365)).unwrap();
/// assert!((df - 1.0 / 1.05).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscretelyCompoundedFlatRate {
    reference_date: Date,
    currency: Currency,
    rate: f64,
    compounding: Compounding,
}

impl DiscretelyCompoundedFlatRate {
    /// Creates the curve; the rate must be finite and above `-frequency`.
    pub fn new(reference_date: Date, currency: Currency, rate: f64, frequency: Frequency) -> CurveResult<Self> {
        let per_year = f64::from(frequency.periods_per_year());
        if !rate.is_finite() || rate <= -per_year {
            return Err(CurveError::invalid_input(format!(
                "flat rate {rate} is invalid for {frequency} compounding"
            )));
        }
        Ok(Self {
            reference_date,
            currency,
            rate,
            compounding: Compounding::from(frequency),
        })
    }

    /// The flat rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// The currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }
}

impl Curve for DiscretelyCompoundedFlatRate {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        Ok(self.compounding.discount_factor(self.rate, t))
    }
}
