//! Funding (discount) curves over a spline stretch.

use serde::{Deserialize, Serialize};
use strata_core::{Currency, Date};
use strata_math::spline::Stretch;

use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// What the stretch response of a funding curve means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuantificationMetric {
    /// The response is the discount factor.
    #[default]
    DiscountFactor,
    /// The response is the continuously compounded zero rate.
    ZeroRate,
    /// The response is the instantaneous forward rate.
    InstantaneousForward,
}

impl QuantificationMetric {
    /// Discount factor at `t` for a stretch carrying this metric.
    #[must_use]
    pub fn discount_factor(&self, stretch: &Stretch, t: f64) -> f64 {
        match self {
            Self::DiscountFactor => stretch.response(t),
            Self::ZeroRate => (-stretch.response(t) * t).exp(),
            Self::InstantaneousForward => (-stretch.integral(0.0, t)).exp(),
        }
    }

    /// Reads this metric off any discount curve at `t`.
    pub fn observe(&self, curve: &dyn Curve, t: f64) -> CurveResult<f64> {
        match self {
            Self::DiscountFactor => curve.discount_factor(t),
            Self::ZeroRate => curve.zero_rate(t, strata_core::Compounding::Continuous),
            Self::InstantaneousForward => curve.instantaneous_forward(t),
        }
    }
}

impl std::fmt::Display for QuantificationMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::DiscountFactor => "DiscountFactor",
            Self::ZeroRate => "ZeroRate",
            Self::InstantaneousForward => "ForwardRate",
        };
        f.write_str(name)
    }
}

/// A funding curve: one stretch read through a [`QuantificationMetric`].
///
/// Past the last knot the curve extends at its terminal instantaneous
/// forward rate, whatever the metric.
///
/// # Example
///
/// ```rust
/// use strata_core::{Currency, Date};
/// use strata_curves::{Curve, FundingCurve, QuantificationMetric};
/// use strata_math::spline::{BoundaryCondition, SegmentControl, Stretch};
///
/// let stretch = Stretch::global_fit(
///     &[0.0, 1.0, 2.0],
///     &[0.03, 0.035, 0.04],
///     SegmentControl::default(),
///     BoundaryCondition::Natural,
/// )
/// .unwrap();
/// let date = Date::from_ymd(2025, 1, 2).unwrap();
/// let curve = FundingCurve::new(date, Currency::USD, QuantificationMetric::ZeroRate, stretch);
/// assert!((curve.discount_factor(1.0).unwrap() - (-0.035f64).exp()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FundingCurve<S = Stretch> {
    reference_date: Date,
    currency: Currency,
    metric: QuantificationMetric,
    stretch: S,
}

impl<S: AsRef<Stretch>> FundingCurve<S> {
    /// Wraps a stretch.
    #[must_use]
    pub fn new(reference_date: Date, currency: Currency, metric: QuantificationMetric, stretch: S) -> Self {
        Self {
            reference_date,
            currency,
            metric,
            stretch,
        }
    }

    /// Currency of the curve.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// What the stretch response means.
    #[must_use]
    pub fn metric(&self) -> QuantificationMetric {
        self.metric
    }

    /// The underlying stretch.
    #[must_use]
    pub fn stretch(&self) -> &Stretch {
        self.stretch.as_ref()
    }

    /// Knot times in years.
    #[must_use]
    pub fn knots(&self) -> &[f64] {
        self.stretch().knots()
    }

    /// Raw stretch response at `t`.
    #[must_use]
    pub fn response(&self, t: f64) -> f64 {
        self.stretch().response(t)
    }

    /// Integral of the raw response over `[a, b]`.
    #[must_use]
    pub fn integral(&self, a: f64, b: f64) -> f64 {
        self.stretch().integral(a, b)
    }

    /// A borrowed view of this curve.
    #[must_use]
    pub fn view(&self) -> FundingCurve<&Stretch> {
        FundingCurve::new(self.reference_date, self.currency, self.metric, self.stretch())
    }
}

impl<S: AsRef<Stretch>> FundingCurve<S> {
    /// Instantaneous forward read off the stretch, valid up to the last knot.
    fn knot_forward(&self, t: f64) -> CurveResult<f64> {
        let stretch = self.stretch();
        match self.metric {
            QuantificationMetric::InstantaneousForward => Ok(stretch.response(t)),
            QuantificationMetric::ZeroRate => Ok(stretch.response(t) + t * stretch.derivative(t, 1)?),
            QuantificationMetric::DiscountFactor => {
                let df = self.metric.discount_factor(stretch, t);
                Ok(-stretch.derivative(t, 1)? / df)
            }
        }
    }
}

impl<S: AsRef<Stretch> + Send + Sync> Curve for FundingCurve<S> {
    fn reference_date(&self) -> Date {
        self.reference_date
    }

    /// Past the last knot the discount factor decays at the terminal
    /// instantaneous forward rate.
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        let last = self.stretch().right_edge();
        let df = if t > last {
            let terminal = self.metric.discount_factor(self.stretch(), last);
            terminal * (-self.knot_forward(last)? * (t - last)).exp()
        } else {
            self.metric.discount_factor(self.stretch(), t)
        };
        if df.is_finite() && df > 0.0 {
            Ok(df)
        } else {
            Err(CurveError::invalid_input(format!(
                "discount factor {df} at t = {t:.6} is not positive"
            )))
        }
    }

    fn instantaneous_forward(&self, t: f64) -> CurveResult<f64> {
        let forward = self.knot_forward(t.min(self.stretch().right_edge()))?;
        if forward.is_finite() {
            Ok(forward)
        } else {
            Err(CurveError::invalid_input(format!("forward at t = {t:.6} is not finite")))
        }
    }
}
