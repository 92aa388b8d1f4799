//! Concrete curves.
//!
//! Stretch-backed curves are generic over how they hold their stretch: an
//! owned [`Stretch`](strata_math::spline::Stretch) for finished curves, a
//! borrowed one for views over a calibration in progress.

mod credit;
mod flat;
mod forward;
mod funding;
mod govvie;

pub use credit::CreditCurve;
pub use flat::DiscretelyCompoundedFlatRate;
pub use forward::ForwardCurve;
pub use funding::{FundingCurve, QuantificationMetric};
pub use govvie::GovvieCurve;
