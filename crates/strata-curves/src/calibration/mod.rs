//! Calibration inputs and the stretch-level calibration driver.
//!
//! A [`LatentStateStretchSpec`] names a latent state and binds it to one or
//! more [`CalibrationLeg`]s. [`shape_preserving_stretch`] solves that spec
//! left to right against a caller-supplied pricer; [`Smoothing`] refits
//! truth values extracted from a calibrated curve.

mod leg;
mod sequential;
mod smoothing;
mod spec;

pub use leg::CalibrationLeg;
pub use sequential::{initial_guesses, shape_preserving_stretch};
pub use smoothing::Smoothing;
pub use spec::{LatentStateKind, LatentStateStretchSpec};

/// Calibrated curve with its repricing report.
#[derive(Debug, Clone)]
pub struct CalibrationResult<C> {
    /// The calibrated curve.
    pub curve: C,
    /// Calibration instruments repriced off `curve`.
    pub report: crate::repricing::RepricingReport,
}

impl<C> CalibrationResult<C> {
    /// Discards the report.
    pub fn into_curve(self) -> C {
        self.curve
    }
}
