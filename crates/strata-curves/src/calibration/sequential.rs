//! Shape-preserving calibration of one latent-state stretch.

use log::debug;
use strata_core::Date;
use strata_math::spline::{SequentialCalibrator, Stretch};

use super::{LatentStateKind, LatentStateStretchSpec};
use crate::error::{CurveError, CurveResult};
use crate::instruments::{CalibrationInstrument, QuoteMeasure};

/// Starting points for each segment's right-edge search.
///
/// Discount factors start from `exp(-quote × t)` when the quote is a rate and
/// from the previous guess otherwise. Forward and govvie states start from
/// the quote itself when it is a rate or yield.
#[must_use]
pub fn initial_guesses(spec: &LatentStateStretchSpec, knots: &[f64], epoch_response: f64) -> Vec<f64> {
    let kind = spec.kind();
    spec.entries()
        .zip(knots.iter().skip(1))
        .scan(epoch_response, |previous, ((_, quote, measure), &t)| {
            let guess = match kind {
                _ if !measure.is_rate_like() => *previous,
                LatentStateKind::DiscountFactor => (-quote * t).exp(),
                LatentStateKind::ForwardRate | LatentStateKind::GovvieYield | LatentStateKind::HazardRate => quote,
            };
            *previous = guess;
            Some(guess)
        })
        .collect()
}

/// Calibrates `spec` left to right so every instrument reprices its quote.
///
/// `price(stretch, instrument, measure)` computes the measure with the
/// latent state read off `stretch`, which holds only the segments solved so
/// far plus the trial segment. Price quotes are compared per unit face.
pub fn shape_preserving_stretch<P>(
    spec: &LatentStateStretchSpec,
    valuation_date: Date,
    calibrator: &SequentialCalibrator,
    epoch_response: f64,
    price: P,
) -> CurveResult<Stretch>
where
    P: Fn(&Stretch, &dyn CalibrationInstrument, QuoteMeasure) -> CurveResult<f64>,
{
    let knots = spec.knots(valuation_date)?;
    let entries: Vec<(&dyn CalibrationInstrument, f64, QuoteMeasure)> = spec.entries().collect();
    let guesses = initial_guesses(spec, &knots, epoch_response);

    debug!(
        "calibrating '{}' ({}) through {} instruments",
        spec.name(),
        spec.kind(),
        entries.len()
    );

    let residual = |i: usize, stretch: &Stretch| {
        let (instrument, quote, measure) = entries[i];
        let scale = if measure == QuoteMeasure::Price { 0.01 } else { 1.0 };
        price(stretch, instrument, measure).map_or(f64::NAN, |value| (value - quote) * scale)
    };

    calibrator
        .calibrate(&knots, epoch_response, &guesses, residual)
        .map_err(|e| CurveError::calibration_failed(spec.name(), e.to_string()))
}
