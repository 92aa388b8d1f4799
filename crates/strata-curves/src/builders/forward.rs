//! Index forward curve construction.

use std::sync::Arc;

use log::info;
use strata_config::CalibrationConfig;
use strata_core::{Date, Tenor};
use strata_math::spline::BoundaryCondition;

use super::calibrator;
use crate::calibration::{
    shape_preserving_stretch, CalibrationLeg, CalibrationResult, LatentStateKind, LatentStateStretchSpec, Smoothing,
};
use crate::context::PricingContext;
use crate::curves::ForwardCurve;
use crate::error::{CurveError, CurveResult};
use crate::repricing::RepricingReport;
use crate::traits::{Curve, ForwardRateSource};

/// Builds an index forward curve against a fixed funding curve.
///
/// The latent state is the index forward rate at its fixing time, starting
/// from the epoch fixing. FRAs and futures are pinned at their fixing
/// dates, swaps at maturity.
#[derive(Clone)]
pub struct ScenarioForwardCurveBuilder {
    valuation_date: Date,
    funding: Arc<dyn Curve>,
    index_tenor: Tenor,
    config: CalibrationConfig,
}

impl ScenarioForwardCurveBuilder {
    /// A builder projecting `index_tenor` rates, discounting on `funding`.
    #[must_use]
    pub fn new(valuation_date: Date, funding: Arc<dyn Curve>, index_tenor: Tenor) -> Self {
        Self {
            valuation_date,
            funding,
            index_tenor,
            config: CalibrationConfig::standard(),
        }
    }

    /// Replaces the calibration settings.
    #[must_use]
    pub fn with_config(mut self, config: CalibrationConfig) -> Self {
        self.config = config;
        self
    }

    /// The funding curve used for discounting.
    pub fn funding(&self) -> &dyn Curve {
        self.funding.as_ref()
    }

    /// The index tenor.
    pub fn index_tenor(&self) -> Tenor {
        self.index_tenor
    }

    /// Calibrates a shape-preserving forward curve through `legs`.
    pub fn shape_preserving(
        &self,
        name: &str,
        legs: Vec<CalibrationLeg>,
        epoch_fixing: f64,
    ) -> CurveResult<CalibrationResult<ForwardCurve>> {
        let spec = LatentStateStretchSpec::new(name, LatentStateKind::ForwardRate, legs)?;
        self.calibrate(&spec, epoch_fixing)
    }

    /// Calibrates `spec`, which must carry a forward-rate latent state.
    pub fn calibrate(
        &self,
        spec: &LatentStateStretchSpec,
        epoch_fixing: f64,
    ) -> CurveResult<CalibrationResult<ForwardCurve>> {
        if spec.kind() != LatentStateKind::ForwardRate {
            return Err(CurveError::invalid_input(format!(
                "forward builder cannot calibrate a {} stretch",
                spec.kind()
            )));
        }
        let valuation_date = self.valuation_date;
        let currency = spec.currency();
        let funding = self.funding.as_ref();
        let stretch = shape_preserving_stretch(
            spec,
            valuation_date,
            &calibrator(&self.config, BoundaryCondition::Financial),
            epoch_fixing,
            |stretch, instrument, measure| {
                let view = ForwardCurve::new(valuation_date, currency, self.index_tenor, stretch);
                let ctx = PricingContext::new(valuation_date).with_funding(funding).with_forward(&view);
                instrument.measure(&ctx, measure)
            },
        )?;

        let curve = ForwardCurve::new(valuation_date, currency, self.index_tenor, stretch);
        let report = self.reprice(spec, &curve);
        info!(
            "calibrated {} forward curve '{}': {} instruments, max error {:.2e}",
            self.index_tenor,
            spec.name(),
            spec.len(),
            report.max_error()
        );
        Ok(CalibrationResult { curve, report })
    }

    /// Calibrates shape-preserving, then refits the forward rates at the
    /// knots with `smoothing`.
    pub fn smooth(
        &self,
        name: &str,
        legs: Vec<CalibrationLeg>,
        epoch_fixing: f64,
        smoothing: Smoothing,
    ) -> CurveResult<CalibrationResult<ForwardCurve>> {
        let spec = LatentStateStretchSpec::new(name, LatentStateKind::ForwardRate, legs)?;
        let base = self.calibrate(&spec, epoch_fixing)?.curve;
        let knots = base.stretch().knots().to_vec();
        let truth = knots
            .iter()
            .map(|&t| base.forward_rate_at(t))
            .collect::<CurveResult<Vec<f64>>>()?;
        let stretch = smoothing.fit(&knots, &truth)?;
        let curve = ForwardCurve::new(self.valuation_date, base.currency(), self.index_tenor, stretch);
        let report = self.reprice(&spec, &curve);
        Ok(CalibrationResult { curve, report })
    }

    fn reprice(&self, spec: &LatentStateStretchSpec, curve: &ForwardCurve) -> RepricingReport {
        let ctx = PricingContext::new(self.valuation_date)
            .with_funding(self.funding.as_ref())
            .with_forward(curve);
        RepricingReport::evaluate(spec, self.config.tolerance, |instrument, measure| {
            instrument.measure(&ctx, measure)
        })
    }
}

impl std::fmt::Debug for ScenarioForwardCurveBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioForwardCurveBuilder")
            .field("valuation_date", &self.valuation_date)
            .field("index_tenor", &self.index_tenor)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
