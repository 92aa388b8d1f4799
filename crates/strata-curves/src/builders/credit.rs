//! Hazard rate bootstrap from CDS par spreads.

use std::sync::Arc;

use log::{debug, info};
use strata_config::CalibrationConfig;
use strata_core::Date;
use strata_math::solvers::find_root;

use crate::calibration::{CalibrationLeg, CalibrationResult, LatentStateKind, LatentStateStretchSpec};
use crate::context::PricingContext;
use crate::curves::CreditCurve;
use crate::error::{CurveError, CurveResult};
use crate::repricing::RepricingReport;
use crate::traits::Curve;

/// Bootstraps a piecewise-flat [`CreditCurve`] one CDS at a time.
///
/// Each spread fixes the hazard on the piece ending at its maturity; the
/// pieces already solved are held fixed.
#[derive(Clone)]
pub struct CreditCurveBuilder {
    valuation_date: Date,
    funding: Arc<dyn Curve>,
    recovery: f64,
    config: CalibrationConfig,
}

impl CreditCurveBuilder {
    /// A builder discounting on `funding` with a fixed `recovery`.
    pub fn new(valuation_date: Date, funding: Arc<dyn Curve>, recovery: f64) -> CurveResult<Self> {
        if !(0.0..1.0).contains(&recovery) {
            return Err(CurveError::invalid_input(format!("recovery {recovery} outside [0, 1)")));
        }
        Ok(Self {
            valuation_date,
            funding,
            recovery,
            config: CalibrationConfig::standard(),
        })
    }

    /// Replaces the calibration settings.
    #[must_use]
    pub fn with_config(mut self, config: CalibrationConfig) -> Self {
        self.config = config;
        self
    }

    /// The recovery rate.
    pub fn recovery(&self) -> f64 {
        self.recovery
    }

    /// A flat curve at `hazard`.
    pub fn flat(&self, hazard: f64) -> CurveResult<CreditCurve> {
        CreditCurve::flat(self.valuation_date, hazard, self.recovery)
    }

    /// Bootstraps hazards through a leg of par-spread quotes.
    pub fn bootstrap(&self, name: &str, leg: CalibrationLeg) -> CurveResult<CalibrationResult<CreditCurve>> {
        let spec = LatentStateStretchSpec::new(name, LatentStateKind::HazardRate, vec![leg])?;
        self.calibrate(&spec)
    }

    /// Bootstraps `spec`, which must carry a hazard-rate latent state.
    pub fn calibrate(&self, spec: &LatentStateStretchSpec) -> CurveResult<CalibrationResult<CreditCurve>> {
        if spec.kind() != LatentStateKind::HazardRate {
            return Err(CurveError::invalid_input(format!(
                "credit builder cannot calibrate a {} stretch",
                spec.kind()
            )));
        }
        let knots = spec.knots(self.valuation_date)?;
        let funding = self.funding.as_ref();
        let solver = self.config.solver_config();
        let loss = 1.0 - self.recovery;

        let mut curve = self.flat(0.0)?;
        for (i, (instrument, quote, measure)) in spec.entries().enumerate() {
            let time = knots[i + 1];
            let base = &curve;
            let objective = |hazard: f64| {
                let trial = base.extended(i, time, hazard);
                let ctx = PricingContext::new(self.valuation_date)
                    .with_funding(funding)
                    .with_credit(&trial);
                instrument.measure(&ctx, measure).map_or(f64::NAN, |value| value - quote)
            };
            let solved = find_root(objective, quote / loss, &solver)
                .map_err(|e| CurveError::calibration_failed(spec.name(), format!("{}: {e}", instrument.label())))?;
            debug!("{}: hazard {:.6} after {} iterations", instrument.label(), solved.root, solved.iterations);
            curve = curve.extended(i, time, solved.root);
        }

        let ctx = PricingContext::new(self.valuation_date)
            .with_funding(funding)
            .with_credit(&curve);
        let report = RepricingReport::evaluate(spec, self.config.tolerance, |instrument, measure| {
            instrument.measure(&ctx, measure)
        });
        info!(
            "bootstrapped credit curve '{}': {} spreads, max error {:.2e}",
            spec.name(),
            spec.len(),
            report.max_error()
        );
        Ok(CalibrationResult { curve, report })
    }
}

impl std::fmt::Debug for CreditCurveBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreditCurveBuilder")
            .field("valuation_date", &self.valuation_date)
            .field("recovery", &self.recovery)
            .finish_non_exhaustive()
    }
}
