//! Government yield curve construction.

use log::info;
use strata_config::CalibrationConfig;
use strata_core::{Date, Frequency};
use strata_math::spline::BoundaryCondition;

use super::calibrator;
use crate::calibration::{
    shape_preserving_stretch, CalibrationLeg, CalibrationResult, LatentStateKind, LatentStateStretchSpec,
};
use crate::context::PricingContext;
use crate::curves::GovvieCurve;
use crate::error::{CurveError, CurveResult};
use crate::repricing::RepricingReport;

/// Builds a govvie curve whose latent state is the bond yield.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioGovvieCurveBuilder {
    valuation_date: Date,
    frequency: Frequency,
    config: CalibrationConfig,
}

impl ScenarioGovvieCurveBuilder {
    /// A builder for yields compounded at `frequency`.
    #[must_use]
    pub fn new(valuation_date: Date, frequency: Frequency) -> Self {
        Self {
            valuation_date,
            frequency,
            config: CalibrationConfig::standard(),
        }
    }

    /// Replaces the calibration settings.
    #[must_use]
    pub fn with_config(mut self, config: CalibrationConfig) -> Self {
        self.config = config;
        self
    }

    /// Calibrates a shape-preserving govvie curve through `legs`.
    ///
    /// The epoch yield defaults to the first quote, which must then be a
    /// yield.
    pub fn shape_preserving(
        &self,
        name: &str,
        legs: Vec<CalibrationLeg>,
        epoch_yield: Option<f64>,
    ) -> CurveResult<CalibrationResult<GovvieCurve>> {
        let spec = LatentStateStretchSpec::new(name, LatentStateKind::GovvieYield, legs)?;
        self.calibrate(&spec, epoch_yield)
    }

    /// Calibrates `spec`, which must carry a govvie-yield latent state.
    pub fn calibrate(
        &self,
        spec: &LatentStateStretchSpec,
        epoch_yield: Option<f64>,
    ) -> CurveResult<CalibrationResult<GovvieCurve>> {
        if spec.kind() != LatentStateKind::GovvieYield {
            return Err(CurveError::invalid_input(format!(
                "govvie builder cannot calibrate a {} stretch",
                spec.kind()
            )));
        }
        let epoch = match epoch_yield {
            Some(value) => value,
            None => {
                let (_, quote, measure) = spec
                    .entries()
                    .next()
                    .ok_or_else(|| CurveError::invalid_input("govvie spec is empty"))?;
                if !measure.is_rate_like() {
                    return Err(CurveError::invalid_input(
                        "epoch yield is required when the first bond is quoted by price",
                    ));
                }
                quote
            }
        };

        let valuation_date = self.valuation_date;
        let currency = spec.currency();
        let stretch = shape_preserving_stretch(
            spec,
            valuation_date,
            &calibrator(&self.config, BoundaryCondition::Financial),
            epoch,
            |stretch, instrument, measure| {
                let view = GovvieCurve::new(valuation_date, currency, self.frequency, stretch);
                instrument.measure(&PricingContext::new(valuation_date).with_govvie(&view), measure)
            },
        )?;

        let curve = GovvieCurve::new(valuation_date, currency, self.frequency, stretch);
        let ctx = PricingContext::new(valuation_date).with_govvie(&curve);
        let report = RepricingReport::evaluate(spec, self.config.tolerance, |instrument, measure| {
            instrument.measure(&ctx, measure)
        });
        info!(
            "calibrated govvie curve '{}': {} bonds, max error {:.2e}",
            spec.name(),
            spec.len(),
            report.max_error()
        );
        Ok(CalibrationResult { curve, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::fixtures::{spot, valuation};
    use crate::instruments::{CalibrationInstrument, QuoteMeasure, TreasuryBond};
    use crate::traits::GovvieYieldSource;
    use std::sync::Arc;
    use strata_core::{Currency, Tenor};

    fn bonds(measure: QuoteMeasure) -> CalibrationLeg {
        let specs = [(2, 0.040, 0.0410), (5, 0.0375, 0.0400), (10, 0.0425, 0.0420), (30, 0.045, 0.0450)];
        let instruments: Vec<Arc<dyn CalibrationInstrument>> = specs
            .iter()
            .map(|&(years, coupon, _)| {
                Arc::new(TreasuryBond::from_tenor(spot(), Tenor::years(years).unwrap(), coupon, Currency::USD).unwrap())
                    as Arc<dyn CalibrationInstrument>
            })
            .collect();
        let quotes = match measure {
            QuoteMeasure::Price => vec![99.8, 98.9, 100.3, 100.0],
            _ => specs.iter().map(|s| s.2).collect(),
        };
        CalibrationLeg::uniform(instruments, quotes, measure).unwrap()
    }

    #[test]
    fn test_yield_quotes_reprice() {
        let result = ScenarioGovvieCurveBuilder::new(valuation(), Frequency::SemiAnnual)
            .shape_preserving("UST", vec![bonds(QuoteMeasure::Yield)], None)
            .unwrap();
        assert!(result.report.is_valid(), "{}", result.report);
        assert!((result.curve.yield_at(0.0).unwrap() - 0.041).abs() < 1e-14);
    }

    #[test]
    fn test_price_quotes_reprice() {
        let result = ScenarioGovvieCurveBuilder::new(valuation(), Frequency::SemiAnnual)
            .shape_preserving("UST", vec![bonds(QuoteMeasure::Price)], Some(0.041))
            .unwrap();
        assert!(result.report.is_valid(), "{}", result.report);
    }

    #[test]
    fn test_price_quotes_need_epoch() {
        let err = ScenarioGovvieCurveBuilder::new(valuation(), Frequency::SemiAnnual)
            .shape_preserving("UST", vec![bonds(QuoteMeasure::Price)], None)
            .unwrap_err();
        assert!(matches!(err, CurveError::InvalidInput { .. }));
    }
}
