//! Funding discount curve construction.

use std::sync::Arc;

use log::{debug, info};
use strata_config::CalibrationConfig;
use strata_core::{BusinessDayConvention, Date, Tenor};
use strata_math::spline::SegmentControl;

use super::calibrator;
use crate::calibration::{
    shape_preserving_stretch, CalibrationLeg, CalibrationResult, LatentStateKind, LatentStateStretchSpec, Smoothing,
};
use crate::context::PricingContext;
use crate::curves::{FundingCurve, QuantificationMetric};
use crate::error::{CurveError, CurveResult};
use crate::instruments::CalibrationInstrument;
use crate::repricing::RepricingReport;

/// Builds funding curves from deposit, future, FRA and swap legs.
///
/// The latent state is the discount factor, anchored at 1 on the
/// valuation date. Every entry point returns the curve together with a
/// repricing report against the legs it was calibrated to.
///
/// ```rust,ignore
/// let builder = ScenarioDiscountCurveBuilder::new(valuation_date);
/// let sparse = builder.shape_preserving("USD", vec![deposits.clone(), swaps.clone()])?;
/// let dense = builder.dense("USD", deposits, swaps)?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ScenarioDiscountCurveBuilder {
    valuation_date: Date,
    config: CalibrationConfig,
}

impl ScenarioDiscountCurveBuilder {
    /// A builder with the standard calibration settings.
    #[must_use]
    pub fn new(valuation_date: Date) -> Self {
        Self {
            valuation_date,
            config: CalibrationConfig::standard(),
        }
    }

    /// Replaces the calibration settings.
    #[must_use]
    pub fn with_config(mut self, config: CalibrationConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the segment control used for shape-preserving fits.
    #[must_use]
    pub fn with_control(mut self, control: SegmentControl) -> Self {
        self.config.control = control;
        self
    }

    /// The valuation date.
    pub fn valuation_date(&self) -> Date {
        self.valuation_date
    }

    /// The calibration settings.
    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Calibrates a shape-preserving discount curve through `legs`.
    pub fn shape_preserving(
        &self,
        name: &str,
        legs: Vec<CalibrationLeg>,
    ) -> CurveResult<CalibrationResult<FundingCurve>> {
        let spec = LatentStateStretchSpec::new(name, LatentStateKind::DiscountFactor, legs)?;
        self.calibrate(&spec)
    }

    /// Calibrates `spec`, which must carry a discount-factor latent state.
    pub fn calibrate(&self, spec: &LatentStateStretchSpec) -> CurveResult<CalibrationResult<FundingCurve>> {
        if spec.kind() != LatentStateKind::DiscountFactor {
            return Err(CurveError::invalid_input(format!(
                "discount builder cannot calibrate a {} stretch",
                spec.kind()
            )));
        }
        let valuation_date = self.valuation_date;
        let currency = spec.currency();
        let stretch = shape_preserving_stretch(
            spec,
            valuation_date,
            &calibrator(&self.config, self.config.discount_boundary),
            1.0,
            |stretch, instrument, measure| {
                let view = FundingCurve::new(valuation_date, currency, QuantificationMetric::DiscountFactor, stretch);
                instrument.measure(&PricingContext::new(valuation_date).with_funding(&view), measure)
            },
        )?;

        let curve = FundingCurve::new(valuation_date, currency, QuantificationMetric::DiscountFactor, stretch);
        let report = self.reprice(spec, &curve);
        info!(
            "calibrated funding curve '{}': {} instruments, max error {:.2e}",
            spec.name(),
            spec.len(),
            report.max_error()
        );
        Ok(CalibrationResult { curve, report })
    }

    /// Calibrates shape-preserving, then refits the `metric` truth values
    /// at the knots with `smoothing`.
    pub fn smooth(
        &self,
        name: &str,
        legs: Vec<CalibrationLeg>,
        smoothing: Smoothing,
        metric: QuantificationMetric,
    ) -> CurveResult<CalibrationResult<FundingCurve>> {
        let spec = LatentStateStretchSpec::new(name, LatentStateKind::DiscountFactor, legs)?;
        let base = self.calibrate(&spec)?.curve;
        self.smooth_curve(&spec, &base, smoothing, metric)
    }

    /// Refits an already calibrated curve; the report reprices `spec`.
    pub fn smooth_curve(
        &self,
        spec: &LatentStateStretchSpec,
        base: &FundingCurve,
        smoothing: Smoothing,
        metric: QuantificationMetric,
    ) -> CurveResult<CalibrationResult<FundingCurve>> {
        let knots = base.knots().to_vec();
        let truth = knots
            .iter()
            .map(|&t| metric.observe(base, t))
            .collect::<CurveResult<Vec<f64>>>()?;
        debug!("smoothing '{}' on {} {} truth values", spec.name(), truth.len(), metric);

        let stretch = smoothing.fit(&knots, &truth)?;
        let curve = FundingCurve::new(self.valuation_date, base.currency(), metric, stretch);
        let report = self.reprice(spec, &curve);
        Ok(CalibrationResult { curve, report })
    }

    /// DENSE: the short leg as quoted, the swap leg re-expressed at the
    /// configured dense tenor.
    pub fn dense(
        &self,
        name: &str,
        short_leg: CalibrationLeg,
        swap_leg: CalibrationLeg,
    ) -> CurveResult<CalibrationResult<FundingCurve>> {
        let tenors = [None, Some(self.config.dense_tenor)];
        self.custom_dense(name, vec![short_leg, swap_leg], &tenors)
    }

    /// Dual DENSE: both legs re-expressed at `tenor`.
    pub fn dual_dense(
        &self,
        name: &str,
        short_leg: CalibrationLeg,
        swap_leg: CalibrationLeg,
        tenor: Tenor,
    ) -> CurveResult<CalibrationResult<FundingCurve>> {
        self.custom_dense(name, vec![short_leg, swap_leg], &[Some(tenor), Some(tenor)])
    }

    /// Two-stage calibration with a per-leg re-construction tenor.
    ///
    /// A leg with `None` is kept as quoted; a leg with `Some(tenor)` is
    /// replaced by synthetic instruments on a `tenor` grid priced off the
    /// first-stage curve.
    pub fn custom_dense(
        &self,
        name: &str,
        legs: Vec<CalibrationLeg>,
        tenors: &[Option<Tenor>],
    ) -> CurveResult<CalibrationResult<FundingCurve>> {
        let stages = DenseStages::new(*self);
        let sparse = stages.sparse(name, legs.clone())?;
        let dense_legs = stages.densify(&sparse.curve, &legs, tenors)?;
        stages.dense(name, dense_legs)
    }

    fn reprice(&self, spec: &LatentStateStretchSpec, curve: &FundingCurve) -> RepricingReport {
        let ctx = PricingContext::new(self.valuation_date).with_funding(curve);
        RepricingReport::evaluate(spec, self.config.tolerance, |instrument, measure| {
            instrument.measure(&ctx, measure)
        })
    }
}

/// The two stages of a DENSE calibration, exposed separately.
#[derive(Debug, Clone, Copy)]
pub struct DenseStages {
    builder: ScenarioDiscountCurveBuilder,
}

impl DenseStages {
    /// Stages driven by `builder`.
    #[must_use]
    pub fn new(builder: ScenarioDiscountCurveBuilder) -> Self {
        Self { builder }
    }

    /// First stage: a shape-preserving curve through the quoted legs.
    pub fn sparse(&self, name: &str, legs: Vec<CalibrationLeg>) -> CurveResult<CalibrationResult<FundingCurve>> {
        self.builder.shape_preserving(name, legs)
    }

    /// Re-expresses each leg on its tenor grid off `sparse`.
    ///
    /// A grid leg keeps its first and last instruments and quotes; the
    /// dates in between are `tenor` steps from the first maturity, each
    /// priced as a copy of the first instrument maturing there.
    pub fn densify(
        &self,
        sparse: &FundingCurve,
        legs: &[CalibrationLeg],
        tenors: &[Option<Tenor>],
    ) -> CurveResult<Vec<CalibrationLeg>> {
        if legs.len() != tenors.len() {
            return Err(CurveError::invalid_input(format!(
                "{} legs but {} re-construction tenors",
                legs.len(),
                tenors.len()
            )));
        }
        let ctx = PricingContext::new(self.builder.valuation_date).with_funding(sparse);
        legs.iter()
            .zip(tenors)
            .map(|(leg, tenor)| match tenor {
                None => Ok(leg.clone()),
                Some(tenor) => densify_leg(&ctx, leg, *tenor),
            })
            .collect()
    }

    /// Second stage: a shape-preserving curve through the dense legs.
    pub fn dense(&self, name: &str, legs: Vec<CalibrationLeg>) -> CurveResult<CalibrationResult<FundingCurve>> {
        self.builder.shape_preserving(name, legs)
    }
}

fn densify_leg(ctx: &PricingContext<'_>, leg: &CalibrationLeg, tenor: Tenor) -> CurveResult<CalibrationLeg> {
    let instruments = leg.instruments();
    let first = &instruments[0];
    let last = &instruments[instruments.len() - 1];
    let measure = leg.measures()[0];
    let first_maturity = first.maturity_date();
    let last_maturity = last.maturity_date();

    let mut dense: Vec<Arc<dyn CalibrationInstrument>> = vec![Arc::clone(first)];
    let mut quotes = vec![leg.quotes()[0]];
    let mut measures = vec![measure];

    let mut step = 1;
    loop {
        let maturity = tenor
            .add_multiple(first_maturity, step)?
            .adjust(BusinessDayConvention::ModifiedFollowing);
        if maturity >= last_maturity {
            break;
        }
        let synthetic = first.with_maturity(maturity)?;
        quotes.push(synthetic.measure(ctx, measure)?);
        dense.push(synthetic);
        measures.push(measure);
        step += 1;
    }

    if instruments.len() > 1 {
        dense.push(Arc::clone(last));
        quotes.push(leg.quotes()[instruments.len() - 1]);
        measures.push(leg.measures()[instruments.len() - 1]);
    }
    debug!(
        "densified leg {}..{} at {tenor}: {} -> {} instruments",
        first.label(),
        last.label(),
        instruments.len(),
        dense.len()
    );
    CalibrationLeg::new(dense, quotes, measures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::fixtures::{deposit_leg, swap_leg, valuation};
    use crate::traits::Curve;
    use approx::assert_abs_diff_eq;
    use strata_math::spline::{C1Generator, LocalControl, SegmentBasis};

    #[test]
    fn test_shape_preserving_reprices_every_instrument() {
        let result = ScenarioDiscountCurveBuilder::new(valuation())
            .shape_preserving("USD", vec![deposit_leg(), swap_leg()])
            .unwrap();
        assert!(result.report.is_valid(), "{}", result.report);
        assert_eq!(result.report.checks().len(), 9);
        assert_abs_diff_eq!(result.curve.discount_factor(0.0).unwrap(), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_discount_factors_decrease() {
        let curve = ScenarioDiscountCurveBuilder::new(valuation())
            .shape_preserving("USD", vec![deposit_leg(), swap_leg()])
            .unwrap()
            .curve;
        let mut previous = 1.0;
        for i in 1..=40 {
            let df = curve.discount_factor(f64::from(i) * 0.25).unwrap();
            assert!(df < previous);
            previous = df;
        }
    }

    #[test]
    fn test_rejects_non_discount_spec() {
        let spec = LatentStateStretchSpec::new("X", LatentStateKind::ForwardRate, vec![swap_leg()]).unwrap();
        assert!(ScenarioDiscountCurveBuilder::new(valuation()).calibrate(&spec).is_err());
    }

    #[test]
    fn test_local_smoothing_keeps_knot_values() {
        let builder = ScenarioDiscountCurveBuilder::new(valuation());
        let base = builder.shape_preserving("USD", vec![deposit_leg(), swap_leg()]).unwrap().curve;
        let smoothed = builder
            .smooth(
                "USD",
                vec![deposit_leg(), swap_leg()],
                Smoothing::Local(LocalControl::monotone(C1Generator::Bessel)),
                QuantificationMetric::ZeroRate,
            )
            .unwrap();
        for &t in base.knots().iter().skip(1) {
            assert_abs_diff_eq!(
                smoothed.curve.discount_factor(t).unwrap(),
                base.discount_factor(t).unwrap(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_dense_adds_grid_instruments() {
        let builder = ScenarioDiscountCurveBuilder::new(valuation());
        let stages = DenseStages::new(builder);
        let sparse = stages.sparse("USD", vec![deposit_leg(), swap_leg()]).unwrap();
        let legs = stages
            .densify(&sparse.curve, &[deposit_leg(), swap_leg()], &[None, Some(Tenor::THREE_MONTHS)])
            .unwrap();
        assert_eq!(legs[0].len(), 3);
        // 1Y to 10Y in 3M steps
        assert_eq!(legs[1].len(), 37);

        let dense = stages.dense("USD", legs).unwrap();
        assert!(dense.report.is_valid(), "{}", dense.report);
        for t in [1.0, 5.0, 9.0] {
            assert_abs_diff_eq!(
                dense.curve.discount_factor(t).unwrap(),
                sparse.curve.discount_factor(t).unwrap(),
                epsilon = 1e-4
            );
        }
    }

    #[test]
    fn test_densify_checks_tenor_count() {
        let builder = ScenarioDiscountCurveBuilder::new(valuation());
        let stages = DenseStages::new(builder);
        let sparse = stages.sparse("USD", vec![deposit_leg(), swap_leg()]).unwrap();
        assert!(stages.densify(&sparse.curve, &[deposit_leg()], &[None, None]).is_err());
    }

    #[test]
    fn test_other_bases_calibrate() {
        let control = SegmentControl::new(SegmentBasis::KaklisPandelis { exponent: 4 }, 1).unwrap();
        let result = ScenarioDiscountCurveBuilder::new(valuation())
            .with_control(control)
            .shape_preserving("USD", vec![deposit_leg(), swap_leg()])
            .unwrap();
        assert!(result.report.is_valid());
    }
}
