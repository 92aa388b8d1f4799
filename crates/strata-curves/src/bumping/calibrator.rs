//! Recalibration from a quote array.

use crate::builders::{CreditCurveBuilder, ScenarioDiscountCurveBuilder, ScenarioGovvieCurveBuilder};
use crate::calibration::{LatentStateKind, LatentStateStretchSpec, Smoothing};
use crate::curves::{CreditCurve, FundingCurve, GovvieCurve, QuantificationMetric};
use crate::error::{CurveError, CurveResult};

/// Something that rebuilds a curve from a full array of quotes.
///
/// The quotes line up with [`labels`](Self::labels); bump generation
/// shifts them and calls [`calibrate`](Self::calibrate) once per scenario.
pub trait QuoteCalibrator: Send + Sync {
    /// The curve produced.
    type Curve: Send + Sync;

    /// Family name used in logs and errors.
    fn name(&self) -> &str;

    /// Tenor label for each quote.
    fn labels(&self) -> Vec<String>;

    /// Unbumped quotes.
    fn base_quotes(&self) -> Vec<f64>;

    /// Calibrates a curve to `quotes`.
    fn calibrate(&self, quotes: &[f64]) -> CurveResult<Self::Curve>;
}

fn expect_kind(spec: &LatentStateStretchSpec, kind: LatentStateKind) -> CurveResult<()> {
    if spec.kind() == kind {
        Ok(())
    } else {
        Err(CurveError::invalid_input(format!(
            "'{}' is a {} stretch, expected {kind}",
            spec.name(),
            spec.kind()
        )))
    }
}

/// Funding curve rebuilt shape-preserving, optionally smoothed afterwards.
#[derive(Debug, Clone)]
pub struct FundingCalibration {
    builder: ScenarioDiscountCurveBuilder,
    spec: LatentStateStretchSpec,
    smoothing: Option<(Smoothing, QuantificationMetric)>,
}

impl FundingCalibration {
    /// Recalibrates `spec` with `builder`.
    pub fn new(builder: ScenarioDiscountCurveBuilder, spec: LatentStateStretchSpec) -> CurveResult<Self> {
        expect_kind(&spec, LatentStateKind::DiscountFactor)?;
        Ok(Self {
            builder,
            spec,
            smoothing: None,
        })
    }

    /// Smooths each recalibrated curve on `metric`.
    #[must_use]
    pub fn with_smoothing(mut self, smoothing: Smoothing, metric: QuantificationMetric) -> Self {
        self.smoothing = Some((smoothing, metric));
        self
    }

    /// The base spec.
    pub fn spec(&self) -> &LatentStateStretchSpec {
        &self.spec
    }
}

impl QuoteCalibrator for FundingCalibration {
    type Curve = FundingCurve;

    fn name(&self) -> &str {
        self.spec.name()
    }

    fn labels(&self) -> Vec<String> {
        self.spec.labels()
    }

    fn base_quotes(&self) -> Vec<f64> {
        self.spec.quotes()
    }

    fn calibrate(&self, quotes: &[f64]) -> CurveResult<FundingCurve> {
        let spec = self.spec.with_quotes(quotes)?;
        let curve = self.builder.calibrate(&spec)?.curve;
        match self.smoothing {
            None => Ok(curve),
            Some((smoothing, metric)) => Ok(self.builder.smooth_curve(&spec, &curve, smoothing, metric)?.curve),
        }
    }
}

/// Funding curve re-expressed through its instantaneous forward rates.
///
/// The shape-preserving discount curve is sampled for instantaneous
/// forwards at its knots and refitted, so a bump shows up as a local
/// forward-rate move rather than a discount-factor move.
#[derive(Debug, Clone)]
pub struct ForwardFundingCalibration {
    builder: ScenarioDiscountCurveBuilder,
    spec: LatentStateStretchSpec,
    smoothing: Smoothing,
}

impl ForwardFundingCalibration {
    /// Recalibrates `spec` with `builder` and the default local smoothing.
    pub fn new(builder: ScenarioDiscountCurveBuilder, spec: LatentStateStretchSpec) -> CurveResult<Self> {
        expect_kind(&spec, LatentStateKind::DiscountFactor)?;
        Ok(Self {
            builder,
            spec,
            smoothing: Smoothing::default(),
        })
    }

    /// Replaces the forward refit.
    #[must_use]
    pub fn with_smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }
}

impl QuoteCalibrator for ForwardFundingCalibration {
    type Curve = FundingCurve;

    fn name(&self) -> &str {
        self.spec.name()
    }

    fn labels(&self) -> Vec<String> {
        self.spec.labels()
    }

    fn base_quotes(&self) -> Vec<f64> {
        self.spec.quotes()
    }

    fn calibrate(&self, quotes: &[f64]) -> CurveResult<FundingCurve> {
        let spec = self.spec.with_quotes(quotes)?;
        let curve = self.builder.calibrate(&spec)?.curve;
        let forward = self
            .builder
            .smooth_curve(&spec, &curve, self.smoothing, QuantificationMetric::InstantaneousForward)?;
        Ok(forward.curve)
    }
}

/// Govvie curve rebuilt from bond quotes.
#[derive(Debug, Clone)]
pub struct GovvieCalibration {
    builder: ScenarioGovvieCurveBuilder,
    spec: LatentStateStretchSpec,
    epoch_yield: Option<f64>,
}

impl GovvieCalibration {
    /// Recalibrates `spec` with `builder`; `epoch_yield` as for
    /// [`ScenarioGovvieCurveBuilder::calibrate`].
    pub fn new(
        builder: ScenarioGovvieCurveBuilder,
        spec: LatentStateStretchSpec,
        epoch_yield: Option<f64>,
    ) -> CurveResult<Self> {
        expect_kind(&spec, LatentStateKind::GovvieYield)?;
        Ok(Self {
            builder,
            spec,
            epoch_yield,
        })
    }
}

impl QuoteCalibrator for GovvieCalibration {
    type Curve = GovvieCurve;

    fn name(&self) -> &str {
        self.spec.name()
    }

    fn labels(&self) -> Vec<String> {
        self.spec.labels()
    }

    fn base_quotes(&self) -> Vec<f64> {
        self.spec.quotes()
    }

    fn calibrate(&self, quotes: &[f64]) -> CurveResult<GovvieCurve> {
        let spec = self.spec.with_quotes(quotes)?;
        Ok(self.builder.calibrate(&spec, self.epoch_yield)?.curve)
    }
}

/// Credit curve bootstrapped from CDS spreads.
#[derive(Debug, Clone)]
pub struct CreditCalibration {
    builder: CreditCurveBuilder,
    spec: LatentStateStretchSpec,
}

impl CreditCalibration {
    /// Bootstraps `spec` with `builder`.
    pub fn new(builder: CreditCurveBuilder, spec: LatentStateStretchSpec) -> CurveResult<Self> {
        expect_kind(&spec, LatentStateKind::HazardRate)?;
        Ok(Self { builder, spec })
    }
}

impl QuoteCalibrator for CreditCalibration {
    type Curve = CreditCurve;

    fn name(&self) -> &str {
        self.spec.name()
    }

    fn labels(&self) -> Vec<String> {
        self.spec.labels()
    }

    fn base_quotes(&self) -> Vec<f64> {
        self.spec.quotes()
    }

    fn calibrate(&self, quotes: &[f64]) -> CurveResult<CreditCurve> {
        let spec = self.spec.with_quotes(quotes)?;
        Ok(self.builder.calibrate(&spec)?.curve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::fixtures::{deposit_leg, swap_leg, valuation};
    use crate::traits::Curve;
    use approx::assert_relative_eq;

    fn spec() -> LatentStateStretchSpec {
        LatentStateStretchSpec::new("USD", LatentStateKind::DiscountFactor, vec![deposit_leg(), swap_leg()]).unwrap()
    }

    #[test]
    fn test_base_quotes_reproduce_builder_curve() {
        let builder = ScenarioDiscountCurveBuilder::new(valuation());
        let cal = FundingCalibration::new(builder, spec()).unwrap();
        assert_eq!(cal.labels()[0], "1M");
        let curve = cal.calibrate(&cal.base_quotes()).unwrap();
        let direct = builder.calibrate(&spec()).unwrap().curve;
        assert_relative_eq!(
            curve.discount_factor(7.0).unwrap(),
            direct.discount_factor(7.0).unwrap(),
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_forward_funding_keeps_knot_forwards() {
        let builder = ScenarioDiscountCurveBuilder::new(valuation());
        let cal = ForwardFundingCalibration::new(builder, spec()).unwrap();
        let base = builder.calibrate(&spec()).unwrap().curve;
        let forward = cal.calibrate(&cal.base_quotes()).unwrap();
        assert_eq!(forward.metric(), QuantificationMetric::InstantaneousForward);
        for &t in base.knots().iter().skip(1) {
            assert_relative_eq!(
                forward.response(t),
                base.instantaneous_forward(t).unwrap(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_kind_is_checked() {
        let builder = ScenarioDiscountCurveBuilder::new(valuation());
        let govvie = LatentStateStretchSpec::new("X", LatentStateKind::GovvieYield, vec![swap_leg()]).unwrap();
        assert!(FundingCalibration::new(builder, govvie).is_err());
    }
}
