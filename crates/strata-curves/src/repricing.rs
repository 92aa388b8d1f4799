//! Repricing validation for calibrated curves.
//!
//! A shape-preserving curve must reprice every calibration instrument to
//! solver tolerance. Smoothed curves trade that away, and the report shows
//! by how much.

use std::fmt;

use crate::calibration::LatentStateStretchSpec;
use crate::error::CurveResult;
use crate::instruments::{CalibrationInstrument, InstrumentKind, QuoteMeasure};

/// One instrument repriced against a curve.
#[derive(Debug, Clone, PartialEq)]
pub struct RepricingCheck {
    /// Instrument label.
    pub label: String,
    /// Instrument family.
    pub kind: InstrumentKind,
    /// Quoted measure.
    pub measure: QuoteMeasure,
    /// Market quote.
    pub target: f64,
    /// Model value; NaN if pricing failed.
    pub model: f64,
    /// `|model - target|`, infinite if pricing failed.
    pub error: f64,
    /// Whether the error is within tolerance.
    pub passed: bool,
}

impl fmt::Display for RepricingCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "ok" } else { "FAIL" };
        write!(
            f,
            "{status:>4} {} {} | {}: target {:.8} model {:.8} | error {:.2e}",
            self.kind, self.label, self.measure, self.target, self.model, self.error
        )
    }
}

/// Repricing of every instrument in a spec.
#[derive(Debug, Clone, PartialEq)]
pub struct RepricingReport {
    checks: Vec<RepricingCheck>,
    tolerance: f64,
}

impl RepricingReport {
    /// Reprices every entry of `spec` with `price`.
    ///
    /// Price quotes are compared per 100 face, like their quotes.
    pub fn evaluate<P>(spec: &LatentStateStretchSpec, tolerance: f64, price: P) -> Self
    where
        P: Fn(&dyn CalibrationInstrument, QuoteMeasure) -> CurveResult<f64>,
    {
        let checks = spec
            .entries()
            .map(|(instrument, target, measure)| {
                let (model, error) = match price(instrument, measure) {
                    Ok(model) => (model, (model - target).abs()),
                    Err(_) => (f64::NAN, f64::INFINITY),
                };
                let scale = if measure == QuoteMeasure::Price { 0.01 } else { 1.0 };
                RepricingCheck {
                    label: instrument.label().to_string(),
                    kind: instrument.kind(),
                    measure,
                    target,
                    model,
                    error,
                    passed: error * scale <= tolerance,
                }
            })
            .collect();
        Self { checks, tolerance }
    }

    /// Individual checks in instrument order.
    #[must_use]
    pub fn checks(&self) -> &[RepricingCheck] {
        &self.checks
    }

    /// Tolerance applied to each check.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Largest absolute error.
    #[must_use]
    pub fn max_error(&self) -> f64 {
        self.checks.iter().map(|c| c.error).fold(0.0, f64::max)
    }

    /// Root mean square error.
    #[must_use]
    pub fn rms_error(&self) -> f64 {
        if self.checks.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.checks.iter().map(|c| c.error * c.error).sum();
        (sum / self.checks.len() as f64).sqrt()
    }

    /// True if every instrument repriced within tolerance.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Checks that failed.
    pub fn failures(&self) -> impl Iterator<Item = &RepricingCheck> {
        self.checks.iter().filter(|c| !c.passed)
    }
}

impl fmt::Display for RepricingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let passed = self.checks.iter().filter(|c| c.passed).count();
        writeln!(
            f,
            "Repricing: {passed}/{} within {:.1e} (max error {:.2e})",
            self.checks.len(),
            self.tolerance,
            self.max_error()
        )?;
        for check in &self.checks {
            writeln!(f, "  {check}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{CalibrationLeg, LatentStateKind};
    use crate::curves::DiscretelyCompoundedFlatRate;
    use crate::context::PricingContext;
    use crate::instruments::Deposit;
    use std::sync::Arc;
    use strata_core::{Currency, Date, Frequency, Tenor};

    #[test]
    fn test_report_flags_mismatch() {
        let spot = Date::from_ymd(2025, 1, 6).unwrap();
        let curve = DiscretelyCompoundedFlatRate::new(spot, Currency::USD, 0.04, Frequency::Annual).unwrap();
        let ctx = PricingContext::new(spot).with_funding(&curve);
        let instruments: Vec<Arc<dyn CalibrationInstrument>> = vec![
            Arc::new(Deposit::from_tenor(spot, Tenor::THREE_MONTHS, Currency::USD).unwrap()),
            Arc::new(Deposit::from_tenor(spot, Tenor::SIX_MONTHS, Currency::USD).unwrap()),
        ];
        let fair = instruments[0].measure(&ctx, QuoteMeasure::Rate).unwrap();
        let leg = CalibrationLeg::uniform(instruments, vec![fair, 0.05], QuoteMeasure::Rate).unwrap();
        let spec = LatentStateStretchSpec::new("USD", LatentStateKind::DiscountFactor, vec![leg]).unwrap();

        let report = RepricingReport::evaluate(&spec, 1e-10, |inst, m| inst.measure(&ctx, m));
        assert!(!report.is_valid());
        assert_eq!(report.failures().count(), 1);
        assert!(report.checks()[0].passed);
        assert!(report.max_error() > 0.005);
        assert!(report.to_string().contains("FAIL"));
    }
}
