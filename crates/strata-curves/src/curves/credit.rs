//! Piecewise-flat hazard rate curves.

use strata_core::Date;

use crate::error::{CurveError, CurveResult};

/// Default intensity curve with a fixed recovery rate.
///
/// Hazard `hazards[i]` applies on `(times[i-1], times[i]]`, the first piece
/// starting at zero and the last one extended to infinity.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditCurve {
    reference_date: Date,
    times: Vec<f64>,
    hazards: Vec<f64>,
    recovery: f64,
}

impl CreditCurve {
    /// Creates a curve from pillar times and the hazard on each piece.
    pub fn new(reference_date: Date, times: Vec<f64>, hazards: Vec<f64>, recovery: f64) -> CurveResult<Self> {
        if times.is_empty() || times.len() != hazards.len() {
            return Err(CurveError::invalid_input(format!(
                "{} hazard rates for {} pillars",
                hazards.len(),
                times.len()
            )));
        }
        if !(0.0..1.0).contains(&recovery) {
            return Err(CurveError::invalid_input(format!("recovery {recovery} outside [0, 1)")));
        }
        let mut previous = 0.0;
        for (i, (&t, &h)) in times.iter().zip(&hazards).enumerate() {
            if !(t > previous) || !t.is_finite() {
                return Err(CurveError::invalid_input(format!(
                    "pillar {i} at {t} does not follow {previous}"
                )));
            }
            if !h.is_finite() {
                return Err(CurveError::invalid_input(format!("hazard {i} is not finite")));
            }
            previous = t;
        }
        Ok(Self {
            reference_date,
            times,
            hazards,
            recovery,
        })
    }

    /// A single hazard rate for all maturities.
    pub fn flat(reference_date: Date, hazard: f64, recovery: f64) -> CurveResult<Self> {
        Self::new(reference_date, vec![1.0], vec![hazard], recovery)
    }

    /// The curve's reference date.
    #[must_use]
    pub fn reference_date(&self) -> Date {
        self.reference_date
    }

    /// Recovery rate on default.
    #[must_use]
    pub fn recovery(&self) -> f64 {
        self.recovery
    }

    /// Pillar times.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Hazard rate on each piece.
    #[must_use]
    pub fn hazards(&self) -> &[f64] {
        &self.hazards
    }

    /// ACT/365F time from the reference date to `date`.
    #[must_use]
    pub fn year_fraction(&self, date: Date) -> f64 {
        self.reference_date.days_between(&date) as f64 / 365.0
    }

    /// Hazard rate in force at `t`.
    #[must_use]
    pub fn hazard_rate(&self, t: f64) -> f64 {
        let idx = self.times.partition_point(|&p| p < t);
        self.hazards[idx.min(self.hazards.len() - 1)]
    }

    /// Probability of surviving to `t`: `exp(-∫₀ᵗ h)`.
    #[must_use]
    pub fn survival_probability(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 1.0;
        }
        let mut integral = 0.0;
        let mut start = 0.0;
        for (i, (&end, &h)) in self.times.iter().zip(&self.hazards).enumerate() {
            let last = i + 1 == self.times.len();
            let stop = if last { t } else { t.min(end) };
            integral += h * (stop - start);
            if t <= end || last {
                break;
            }
            start = end;
        }
        (-integral).exp()
    }

    /// Survival probability to `date`.
    #[must_use]
    pub fn survival_at(&self, date: Date) -> f64 {
        self.survival_probability(self.year_fraction(date))
    }

    /// A copy with every hazard shifted by `basis`.
    #[must_use]
    pub fn shifted(&self, basis: f64) -> Self {
        Self {
            reference_date: self.reference_date,
            times: self.times.clone(),
            hazards: self.hazards.iter().map(|h| h + basis).collect(),
            recovery: self.recovery,
        }
    }

    /// A copy with the first `pillars` pieces and a trailing hazard `hazard`.
    pub(crate) fn extended(&self, pillars: usize, time: f64, hazard: f64) -> Self {
        let mut times = self.times[..pillars.min(self.times.len())].to_vec();
        let mut hazards = self.hazards[..times.len()].to_vec();
        times.push(time);
        hazards.push(hazard);
        Self {
            reference_date: self.reference_date,
            times,
            hazards,
            recovery: self.recovery,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date() -> Date {
        Date::from_ymd(2025, 1, 2).unwrap()
    }

    #[test]
    fn test_flat_survival() {
        let curve = CreditCurve::flat(date(), 0.02, 0.4).unwrap();
        assert_relative_eq!(curve.survival_probability(5.0), (-0.1f64).exp(), epsilon = 1e-14);
        assert_eq!(curve.survival_probability(-1.0), 1.0);
        assert_relative_eq!(curve.hazard_rate(30.0), 0.02);
    }

    #[test]
    fn test_piecewise_survival() {
        let curve = CreditCurve::new(date(), vec![1.0, 3.0], vec![0.01, 0.03], 0.4).unwrap();
        assert_relative_eq!(curve.survival_probability(0.5), (-0.005f64).exp(), epsilon = 1e-14);
        assert_relative_eq!(curve.survival_probability(2.0), (-0.04f64).exp(), epsilon = 1e-14);
        assert_relative_eq!(curve.survival_probability(5.0), (-0.13f64).exp(), epsilon = 1e-14);
        assert_relative_eq!(curve.hazard_rate(1.0), 0.01);
        assert_relative_eq!(curve.hazard_rate(1.5), 0.03);

        let shifted = curve.shifted(0.01);
        assert_relative_eq!(shifted.survival_probability(2.0), (-0.06f64).exp(), epsilon = 1e-14);
    }

    #[test]
    fn test_validation() {
        assert!(CreditCurve::new(date(), vec![1.0, 1.0], vec![0.01, 0.02], 0.4).is_err());
        assert!(CreditCurve::new(date(), vec![1.0], vec![0.01], 1.0).is_err());
        assert!(CreditCurve::new(date(), vec![], vec![], 0.4).is_err());
    }
}
