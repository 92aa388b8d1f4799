//! Bumped curve family generation.

use std::sync::Arc;

use log::debug;
use rayon::prelude::*;
use strata_config::BumpConfig;

use super::{BumpSpecification, BumpedCurveFamily, BumpedCurveMap, QuoteCalibrator, PARALLEL_BUMP_LABEL};
use crate::error::{CurveError, CurveResult};

/// Builds up and down bumped families from a [`QuoteCalibrator`].
///
/// Each scenario recalibrates from the base quotes with one bump applied,
/// so scenarios are independent and run on the rayon pool when the
/// configuration allows. Entries come back in instrument order either way.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScenarioGenerator {
    config: BumpConfig,
}

impl ScenarioGenerator {
    /// A generator with `config`.
    #[must_use]
    pub fn new(config: BumpConfig) -> Self {
        Self { config }
    }

    /// The bump settings.
    pub fn config(&self) -> &BumpConfig {
        &self.config
    }

    /// Calibrates the base curve and both bumped maps.
    pub fn generate<Q: QuoteCalibrator>(&self, calibrator: &Q) -> CurveResult<BumpedCurveFamily<Q::Curve>> {
        let amount = self.config.bump_amount();
        if !(amount.is_finite() && amount > 0.0) {
            return Err(CurveError::invalid_input(format!("bump size {amount} is not positive")));
        }
        let quotes = calibrator.base_quotes();
        let base = Arc::new(calibrator.calibrate(&quotes)?);
        let up = self.bumped_map(calibrator, &quotes, amount)?;
        let down = self.bumped_map(calibrator, &quotes, -amount)?;
        debug!(
            "generated bump family '{}': {} scenarios each way at {:.2}bp",
            calibrator.name(),
            up.len(),
            self.config.bump_bp
        );
        BumpedCurveFamily::new(base, up, down, amount)
    }

    /// One map of scenarios shifted by the signed `amount`.
    pub fn bumped_map<Q: QuoteCalibrator>(
        &self,
        calibrator: &Q,
        base_quotes: &[f64],
        amount: f64,
    ) -> CurveResult<BumpedCurveMap<Q::Curve>> {
        let mut scenarios: Vec<(String, BumpSpecification)> = calibrator
            .labels()
            .into_iter()
            .enumerate()
            .map(|(i, label)| (label, BumpSpecification::tenor(i, amount)))
            .collect();
        if self.config.include_parallel {
            scenarios.push((PARALLEL_BUMP_LABEL.to_string(), BumpSpecification::parallel(amount)));
        }

        let build = |(label, bump): (String, BumpSpecification)| -> CurveResult<(String, Arc<Q::Curve>)> {
            let quotes = bump.apply(base_quotes)?;
            let curve = calibrator.calibrate(&quotes).map_err(|e| {
                CurveError::calibration_failed(calibrator.name(), format!("{label} ({bump}): {e}"))
            })?;
            Ok((label, Arc::new(curve)))
        };

        let entries = if self.config.parallel_execution {
            scenarios.into_par_iter().map(build).collect::<CurveResult<Vec<_>>>()?
        } else {
            scenarios.into_iter().map(build).collect::<CurveResult<Vec<_>>>()?
        };
        BumpedCurveMap::new(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sums its quotes; fails on any quote above the cap.
    struct Summing {
        quotes: Vec<f64>,
        cap: f64,
    }

    impl QuoteCalibrator for Summing {
        type Curve = f64;

        fn name(&self) -> &str {
            "summing"
        }

        fn labels(&self) -> Vec<String> {
            (1..=self.quotes.len()).map(|i| format!("{i}Y")).collect()
        }

        fn base_quotes(&self) -> Vec<f64> {
            self.quotes.clone()
        }

        fn calibrate(&self, quotes: &[f64]) -> CurveResult<f64> {
            if quotes.iter().any(|q| *q > self.cap) {
                return Err(CurveError::invalid_input("quote above cap"));
            }
            Ok(quotes.iter().sum())
        }
    }

    #[test]
    fn test_family_shape() {
        let cal = Summing {
            quotes: vec![0.01, 0.02, 0.03],
            cap: 1.0,
        };
        let family = ScenarioGenerator::new(BumpConfig::standard()).generate(&cal).unwrap();
        assert_eq!(family.up().labels(), vec!["1Y", "2Y", "3Y", "bump"]);
        assert!((**family.up().get("2Y").unwrap() - 0.0601).abs() < 1e-15);
        assert!((**family.down().parallel().unwrap() - 0.0597).abs() < 1e-15);
        assert!((family.bump() - 1e-4).abs() < 1e-18);
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let cal = Summing {
            quotes: (0..20).map(|i| 0.01 + 0.001 * f64::from(i)).collect(),
            cap: 1.0,
        };
        let mut config = BumpConfig::standard();
        let parallel = ScenarioGenerator::new(config).generate(&cal).unwrap();
        config.parallel_execution = false;
        let sequential = ScenarioGenerator::new(config).generate(&cal).unwrap();
        assert_eq!(parallel.up().labels(), sequential.up().labels());
        for ((_, a), (_, b)) in parallel.down().iter().zip(sequential.down().iter()) {
            assert_eq!(**a, **b);
        }
    }

    #[test]
    fn test_one_failure_fails_the_family() {
        let cal = Summing {
            quotes: vec![0.01, 0.02, 0.99995],
            cap: 1.0,
        };
        let err = ScenarioGenerator::new(BumpConfig::standard()).generate(&cal).unwrap_err();
        assert!(matches!(err, CurveError::CalibrationFailure { .. }));
    }

    #[test]
    fn test_without_parallel_entry() {
        let cal = Summing {
            quotes: vec![0.01, 0.02],
            cap: 1.0,
        };
        let config = BumpConfig {
            include_parallel: false,
            ..BumpConfig::standard()
        };
        let family = ScenarioGenerator::new(config).generate(&cal).unwrap();
        assert!(family.up().parallel().is_none());
        assert_eq!(family.tenor_labels(), vec!["1Y", "2Y"]);
    }
}
