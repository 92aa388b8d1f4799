//! Scenario curve builders.
//!
//! Each builder turns calibration legs into a stretch-backed curve and a
//! [`RepricingReport`](crate::repricing::RepricingReport):
//!
//! - [`ScenarioDiscountCurveBuilder`]: funding discount factors, with
//!   smoothing and the two-stage DENSE scheme ([`DenseStages`])
//! - [`ScenarioForwardCurveBuilder`]: index forward rates discounted off a
//!   fixed funding curve
//! - [`ScenarioGovvieCurveBuilder`]: government bond yields
//! - [`CreditCurveBuilder`]: piecewise-flat hazard rates from CDS spreads

mod credit;
mod discount;
mod forward;
mod govvie;

pub use credit::CreditCurveBuilder;
pub use discount::{DenseStages, ScenarioDiscountCurveBuilder};
pub use forward::ScenarioForwardCurveBuilder;
pub use govvie::ScenarioGovvieCurveBuilder;

use strata_math::spline::{BoundaryCondition, SequentialCalibrator};

use strata_config::CalibrationConfig;

pub(crate) fn calibrator(config: &CalibrationConfig, boundary: BoundaryCondition) -> SequentialCalibrator {
    SequentialCalibrator::new(config.control, boundary).with_config(config.solver_config())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use strata_core::{Currency, Date, Tenor};

    use crate::calibration::CalibrationLeg;
    use crate::instruments::{CalibrationInstrument, Deposit, QuoteMeasure, Swap};

    pub fn valuation() -> Date {
        Date::from_ymd(2025, 1, 15).unwrap()
    }

    pub fn spot() -> Date {
        valuation().add_business_days(2)
    }

    pub fn deposit_leg() -> CalibrationLeg {
        let tenors = ["1M", "3M", "6M"];
        let rates = vec![0.0430, 0.0435, 0.0440];
        let instruments = tenors
            .iter()
            .map(|t| {
                let tenor: Tenor = t.parse().unwrap();
                Arc::new(Deposit::from_tenor(spot(), tenor, Currency::USD).unwrap()) as Arc<dyn CalibrationInstrument>
            })
            .collect();
        CalibrationLeg::uniform(instruments, rates, QuoteMeasure::Rate).unwrap()
    }

    pub fn swap_leg() -> CalibrationLeg {
        let tenors = ["1Y", "2Y", "3Y", "5Y", "7Y", "10Y"];
        let rates = vec![0.0420, 0.0405, 0.0398, 0.0395, 0.0400, 0.0410];
        let instruments = tenors
            .iter()
            .map(|t| {
                let tenor: Tenor = t.parse().unwrap();
                Arc::new(Swap::from_tenor(spot(), tenor, Currency::USD).unwrap()) as Arc<dyn CalibrationInstrument>
            })
            .collect();
        CalibrationLeg::uniform(instruments, rates, QuoteMeasure::SwapRate).unwrap()
    }
}
