//! Quote bumping and recalibrated scenario families.
//!
//! Sensitivities are finite differences between curves recalibrated from
//! bumped quotes, not shifts applied to a finished curve:
//!
//! - [`BumpSpecification`]: parallel or single-tenor shift of a quote array
//! - [`QuoteCalibrator`]: rebuilds a curve from quotes; implemented for
//!   funding, forward funding, govvie and credit calibrations
//! - [`ScenarioGenerator`]: base curve plus up and down [`BumpedCurveMap`]s
//!   keyed by tenor label, with an optional `"bump"` parallel entry
//!
//! # Example: key-rate sensitivities
//!
//! ```rust,ignore
//! use strata_curves::bumping::{FundingCalibration, ScenarioGenerator};
//!
//! let calibration = FundingCalibration::new(builder, spec)?;
//! let family = ScenarioGenerator::new(BumpConfig::standard()).generate(&calibration)?;
//!
//! let krd = family.central_differences(|curve| bond_price(curve))?;
//! ```

mod calibrator;
mod family;
mod generator;
mod spec;

pub use calibrator::{
    CreditCalibration, ForwardFundingCalibration, FundingCalibration, GovvieCalibration, QuoteCalibrator,
};
pub use family::{BumpedCurveFamily, BumpedCurveMap, PARALLEL_BUMP_LABEL};
pub use generator::ScenarioGenerator;
pub use spec::{BumpPolicy, BumpSpecification};
