//! # Strata Curves
//!
//! Curve calibration and scenario generation for the Strata risk library.
//!
//! This crate provides:
//!
//! - **Curve Traits**: [`Curve`], [`ForwardRateSource`] and [`GovvieYieldSource`]
//! - **Curves**: stretch-backed funding, forward and govvie curves, a
//!   piecewise-flat [`CreditCurve`] and [`DiscretelyCompoundedFlatRate`]
//! - **Instruments**: deposits, FRAs, futures, swaps, treasury bonds and CDS
//!   quoted on a named [`QuoteMeasure`]
//! - **Calibration**: shape-preserving left-to-right calibration, global and
//!   local smoothing, and the two-stage DENSE scheme
//! - **Bumping**: per-tenor and parallel scenario families, built in parallel
//! - **Market State**: an immutable bundle of curves and fixings
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use strata_curves::prelude::*;
//!
//! let deposits = CalibrationLeg::uniform(deposit_instruments, deposit_rates, QuoteMeasure::Rate)?;
//! let swaps = CalibrationLeg::uniform(swap_instruments, swap_rates, QuoteMeasure::SwapRate)?;
//!
//! let result = ScenarioDiscountCurveBuilder::new(valuation_date)
//!     .shape_preserving("USD-FUNDING", vec![deposits, swaps])?;
//! assert!(result.report.is_valid());
//!
//! let df = result.curve.discount_factor(5.0)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]

pub mod builders;
pub mod bumping;
pub mod calibration;
pub mod cashflows;
pub mod context;
pub mod curves;
pub mod error;
pub mod instruments;
pub mod market;
pub mod repricing;
pub mod traits;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::builders::{
        CreditCurveBuilder, DenseStages, ScenarioDiscountCurveBuilder, ScenarioForwardCurveBuilder,
        ScenarioGovvieCurveBuilder,
    };
    pub use crate::bumping::{
        BumpPolicy, BumpSpecification, BumpedCurveFamily, BumpedCurveMap, CreditCalibration,
        ForwardFundingCalibration, FundingCalibration, GovvieCalibration, QuoteCalibrator,
        ScenarioGenerator,
    };
    pub use crate::calibration::{
        CalibrationLeg, CalibrationResult, LatentStateKind, LatentStateStretchSpec, Smoothing,
    };
    pub use crate::cashflows::CashFlow;
    pub use crate::context::{Fixings, PricingContext};
    pub use crate::curves::{
        CreditCurve, DiscretelyCompoundedFlatRate, ForwardCurve, FundingCurve, GovvieCurve,
        QuantificationMetric,
    };
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::instruments::{
        CalibrationInstrument, CreditDefaultSwap, Deposit, Fra, InstrumentKind, QuoteMeasure,
        RateFuture, Swap, TreasuryBond,
    };
    pub use crate::market::{BumpedMarketStates, MarketState, MarketStateBuilder};
    pub use crate::repricing::{RepricingCheck, RepricingReport};
    pub use crate::traits::{Curve, ForwardRateSource, GovvieYieldSource};
}

pub use curves::{
    CreditCurve, DiscretelyCompoundedFlatRate, ForwardCurve, FundingCurve, GovvieCurve,
    QuantificationMetric,
};
pub use error::{CurveError, CurveResult};
pub use traits::{Curve, ForwardRateSource, GovvieYieldSource};
