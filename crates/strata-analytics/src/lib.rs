//! # Strata Analytics
//!
//! Bond analytics on calibrated Strata curves.
//!
//! This crate provides:
//!
//! - **Bonds**: fixed and floating coupons with call, put and amortization
//!   schedules
//! - **Pricing**: accrued, flows to workout, yield measures, durations and
//!   credit-risky pricing with a hazard basis
//! - **Workout**: yield-to-worst exercise resolution
//! - **Replication**: [`BondReplicator`] and its named-field
//!   [`BondReplicationRun`] with funding, govvie and credit key-rate durations
//! - **SIMM**: interest-rate margin aggregation across curve families
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use strata_analytics::prelude::*;
//!
//! let bond = Bond::builder("ACME 5 01/35", issue, maturity).fixed(0.05).build()?;
//! let replicator = BondReplicator::builder(bond, settlement, 101.25, funding)
//!     .credit(credit)
//!     .build()?;
//! let run = replicator.generate_run()?;
//! let krd = run.fields().tenor_map("Funding KRD");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]

pub mod bond;
pub mod error;
pub mod pricing;
pub mod replicator;
pub mod report;
pub mod simm;
pub mod workout;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bond::{Bond, BondBuilder, CouponPeriod, CouponSpec, ExerciseEntry, PrincipalStep};
    pub use crate::error::{AnalyticsError, AnalyticsResult};
    pub use crate::pricing::BondFlow;
    pub use crate::replicator::{fields, BondReplicator, BondReplicatorBuilder};
    pub use crate::report::{BondReplicationRun, Diagnostic, FieldValue, NamedField, NamedFieldMap, TenorValues};
    pub use crate::simm::{
        curvature_covariance, linear_covariance, FamilyPair, IrCovarianceAggregate, IrCurveFamily,
        RiskFactorAggregateIr, TenorCorrelation,
    };
    pub use crate::workout::{Workout, WorkoutKind};
}

pub use bond::{Bond, BondBuilder};
pub use error::{AnalyticsError, AnalyticsResult};
pub use replicator::{BondReplicator, BondReplicatorBuilder};
pub use report::{BondReplicationRun, FieldValue, NamedFieldMap};
