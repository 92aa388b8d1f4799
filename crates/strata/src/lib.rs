//! # Strata
//!
//! Curve calibration, scenario bumping and sensitivity analytics.
//!
//! This crate re-exports the member crates under one name:
//!
//! - [`types`]: dates, tenors, frequencies and day counts
//! - [`math`]: root finding, tolerance helpers, linear solves and the spline engine
//! - [`config`]: calibration, bumping, replication and SIMM settings
//! - [`curves`]: curve calibration, bumped families and market states
//! - [`analytics`]: bond replication and SIMM aggregation

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use strata_analytics as analytics;
pub use strata_config as config;
pub use strata_core as types;
pub use strata_curves as curves;
pub use strata_math as math;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use strata_analytics::prelude::*;
    pub use strata_config::{BumpConfig, ReplicationConfig, SimmConfig, StrataConfig, Validate};
    pub use strata_core::daycounts::DayCount;
    pub use strata_core::{Compounding, Currency, Date, Frequency, Tenor};
    pub use strata_curves::prelude::*;
}
