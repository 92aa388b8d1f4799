//! # Strata Core
//!
//! Core types shared by every Strata crate.
//!
//! - **Dates**: [`Date`] wrapper with month arithmetic and weekend-aware rolling
//! - **Tenors**: [`Tenor`] parsing ("ON", "2W", "3M", "5Y") and date walking
//! - **Conventions**: [`Frequency`], [`Compounding`], [`DayCount`], [`BusinessDayConvention`]
//! - **Currencies**: ISO currency codes used to key curves
//! - **Schedules**: unadjusted period dates rolled backward from termination
//!
//! Calendars beyond weekends are out of scope; holiday-aware rolling belongs
//! to the caller.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

pub mod daycounts;
pub mod error;
pub mod schedule;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::daycounts::DayCount;
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{
        BusinessDayConvention, Compounding, Currency, Date, Frequency, Tenor, TenorUnit,
    };
}

pub use error::{CoreError, CoreResult};
pub use types::{BusinessDayConvention, Compounding, Currency, Date, Frequency, Tenor, TenorUnit};
