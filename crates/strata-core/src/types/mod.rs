//! Core value types.

mod business_day;
mod currency;
mod date;
mod frequency;
mod tenor;

pub use business_day::BusinessDayConvention;
pub use currency::Currency;
pub use date::{days_in_month, Date};
pub use frequency::{Compounding, Frequency};
pub use tenor::{Tenor, TenorUnit};
