//! Weekend business-day rolling conventions.

use serde::{Deserialize, Serialize};

/// How a date falling on a weekend is moved onto a business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BusinessDayConvention {
    /// Leave the date as is.
    Unadjusted,
    /// Next business day.
    Following,
    /// Next business day unless that crosses a month end, then previous.
    #[default]
    ModifiedFollowing,
    /// Previous business day.
    Preceding,
}
