//! Interest-rate curve families of a currency bucket.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// A sub-curve of one currency's interest-rate bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IrCurveFamily {
    /// Overnight index swap curve.
    Ois,
    /// One-month LIBOR.
    Libor1M,
    /// Three-month LIBOR.
    Libor3M,
    /// Six-month LIBOR.
    Libor6M,
    /// Twelve-month LIBOR.
    Libor12M,
    /// Prime rate.
    Prime,
    /// Municipal curve.
    Municipal,
}

impl IrCurveFamily {
    /// Every family, in aggregation order.
    pub const ALL: [Self; 7] = [
        Self::Ois,
        Self::Libor1M,
        Self::Libor3M,
        Self::Libor6M,
        Self::Libor12M,
        Self::Prime,
        Self::Municipal,
    ];

    /// Short label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ois => "OIS",
            Self::Libor1M => "LIBOR1M",
            Self::Libor3M => "LIBOR3M",
            Self::Libor6M => "LIBOR6M",
            Self::Libor12M => "LIBOR12M",
            Self::Prime => "PRIME",
            Self::Municipal => "MUNICIPAL",
        }
    }
}

impl fmt::Display for IrCurveFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for IrCurveFamily {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|family| family.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AnalyticsError::invalid_input(format!("unknown curve family '{s}'")))
    }
}
