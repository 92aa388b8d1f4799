//! Payment frequency and rate compounding conventions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment frequency of a coupon or fixed leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Frequency {
    /// Once per year.
    Annual,
    /// Twice per year.
    #[default]
    SemiAnnual,
    /// Four times per year.
    Quarterly,
    /// Twelve times per year.
    Monthly,
}

impl Frequency {
    /// Number of periods per year.
    #[must_use]
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Annual => 1,
            Frequency::SemiAnnual => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
        }
    }

    /// Number of months in one period.
    #[must_use]
    pub fn months_per_period(&self) -> u32 {
        12 / self.periods_per_year()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Annual => "Annual",
            Frequency::SemiAnnual => "Semi-Annual",
            Frequency::Quarterly => "Quarterly",
            Frequency::Monthly => "Monthly",
        };
        write!(f, "{name}")
    }
}

/// Compounding convention linking a rate to a discount factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Compounding {
    /// Simple interest: `DF = 1 / (1 + r t)`.
    Simple,
    /// Annual compounding.
    Annual,
    /// Semi-annual compounding.
    SemiAnnual,
    /// Quarterly compounding.
    Quarterly,
    /// Monthly compounding.
    Monthly,
    /// Continuous compounding: `DF = exp(-r t)`.
    #[default]
    Continuous,
}

impl Compounding {
    /// Periods per year, `None` for simple and continuous.
    #[must_use]
    pub fn periods_per_year(&self) -> Option<f64> {
        match self {
            Compounding::Annual => Some(1.0),
            Compounding::SemiAnnual => Some(2.0),
            Compounding::Quarterly => Some(4.0),
            Compounding::Monthly => Some(12.0),
            Compounding::Simple | Compounding::Continuous => None,
        }
    }

    /// Discount factor implied by `rate` over `t` years.
    #[must_use]
    pub fn discount_factor(&self, rate: f64, t: f64) -> f64 {
        match self {
            Compounding::Simple => 1.0 / (1.0 + rate * t),
            Compounding::Continuous => (-rate * t).exp(),
            _ => {
                let n = self.periods_per_year().unwrap_or(1.0);
                (1.0 + rate / n).powf(-n * t)
            }
        }
    }

    /// Rate implied by discount factor `df` over `t` years.
    ///
    /// Returns 0 for `t <= 0`.
    #[must_use]
    pub fn zero_rate(&self, df: f64, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        match self {
            Compounding::Simple => (1.0 / df - 1.0) / t,
            Compounding::Continuous => -df.ln() / t,
            _ => {
                let n = self.periods_per_year().unwrap_or(1.0);
                n * (df.powf(-1.0 / (n * t)) - 1.0)
            }
        }
    }
}

impl From<Frequency> for Compounding {
    fn from(freq: Frequency) -> Self {
        match freq {
            Frequency::Annual => Compounding::Annual,
            Frequency::SemiAnnual => Compounding::SemiAnnual,
            Frequency::Quarterly => Compounding::Quarterly,
            Frequency::Monthly => Compounding::Monthly,
        }
    }
}
