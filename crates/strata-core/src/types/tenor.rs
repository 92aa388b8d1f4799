//! Tenors such as "3M" or "10Y" and walking dates by them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::types::{BusinessDayConvention, Date};

/// Unit of a tenor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TenorUnit {
    /// Calendar days.
    Day,
    /// Weeks of seven days.
    Week,
    /// Calendar months.
    Month,
    /// Calendar years.
    Year,
}

impl TenorUnit {
    fn suffix(self) -> char {
        match self {
            TenorUnit::Day => 'D',
            TenorUnit::Week => 'W',
            TenorUnit::Month => 'M',
            TenorUnit::Year => 'Y',
        }
    }
}

/// A period length such as "3M".
///
/// ```rust
/// use strata_core::types::{Date, Tenor};
///
/// let tenor: Tenor = "18M".parse().unwrap();
/// let start = Date::from_ymd(2025, 1, 15).unwrap();
/// assert_eq!(tenor.add_to(start).unwrap(), Date::from_ymd(2026, 7, 15).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tenor {
    count: u32,
    unit: TenorUnit,
}

impl Tenor {
    /// One month.
    pub const ONE_MONTH: Tenor = Tenor { count: 1, unit: TenorUnit::Month };
    /// Three months.
    pub const THREE_MONTHS: Tenor = Tenor { count: 3, unit: TenorUnit::Month };
    /// Six months.
    pub const SIX_MONTHS: Tenor = Tenor { count: 6, unit: TenorUnit::Month };
    /// One year.
    pub const ONE_YEAR: Tenor = Tenor { count: 1, unit: TenorUnit::Year };

    /// Creates a tenor; a zero count is rejected.
    pub fn new(count: u32, unit: TenorUnit) -> CoreResult<Self> {
        if count == 0 {
            return Err(CoreError::invalid_tenor(
                format!("0{}", unit.suffix()),
                "tenor length must be positive",
            ));
        }
        Ok(Self { count, unit })
    }

    /// Shorthand for a month tenor.
    pub fn months(count: u32) -> CoreResult<Self> {
        Self::new(count, TenorUnit::Month)
    }

    /// Shorthand for a year tenor.
    pub fn years(count: u32) -> CoreResult<Self> {
        Self::new(count, TenorUnit::Year)
    }

    /// Number of units.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// The unit.
    #[must_use]
    pub fn unit(&self) -> TenorUnit {
        self.unit
    }

    /// Tenor length in years, using 365 days and 12 months per year.
    #[must_use]
    pub fn approx_years(&self) -> f64 {
        let n = f64::from(self.count);
        match self.unit {
            TenorUnit::Day => n / 365.0,
            TenorUnit::Week => 7.0 * n / 365.0,
            TenorUnit::Month => n / 12.0,
            TenorUnit::Year => n,
        }
    }

    /// Adds `multiple` copies of the tenor to `date` without rolling.
    ///
    /// Month and year multiples are added in one step from `date`, so the
    /// sequence `add_multiple(d, 1..n)` never drifts after a month-end clamp.
    pub fn add_multiple(&self, date: Date, multiple: i32) -> CoreResult<Date> {
        let n = self.count as i32 * multiple;
        match self.unit {
            TenorUnit::Day => Ok(date.add_days(i64::from(n))),
            TenorUnit::Week => Ok(date.add_days(7 * i64::from(n))),
            TenorUnit::Month => date.add_months(n),
            TenorUnit::Year => date.add_years(n),
        }
    }

    /// Adds the tenor to `date` without rolling.
    pub fn add_to(&self, date: Date) -> CoreResult<Date> {
        self.add_multiple(date, 1)
    }

    /// Adds the tenor and rolls the result onto a business day.
    pub fn add_adjusted(&self, date: Date, convention: BusinessDayConvention) -> CoreResult<Date> {
        Ok(self.add_to(date)?.adjust(convention))
    }
}

impl FromStr for Tenor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_uppercase();
        match text.as_str() {
            "ON" | "O/N" => return Self::new(1, TenorUnit::Day),
            "TN" | "T/N" => return Self::new(2, TenorUnit::Day),
            _ => {}
        }
        let Some(last) = text.chars().last() else {
            return Err(CoreError::invalid_tenor(s, "empty tenor"));
        };
        let unit = match last {
            'D' => TenorUnit::Day,
            'W' => TenorUnit::Week,
            'M' => TenorUnit::Month,
            'Y' => TenorUnit::Year,
            _ => return Err(CoreError::invalid_tenor(s, "unknown unit")),
        };
        let count = text[..text.len() - 1]
            .parse::<u32>()
            .map_err(|_| CoreError::invalid_tenor(s, "count is not a positive integer"))?;
        Self::new(count, unit)
    }
}

impl TryFrom<String> for Tenor {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tenor> for String {
    fn from(tenor: Tenor) -> Self {
        tenor.to_string()
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.unit.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_and_display() {
        assert_eq!("3m".parse::<Tenor>().unwrap().to_string(), "3M");
        assert_eq!("ON".parse::<Tenor>().unwrap().to_string(), "1D");
        assert!("0Y".parse::<Tenor>().is_err());
        assert!("5Q".parse::<Tenor>().is_err());
        assert!("".parse::<Tenor>().is_err());
        assert_relative_eq!("6M".parse::<Tenor>().unwrap().approx_years(), 0.5);
    }

    #[test]
    fn test_add_multiple_does_not_drift() {
        let start = Date::from_ymd(2025, 1, 31).unwrap();
        let m = Tenor::months(1).unwrap();
        assert_eq!(m.add_multiple(start, 1).unwrap(), Date::from_ymd(2025, 2, 28).unwrap());
        assert_eq!(m.add_multiple(start, 2).unwrap(), Date::from_ymd(2025, 3, 31).unwrap());
    }

    #[test]
    fn test_add_adjusted() {
        // 2025-08-30 is a Saturday; modified following would cross into September
        let start = Date::from_ymd(2025, 5, 30).unwrap();
        let t = Tenor::months(3).unwrap();
        assert_eq!(
            t.add_adjusted(start, BusinessDayConvention::ModifiedFollowing).unwrap(),
            Date::from_ymd(2025, 8, 29).unwrap()
        );
    }

    #[test]
    fn test_serde() {
        let t: Tenor = serde_json::from_str("\"10Y\"").unwrap();
        assert_eq!(t, Tenor::years(10).unwrap());
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"10Y\"");
    }
}
