//! Calendar date used for curve reference dates and cash flow schedules.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::error::{CoreError, CoreResult};
use crate::types::BusinessDayConvention;

/// A calendar date.
///
/// Newtype over `chrono::NaiveDate` with the month arithmetic and weekend
/// rolling needed by schedule generation.
///
/// # Example
///
/// ```rust
/// use strata_core::types::Date;
///
/// let date = Date::from_ymd(2025, 1, 31).unwrap();
/// let next = date.add_months(1).unwrap();
/// assert_eq!(next, Date::from_ymd(2025, 2, 28).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Creates a new date from year, month, and day.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> CoreResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Date)
            .ok_or_else(|| CoreError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Parses an ISO 8601 date (YYYY-MM-DD).
    pub fn parse(s: &str) -> CoreResult<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Date)
            .map_err(|_| CoreError::invalid_date(format!("Cannot parse: {s}")))
    }

    /// Wraps a `chrono` date.
    #[must_use]
    pub fn from_naive(date: NaiveDate) -> Self {
        Date(date)
    }

    /// Returns the underlying `chrono` date.
    #[must_use]
    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// Returns the year component.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Returns the month component (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Returns the day component (1-31).
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the weekday.
    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// True for Saturday and Sunday.
    #[must_use]
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Adds a signed number of calendar days.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Date(self.0 + chrono::Duration::days(days))
    }

    /// Adds a signed number of months, clamping the day to the month end.
    pub fn add_months(&self, months: i32) -> CoreResult<Self> {
        let total_months = self.year() * 12 + self.month() as i32 - 1 + months;
        let new_year = total_months.div_euclid(12);
        let new_month = (total_months.rem_euclid(12) + 1) as u32;
        let new_day = self.day().min(days_in_month(new_year, new_month));
        Self::from_ymd(new_year, new_month, new_day)
    }

    /// Adds a signed number of years.
    pub fn add_years(&self, years: i32) -> CoreResult<Self> {
        self.add_months(years * 12)
    }

    /// Adds business days, skipping weekends.
    #[must_use]
    pub fn add_business_days(&self, days: i32) -> Self {
        let step = if days >= 0 { 1 } else { -1 };
        let mut remaining = days.abs();
        let mut current = *self;
        while remaining > 0 {
            current = current.add_days(step);
            if !current.is_weekend() {
                remaining -= 1;
            }
        }
        current
    }

    /// Rolls the date onto a weekday under the given convention.
    #[must_use]
    pub fn adjust(&self, convention: BusinessDayConvention) -> Self {
        if !self.is_weekend() {
            return *self;
        }
        let following = self.roll_while_weekend(1);
        match convention {
            BusinessDayConvention::Unadjusted => *self,
            BusinessDayConvention::Following => following,
            BusinessDayConvention::Preceding => self.roll_while_weekend(-1),
            BusinessDayConvention::ModifiedFollowing => {
                if following.month() == self.month() {
                    following
                } else {
                    self.roll_while_weekend(-1)
                }
            }
        }
    }

    fn roll_while_weekend(&self, step: i64) -> Self {
        let mut current = *self;
        while current.is_weekend() {
            current = current.add_days(step);
        }
        current
    }

    /// Signed number of days from `self` to `other`.
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        (other.0 - self.0).num_days()
    }
}

/// Number of days in a month.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Add<i64> for Date {
    type Output = Date;

    fn add(self, days: i64) -> Self::Output {
        self.add_days(days)
    }
}

impl Sub<i64> for Date {
    type Output = Date;

    fn sub(self, days: i64) -> Self::Output {
        self.add_days(-days)
    }
}

impl Sub for Date {
    type Output = i64;

    fn sub(self, other: Date) -> Self::Output {
        other.days_between(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_months_clamps_month_end() {
        let d = Date::from_ymd(2024, 1, 31).unwrap();
        assert_eq!(d.add_months(1).unwrap(), Date::from_ymd(2024, 2, 29).unwrap());
        assert_eq!(d.add_months(-2).unwrap(), Date::from_ymd(2023, 11, 30).unwrap());
        assert_eq!(d.add_years(1).unwrap(), Date::from_ymd(2025, 1, 31).unwrap());
    }

    #[test]
    fn test_adjust() {
        // 2025-05-31 is a Saturday
        let sat = Date::from_ymd(2025, 5, 31).unwrap();
        assert_eq!(
            sat.adjust(BusinessDayConvention::Following),
            Date::from_ymd(2025, 6, 2).unwrap()
        );
        assert_eq!(
            sat.adjust(BusinessDayConvention::ModifiedFollowing),
            Date::from_ymd(2025, 5, 30).unwrap()
        );
        assert_eq!(sat.adjust(BusinessDayConvention::Unadjusted), sat);
    }

    #[test]
    fn test_business_days_and_arithmetic() {
        // Friday + 2 business days is Tuesday
        let fri = Date::from_ymd(2025, 6, 13).unwrap();
        assert_eq!(fri.add_business_days(2), Date::from_ymd(2025, 6, 17).unwrap());
        assert_eq!(Date::from_ymd(2025, 6, 17).unwrap() - fri, 4);
        assert_eq!((fri + 365).to_string(), "2026-06-13");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Date::parse("2025-03-14").unwrap().day(), 14);
        assert!(Date::parse("2025-13-01").is_err());
    }
}
