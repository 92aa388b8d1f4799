//! Day count conventions for accrual fractions.

use serde::{Deserialize, Serialize};

use crate::types::Date;

/// Accrual day count convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DayCount {
    /// Actual days over 360.
    #[default]
    Act360,
    /// Actual days over 365.
    Act365Fixed,
    /// 30/360 bond basis.
    Thirty360,
}

impl DayCount {
    /// Year fraction between two dates (negative if `end < start`).
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCount::Act360 => start.days_between(&end) as f64 / 360.0,
            DayCount::Act365Fixed => start.days_between(&end) as f64 / 365.0,
            DayCount::Thirty360 => {
                let d1 = start.day().min(30);
                let d2 = if d1 == 30 { end.day().min(30) } else { end.day() };
                let days = 360 * (end.year() - start.year())
                    + 30 * (end.month() as i32 - start.month() as i32)
                    + (d2 as i32 - d1 as i32);
                f64::from(days) / 360.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_year_fractions() {
        let a = Date::from_ymd(2025, 1, 15).unwrap();
        let b = Date::from_ymd(2025, 7, 15).unwrap();
        assert_relative_eq!(DayCount::Act360.year_fraction(a, b), 181.0 / 360.0);
        assert_relative_eq!(DayCount::Act365Fixed.year_fraction(a, b), 181.0 / 365.0);
        assert_relative_eq!(DayCount::Thirty360.year_fraction(a, b), 0.5);
    }

    #[test]
    fn test_thirty360_month_end() {
        let a = Date::from_ymd(2025, 1, 31).unwrap();
        let b = Date::from_ymd(2025, 3, 31).unwrap();
        assert_relative_eq!(DayCount::Thirty360.year_fraction(a, b), 60.0 / 360.0);
    }
}
