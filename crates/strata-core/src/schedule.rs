//! Unadjusted coupon schedules rolled backward from a termination date.

use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// Period boundaries from `start` to `end`, generated backward from `end`.
///
/// Each date is `end` minus a whole multiple of `months`, added in one step so
/// month-end clamping never drifts. Any short stub lands at the front. The
/// result starts with `start` and ends with `end`.
///
/// ```rust
/// use strata_core::schedule::backward_schedule;
/// use strata_core::Date;
///
/// let start = Date::from_ymd(2025, 3, 10).unwrap();
/// let end = Date::from_ymd(2026, 6, 15).unwrap();
/// let dates = backward_schedule(start, end, 6).unwrap();
/// assert_eq!(dates.len(), 4);
/// assert_eq!(dates[1], Date::from_ymd(2025, 6, 15).unwrap());
/// ```
pub fn backward_schedule(start: Date, end: Date, months: u32) -> CoreResult<Vec<Date>> {
    if end <= start {
        return Err(CoreError::invalid_input(format!(
            "schedule end {end} is not after start {start}"
        )));
    }
    if months == 0 {
        return Err(CoreError::invalid_input("schedule period must be at least one month"));
    }
    let step = i32::try_from(months)
        .map_err(|_| CoreError::invalid_input(format!("period of {months} months is too long")))?;

    let mut dates = vec![end];
    let mut k = 1;
    loop {
        let date = end.add_months(-step * k)?;
        if date <= start {
            break;
        }
        dates.push(date);
        k += 1;
    }
    dates.push(start);
    dates.reverse();
    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_regular_schedule() {
        let dates = backward_schedule(d(2025, 1, 15), d(2027, 1, 15), 12).unwrap();
        assert_eq!(dates, vec![d(2025, 1, 15), d(2026, 1, 15), d(2027, 1, 15)]);
    }

    #[test]
    fn test_month_end_does_not_drift() {
        let dates = backward_schedule(d(2025, 1, 1), d(2025, 8, 31), 3).unwrap();
        assert_eq!(
            dates,
            vec![d(2025, 1, 1), d(2025, 2, 28), d(2025, 5, 31), d(2025, 8, 31)]
        );
    }

    #[test]
    fn test_rejects_inverted_dates() {
        assert!(backward_schedule(d(2025, 1, 1), d(2025, 1, 1), 3).is_err());
        assert!(backward_schedule(d(2025, 1, 1), d(2026, 1, 1), 0).is_err());
    }
}
