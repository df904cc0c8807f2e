//! Probation period computation.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// The three dates derived from a joining date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProbationDates {
    /// First day of probation; the joining date.
    pub start: NaiveDate,
    /// Last day of probation, inclusive.
    pub end: NaiveDate,
    /// The day after the last probation day.
    pub confirmation: NaiveDate,
}

/// Computes probation dates for a joining date and probation length.
///
/// A missing joining date is taken to be `today`.
///
/// # Examples
///
/// ```
/// use hr_payroll_engine::lifecycle::probation_dates;
/// use chrono::NaiveDate;
///
/// let joined = NaiveDate::from_ymd_opt(2025, 1, 1);
/// let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// let dates = probation_dates(joined, 90, today);
///
/// assert_eq!(dates.end, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
/// assert_eq!(dates.confirmation, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
/// ```
pub fn probation_dates(
    date_of_joining: Option<NaiveDate>,
    days: u32,
    today: NaiveDate,
) -> ProbationDates {
    let start = date_of_joining.unwrap_or(today);
    let offset = |n: i64| start.checked_add_signed(Duration::days(n)).unwrap_or(start);

    ProbationDates {
        start,
        end: offset(i64::from(days) - 1),
        confirmation: offset(i64::from(days)),
    }
}
