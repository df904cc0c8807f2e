//! Remaining-months calculation.
//!
//! Counts the payroll months left in a fiscal year, including the month the
//! payroll period starts in.

use chrono::{Datelike, NaiveDate};

use super::fiscal_year::{FISCAL_YEAR_END_MONTH, fiscal_year_for, parse_fiscal_year_start};

/// Number of months in a fiscal year.
pub const MONTHS_IN_FISCAL_YEAR: u32 = 12;

/// Computes how many fiscal months remain from `start_date`, inclusive.
///
/// When `fiscal_year` is `None` it is derived from `start_date`. A missing
/// start date yields a full year. The result is always in `1..=12`.
///
/// # Examples
///
/// ```
/// use hr_payroll_engine::calculation::months_remaining_in_fiscal;
/// use chrono::NaiveDate;
///
/// let july = NaiveDate::from_ymd_opt(2025, 7, 1);
/// assert_eq!(months_remaining_in_fiscal(july, Some("2025-26")), 9);
///
/// let april = NaiveDate::from_ymd_opt(2025, 4, 1);
/// assert_eq!(months_remaining_in_fiscal(april, None), 12);
/// ```
pub fn months_remaining_in_fiscal(start_date: Option<NaiveDate>, fiscal_year: Option<&str>) -> u32 {
    let Some(start_date) = start_date else {
        return MONTHS_IN_FISCAL_YEAR;
    };

    let derived;
    let fiscal_year = match fiscal_year.filter(|fy| !fy.trim().is_empty()) {
        Some(fy) => fy,
        None => {
            derived = fiscal_year_for(start_date);
            &derived
        }
    };

    let fiscal_end_year = i64::from(parse_fiscal_year_start(Some(fiscal_year))) + 1;
    let months = (fiscal_end_year - i64::from(start_date.year())) * 12
        + (i64::from(FISCAL_YEAR_END_MONTH) - i64::from(start_date.month()))
        + 1;

    months.clamp(1, i64::from(MONTHS_IN_FISCAL_YEAR)) as u32
}
