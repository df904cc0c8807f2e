//! Fiscal year resolution.
//!
//! Fiscal years run from 1 April to 31 March and are labelled
//! `"<startYear>-<endYear>"`. Both `"2025-26"` and `"2025-2026"` are accepted
//! when parsing; derived labels always use the four-digit end year.

use chrono::{Datelike, NaiveDate};

use super::dates::today;

/// First month of the fiscal year (April).
pub const FISCAL_YEAR_START_MONTH: u32 = 4;

/// Last month of the fiscal year (March).
pub const FISCAL_YEAR_END_MONTH: u32 = 3;

/// Returns the fiscal year label a date falls in.
///
/// # Examples
///
/// ```
/// use hr_payroll_engine::calculation::fiscal_year_for;
/// use chrono::NaiveDate;
///
/// assert_eq!(fiscal_year_for(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()), "2025-2026");
/// assert_eq!(fiscal_year_for(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()), "2025-2026");
/// ```
pub fn fiscal_year_for(date: NaiveDate) -> String {
    let start_year = if date.month() >= FISCAL_YEAR_START_MONTH {
        date.year()
    } else {
        date.year() - 1
    };
    format!("{}-{}", start_year, start_year + 1)
}

/// Returns the fiscal year label for a date, using today when none is given.
pub fn fiscal_year_from_date(date: Option<NaiveDate>) -> String {
    fiscal_year_for(date.unwrap_or_else(today))
}

/// Parses the starting calendar year out of a fiscal year label.
///
/// Tries the text before the first `-`, then the first four characters, and
/// finally falls back to the current calendar year. Never fails.
///
/// # Examples
///
/// ```
/// use hr_payroll_engine::calculation::parse_fiscal_year_start;
///
/// assert_eq!(parse_fiscal_year_start(Some("2025-26")), 2025);
/// assert_eq!(parse_fiscal_year_start(Some("2024-2025")), 2024);
/// assert_eq!(parse_fiscal_year_start(Some("2023/24")), 2023);
/// ```
pub fn parse_fiscal_year_start(label: Option<&str>) -> i32 {
    let Some(label) = label.filter(|l| !l.trim().is_empty()) else {
        return today().year();
    };

    let before_dash = label.split('-').next().unwrap_or(label);
    if let Ok(year) = before_dash.trim().parse::<i32>() {
        return year;
    }

    let prefix: String = label.chars().take(4).collect();
    prefix
        .trim()
        .parse::<i32>()
        .unwrap_or_else(|_| today().year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// FY-001: April starts a new fiscal year
    #[test]
    fn test_april_first_starts_fiscal_year() {
        assert_eq!(fiscal_year_for(date(2025, 4, 1)), "2025-2026");
    }

    /// FY-002: March belongs to the previous start year
    #[test]
    fn test_march_belongs_to_previous_start_year() {
        assert_eq!(fiscal_year_for(date(2026, 3, 31)), "2025-2026");
    }

    #[test]
    fn test_january_belongs_to_previous_start_year() {
        assert_eq!(fiscal_year_for(date(2026, 1, 15)), "2025-2026");
    }

    #[test]
    fn test_december_belongs_to_current_start_year() {
        assert_eq!(fiscal_year_for(date(2025, 12, 31)), "2025-2026");
    }

    #[test]
    fn test_missing_date_uses_today() {
        assert_eq!(fiscal_year_from_date(None), fiscal_year_for(today()));
    }

    #[test]
    fn test_parse_two_digit_suffix() {
        assert_eq!(parse_fiscal_year_start(Some("2025-26")), 2025);
    }

    #[test]
    fn test_parse_four_digit_suffix() {
        assert_eq!(parse_fiscal_year_start(Some("2025-2026")), 2025);
    }

    #[test]
    fn test_parse_falls_back_to_first_four_characters() {
        assert_eq!(parse_fiscal_year_start(Some("2022FY")), 2022);
    }

    #[test]
    fn test_parse_falls_back_to_current_year() {
        assert_eq!(parse_fiscal_year_start(Some("FY-XX")), today().year());
        assert_eq!(parse_fiscal_year_start(Some("")), today().year());
        assert_eq!(parse_fiscal_year_start(None), today().year());
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        assert_eq!(parse_fiscal_year_start(Some(" 2025 - 26")), 2025);
    }

    proptest! {
        #[test]
        fn prop_label_matches_april_convention(
            year in 1990i32..2100,
            month in 1u32..=12,
            day in 1u32..=28,
        ) {
            let d = date(year, month, day);
            let expected = if month >= 4 {
                format!("{}-{}", year, year + 1)
            } else {
                format!("{}-{}", year - 1, year)
            };
            prop_assert_eq!(fiscal_year_for(d), expected);
        }

        #[test]
        fn prop_derived_label_parses_back_to_start_year(
            year in 1990i32..2100,
            month in 1u32..=12,
        ) {
            let d = date(year, month, 1);
            let label = fiscal_year_for(d);
            let start = if month >= 4 { year } else { year - 1 };
            prop_assert_eq!(parse_fiscal_year_start(Some(&label)), start);
        }
    }
}
