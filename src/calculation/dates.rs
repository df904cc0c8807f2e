//! Lenient date handling.
//!
//! Payroll documents arrive with dates in whatever form the submitting
//! system uses. Parsing never fails: text that cannot be read as a date
//! resolves to the current local date.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Returns the current local date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses a date from common textual forms.
///
/// Accepts `YYYY-MM-DD`, `DD-MM-YYYY`, `YYYY/MM/DD`, a date-time with a
/// space or `T` separator, or an RFC 3339 timestamp.
///
/// # Examples
///
/// ```
/// use hr_payroll_engine::calculation::parse_date;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2025, 7, 1);
/// assert_eq!(parse_date("2025-07-01"), expected);
/// assert_eq!(parse_date("01-07-2025"), expected);
/// assert_eq!(parse_date("2025-07-01 09:30:00"), expected);
/// assert_eq!(parse_date("not a date"), None);
/// ```
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Resolves an optional textual date.
///
/// Absent or blank input stays `None`; text that cannot be parsed resolves
/// to [`today`].
pub fn resolve_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw.map(str::trim).filter(|r| !r.is_empty())?;
    Some(parse_date(raw).unwrap_or_else(today))
}

/// Returns the last day of the month `date` falls in.
///
/// # Examples
///
/// ```
/// use hr_payroll_engine::calculation::last_day_of_month;
/// use chrono::NaiveDate;
///
/// let feb = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
/// assert_eq!(last_day_of_month(feb), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// ```
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

/// Counts the calendar months a date range touches, inclusive.
///
/// An inverted range counts as one month.
pub fn months_touched(start: NaiveDate, end: NaiveDate) -> u32 {
    let months = (i64::from(end.year()) - i64::from(start.year())) * 12
        + i64::from(end.month())
        - i64::from(start.month())
        + 1;
    u32::try_from(months.max(1)).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_date("2026-03-31"),
            NaiveDate::from_ymd_opt(2026, 3, 31)
        );
    }

    #[test]
    fn test_parse_day_first_date() {
        assert_eq!(
            parse_date("15-08-2025"),
            NaiveDate::from_ymd_opt(2025, 8, 15)
        );
    }

    #[test]
    fn test_parse_rfc3339_timestamp() {
        assert_eq!(
            parse_date("2025-04-01T10:00:00+05:30"),
            NaiveDate::from_ymd_opt(2025, 4, 1)
        );
    }

    #[test]
    fn test_parse_rejects_garbage_and_blank() {
        assert_eq!(parse_date("2025-13-45"), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_resolve_absent_stays_none() {
        assert_eq!(resolve_date(None), None);
        assert_eq!(resolve_date(Some("")), None);
    }

    #[test]
    fn test_resolve_unparseable_falls_back_to_today() {
        assert_eq!(resolve_date(Some("garbage")), Some(today()));
    }

    #[test]
    fn test_resolve_valid_date() {
        assert_eq!(
            resolve_date(Some(" 2025-07-01 ")),
            NaiveDate::from_ymd_opt(2025, 7, 1)
        );
    }

    #[test]
    fn test_last_day_of_month() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(last_day_of_month(d(2025, 7, 1)), d(2025, 7, 31));
        assert_eq!(last_day_of_month(d(2025, 12, 5)), d(2025, 12, 31));
        assert_eq!(last_day_of_month(d(2025, 2, 28)), d(2025, 2, 28));
    }

    #[test]
    fn test_months_touched() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(months_touched(d(2025, 7, 1), d(2025, 7, 31)), 1);
        assert_eq!(months_touched(d(2025, 7, 31), d(2025, 8, 1)), 2);
        assert_eq!(months_touched(d(2025, 4, 1), d(2026, 3, 31)), 12);
        assert_eq!(months_touched(d(2025, 8, 1), d(2025, 7, 1)), 1);
    }
}
