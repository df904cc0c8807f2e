//! Request types for the HR Payroll Engine API.
//!
//! Declarations, employees, assignments and report filters are accepted in
//! their model form. Salary slips arrive with textual dates, which are
//! resolved leniently.

use serde::{Deserialize, Serialize};

use crate::calculation::resolve_date;
use crate::models::{SalaryDetail, SalarySlip};

/// Request body for the `/salary-slips/validate` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalarySlipRequest {
    /// Document name.
    #[serde(default)]
    pub name: Option<String>,
    /// The employee being paid.
    #[serde(default)]
    pub employee: Option<String>,
    /// The salary structure the slip was generated from.
    #[serde(default)]
    pub salary_structure: Option<String>,
    /// First day of the period. Unreadable dates resolve to today.
    #[serde(default)]
    pub start_date: Option<String>,
    /// Last day of the period.
    #[serde(default)]
    pub end_date: Option<String>,
    /// Explicit fiscal year label.
    #[serde(default)]
    pub fiscal_year: Option<String>,
    /// Earning lines.
    #[serde(default)]
    pub earnings: Vec<SalaryDetail>,
    /// Deduction lines.
    #[serde(default)]
    pub deductions: Vec<SalaryDetail>,
}

impl From<SalarySlipRequest> for SalarySlip {
    fn from(req: SalarySlipRequest) -> Self {
        SalarySlip {
            name: req.name,
            employee: req.employee,
            salary_structure: req.salary_structure,
            start_date: resolve_date(req.start_date.as_deref()),
            end_date: resolve_date(req.end_date.as_deref()),
            fiscal_year: req.fiscal_year,
            earnings: req.earnings,
            deductions: req.deductions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::today;
    use chrono::NaiveDate;

    #[test]
    fn test_slip_request_resolves_dates() {
        let json = r#"{
            "employee": "EMP-0001",
            "start_date": "01-07-2025",
            "end_date": "sometime"
        }"#;
        let req: SalarySlipRequest = serde_json::from_str(json).unwrap();
        let slip: SalarySlip = req.into();

        assert_eq!(slip.start_date, NaiveDate::from_ymd_opt(2025, 7, 1));
        assert_eq!(slip.end_date, Some(today()));
    }

    #[test]
    fn test_slip_request_without_dates() {
        let slip: SalarySlip = SalarySlipRequest::default().into();
        assert!(slip.start_date.is_none());
        assert!(slip.employee.is_none());
    }
}
