//! Salary slip and salary component models.
//!
//! This module contains the [`SalarySlip`] type (one employee's pay for a
//! single payroll period) and the line items and components it is built from.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Whether a salary component adds to or subtracts from pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentType {
    /// Adds to gross pay.
    Earning,
    /// Subtracts from gross pay.
    Deduction,
}

/// A salary component master record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryComponent {
    /// The component name, also used as the tag on slip line items.
    pub salary_component: String,
    /// Short abbreviation used in formulas.
    pub salary_component_abbr: String,
    /// Earning or deduction.
    pub component_type: ComponentType,
    /// Whether the component counts towards taxable income.
    pub is_taxable: bool,
    /// Amount used when a structure does not specify one.
    pub default_amount: Decimal,
}

/// One earning or deduction line on a salary slip.
///
/// # Example
///
/// ```
/// use hr_payroll_engine::models::SalaryDetail;
/// use rust_decimal::Decimal;
///
/// let line = SalaryDetail::new("Income Tax", Decimal::new(250000, 2));
/// assert_eq!(line.amount, Decimal::new(2500, 0));
/// assert!(line.abbr.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryDetail {
    /// The component this line is tagged with.
    pub salary_component: String,
    /// The component abbreviation, if known.
    #[serde(default)]
    pub abbr: Option<String>,
    /// The monetary amount.
    pub amount: Decimal,
}

impl SalaryDetail {
    /// Creates a line with no abbreviation.
    pub fn new(salary_component: impl Into<String>, amount: Decimal) -> Self {
        Self {
            salary_component: salary_component.into(),
            abbr: None,
            amount,
        }
    }
}

/// One employee's compensation computation for a single pay cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalarySlip {
    /// Document name.
    #[serde(default)]
    pub name: Option<String>,
    /// The employee being paid.
    #[serde(default)]
    pub employee: Option<String>,
    /// The salary structure the slip was generated from.
    #[serde(default)]
    pub salary_structure: Option<String>,
    /// First day of the payroll period.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day of the payroll period.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Explicit fiscal year label; derived from `start_date` when absent.
    #[serde(default)]
    pub fiscal_year: Option<String>,
    /// Earning lines, in order.
    #[serde(default)]
    pub earnings: Vec<SalaryDetail>,
    /// Deduction lines, in order.
    #[serde(default)]
    pub deductions: Vec<SalaryDetail>,
}

impl SalarySlip {
    /// Creates an empty slip for an employee and period.
    pub fn new(employee: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            name: None,
            employee: Some(employee.into()),
            salary_structure: None,
            start_date: Some(start_date),
            end_date: Some(end_date),
            fiscal_year: None,
            earnings: Vec::new(),
            deductions: Vec::new(),
        }
    }

    /// Sum of all earning lines.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AmountOutOfRange`] if the sum overflows.
    pub fn gross_pay(&self) -> EngineResult<Decimal> {
        sum_amounts(&self.earnings, "Gross Pay")
    }

    /// Sum of all deduction lines.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AmountOutOfRange`] if the sum overflows.
    pub fn total_deduction(&self) -> EngineResult<Decimal> {
        sum_amounts(&self.deductions, "Total Deduction")
    }

    /// Gross pay less total deductions.
    ///
    /// # Example
    ///
    /// ```
    /// use hr_payroll_engine::models::{SalaryDetail, SalarySlip};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let mut slip = SalarySlip::new(
    ///     "EMP-0001",
    ///     NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
    /// );
    /// slip.earnings.push(SalaryDetail::new("Basic", Decimal::new(50000, 0)));
    /// slip.deductions.push(SalaryDetail::new("Income Tax", Decimal::new(4000, 0)));
    /// assert_eq!(slip.net_pay().unwrap(), Decimal::new(46000, 0));
    /// ```
    pub fn net_pay(&self) -> EngineResult<Decimal> {
        self.gross_pay()?
            .checked_sub(self.total_deduction()?)
            .ok_or_else(|| EngineError::AmountOutOfRange {
                field: "Net Pay".to_string(),
            })
    }

    /// Returns the deduction lines tagged with `component`.
    pub fn deductions_for<'a>(
        &'a self,
        component: &'a str,
    ) -> impl Iterator<Item = &'a SalaryDetail> + 'a {
        self.deductions
            .iter()
            .filter(move |d| d.salary_component == component)
    }
}

/// Sums line amounts, failing with [`EngineError::AmountOutOfRange`]
/// labelled `total` on overflow.
pub fn sum_amounts<'a, I>(lines: I, total: &str) -> EngineResult<Decimal>
where
    I: IntoIterator<Item = &'a SalaryDetail>,
{
    lines.into_iter().try_fold(Decimal::ZERO, |sum, line| {
        sum.checked_add(line.amount)
            .ok_or_else(|| EngineError::AmountOutOfRange {
                field: total.to_string(),
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_slip() -> SalarySlip {
        let mut slip = SalarySlip::new(
            "EMP-0001",
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
        );
        slip.earnings.push(SalaryDetail::new("Basic", dec("40000")));
        slip.earnings.push(SalaryDetail::new("HRA", dec("16000")));
        slip.deductions.push(SalaryDetail::new("Provident Fund", dec("4800")));
        slip.deductions.push(SalaryDetail::new("Income Tax", dec("3200.50")));
        slip
    }

    #[test]
    fn test_totals() {
        let slip = create_slip();
        assert_eq!(slip.gross_pay().unwrap(), dec("56000"));
        assert_eq!(slip.total_deduction().unwrap(), dec("8000.50"));
        assert_eq!(slip.net_pay().unwrap(), dec("47999.50"));
    }

    #[test]
    fn test_overflowing_deductions_reported() {
        let mut slip = create_slip();
        slip.deductions.push(SalaryDetail::new("TDS", Decimal::MAX));
        slip.deductions.push(SalaryDetail::new("Cess", Decimal::MAX));

        match slip.total_deduction() {
            Err(EngineError::AmountOutOfRange { field }) => assert_eq!(field, "Total Deduction"),
            other => panic!("Expected AmountOutOfRange, got {:?}", other),
        }
        assert!(slip.net_pay().is_err());
        assert_eq!(slip.gross_pay().unwrap(), dec("56000"));
    }

    #[test]
    fn test_net_pay_underflow_reported() {
        let mut slip = create_slip();
        slip.earnings = vec![SalaryDetail::new("Basic", Decimal::MIN)];
        slip.deductions = vec![SalaryDetail::new("Income Tax", Decimal::MAX)];

        match slip.net_pay() {
            Err(EngineError::AmountOutOfRange { field }) => assert_eq!(field, "Net Pay"),
            other => panic!("Expected AmountOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_deductions_for_component() {
        let slip = create_slip();
        let tax: Vec<_> = slip.deductions_for("Income Tax").collect();
        assert_eq!(tax.len(), 1);
        assert_eq!(tax[0].amount, dec("3200.50"));
        assert_eq!(slip.deductions_for("Investment Exemption").count(), 0);
    }

    #[test]
    fn test_deserialize_slip_without_lines() {
        let json = r#"{
            "employee": "EMP-0002",
            "start_date": "2025-04-01",
            "end_date": "2025-04-30"
        }"#;
        let slip: SalarySlip = serde_json::from_str(json).unwrap();
        assert_eq!(slip.employee.as_deref(), Some("EMP-0002"));
        assert!(slip.fiscal_year.is_none());
        assert!(slip.deductions.is_empty());
    }

    #[test]
    fn test_serialize_salary_component() {
        let component = SalaryComponent {
            salary_component: "Investment Exemption".to_string(),
            salary_component_abbr: "INV_EXEMPT".to_string(),
            component_type: ComponentType::Deduction,
            is_taxable: false,
            default_amount: Decimal::ZERO,
        };
        let json = serde_json::to_value(&component).unwrap();
        assert_eq!(json["component_type"], "Deduction");
        assert_eq!(json["is_taxable"], false);
    }
}
