//! Tax regime comparison report.
//!
//! For every employee matching the filters, builds a salary slip under the
//! old-regime and the new-regime structure, extracts the tax deducted under
//! each and recommends the regime with the lower tax.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::calculation::{last_day_of_month, parse_date};
use crate::config::RegimeStructures;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, EmployeeFilter, SalarySlip, TaxRegime, sum_amounts};
use crate::store::EmployeeStore;

use super::slip_calculator::SlipCalculator;

/// Maximum number of employees one report run covers.
pub const EMPLOYEE_LIMIT: usize = 1000;

/// Report filters as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFilters {
    /// Start of the period; required.
    #[serde(default)]
    pub from_date: Option<String>,
    /// End of the period; required.
    #[serde(default)]
    pub to_date: Option<String>,
    /// Only employees of this company.
    #[serde(default)]
    pub company: Option<String>,
    /// Only this employee.
    #[serde(default)]
    pub employee: Option<String>,
    /// Only employees of this department.
    #[serde(default)]
    pub department: Option<String>,
}

impl ReportFilters {
    fn period(&self) -> EngineResult<(NaiveDate, NaiveDate)> {
        let from = required_date(self.from_date.as_deref(), "From Date")?;
        let to = required_date(self.to_date.as_deref(), "To Date")?;
        if from > to {
            return Err(EngineError::InvalidDateRange {
                start: from,
                end: to,
            });
        }
        Ok((from, to))
    }

    fn employee_filter(&self) -> EmployeeFilter {
        EmployeeFilter {
            company: self.company.clone(),
            employee: self.employee.clone(),
            department: self.department.clone(),
        }
    }
}

fn required_date(raw: Option<&str>, field: &str) -> EngineResult<NaiveDate> {
    let raw = raw
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| EngineError::MissingField {
            field: field.to_string(),
        })?;
    parse_date(raw).ok_or_else(|| EngineError::InvalidDate {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

/// A report column definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportColumn {
    /// Column heading.
    pub label: String,
    /// Key of the value in each row.
    pub fieldname: String,
    /// How the value is rendered.
    pub fieldtype: String,
    /// Link target for `Link` columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
    /// Column width in pixels.
    pub width: u32,
}

fn column(label: &str, fieldname: &str, fieldtype: &str, options: Option<&str>, width: u32) -> ReportColumn {
    ReportColumn {
        label: label.to_string(),
        fieldname: fieldname.to_string(),
        fieldtype: fieldtype.to_string(),
        options: options.map(str::to_string),
        width,
    }
}

/// The columns of the comparison report, in display order.
pub fn report_columns() -> Vec<ReportColumn> {
    vec![
        column("Employee", "employee", "Link", Some("Employee"), 120),
        column("Employee Name", "employee_name", "Data", None, 160),
        column("Company", "company", "Link", Some("Company"), 140),
        column("Tax (Old)", "tax_old", "Currency", None, 120),
        column("Tax (New)", "tax_new", "Currency", None, 120),
        column("Difference (Old - New)", "difference", "Currency", None, 120),
        column("Recommended", "recommended", "Data", None, 120),
    ]
}

/// One employee's comparison.
///
/// When the computation failed the figures are empty and `error` holds the
/// reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonRow {
    /// Employee id.
    pub employee: String,
    /// Employee name.
    pub employee_name: Option<String>,
    /// Company.
    pub company: Option<String>,
    /// Tax under the old regime.
    pub tax_old: Option<Decimal>,
    /// Tax under the new regime.
    pub tax_new: Option<Decimal>,
    /// Old minus new.
    pub difference: Option<Decimal>,
    /// The regime with the lower tax; old on a tie.
    pub recommended: Option<TaxRegime>,
    /// Why the row could not be computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComparisonRow {
    fn computed(employee: &Employee, tax_old: Decimal, tax_new: Decimal, difference: Decimal) -> Self {
        let recommended = if difference > Decimal::ZERO {
            TaxRegime::New
        } else {
            TaxRegime::Old
        };
        Self {
            employee: employee.id.clone(),
            employee_name: employee.employee_name.clone(),
            company: employee.company.clone(),
            tax_old: Some(tax_old),
            tax_new: Some(tax_new),
            difference: Some(difference),
            recommended: Some(recommended),
            error: None,
        }
    }

    fn failed(employee: &Employee, err: &EngineError) -> Self {
        Self {
            employee: employee.id.clone(),
            employee_name: employee.employee_name.clone(),
            company: employee.company.clone(),
            tax_old: None,
            tax_new: None,
            difference: None,
            recommended: None,
            error: Some(err.to_string()),
        }
    }
}

/// The report output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxRegimeReport {
    /// Column definitions.
    pub columns: Vec<ReportColumn>,
    /// One row per employee.
    pub data: Vec<ComparisonRow>,
}

/// Sums the tax deducted on a slip.
///
/// Deductions whose component name contains "tax" or "tds" are summed
/// (case-insensitive). If that comes to zero, components containing
/// "income" are summed instead.
///
/// # Example
///
/// ```
/// use hr_payroll_engine::models::{SalaryDetail, SalarySlip};
/// use hr_payroll_engine::report::tax_from_deductions;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let mut slip = SalarySlip::new(
///     "EMP-0001",
///     NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
/// );
/// slip.deductions.push(SalaryDetail::new("Provident Fund", Decimal::new(1800, 0)));
/// slip.deductions.push(SalaryDetail::new("TDS", Decimal::new(2500, 0)));
/// slip.deductions.push(SalaryDetail::new("Professional Tax", Decimal::new(200, 0)));
/// assert_eq!(tax_from_deductions(&slip).unwrap(), Decimal::new(2700, 0));
/// ```
///
/// # Errors
///
/// Returns [`EngineError::AmountOutOfRange`] if the matching lines overflow.
pub fn tax_from_deductions(slip: &SalarySlip) -> EngineResult<Decimal> {
    let sum_matching = |keywords: &[&str]| -> EngineResult<Decimal> {
        sum_amounts(
            slip.deductions.iter().filter(|d| {
                let name = d.salary_component.to_lowercase();
                keywords.iter().any(|k| name.contains(k))
            }),
            "Tax",
        )
    };

    let tax = sum_matching(&["tax", "tds"])?;
    if tax.is_zero() {
        sum_matching(&["income"])
    } else {
        Ok(tax)
    }
}

/// Computes an employee's tax for a period under one salary structure.
///
/// A missing end date means the last day of the start month.
///
/// # Errors
///
/// - [`EngineError::CalculationError`] when no structure is configured
/// - [`EngineError::InvalidDateRange`] when the start is after the end
/// - any error the calculator returns
pub fn compute_tax_for_employee(
    calculator: &dyn SlipCalculator,
    employee: &Employee,
    salary_structure: Option<&str>,
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> EngineResult<Decimal> {
    let salary_structure = salary_structure
        .filter(|s| !s.is_empty())
        .ok_or_else(|| EngineError::CalculationError {
            message: "Salary Structure not configured for regime used in report. \
                      Please configure mapping or check salary structure names."
                .to_string(),
        })?;

    let end = end.unwrap_or_else(|| last_day_of_month(start));
    if start > end {
        return Err(EngineError::InvalidDateRange { start, end });
    }

    let slip = calculator.calculate(employee, salary_structure, start, end)?;
    tax_from_deductions(&slip)
}

/// Runs the tax regime comparison.
///
/// # Errors
///
/// Filter errors ([`EngineError::MissingField`], [`EngineError::InvalidDate`],
/// [`EngineError::InvalidDateRange`]) and store faults fail the whole run.
/// Failures for a single employee are logged and reported on that row.
pub fn execute<S>(
    filters: &ReportFilters,
    store: &S,
    calculator: &dyn SlipCalculator,
    regimes: &RegimeStructures,
) -> EngineResult<TaxRegimeReport>
where
    S: EmployeeStore + ?Sized,
{
    let (from, to) = filters.period()?;
    let employees = store.list_employees(&filters.employee_filter(), EMPLOYEE_LIMIT)?;

    let old_structure = regimes.structure_for(TaxRegime::Old);
    let new_structure = regimes.structure_for(TaxRegime::New);

    let data: Vec<ComparisonRow> = employees
        .iter()
        .map(|employee| {
            let taxes = compute_tax_for_employee(calculator, employee, Some(old_structure), from, Some(to))
                .and_then(|old| {
                    compute_tax_for_employee(calculator, employee, Some(new_structure), from, Some(to))
                        .map(|new| (old, new))
                })
                .and_then(|(old, new)| {
                    let difference =
                        old.checked_sub(new)
                            .ok_or_else(|| EngineError::AmountOutOfRange {
                                field: "Difference (Old - New)".to_string(),
                            })?;
                    Ok((old, new, difference))
                });
            match taxes {
                Ok((old, new, difference)) => ComparisonRow::computed(employee, old, new, difference),
                Err(err) => {
                    error!(
                        employee = %employee.id,
                        error = %err,
                        "Tax regime comparison failed for employee"
                    );
                    ComparisonRow::failed(employee, &err)
                }
            }
        })
        .collect();

    info!(
        from_date = %from,
        to_date = %to,
        rows = data.len(),
        "Tax regime comparison complete"
    );

    Ok(TaxRegimeReport {
        columns: report_columns(),
        data,
    })
}
