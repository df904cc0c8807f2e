//! Payroll reports.
//!
//! The tax regime comparison computes each employee's tax under both
//! regimes for a period and recommends the cheaper one.

mod slip_calculator;
mod tax_regime_comparison;

pub use slip_calculator::{SlipCalculator, StructureSlipCalculator};
pub use tax_regime_comparison::{
    ComparisonRow, EMPLOYEE_LIMIT, ReportColumn, ReportFilters, TaxRegimeReport,
    compute_tax_for_employee, execute, report_columns, tax_from_deductions,
};
