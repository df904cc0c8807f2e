//! Salary slip construction for reports.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calculation::months_touched;
use crate::config::{PayrollConfig, StructureDefinition};
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, SalaryDetail, SalarySlip};

/// Builds an unsaved salary slip for an employee under a salary structure.
pub trait SlipCalculator: Send + Sync {
    /// Computes the slip for `[start, end]` using `salary_structure`.
    fn calculate(
        &self,
        employee: &Employee,
        salary_structure: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<SalarySlip>;
}

/// A [`SlipCalculator`] driven by the configured structure definitions.
///
/// Every line is a fixed monthly amount, multiplied by the number of
/// calendar months the period touches.
///
/// # Example
///
/// ```
/// use hr_payroll_engine::config::ConfigLoader;
/// use hr_payroll_engine::models::Employee;
/// use hr_payroll_engine::report::{SlipCalculator, StructureSlipCalculator};
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let calculator = StructureSlipCalculator::from_config(loader.config());
/// let slip = calculator
///     .calculate(
///         &Employee::new("EMP-0001"),
///         "DEMO - Salary Structure - Old Regime",
///         NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
///         NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
///     )
///     .unwrap();
/// assert!(!slip.deductions.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StructureSlipCalculator {
    structures: HashMap<String, StructureDefinition>,
}

impl StructureSlipCalculator {
    /// Creates a calculator over the given structures.
    pub fn new(structures: HashMap<String, StructureDefinition>) -> Self {
        Self { structures }
    }

    /// Creates a calculator over the structures in `config`.
    pub fn from_config(config: &PayrollConfig) -> Self {
        Self::new(config.structures().clone())
    }
}

fn scale(lines: &[SalaryDetail], months: Decimal) -> EngineResult<Vec<SalaryDetail>> {
    lines
        .iter()
        .map(|line| {
            let amount = line.amount.checked_mul(months).ok_or_else(|| {
                EngineError::CalculationError {
                    message: format!(
                        "{} amount {} overflows over {} months",
                        line.salary_component, line.amount, months
                    ),
                }
            })?;
            Ok(SalaryDetail {
                amount,
                ..line.clone()
            })
        })
        .collect()
}

impl SlipCalculator for StructureSlipCalculator {
    fn calculate(
        &self,
        employee: &Employee,
        salary_structure: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<SalarySlip> {
        let structure =
            self.structures
                .get(salary_structure)
                .ok_or_else(|| EngineError::CalculationError {
                    message: format!("Salary structure not found: {}", salary_structure),
                })?;

        let months = Decimal::from(months_touched(start, end));
        let mut slip = SalarySlip::new(employee.id.clone(), start, end);
        slip.salary_structure = Some(salary_structure.to_string());
        slip.earnings = scale(&structure.earnings, months)?;
        slip.deductions = scale(&structure.deductions, months)?;
        Ok(slip)
    }
}
