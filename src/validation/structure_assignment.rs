//! Tax regime enforcement on salary structure assignments.

use tracing::warn;

use crate::config::RegimeStructures;
use crate::error::{EngineError, EngineResult};
use crate::models::{SalaryStructureAssignment, TaxRegime};
use crate::store::EmployeeStore;

/// Rejects assignments whose structure is not mapped to a tax regime.
///
/// An assignment without a structure is permitted.
///
/// # Examples
///
/// ```
/// use hr_payroll_engine::config::RegimeStructures;
/// use hr_payroll_engine::models::SalaryStructureAssignment;
/// use hr_payroll_engine::validation::validate_salary_structure_assignment;
///
/// let regimes = RegimeStructures::default();
/// let assignment = SalaryStructureAssignment {
///     name: None,
///     employee: Some("EMP-0001".to_string()),
///     salary_structure: Some("Contractor Structure".to_string()),
///     from_date: None,
/// };
/// assert!(validate_salary_structure_assignment(&assignment, &regimes).is_err());
/// ```
pub fn validate_salary_structure_assignment(
    assignment: &SalaryStructureAssignment,
    regimes: &RegimeStructures,
) -> EngineResult<()> {
    let Some(structure) = assignment
        .salary_structure
        .as_deref()
        .filter(|s| !s.is_empty())
    else {
        return Ok(());
    };

    if regimes.is_allowed(structure) {
        return Ok(());
    }

    warn!(
        assignment = assignment.name.as_deref().unwrap_or_default(),
        employee = assignment.employee.as_deref().unwrap_or_default(),
        structure = %structure,
        "Rejected salary structure outside the tax regime mapping"
    );
    Err(EngineError::StructureNotAllowed {
        structure: structure.to_string(),
        allowed: regimes.allowed(),
    })
}

/// Returns the candidates whose name contains the regime label.
pub fn structures_for_regime<I, S>(regime: TaxRegime, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .filter(|name| name.as_ref().contains(regime.label()))
        .map(|name| name.as_ref().to_string())
        .collect()
}

/// Returns the structures an employee may be assigned, based on their
/// tax regime preference.
///
/// # Errors
///
/// Returns [`EngineError::NotFound`] if the employee does not exist.
pub fn structures_for_employee<St, I, S>(
    store: &St,
    employee_id: &str,
    candidates: I,
) -> EngineResult<(TaxRegime, Vec<String>)>
where
    St: EmployeeStore + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let employee = store
        .get_employee(employee_id)?
        .ok_or_else(|| EngineError::NotFound {
            doctype: "Employee".to_string(),
            name: employee_id.to_string(),
        })?;

    let regime = employee.tax_regime_preference;
    Ok((regime, structures_for_regime(regime, candidates)))
}
