//! Exemption aggregation.

use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::store::DeclarationStore;

/// Returns the total declared exemption for an employee and fiscal year.
///
/// Missing or blank identifiers yield zero, as does the absence of a
/// declaration. Only the first matching declaration is read; the store's
/// uniqueness invariant means there should never be more than one.
///
/// # Examples
///
/// ```
/// use hr_payroll_engine::calculation::total_declared_exemption;
/// use hr_payroll_engine::store::InMemoryStore;
/// use rust_decimal::Decimal;
///
/// let store = InMemoryStore::new();
/// let total = total_declared_exemption(&store, Some("EMP-0001"), Some("2025-26")).unwrap();
/// assert_eq!(total, Decimal::ZERO);
/// ```
pub fn total_declared_exemption<S>(
    store: &S,
    employee: Option<&str>,
    fiscal_year: Option<&str>,
) -> EngineResult<Decimal>
where
    S: DeclarationStore + ?Sized,
{
    let (Some(employee), Some(fiscal_year)) = (
        employee.filter(|e| !e.is_empty()),
        fiscal_year.filter(|fy| !fy.is_empty()),
    ) else {
        return Ok(Decimal::ZERO);
    };

    Ok(store
        .find_declarations(employee, fiscal_year)?
        .first()
        .map(|d| d.total_exemption)
        .unwrap_or(Decimal::ZERO))
}
