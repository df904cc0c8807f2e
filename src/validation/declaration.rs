//! Investment declaration validation.
//!
//! Every create and update goes through [`validate_declaration`], which in
//! order parses the amounts, totals them, checks the required fields and the
//! one-declaration-per-year rule, then applies the statutory caps.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::StatutoryCaps;
use crate::error::{EngineError, EngineResult};
use crate::models::{DeclarationDraft, ExemptionField, InvestmentDeclaration};
use crate::store::DeclarationStore;

/// A declaration that passed validation, plus any soft-cap warnings.
#[derive(Debug, Clone, Serialize)]
pub struct ValidatedDeclaration {
    /// The normalised declaration.
    pub declaration: InvestmentDeclaration,
    /// Cap messages raised in soft-cap mode.
    pub warnings: Vec<String>,
}

/// Reads a submitted amount as a decimal.
///
/// Absent, null and blank values count as zero. JSON numbers and numeric
/// strings (including scientific notation) are accepted.
///
/// # Examples
///
/// ```
/// use hr_payroll_engine::models::ExemptionField;
/// use hr_payroll_engine::validation::parse_amount;
/// use rust_decimal::Decimal;
/// use serde_json::json;
///
/// let field = ExemptionField::Section80C;
/// assert_eq!(parse_amount(field, Some(&json!("1500.50"))).unwrap(), Decimal::new(150050, 2));
/// assert_eq!(parse_amount(field, None).unwrap(), Decimal::ZERO);
/// assert!(parse_amount(field, Some(&json!("abc"))).is_err());
/// assert!(parse_amount(field, Some(&json!(-1))).is_err());
/// ```
pub fn parse_amount(field: ExemptionField, raw: Option<&Value>) -> EngineResult<Decimal> {
    let non_numeric = |value: String| EngineError::NonNumericAmount {
        field: field.label().to_string(),
        value,
    };

    let amount = match raw {
        None | Some(Value::Null) => Decimal::ZERO,
        Some(Value::Number(number)) => {
            let text = number.to_string();
            parse_decimal(&text).ok_or_else(|| non_numeric(text))?
        }
        Some(Value::String(text)) if text.trim().is_empty() => Decimal::ZERO,
        Some(Value::String(text)) => {
            parse_decimal(text.trim()).ok_or_else(|| non_numeric(text.clone()))?
        }
        Some(other) => return Err(non_numeric(other.to_string())),
    };

    if amount < Decimal::ZERO {
        return Err(EngineError::NegativeAmount {
            field: field.label().to_string(),
        });
    }
    Ok(amount)
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn required(value: Option<&str>, label: &str) -> EngineResult<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| EngineError::MissingField {
            field: label.to_string(),
        })
}

fn cap_violations(declaration: &InvestmentDeclaration, caps: &StatutoryCaps) -> Vec<String> {
    [
        ("Section 80C", declaration.section_80c_amount, caps.section_80c),
        ("Section 80D", declaration.section_80d_amount, caps.section_80d),
    ]
    .into_iter()
    .filter_map(|(section, amount, cap)| {
        let cap = cap?;
        (amount > cap).then(|| {
            format!(
                "{} declared amount ({:.2}) exceeds the cap of {:.2}.",
                section, amount, cap
            )
        })
    })
    .collect()
}

/// Validates a submitted declaration.
///
/// A draft without a name is treated as new; with a name, the record of
/// that name is excluded from the duplicate check. New declarations are
/// given a generated name.
///
/// # Errors
///
/// - [`EngineError::NonNumericAmount`] / [`EngineError::NegativeAmount`] for bad amounts
/// - [`EngineError::AmountOutOfRange`] when the amounts cannot be totalled
/// - [`EngineError::MissingField`] when the employee or fiscal year is empty
/// - [`EngineError::DuplicateDeclaration`] when another record covers the same pair
/// - [`EngineError::CapExceeded`] when a cap is exceeded in hard-cap mode
pub fn validate_declaration<S>(
    draft: &DeclarationDraft,
    store: &S,
    caps: &StatutoryCaps,
) -> EngineResult<ValidatedDeclaration>
where
    S: DeclarationStore + ?Sized,
{
    let section_80c_amount = parse_amount(
        ExemptionField::Section80C,
        draft.raw_amount(ExemptionField::Section80C),
    )?;
    let section_80d_amount = parse_amount(
        ExemptionField::Section80D,
        draft.raw_amount(ExemptionField::Section80D),
    )?;
    let other_exemptions =
        parse_amount(ExemptionField::Other, draft.raw_amount(ExemptionField::Other))?;

    let total_exemption = section_80c_amount
        .checked_add(section_80d_amount)
        .and_then(|sum| sum.checked_add(other_exemptions))
        .ok_or_else(|| EngineError::AmountOutOfRange {
            field: "Total Exemption".to_string(),
        })?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    let employee = required(draft.employee.as_deref(), "Employee")?;
    let fiscal_year = required(draft.fiscal_year.as_deref(), "Fiscal Year")?;

    let current = draft.name.as_deref().filter(|n| !n.is_empty());
    if let Some(existing) = store
        .find_declarations(&employee, &fiscal_year)?
        .into_iter()
        .find(|d| Some(d.name.as_str()) != current)
    {
        return Err(EngineError::DuplicateDeclaration {
            employee,
            fiscal_year,
            existing: existing.name,
        });
    }

    let declaration = InvestmentDeclaration {
        name: current
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string()),
        employee,
        fiscal_year,
        section_80c_amount,
        section_80d_amount,
        other_exemptions,
        total_exemption,
    };

    let violations = cap_violations(&declaration, caps);
    if violations.is_empty() {
        return Ok(ValidatedDeclaration {
            declaration,
            warnings: Vec::new(),
        });
    }

    if caps.enforce {
        return Err(EngineError::CapExceeded { violations });
    }

    for message in &violations {
        warn!(
            declaration = %declaration.name,
            employee = %declaration.employee,
            fiscal_year = %declaration.fiscal_year,
            "{}",
            message
        );
    }
    Ok(ValidatedDeclaration {
        declaration,
        warnings: violations,
    })
}

/// Validates and stores a new declaration.
pub fn create_declaration<S>(
    mut draft: DeclarationDraft,
    store: &S,
    caps: &StatutoryCaps,
) -> EngineResult<ValidatedDeclaration>
where
    S: DeclarationStore + ?Sized,
{
    draft.name = None;
    let validated = validate_declaration(&draft, store, caps)?;
    let declaration = store.insert_declaration(validated.declaration)?;
    info!(
        declaration = %declaration.name,
        employee = %declaration.employee,
        fiscal_year = %declaration.fiscal_year,
        total_exemption = %declaration.total_exemption,
        "Created investment declaration"
    );
    Ok(ValidatedDeclaration {
        declaration,
        warnings: validated.warnings,
    })
}

/// Validates and replaces the declaration called `name`.
///
/// # Errors
///
/// Returns [`EngineError::NotFound`] if no declaration has that name, plus
/// any error [`validate_declaration`] raises.
pub fn update_declaration<S>(
    name: &str,
    mut draft: DeclarationDraft,
    store: &S,
    caps: &StatutoryCaps,
) -> EngineResult<ValidatedDeclaration>
where
    S: DeclarationStore + ?Sized,
{
    if store.get_declaration(name)?.is_none() {
        return Err(EngineError::NotFound {
            doctype: "Employee Investment Declaration".to_string(),
            name: name.to_string(),
        });
    }

    draft.name = Some(name.to_string());
    let validated = validate_declaration(&draft, store, caps)?;
    let declaration = store.update_declaration(validated.declaration)?;
    info!(
        declaration = %declaration.name,
        total_exemption = %declaration.total_exemption,
        "Updated investment declaration"
    );
    Ok(ValidatedDeclaration {
        declaration,
        warnings: validated.warnings,
    })
}
