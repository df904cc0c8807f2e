//! Investment declaration models.
//!
//! A declaration is an employee's self-reported tax-exemption claim for one
//! fiscal year. [`DeclarationDraft`] is what arrives from the user;
//! [`InvestmentDeclaration`] is the validated, persisted record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The three exemption categories a declaration carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExemptionField {
    /// Section 80C investments (PPF, ELSS, life insurance, ...).
    Section80C,
    /// Section 80D medical insurance premiums.
    Section80D,
    /// Any other exemption.
    Other,
}

impl ExemptionField {
    /// All exemption fields in declaration order.
    pub const ALL: [ExemptionField; 3] = [
        ExemptionField::Section80C,
        ExemptionField::Section80D,
        ExemptionField::Other,
    ];

    /// The label used in validation messages.
    pub fn label(&self) -> &'static str {
        match self {
            ExemptionField::Section80C => "Section 80C Amount",
            ExemptionField::Section80D => "Section 80D Amount",
            ExemptionField::Other => "Other Exemptions",
        }
    }
}

/// A validated investment declaration.
///
/// # Example
///
/// ```
/// use hr_payroll_engine::models::InvestmentDeclaration;
/// use rust_decimal::Decimal;
///
/// let declaration = InvestmentDeclaration {
///     name: "decl-001".to_string(),
///     employee: "EMP-0001".to_string(),
///     fiscal_year: "2025-26".to_string(),
///     section_80c_amount: Decimal::new(100000, 0),
///     section_80d_amount: Decimal::new(20000, 0),
///     other_exemptions: Decimal::ZERO,
///     total_exemption: Decimal::new(120000, 0),
/// };
/// assert_eq!(declaration.amount(hr_payroll_engine::models::ExemptionField::Section80D), Decimal::new(20000, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentDeclaration {
    /// Document name.
    pub name: String,
    /// The employee making the declaration.
    pub employee: String,
    /// The fiscal year label (e.g., "2025-26").
    pub fiscal_year: String,
    /// Section 80C amount.
    pub section_80c_amount: Decimal,
    /// Section 80D amount.
    pub section_80d_amount: Decimal,
    /// Other exemptions.
    pub other_exemptions: Decimal,
    /// Sum of the three amounts, rounded to 2 decimal places.
    pub total_exemption: Decimal,
}

impl InvestmentDeclaration {
    /// Returns the amount held for the given category.
    pub fn amount(&self, field: ExemptionField) -> Decimal {
        match field {
            ExemptionField::Section80C => self.section_80c_amount,
            ExemptionField::Section80D => self.section_80d_amount,
            ExemptionField::Other => self.other_exemptions,
        }
    }
}

/// An unvalidated declaration as submitted.
///
/// Amounts are kept as raw JSON so that non-numeric input can be reported
/// against the field that carried it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclarationDraft {
    /// Existing document name when updating.
    #[serde(default)]
    pub name: Option<String>,
    /// The employee making the declaration.
    #[serde(default)]
    pub employee: Option<String>,
    /// The fiscal year label.
    #[serde(default)]
    pub fiscal_year: Option<String>,
    /// Raw Section 80C amount.
    #[serde(default)]
    pub section_80c_amount: Option<serde_json::Value>,
    /// Raw Section 80D amount.
    #[serde(default)]
    pub section_80d_amount: Option<serde_json::Value>,
    /// Raw other exemptions amount.
    #[serde(default)]
    pub other_exemptions: Option<serde_json::Value>,
}

impl DeclarationDraft {
    /// Returns the raw value submitted for the given category.
    pub fn raw_amount(&self, field: ExemptionField) -> Option<&serde_json::Value> {
        match field {
            ExemptionField::Section80C => self.section_80c_amount.as_ref(),
            ExemptionField::Section80D => self.section_80d_amount.as_ref(),
            ExemptionField::Other => self.other_exemptions.as_ref(),
        }
    }
}

impl From<&InvestmentDeclaration> for DeclarationDraft {
    fn from(declaration: &InvestmentDeclaration) -> Self {
        let raw = |amount: Decimal| Some(serde_json::Value::String(amount.to_string()));
        Self {
            name: Some(declaration.name.clone()),
            employee: Some(declaration.employee.clone()),
            fiscal_year: Some(declaration.fiscal_year.clone()),
            section_80c_amount: raw(declaration.section_80c_amount),
            section_80d_amount: raw(declaration.section_80d_amount),
            other_exemptions: raw(declaration.other_exemptions),
        }
    }
}
