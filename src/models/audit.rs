//! Audit trail model.
//!
//! Every adjustment the engine makes to a salary slip is explained by an
//! [`AuditStep`], so payroll staff can trace why a deduction has the amount
//! it has.

use serde::{Deserialize, Serialize};

/// Represents a single step in the audit trail.
///
/// # Example
///
/// ```
/// use hr_payroll_engine::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "investment_proration".to_string(),
///     rule_name: "Investment Exemption Pro-ration".to_string(),
///     input: serde_json::json!({"total_exemption": "120000"}),
///     output: serde_json::json!({"per_period_amount": "13333.33"}),
///     reasoning: "120000 / 9 months = 13333.33".to_string(),
/// };
/// assert_eq!(step.step_number, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number in the calculation.
    pub step_number: u32,
    /// The identifier of the rule being applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input values for this step.
    pub input: serde_json::Value,
    /// The output values from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the step.
    pub reasoning: String,
}
