//! Investment exemption pro-ration.
//!
//! Runs when a salary slip is validated: the employee's declared exemption
//! for the fiscal year is spread evenly over the months left in that year
//! and booked as a single deduction line on the slip.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::ExemptionComponentConfig;
use crate::error::EngineResult;
use crate::models::{AuditStep, ComponentType, SalaryComponent, SalaryDetail, SalarySlip};
use crate::store::{ComponentStore, DeclarationStore};

use super::exemption::total_declared_exemption;
use super::fiscal_year::fiscal_year_from_date;
use super::remaining_months::{MONTHS_IN_FISCAL_YEAR, months_remaining_in_fiscal};

/// Rule identifier recorded in the audit trail.
pub const INVESTMENT_PRORATION_RULE: &str = "investment_proration";

/// What pro-ration did to a slip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProrationOutcome {
    /// The slip has no employee; nothing was touched.
    Skipped {
        /// Why the slip was skipped.
        reason: String,
    },
    /// No positive exemption is declared; any previous exemption line was removed.
    NoExemption {
        /// The fiscal year that was looked up.
        fiscal_year: String,
    },
    /// An exemption line was booked.
    Applied {
        /// The fiscal year that was looked up.
        fiscal_year: String,
        /// The declared total for the year.
        total_exemption: Decimal,
        /// Months the total was spread over.
        remaining_months: u32,
        /// The amount booked on this slip.
        per_period_amount: Decimal,
    },
}

/// The result of pro-rating a slip, including the outcome and audit step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProrationResult {
    /// What happened to the slip.
    pub outcome: ProrationOutcome,
    /// Exemption lines removed before booking.
    pub removed_rows: usize,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Divides a total over `months`, rounded half away from zero to 2 places.
///
/// # Examples
///
/// ```
/// use hr_payroll_engine::calculation::per_period_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(per_period_amount(Decimal::new(120000, 0), 9), Decimal::new(1333333, 2));
/// ```
pub fn per_period_amount(total: Decimal, months: u32) -> Decimal {
    let months = if months == 0 { MONTHS_IN_FISCAL_YEAR } else { months };
    (total / Decimal::from(months)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Creates the exemption salary component if it does not exist yet.
///
/// Returns true when the component was created.
pub fn ensure_exemption_component<S>(
    store: &S,
    component: &ExemptionComponentConfig,
) -> EngineResult<bool>
where
    S: ComponentStore + ?Sized,
{
    if store.component_exists(&component.name)? {
        return Ok(false);
    }

    store.insert_component(SalaryComponent {
        salary_component: component.name.clone(),
        salary_component_abbr: component.abbr.clone(),
        component_type: ComponentType::Deduction,
        is_taxable: false,
        default_amount: Decimal::ZERO,
    })?;
    debug!(component = %component.name, "Created exemption salary component");
    Ok(true)
}

/// Removes every deduction line tagged with `component`, keeping the order
/// of the remaining lines. Returns how many lines were removed.
pub fn remove_exemption_rows(slip: &mut SalarySlip, component: &str) -> usize {
    let before = slip.deductions.len();
    slip.deductions.retain(|d| d.salary_component != component);
    before - slip.deductions.len()
}

/// Books `amount` on the exemption line, updating it in place if present.
///
/// Non-positive amounts are ignored.
pub fn add_exemption_row(slip: &mut SalarySlip, component: &ExemptionComponentConfig, amount: Decimal) {
    if amount <= Decimal::ZERO {
        return;
    }

    if let Some(line) = slip
        .deductions
        .iter_mut()
        .find(|d| d.salary_component == component.name)
    {
        line.amount = amount;
        return;
    }

    slip.deductions.push(SalaryDetail {
        salary_component: component.name.clone(),
        abbr: Some(component.abbr.clone()),
        amount,
    });
}

/// Adjusts a salary slip for the employee's investment declaration.
///
/// Steps:
/// 1. Skip slips without an employee.
/// 2. Use the slip's fiscal year, or derive it from the start date.
/// 3. Read the declared total for the employee and year.
/// 4. Make sure the exemption component exists.
/// 5. Remove existing exemption lines.
/// 6. Stop if the total is not positive.
/// 7. Book `round(total / remaining months, 2)` as the exemption line.
///
/// Re-running on the same slip yields the same single line. Any fault is
/// logged and returned; the caller must abort the slip validation.
///
/// # Examples
///
/// ```
/// use hr_payroll_engine::calculation::{ProrationOutcome, adjust_salary_slip_with_investments};
/// use hr_payroll_engine::config::ExemptionComponentConfig;
/// use hr_payroll_engine::models::{InvestmentDeclaration, SalarySlip};
/// use hr_payroll_engine::store::{DeclarationStore, InMemoryStore};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let store = InMemoryStore::new();
/// store.insert_declaration(InvestmentDeclaration {
///     name: "decl-1".to_string(),
///     employee: "EMP-0001".to_string(),
///     fiscal_year: "2025-26".to_string(),
///     section_80c_amount: Decimal::new(120000, 0),
///     section_80d_amount: Decimal::ZERO,
///     other_exemptions: Decimal::ZERO,
///     total_exemption: Decimal::new(120000, 0),
/// }).unwrap();
///
/// let mut slip = SalarySlip::new(
///     "EMP-0001",
///     NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
/// );
/// slip.fiscal_year = Some("2025-26".to_string());
///
/// let component = ExemptionComponentConfig::default();
/// let result = adjust_salary_slip_with_investments(&mut slip, &store, &component, 1).unwrap();
///
/// assert!(matches!(result.outcome, ProrationOutcome::Applied { remaining_months: 9, .. }));
/// assert_eq!(slip.deductions[0].amount, Decimal::new(1333333, 2));
/// ```
pub fn adjust_salary_slip_with_investments<S>(
    slip: &mut SalarySlip,
    store: &S,
    component: &ExemptionComponentConfig,
    step_number: u32,
) -> EngineResult<ProrationResult>
where
    S: DeclarationStore + ComponentStore + ?Sized,
{
    prorate(slip, store, component, step_number).inspect_err(|err| {
        error!(
            slip = slip.name.as_deref().unwrap_or_default(),
            employee = slip.employee.as_deref().unwrap_or_default(),
            error = %err,
            "Investment exemption pro-ration failed"
        );
    })
}

fn prorate<S>(
    slip: &mut SalarySlip,
    store: &S,
    component: &ExemptionComponentConfig,
    step_number: u32,
) -> EngineResult<ProrationResult>
where
    S: DeclarationStore + ComponentStore + ?Sized,
{
    let Some(employee) = slip.employee.clone().filter(|e| !e.is_empty()) else {
        let reason = "Salary slip has no employee".to_string();
        return Ok(ProrationResult {
            audit_step: audit_step(
                step_number,
                serde_json::json!({ "employee": null }),
                serde_json::json!({ "applied": false }),
                reason.clone(),
            ),
            outcome: ProrationOutcome::Skipped { reason },
            removed_rows: 0,
        });
    };

    let fiscal_year = match slip.fiscal_year.as_deref().filter(|fy| !fy.is_empty()) {
        Some(fy) => fy.to_string(),
        None => fiscal_year_from_date(slip.start_date),
    };

    let total = total_declared_exemption(store, Some(&employee), Some(&fiscal_year))?;
    ensure_exemption_component(store, component)?;
    let removed_rows = remove_exemption_rows(slip, &component.name);

    let input = serde_json::json!({
        "employee": employee,
        "fiscal_year": fiscal_year,
        "start_date": slip.start_date.map(|d| d.to_string()),
        "total_exemption": total.to_string(),
        "removed_rows": removed_rows
    });

    if total <= Decimal::ZERO {
        return Ok(ProrationResult {
            audit_step: audit_step(
                step_number,
                input,
                serde_json::json!({ "applied": false }),
                format!(
                    "No positive exemption declared for {} in {}; no deduction booked",
                    employee, fiscal_year
                ),
            ),
            outcome: ProrationOutcome::NoExemption { fiscal_year },
            removed_rows,
        });
    }

    let remaining_months = match months_remaining_in_fiscal(slip.start_date, Some(&fiscal_year)) {
        0 => MONTHS_IN_FISCAL_YEAR,
        months => months,
    };
    let amount = per_period_amount(total, remaining_months);
    add_exemption_row(slip, component, amount);

    debug!(
        employee = %employee,
        fiscal_year = %fiscal_year,
        remaining_months,
        per_period_amount = %amount,
        "Booked investment exemption"
    );

    Ok(ProrationResult {
        audit_step: audit_step(
            step_number,
            input,
            serde_json::json!({
                "applied": true,
                "remaining_months": remaining_months,
                "per_period_amount": amount.to_string()
            }),
            format!(
                "{} / {} remaining months = {}",
                total.normalize(),
                remaining_months,
                amount
            ),
        ),
        outcome: ProrationOutcome::Applied {
            fiscal_year,
            total_exemption: total,
            remaining_months,
            per_period_amount: amount,
        },
        removed_rows,
    })
}

fn audit_step(
    step_number: u32,
    input: serde_json::Value,
    output: serde_json::Value,
    reasoning: String,
) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: INVESTMENT_PRORATION_RULE.to_string(),
        rule_name: "Investment Exemption Pro-ration".to_string(),
        input,
        output,
        reasoning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::InvestmentDeclaration;
    use crate::store::InMemoryStore;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn component() -> ExemptionComponentConfig {
        ExemptionComponentConfig::default()
    }

    fn store_with_total(fiscal_year: &str, total: &str) -> InMemoryStore {
        let store = InMemoryStore::new();
        store
            .insert_declaration(InvestmentDeclaration {
                name: "decl-1".to_string(),
                employee: "EMP-0001".to_string(),
                fiscal_year: fiscal_year.to_string(),
                section_80c_amount: dec(total),
                section_80d_amount: Decimal::ZERO,
                other_exemptions: Decimal::ZERO,
                total_exemption: dec(total),
            })
            .unwrap();
        store
    }

    fn july_slip() -> SalarySlip {
        let mut slip = SalarySlip::new(
            "EMP-0001",
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 31).unwrap(),
        );
        slip.fiscal_year = Some("2025-26".to_string());
        slip.deductions.push(SalaryDetail::new("Provident Fund", dec("1800")));
        slip.deductions.push(SalaryDetail::new("Income Tax", dec("2500")));
        slip
    }

    fn exemption_lines(slip: &SalarySlip) -> Vec<&SalaryDetail> {
        slip.deductions_for("Investment Exemption").collect()
    }

    /// PR-001: 120000 over Jul..Mar
    #[test]
    fn test_july_start_books_nine_month_share() {
        let store = store_with_total("2025-26", "120000");
        let mut slip = july_slip();

        let result = adjust_salary_slip_with_investments(&mut slip, &store, &component(), 1).unwrap();

        assert_eq!(
            result.outcome,
            ProrationOutcome::Applied {
                fiscal_year: "2025-26".to_string(),
                total_exemption: dec("120000"),
                remaining_months: 9,
                per_period_amount: dec("13333.33"),
            }
        );
        let lines = exemption_lines(&slip);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].amount, dec("13333.33"));
        assert_eq!(lines[0].abbr.as_deref(), Some("INV_EXEMPT"));
        assert_eq!(result.audit_step.rule_id, INVESTMENT_PRORATION_RULE);
        assert_eq!(
            result.audit_step.reasoning,
            "120000 / 9 remaining months = 13333.33"
        );
    }

    /// PR-002: re-running does not duplicate the line
    #[test]
    fn test_rerun_is_idempotent() {
        let store = store_with_total("2025-26", "120000");
        let mut slip = july_slip();

        adjust_salary_slip_with_investments(&mut slip, &store, &component(), 1).unwrap();
        let first = slip.clone();
        let second = adjust_salary_slip_with_investments(&mut slip, &store, &component(), 2).unwrap();

        assert_eq!(slip, first);
        assert_eq!(second.removed_rows, 1);
        assert_eq!(exemption_lines(&slip).len(), 1);
    }

    /// PR-003: zero declaration removes any existing line
    #[test]
    fn test_zero_total_removes_existing_line() {
        let store = store_with_total("2025-26", "0");
        let mut slip = july_slip();
        slip.deductions
            .insert(1, SalaryDetail::new("Investment Exemption", dec("999")));

        let result = adjust_salary_slip_with_investments(&mut slip, &store, &component(), 1).unwrap();

        assert_eq!(
            result.outcome,
            ProrationOutcome::NoExemption {
                fiscal_year: "2025-26".to_string()
            }
        );
        assert_eq!(result.removed_rows, 1);
        assert!(exemption_lines(&slip).is_empty());
    }

    #[test]
    fn test_no_declaration_adds_nothing() {
        let store = InMemoryStore::new();
        let mut slip = july_slip();

        let result = adjust_salary_slip_with_investments(&mut slip, &store, &component(), 1).unwrap();

        assert!(matches!(result.outcome, ProrationOutcome::NoExemption { .. }));
        assert_eq!(slip.deductions.len(), 2);
    }

    #[test]
    fn test_removal_preserves_order_of_other_lines() {
        let store = store_with_total("2025-26", "120000");
        let mut slip = july_slip();
        slip.deductions
            .insert(0, SalaryDetail::new("Investment Exemption", dec("1")));
        slip.deductions
            .insert(2, SalaryDetail::new("Investment Exemption", dec("2")));

        let result = adjust_salary_slip_with_investments(&mut slip, &store, &component(), 1).unwrap();

        assert_eq!(result.removed_rows, 2);
        let names: Vec<_> = slip
            .deductions
            .iter()
            .map(|d| d.salary_component.as_str())
            .collect();
        assert_eq!(names, vec!["Provident Fund", "Income Tax", "Investment Exemption"]);
    }

    #[test]
    fn test_missing_employee_is_skipped() {
        let store = store_with_total("2025-26", "120000");
        let mut slip = july_slip();
        slip.employee = None;
        slip.deductions
            .push(SalaryDetail::new("Investment Exemption", dec("50")));

        let result = adjust_salary_slip_with_investments(&mut slip, &store, &component(), 1).unwrap();

        assert!(matches!(result.outcome, ProrationOutcome::Skipped { .. }));
        assert_eq!(exemption_lines(&slip).len(), 1);
        assert!(!store.component_exists("Investment Exemption").unwrap());
    }

    #[test]
    fn test_derives_fiscal_year_from_start_date() {
        let store = store_with_total("2025-2026", "60000");
        let mut slip = july_slip();
        slip.fiscal_year = None;
        slip.start_date = NaiveDate::from_ymd_opt(2026, 1, 1);

        let result = adjust_salary_slip_with_investments(&mut slip, &store, &component(), 1).unwrap();

        match result.outcome {
            ProrationOutcome::Applied {
                fiscal_year,
                remaining_months,
                per_period_amount,
                ..
            } => {
                assert_eq!(fiscal_year, "2025-2026");
                assert_eq!(remaining_months, 3);
                assert_eq!(per_period_amount, dec("20000"));
            }
            other => panic!("Expected Applied, got {:?}", other),
        }
    }

    #[test]
    fn test_creates_exemption_component_once() {
        let store = store_with_total("2025-26", "12000");
        let mut slip = july_slip();

        adjust_salary_slip_with_investments(&mut slip, &store, &component(), 1).unwrap();
        let created = store.component("Investment Exemption").unwrap().unwrap();
        assert_eq!(created.component_type, ComponentType::Deduction);
        assert!(!created.is_taxable);
        assert!(!ensure_exemption_component(&store, &component()).unwrap());
    }

    #[test]
    fn test_store_fault_is_propagated() {
        struct BrokenStore;

        impl DeclarationStore for BrokenStore {
            fn find_declarations(&self, _: &str, _: &str) -> EngineResult<Vec<InvestmentDeclaration>> {
                Err(EngineError::Storage {
                    message: "timeout".to_string(),
                })
            }
            fn get_declaration(&self, _: &str) -> EngineResult<Option<InvestmentDeclaration>> {
                Ok(None)
            }
            fn insert_declaration(&self, d: InvestmentDeclaration) -> EngineResult<InvestmentDeclaration> {
                Ok(d)
            }
            fn update_declaration(&self, d: InvestmentDeclaration) -> EngineResult<InvestmentDeclaration> {
                Ok(d)
            }
            fn delete_declaration(&self, _: &str) -> EngineResult<()> {
                Ok(())
            }
        }

        impl ComponentStore for BrokenStore {
            fn component_exists(&self, _: &str) -> EngineResult<bool> {
                Ok(true)
            }
            fn insert_component(&self, _: SalaryComponent) -> EngineResult<()> {
                Ok(())
            }
        }

        let mut slip = july_slip();
        let before = slip.clone();
        let result = adjust_salary_slip_with_investments(&mut slip, &BrokenStore, &component(), 1);

        assert!(matches!(result, Err(EngineError::Storage { .. })));
        assert_eq!(slip, before);
    }

    #[test]
    fn test_add_row_updates_existing_line_in_place() {
        let mut slip = july_slip();
        slip.deductions
            .insert(0, SalaryDetail::new("Investment Exemption", dec("1")));

        add_exemption_row(&mut slip, &component(), dec("750.25"));

        assert_eq!(slip.deductions.len(), 3);
        assert_eq!(slip.deductions[0].amount, dec("750.25"));
    }

    #[test]
    fn test_add_row_ignores_non_positive_amounts() {
        let mut slip = july_slip();
        add_exemption_row(&mut slip, &component(), Decimal::ZERO);
        add_exemption_row(&mut slip, &component(), dec("-5"));
        assert!(exemption_lines(&slip).is_empty());
    }

    #[test]
    fn test_per_period_rounds_half_away_from_zero() {
        assert_eq!(per_period_amount(dec("0.05"), 2), dec("0.03"));
        assert_eq!(per_period_amount(dec("100"), 3), dec("33.33"));
        assert_eq!(per_period_amount(dec("200"), 3), dec("66.67"));
    }

    #[test]
    fn test_per_period_treats_zero_months_as_full_year() {
        assert_eq!(per_period_amount(dec("1200"), 0), dec("100"));
    }

    proptest! {
        #[test]
        fn prop_per_period_total_within_rounding_tolerance(
            cents in 1i64..10_000_000_000,
            months in 1u32..=12,
        ) {
            let total = Decimal::new(cents, 2);
            let share = per_period_amount(total, months);
            let spread = share * Decimal::from(months);
            let tolerance = Decimal::new(5, 3) * Decimal::from(months);
            prop_assert!((spread - total).abs() <= tolerance);
        }
    }
}
