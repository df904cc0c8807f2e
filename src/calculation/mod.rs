//! Calculation logic for payroll investment exemptions.
//!
//! This module contains the date helpers, fiscal year derivation, the
//! remaining-months count, the declared-exemption lookup and the pro-ration
//! engine that books the exemption deduction onto a salary slip.

mod dates;
mod exemption;
mod fiscal_year;
mod proration;
mod remaining_months;

pub use dates::{last_day_of_month, months_touched, parse_date, resolve_date, today};
pub use exemption::total_declared_exemption;
pub use fiscal_year::{
    FISCAL_YEAR_END_MONTH, FISCAL_YEAR_START_MONTH, fiscal_year_for, fiscal_year_from_date,
    parse_fiscal_year_start,
};
pub use proration::{
    INVESTMENT_PRORATION_RULE, ProrationOutcome, ProrationResult, add_exemption_row,
    adjust_salary_slip_with_investments, ensure_exemption_component, per_period_amount,
    remove_exemption_rows,
};
pub use remaining_months::{MONTHS_IN_FISCAL_YEAR, months_remaining_in_fiscal};
