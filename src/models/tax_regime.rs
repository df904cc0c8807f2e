//! Tax regime and salary structure assignment models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The income-tax regime an employee opts into.
///
/// The serialized form is the label shown to users, which is also the
/// substring salary structure names are matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaxRegime {
    /// The old regime, with investment exemptions.
    #[default]
    #[serde(rename = "Old Regime")]
    Old,
    /// The new regime, with lower slab rates and few exemptions.
    #[serde(rename = "New Regime")]
    New,
}

impl TaxRegime {
    /// Returns the display label for the regime.
    ///
    /// # Example
    ///
    /// ```
    /// use hr_payroll_engine::models::TaxRegime;
    ///
    /// assert_eq!(TaxRegime::New.label(), "New Regime");
    /// ```
    pub fn label(&self) -> &'static str {
        match self {
            TaxRegime::Old => "Old Regime",
            TaxRegime::New => "New Regime",
        }
    }
}

impl fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Links an employee to the salary structure their slips are generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryStructureAssignment {
    /// The assignment's document name.
    #[serde(default)]
    pub name: Option<String>,
    /// The employee being assigned.
    #[serde(default)]
    pub employee: Option<String>,
    /// The salary structure selected for the employee.
    #[serde(default)]
    pub salary_structure: Option<String>,
    /// The date the assignment takes effect.
    #[serde(default)]
    pub from_date: Option<NaiveDate>,
}
