//! Configuration types for payroll processing.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::models::{SalaryDetail, TaxRegime};

/// Fallback probation length when the settings file does not specify one.
pub const DEFAULT_PROBATION_DAYS: u32 = 90;

fn default_probation_days() -> u32 {
    DEFAULT_PROBATION_DAYS
}

fn enforce_by_default() -> bool {
    true
}

fn default_print_format() -> String {
    "Experience Letter".to_string()
}

/// Statutory caps on declared exemptions.
///
/// A `None` cap is not checked. `enforce` switches every cap between hard
/// mode (validation fails) and soft mode (validation warns).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatutoryCaps {
    /// Ceiling for the Section 80C amount.
    #[serde(default)]
    pub section_80c: Option<Decimal>,
    /// Ceiling for the Section 80D amount.
    #[serde(default)]
    pub section_80d: Option<Decimal>,
    /// Hard-cap mode when true, soft-cap mode when false.
    #[serde(default = "enforce_by_default")]
    pub enforce: bool,
}

impl Default for StatutoryCaps {
    fn default() -> Self {
        Self {
            section_80c: Some(Decimal::new(150_000, 0)),
            section_80d: Some(Decimal::new(50_000, 0)),
            enforce: true,
        }
    }
}

/// The salary component pro-rated exemptions are booked against.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExemptionComponentConfig {
    /// Component name, used as the deduction line tag.
    pub name: String,
    /// Component abbreviation.
    pub abbr: String,
}

impl Default for ExemptionComponentConfig {
    fn default() -> Self {
        Self {
            name: "Investment Exemption".to_string(),
            abbr: "INV_EXEMPT".to_string(),
        }
    }
}

/// General settings from settings.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PayrollSettings {
    /// Statutory caps on declarations.
    #[serde(default)]
    pub caps: StatutoryCaps,
    /// Probation length applied to new joiners, in days.
    #[serde(default = "default_probation_days")]
    pub default_probation_days: u32,
    /// The component investment exemptions are deducted under.
    #[serde(default)]
    pub exemption_component: ExemptionComponentConfig,
    /// The print format rendered as the experience letter on exit.
    #[serde(default = "default_print_format")]
    pub experience_letter_print_format: String,
}

impl Default for PayrollSettings {
    fn default() -> Self {
        Self {
            caps: StatutoryCaps::default(),
            default_probation_days: DEFAULT_PROBATION_DAYS,
            exemption_component: ExemptionComponentConfig::default(),
            experience_letter_print_format: default_print_format(),
        }
    }
}

/// Maps each tax regime to the only salary structure allowed for it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegimeStructures {
    /// Structure used for the old regime.
    pub old_regime: String,
    /// Structure used for the new regime.
    pub new_regime: String,
}

impl RegimeStructures {
    /// Returns the structure configured for a regime.
    pub fn structure_for(&self, regime: TaxRegime) -> &str {
        match regime {
            TaxRegime::Old => &self.old_regime,
            TaxRegime::New => &self.new_regime,
        }
    }

    /// Returns true if the structure belongs to either regime.
    pub fn is_allowed(&self, structure: &str) -> bool {
        structure == self.old_regime || structure == self.new_regime
    }

    /// Returns the allowed structures, sorted and deduplicated.
    pub fn allowed(&self) -> Vec<String> {
        let mut allowed = vec![self.old_regime.clone(), self.new_regime.clone()];
        allowed.sort();
        allowed.dedup();
        allowed
    }
}

impl Default for RegimeStructures {
    fn default() -> Self {
        Self {
            old_regime: "DEMO - Salary Structure - Old Regime".to_string(),
            new_regime: "DEMO - Salary Structure - New Regime".to_string(),
        }
    }
}

/// The monthly earnings and deductions of one salary structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StructureDefinition {
    /// Earning lines, per month.
    #[serde(default)]
    pub earnings: Vec<SalaryDetail>,
    /// Deduction lines, per month.
    #[serde(default)]
    pub deductions: Vec<SalaryDetail>,
}

/// Structures configuration file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StructuresConfig {
    /// Map of structure name to definition.
    #[serde(default)]
    pub structures: HashMap<String, StructureDefinition>,
}

/// The complete payroll configuration loaded from YAML files.
#[derive(Debug, Clone, Default)]
pub struct PayrollConfig {
    settings: PayrollSettings,
    regimes: RegimeStructures,
    structures: HashMap<String, StructureDefinition>,
}

impl PayrollConfig {
    /// Creates a new PayrollConfig from its component parts.
    pub fn new(
        settings: PayrollSettings,
        regimes: RegimeStructures,
        structures: HashMap<String, StructureDefinition>,
    ) -> Self {
        Self {
            settings,
            regimes,
            structures,
        }
    }

    /// Returns the general settings.
    pub fn settings(&self) -> &PayrollSettings {
        &self.settings
    }

    /// Returns the statutory caps.
    pub fn caps(&self) -> &StatutoryCaps {
        &self.settings.caps
    }

    /// Returns the regime-to-structure mapping.
    pub fn regimes(&self) -> &RegimeStructures {
        &self.regimes
    }

    /// Returns all salary structure definitions.
    pub fn structures(&self) -> &HashMap<String, StructureDefinition> {
        &self.structures
    }

    /// Returns the structure names, sorted.
    pub fn structure_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.structures.keys().cloned().collect();
        names.sort();
        names
    }
}
