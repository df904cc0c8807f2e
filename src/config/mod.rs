//! Configuration loading and management for the HR Payroll Engine.
//!
//! This module provides functionality to load payroll configuration from YAML
//! files: statutory caps, probation defaults, the exemption component, the
//! tax-regime mapping and salary structure definitions.
//!
//! # Example
//!
//! ```no_run
//! use hr_payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Old regime structure: {}", config.config().regimes().old_regime);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DEFAULT_PROBATION_DAYS, ExemptionComponentConfig, PayrollConfig, PayrollSettings,
    RegimeStructures, StatutoryCaps, StructureDefinition, StructuresConfig,
};
