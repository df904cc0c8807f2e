//! HR Payroll Engine
//!
//! This crate implements the payroll customisation hooks of an HR system:
//! pro-rating declared investment exemptions across the remaining months of
//! the April-March fiscal year, validating investment declarations against
//! statutory caps, populating employee probation and exit details,
//! restricting salary structures to the configured tax regimes, and
//! comparing an employee's tax under the old and new regimes.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod report;
pub mod store;
pub mod validation;
