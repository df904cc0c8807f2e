//! Error types for the HR Payroll Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while validating declarations,
//! adjusting salary slips, handling employee lifecycle events and running
//! the tax regime comparison.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the HR Payroll Engine.
///
/// Validation failures abort the save they belong to; storage, rendering and
/// calculation faults are propagated to the caller after being logged.
///
/// # Example
///
/// ```
/// use hr_payroll_engine::error::EngineError;
///
/// let error = EngineError::NegativeAmount {
///     field: "Section 80C Amount".to_string(),
/// };
/// assert_eq!(error.to_string(), "Section 80C Amount cannot be negative");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A required field was empty or absent.
    #[error("{field} is required")]
    MissingField {
        /// The label of the missing field.
        field: String,
    },

    /// A declared amount could not be read as a number.
    #[error("{field} must be a number")]
    NonNumericAmount {
        /// The label of the offending field.
        field: String,
        /// The raw value that was supplied.
        value: String,
    },

    /// A declared amount was below zero.
    #[error("{field} cannot be negative")]
    NegativeAmount {
        /// The label of the offending field.
        field: String,
    },

    /// An amount, or a total built from amounts, does not fit in a decimal.
    #[error("{field} is too large")]
    AmountOutOfRange {
        /// The label of the amount or total that overflowed.
        field: String,
    },

    /// Another declaration already exists for the same employee and fiscal year.
    #[error(
        "A declaration already exists for employee {employee} in fiscal year {fiscal_year}. \
         Open {existing} to update or delete it before creating a new one."
    )]
    DuplicateDeclaration {
        /// The employee the declarations belong to.
        employee: String,
        /// The fiscal year label.
        fiscal_year: String,
        /// The name of the conflicting declaration.
        existing: String,
    },

    /// One or more declared amounts exceed their statutory cap in hard-cap mode.
    #[error("Validation Error(s): {}", .violations.join(" "))]
    CapExceeded {
        /// One message per exceeded cap.
        violations: Vec<String>,
    },

    /// An employee with the same id is already stored.
    #[error("Employee already exists: {id}")]
    EmployeeExists {
        /// The conflicting employee id.
        id: String,
    },

    /// A salary structure assignment references a structure outside the regime mapping.
    #[error(
        "Salary Structure Assignment may only reference salary structures for Old/New tax regimes. \
         Found: {}. Please choose one of: {}", .structure, .allowed.join(", ")
    )]
    StructureNotAllowed {
        /// The structure that was rejected.
        structure: String,
        /// The structures that are permitted, sorted.
        allowed: Vec<String>,
    },

    /// A date field could not be parsed.
    #[error("Invalid date for {field}: {value}")]
    InvalidDate {
        /// The field holding the date.
        field: String,
        /// The raw value that was supplied.
        value: String,
    },

    /// A date range was inverted.
    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange {
        /// The range start.
        start: NaiveDate,
        /// The range end.
        end: NaiveDate,
    },

    /// A referenced document does not exist.
    #[error("{doctype} not found: {name}")]
    NotFound {
        /// The kind of document (e.g., "Employee").
        doctype: String,
        /// The name or id that was looked up.
        name: String,
    },

    /// The document store failed.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage fault.
        message: String,
    },

    /// The print format could not be rendered or attached.
    #[error("Rendering error: {message}")]
    Rendering {
        /// A description of the rendering fault.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
