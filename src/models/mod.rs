//! Core data models for the HR Payroll Engine.
//!
//! These are plain records; persistence goes through the traits in
//! [`crate::store`].

mod audit;
mod declaration;
mod employee;
mod salary_slip;
mod tax_regime;

pub use audit::AuditStep;
pub use declaration::{DeclarationDraft, ExemptionField, InvestmentDeclaration};
pub use employee::{Employee, EmployeeFilter, EmployeeStatus, LifecycleStatus};
pub use salary_slip::{ComponentType, SalaryComponent, SalaryDetail, SalarySlip, sum_amounts};
pub use tax_regime::{SalaryStructureAssignment, TaxRegime};
