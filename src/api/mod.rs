//! HTTP API module for the HR Payroll Engine.
//!
//! This module exposes the declaration, salary slip, assignment, employee
//! lifecycle, report and configuration operations as JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::SalarySlipRequest;
pub use response::{
    ApiError, ApiErrorResponse, EmployeeResponse, ReloadResponse, SalaryStructuresResponse,
    SlipValidationResponse,
};
pub use state::AppState;
