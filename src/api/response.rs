//! Response types for the HR Payroll Engine API.
//!
//! This module defines the error response structures, the mapping from
//! [`EngineError`] to HTTP statuses, and the success bodies that wrap
//! several results.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::calculation::ProrationResult;
use crate::error::EngineError;
use crate::lifecycle::LifecycleUpdate;
use crate::models::{Employee, SalarySlip, TaxRegime};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::MissingField { .. } => {
                (StatusCode::BAD_REQUEST, ApiError::new("MISSING_FIELD", message))
            }
            EngineError::NonNumericAmount { value, .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "NON_NUMERIC_AMOUNT",
                    message,
                    format!("Received: {}", value),
                ),
            ),
            EngineError::NegativeAmount { .. } => {
                (StatusCode::BAD_REQUEST, ApiError::new("NEGATIVE_AMOUNT", message))
            }
            EngineError::AmountOutOfRange { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("AMOUNT_OUT_OF_RANGE", message),
            ),
            EngineError::CapExceeded { .. } => {
                (StatusCode::BAD_REQUEST, ApiError::new("CAP_EXCEEDED", message))
            }
            EngineError::StructureNotAllowed { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("STRUCTURE_NOT_ALLOWED", message),
            ),
            EngineError::InvalidDate { .. } => {
                (StatusCode::BAD_REQUEST, ApiError::new("INVALID_DATE", message))
            }
            EngineError::InvalidDateRange { .. } => (
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_DATE_RANGE", message),
            ),
            EngineError::DuplicateDeclaration { existing, .. } => (
                StatusCode::CONFLICT,
                ApiError::with_details(
                    "DUPLICATE_DECLARATION",
                    message,
                    format!("Existing declaration: {}", existing),
                ),
            ),
            EngineError::EmployeeExists { .. } => {
                (StatusCode::CONFLICT, ApiError::new("EMPLOYEE_EXISTS", message))
            }
            EngineError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message))
            }
            EngineError::Storage { message: details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("STORAGE_ERROR", "Storage failure", details),
            ),
            EngineError::Rendering { message: details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("RENDERING_ERROR", "Rendering failed", details),
            ),
            EngineError::CalculationError { message: details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CALCULATION_ERROR", "Calculation failed", details),
            ),
        };
        ApiErrorResponse { status, error }
    }
}

/// Response body for `/salary-slips/validate`.
#[derive(Debug, Clone, Serialize)]
pub struct SlipValidationResponse {
    /// The adjusted slip.
    pub slip: SalarySlip,
    /// What the pro-ration did.
    pub proration: ProrationResult,
}

/// Response body for employee writes.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeResponse {
    /// The stored employee.
    pub employee: Employee,
    /// Fields the lifecycle hooks changed.
    pub lifecycle: LifecycleUpdate,
}

/// Response body for `/employees/:id/salary-structures`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryStructuresResponse {
    /// The employee id.
    pub employee: String,
    /// The employee's tax regime preference.
    pub tax_regime: TaxRegime,
    /// Structures matching the preference.
    pub salary_structures: Vec<String>,
}

/// Response body for `/config/reload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadResponse {
    /// Directory the configuration was read from.
    pub source: Option<String>,
    /// Number of salary structures loaded.
    pub structures: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_validation_errors_map_to_bad_request() {
        let errors = [
            EngineError::MissingField {
                field: "Employee".to_string(),
            },
            EngineError::NegativeAmount {
                field: "Other Exemptions".to_string(),
            },
            EngineError::CapExceeded {
                violations: vec!["too much".to_string()],
            },
            EngineError::AmountOutOfRange {
                field: "Total Deduction".to_string(),
            },
        ];
        for err in errors {
            let response: ApiErrorResponse = err.into();
            assert_eq!(response.status, StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let response: ApiErrorResponse = EngineError::DuplicateDeclaration {
            employee: "EMP-1".to_string(),
            fiscal_year: "2025-26".to_string(),
            existing: "decl-1".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::CONFLICT);
        assert_eq!(response.error.code, "DUPLICATE_DECLARATION");
        assert_eq!(
            response.error.details.as_deref(),
            Some("Existing declaration: decl-1")
        );
    }

    #[test]
    fn test_existing_employee_maps_to_conflict() {
        let response: ApiErrorResponse = EngineError::EmployeeExists {
            id: "EMP-0001".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::CONFLICT);
        assert_eq!(response.error.code, "EMPLOYEE_EXISTS");
        assert_eq!(response.error.message, "Employee already exists: EMP-0001");
    }

    #[test]
    fn test_not_found_and_storage_statuses() {
        let not_found: ApiErrorResponse = EngineError::NotFound {
            doctype: "Employee".to_string(),
            name: "EMP-9".to_string(),
        }
        .into();
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert_eq!(not_found.error.message, "Employee not found: EMP-9");

        let storage: ApiErrorResponse = EngineError::Storage {
            message: "disk full".to_string(),
        }
        .into();
        assert_eq!(storage.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(storage.error.details.as_deref(), Some("disk full"));
    }
}
