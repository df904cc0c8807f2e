//! HTTP request handlers for the HR Payroll Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::adjust_salary_slip_with_investments;
use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::lifecycle::{
    LifecycleContext, on_employee_after_insert, on_employee_after_save, on_employee_on_update,
};
use crate::models::{DeclarationDraft, Employee, SalarySlip, SalaryStructureAssignment};
use crate::report::{ReportFilters, execute};
use crate::validation::{
    create_declaration, structures_for_employee, update_declaration,
    validate_salary_structure_assignment,
};

use super::request::SalarySlipRequest;
use super::response::{
    ApiError, ApiErrorResponse, EmployeeResponse, ReloadResponse, SalaryStructuresResponse,
    SlipValidationResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/declarations", post(create_declaration_handler))
        .route(
            "/declarations/:name",
            get(get_declaration_handler)
                .put(update_declaration_handler)
                .delete(delete_declaration_handler),
        )
        .route("/salary-slips/validate", post(validate_salary_slip_handler))
        .route(
            "/salary-structure-assignments/validate",
            post(validate_assignment_handler),
        )
        .route(
            "/employees/:id/salary-structures",
            get(employee_structures_handler),
        )
        .route("/employees", post(create_employee_handler))
        .route(
            "/employees/:id",
            get(get_employee_handler).put(update_employee_handler),
        )
        .route(
            "/reports/tax-regime-comparison",
            post(tax_regime_report_handler),
        )
        .route("/config/reload", post(reload_config_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

/// Unwraps a JSON body or returns the 400 response for it.
macro_rules! json_body {
    ($payload:expr, $correlation_id:expr) => {
        match $payload {
            Ok(Json(body)) => body,
            Err(rejection) => return rejection_response($correlation_id, rejection),
        }
    };
}

/// Unwraps an engine result or returns the error response for it.
macro_rules! try_engine {
    ($result:expr, $correlation_id:expr) => {
        match $result {
            Ok(value) => value,
            Err(err) => return error_response($correlation_id, err),
        }
    };
}

fn employee_not_found(id: &str) -> EngineError {
    EngineError::NotFound {
        doctype: "Employee".to_string(),
        name: id.to_string(),
    }
}

/// Handler for POST /declarations.
async fn create_declaration_handler(
    State(state): State<AppState>,
    payload: Result<Json<DeclarationDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Creating investment declaration");

    let draft = json_body!(payload, correlation_id);
    let config = try_engine!(state.config(), correlation_id);
    let saved = try_engine!(
        create_declaration(draft, state.store(), config.config().caps()),
        correlation_id
    );

    info!(
        correlation_id = %correlation_id,
        declaration = %saved.declaration.name,
        warnings = saved.warnings.len(),
        "Declaration created"
    );
    json_response(StatusCode::CREATED, saved)
}

/// Handler for GET /declarations/:name.
async fn get_declaration_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let declaration = try_engine!(
        state.store().get_declaration(&name).and_then(|found| {
            found.ok_or_else(|| EngineError::NotFound {
                doctype: "Employee Investment Declaration".to_string(),
                name: name.clone(),
            })
        }),
        correlation_id
    );
    json_response(StatusCode::OK, declaration)
}

/// Handler for PUT /declarations/:name.
async fn update_declaration_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<DeclarationDraft>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, declaration = %name, "Updating investment declaration");

    let draft = json_body!(payload, correlation_id);
    let config = try_engine!(state.config(), correlation_id);
    let saved = try_engine!(
        update_declaration(&name, draft, state.store(), config.config().caps()),
        correlation_id
    );
    json_response(StatusCode::OK, saved)
}

/// Handler for DELETE /declarations/:name.
async fn delete_declaration_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    try_engine!(state.store().delete_declaration(&name), correlation_id);
    info!(correlation_id = %correlation_id, declaration = %name, "Declaration deleted");
    StatusCode::NO_CONTENT.into_response()
}

/// Handler for POST /salary-slips/validate.
///
/// Books the investment exemption onto the slip and returns it.
async fn validate_salary_slip_handler(
    State(state): State<AppState>,
    payload: Result<Json<SalarySlipRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Validating salary slip");

    let mut slip: SalarySlip = json_body!(payload, correlation_id).into();
    let config = try_engine!(state.config(), correlation_id);

    let start_time = Instant::now();
    let proration = try_engine!(
        adjust_salary_slip_with_investments(
            &mut slip,
            state.store(),
            &config.config().settings().exemption_component,
            1,
        ),
        correlation_id
    );
    let total_deduction = try_engine!(slip.total_deduction(), correlation_id);

    info!(
        correlation_id = %correlation_id,
        employee = slip.employee.as_deref().unwrap_or_default(),
        total_deduction = %total_deduction,
        duration_us = start_time.elapsed().as_micros(),
        "Salary slip validated"
    );
    json_response(StatusCode::OK, SlipValidationResponse { slip, proration })
}

/// Handler for POST /salary-structure-assignments/validate.
async fn validate_assignment_handler(
    State(state): State<AppState>,
    payload: Result<Json<SalaryStructureAssignment>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let assignment = json_body!(payload, correlation_id);
    let config = try_engine!(state.config(), correlation_id);
    try_engine!(
        validate_salary_structure_assignment(&assignment, config.config().regimes()),
        correlation_id
    );
    json_response(StatusCode::OK, assignment)
}

fn candidate_structures(config: &ConfigLoader) -> Vec<String> {
    let mut names = config.config().structure_names();
    names.extend(config.config().regimes().allowed());
    names.sort();
    names.dedup();
    names
}

/// Handler for GET /employees/:id/salary-structures.
async fn employee_structures_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let config = try_engine!(state.config(), correlation_id);
    let (tax_regime, salary_structures) = try_engine!(
        structures_for_employee(state.store(), &id, candidate_structures(&config)),
        correlation_id
    );
    json_response(
        StatusCode::OK,
        SalaryStructuresResponse {
            employee: id,
            tax_regime,
            salary_structures,
        },
    )
}

/// Handler for POST /employees.
///
/// Runs the insert and save hooks before storing the employee. An id that
/// is already stored is a 409.
async fn create_employee_handler(
    State(state): State<AppState>,
    payload: Result<Json<Employee>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let mut employee = json_body!(payload, correlation_id);
    if employee.id.trim().is_empty() {
        return error_response(
            correlation_id,
            EngineError::MissingField {
                field: "Employee ID".to_string(),
            },
        );
    }
    let config = try_engine!(state.config(), correlation_id);
    let ctx = LifecycleContext::new(config.config().settings(), state.store())
        .with_renderer(state.renderer());
    let mut lifecycle = on_employee_after_insert(&mut employee, &ctx);
    let after_save = on_employee_after_save(&mut employee, &ctx);
    lifecycle.changes.extend(after_save.changes);
    lifecycle.warnings.extend(after_save.warnings);

    let employee = try_engine!(state.store().insert_employee(employee), correlation_id);
    info!(
        correlation_id = %correlation_id,
        employee = %employee.id,
        changes = lifecycle.changes.len(),
        "Employee created"
    );
    json_response(StatusCode::CREATED, EmployeeResponse { employee, lifecycle })
}

/// Handler for GET /employees/:id.
async fn get_employee_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();

    let employee = try_engine!(
        state
            .store()
            .get_employee(&id)
            .and_then(|found| found.ok_or_else(|| employee_not_found(&id))),
        correlation_id
    );
    json_response(StatusCode::OK, employee)
}

fn update_employee(
    state: &AppState,
    id: &str,
    mut employee: Employee,
) -> EngineResult<EmployeeResponse> {
    let previous = state
        .store()
        .get_employee(id)?
        .ok_or_else(|| employee_not_found(id))?;
    let config = state.config()?;
    let ctx = LifecycleContext::new(config.config().settings(), state.store())
        .with_renderer(state.renderer());

    let mut lifecycle = on_employee_on_update(Some(&previous), &mut employee, &ctx);
    let after_save = on_employee_after_save(&mut employee, &ctx);
    lifecycle.changes.extend(after_save.changes);
    lifecycle.warnings.extend(after_save.warnings);

    let employee = state.store().save_employee(employee)?;
    Ok(EmployeeResponse { employee, lifecycle })
}

/// Handler for PUT /employees/:id.
///
/// Runs the update and save hooks against the stored record.
async fn update_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Employee>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let mut employee = json_body!(payload, correlation_id);
    employee.id = id.clone();

    let response = try_engine!(update_employee(&state, &id, employee), correlation_id);
    info!(
        correlation_id = %correlation_id,
        employee = %response.employee.id,
        changes = response.lifecycle.changes.len(),
        "Employee updated"
    );
    json_response(StatusCode::OK, response)
}

/// Handler for POST /reports/tax-regime-comparison.
async fn tax_regime_report_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReportFilters>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Running tax regime comparison");

    let filters = json_body!(payload, correlation_id);
    let config = try_engine!(state.config(), correlation_id);
    let calculator = try_engine!(state.slip_calculator(), correlation_id);

    let start_time = Instant::now();
    let report = try_engine!(
        execute(
            &filters,
            state.store(),
            calculator.as_ref(),
            config.config().regimes(),
        ),
        correlation_id
    );

    info!(
        correlation_id = %correlation_id,
        rows = report.data.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Tax regime comparison served"
    );
    json_response(StatusCode::OK, report)
}

/// Handler for POST /config/reload.
async fn reload_config_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();

    let config = try_engine!(state.reload_config(), correlation_id);
    json_response(
        StatusCode::OK,
        ReloadResponse {
            source: config.source().map(|path| path.display().to_string()),
            structures: config.config().structures().len(),
        },
    )
}
