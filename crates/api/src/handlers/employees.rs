//! Handlers for the `/employees` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use presence_core::types::DbId;
use presence_db::models::employee::{CreateEmployee, Employee, UpdateEmployee};
use presence_engine::EmployeeDetail;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::state::AppState;

/// GET /api/employees
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Employee>>> {
    let employees = state.directory.list_employees().await?;
    Ok(Json(employees))
}

/// POST /api/employees
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateEmployee>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    let employee = state.directory.create_employee(input).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// GET /api/employees/{id}
///
/// The employee with its department and current status.
pub async fn get_by_id(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<EmployeeDetail>> {
    let detail = state.directory.get_employee_with_status(id).await?;
    Ok(Json(detail))
}

/// PUT /api/employees/{id}
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEmployee>,
) -> AppResult<Json<Employee>> {
    let employee = state.directory.update_employee(id, input).await?;
    Ok(Json(employee))
}

/// DELETE /api/employees/{id}
///
/// Soft-deactivates the employee. History and status are kept.
pub async fn deactivate(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.directory.deactivate_employee(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
