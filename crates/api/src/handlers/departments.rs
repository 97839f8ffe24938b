//! Handlers for the `/departments` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use presence_db::models::department::{CreateDepartment, Department};
use presence_engine::DepartmentWithEmployees;

use crate::error::AppResult;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::state::AppState;

/// GET /api/departments
///
/// Every department with its active employees and their current status.
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<DepartmentWithEmployees>>> {
    let departments = state.directory.get_departments_with_employees().await?;
    Ok(Json(departments))
}

/// POST /api/departments
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateDepartment>,
) -> AppResult<(StatusCode, Json<Department>)> {
    let department = state.directory.create_department(input).await?;
    Ok((StatusCode::CREATED, Json(department)))
}
