//! Handlers for presence status.

use axum::extract::{Path, State};
use axum::Json;
use presence_core::geo::GeoLocation;
use presence_core::types::DbId;
use presence_db::models::employee_status::EmployeeStatus;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

/// Request body for `POST /employees/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(flatten)]
    pub location: GeoLocation,
}

/// GET /api/employees/{id}/status
pub async fn get(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(employee_id): Path<DbId>,
) -> AppResult<Json<EmployeeStatus>> {
    let status = state.presence.get_status(employee_id).await?;
    Ok(Json(status))
}

/// POST /api/employees/{id}/status
///
/// Replaces the employee's status and broadcasts `STATUS_UPDATE`.
pub async fn set(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(employee_id): Path<DbId>,
    Json(input): Json<SetStatusRequest>,
) -> AppResult<Json<EmployeeStatus>> {
    let status = state
        .presence
        .set_status(
            employee_id,
            &input.status,
            input.comment.as_deref(),
            input.location,
        )
        .await?;
    tracing::debug!(employee_id, user_id = user.user_id, "Status set via API");
    Ok(Json(status))
}

/// GET /api/employee-statuses
pub async fn list(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<EmployeeStatus>>> {
    let statuses = state.presence.list_statuses().await?;
    Ok(Json(statuses))
}
