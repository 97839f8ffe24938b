//! Handlers for attendance: clock-in/out, history, corrections and export.

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::Json;
use presence_core::export::{export_file_name, CSV_CONTENT_TYPE};
use presence_core::geo::GeoLocation;
use presence_core::types::{DbId, WorkDate};
use presence_db::models::attendance::{AttendanceRecord, UpdateAttendanceRecord};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /attendance/clock-in`.
#[derive(Debug, Deserialize)]
pub struct ClockInRequest {
    pub employee_id: DbId,
    pub status: String,
    #[serde(flatten)]
    pub location: GeoLocation,
}

/// Request body for `POST /attendance/clock-out`.
#[derive(Debug, Deserialize)]
pub struct ClockOutRequest {
    pub employee_id: DbId,
    #[serde(flatten)]
    pub location: GeoLocation,
}

/// Query parameters for `GET /employees/{id}/attendance`.
///
/// `year` + `month` selects a month, `start` + `end` an inclusive range.
/// With neither, today's record is returned.
#[derive(Debug, Default, Deserialize)]
pub struct AttendanceQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub start: Option<WorkDate>,
    pub end: Option<WorkDate>,
}

/// Query parameters for the CSV export.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub year: i32,
    pub month: u32,
}

/// Either a list of records or today's record (`null` when absent).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AttendanceView {
    Records(Vec<AttendanceRecord>),
    Today(Option<AttendanceRecord>),
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/attendance/clock-in
pub async fn clock_in(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<ClockInRequest>,
) -> AppResult<Json<AttendanceRecord>> {
    let record = state
        .attendance
        .clock_in(input.employee_id, &input.status, input.location)
        .await?;
    Ok(Json(record))
}

/// POST /api/attendance/clock-out
pub async fn clock_out(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<ClockOutRequest>,
) -> AppResult<Json<AttendanceRecord>> {
    let record = state
        .attendance
        .clock_out(input.employee_id, input.location)
        .await?;
    Ok(Json(record))
}

/// GET /api/employees/{id}/attendance
pub async fn history(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(employee_id): Path<DbId>,
    Query(query): Query<AttendanceQuery>,
) -> AppResult<Json<AttendanceView>> {
    let view = match query {
        AttendanceQuery {
            year: Some(year),
            month: Some(month),
            start: None,
            end: None,
        } => AttendanceView::Records(
            state
                .attendance
                .get_monthly_attendance(employee_id, year, month)
                .await?,
        ),
        AttendanceQuery {
            year: None,
            month: None,
            start: Some(start),
            end: Some(end),
        } => AttendanceView::Records(
            state
                .attendance
                .get_attendance_between(employee_id, start, end)
                .await?,
        ),
        AttendanceQuery {
            year: None,
            month: None,
            start: None,
            end: None,
        } => AttendanceView::Today(state.attendance.get_today(employee_id).await?),
        _ => {
            return Err(AppError::BadRequest(
                "Use either year and month, or start and end".into(),
            ))
        }
    };
    Ok(Json(view))
}

/// GET /api/employees/{id}/attendance/export?year=&month=
///
/// Monthly attendance as a CSV attachment.
pub async fn export_csv(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(employee_id): Path<DbId>,
    Query(query): Query<ExportQuery>,
) -> AppResult<impl IntoResponse> {
    let csv = state
        .directory
        .export_monthly_attendance_csv(employee_id, query.year, query.month)
        .await?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(query.year, query.month)
    );
    Ok((
        [
            (CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

/// PUT /api/attendance/{id}
///
/// Manual correction. The record is marked modified.
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAttendanceRecord>,
) -> AppResult<Json<AttendanceRecord>> {
    let record = state.attendance.update_record(id, input).await?;
    tracing::info!(record_id = id, admin_id = admin.user_id, "Attendance corrected via API");
    Ok(Json(record))
}
