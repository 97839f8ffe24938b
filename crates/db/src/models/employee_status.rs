//! Employee presence status model and DTOs.

use presence_core::geo::GeoLocation;
use presence_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `employee_status` table: the single current presence
/// snapshot of one employee.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct EmployeeStatus {
    pub id: DbId,
    pub employee_id: DbId,
    pub status: String,
    pub comment: Option<String>,
    pub last_updated: Timestamp,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// DTO for writing an employee's status. Replaces every field of the
/// existing row, or inserts one when none exists.
#[derive(Debug, Clone)]
pub struct UpsertEmployeeStatus {
    pub employee_id: DbId,
    pub status: String,
    pub comment: Option<String>,
    pub location: GeoLocation,
    pub last_updated: Timestamp,
}
