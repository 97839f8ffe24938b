//! Events pushed to subscribers after a successful mutation.

use presence_core::attendance::{CLOCK_IN, CLOCK_OUT};
use presence_core::types::DbId;
use presence_db::models::attendance::AttendanceRecord;
use presence_db::models::employee_status::EmployeeStatus;
use serde::Serialize;

/// Which attendance transition produced an [`PresenceEvent::AttendanceUpdate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceAction {
    ClockIn,
    ClockOut,
}

impl AttendanceAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClockIn => CLOCK_IN,
            Self::ClockOut => CLOCK_OUT,
        }
    }
}

/// A change notification.
///
/// Serialized as `{"type": "...", "data": {...}}`:
///
/// ```json
/// {"type":"STATUS_UPDATE","data":{"employee_id":71,"status":{...}}}
/// {"type":"ATTENDANCE_UPDATE","data":{"type":"clock-in","attendance":{...}}}
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PresenceEvent {
    StatusUpdate {
        employee_id: DbId,
        status: EmployeeStatus,
    },
    AttendanceUpdate {
        #[serde(rename = "type")]
        action: AttendanceAction,
        attendance: AttendanceRecord,
    },
}

impl PresenceEvent {
    pub fn status_update(status: EmployeeStatus) -> Self {
        Self::StatusUpdate {
            employee_id: status.employee_id,
            status,
        }
    }

    pub fn attendance_update(action: AttendanceAction, attendance: AttendanceRecord) -> Self {
        Self::AttendanceUpdate { action, attendance }
    }

    /// Wire name of the event, e.g. `STATUS_UPDATE`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::StatusUpdate { .. } => "STATUS_UPDATE",
            Self::AttendanceUpdate { .. } => "ATTENDANCE_UPDATE",
        }
    }

    /// Employee the event concerns.
    pub fn employee_id(&self) -> DbId {
        match self {
            Self::StatusUpdate { employee_id, .. } => *employee_id,
            Self::AttendanceUpdate { attendance, .. } => attendance.employee_id,
        }
    }
}
