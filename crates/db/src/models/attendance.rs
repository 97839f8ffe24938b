//! Attendance record model and DTOs.

use presence_core::geo::GeoLocation;
use presence_core::types::{DbId, Timestamp, WorkDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `attendance_records` table.
///
/// One row per employee per `work_date`. `work_hours` is the number of whole
/// minutes between clock-in and clock-out.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct AttendanceRecord {
    pub id: DbId,
    pub employee_id: DbId,
    pub work_date: WorkDate,
    pub clock_in_time: Option<Timestamp>,
    pub clock_out_time: Option<Timestamp>,
    pub clock_in_location: Option<String>,
    pub clock_in_latitude: Option<f64>,
    pub clock_in_longitude: Option<f64>,
    pub clock_out_location: Option<String>,
    pub clock_out_latitude: Option<f64>,
    pub clock_out_longitude: Option<f64>,
    pub status: String,
    pub work_hours: Option<i32>,
    pub is_modified: bool,
    pub modification_reason: Option<String>,
    pub created_at: Timestamp,
}

impl AttendanceRecord {
    /// True once a clock-in time has been recorded.
    pub fn is_clocked_in(&self) -> bool {
        self.clock_in_time.is_some()
    }
}

/// DTO for inserting a new attendance record.
#[derive(Debug, Clone)]
pub struct CreateAttendanceRecord {
    pub employee_id: DbId,
    pub work_date: WorkDate,
    pub clock_in_time: Option<Timestamp>,
    pub clock_in: GeoLocation,
    pub status: String,
}

/// DTO for patching an attendance record. Only `Some` fields are applied.
///
/// Used by clock-in on a placeholder row, by clock-out, and by manual
/// corrections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAttendanceRecord {
    pub clock_in_time: Option<Timestamp>,
    pub clock_out_time: Option<Timestamp>,
    pub clock_in_location: Option<String>,
    pub clock_in_latitude: Option<f64>,
    pub clock_in_longitude: Option<f64>,
    pub clock_out_location: Option<String>,
    pub clock_out_latitude: Option<f64>,
    pub clock_out_longitude: Option<f64>,
    pub status: Option<String>,
    pub work_hours: Option<i32>,
    pub is_modified: Option<bool>,
    pub modification_reason: Option<String>,
}

impl UpdateAttendanceRecord {
    /// Patch that records a clock-in at `at` from `location` with `status`.
    pub fn clock_in(at: Timestamp, location: GeoLocation, status: impl Into<String>) -> Self {
        Self {
            clock_in_time: Some(at),
            clock_in_location: location.location,
            clock_in_latitude: location.latitude,
            clock_in_longitude: location.longitude,
            status: Some(status.into()),
            ..Self::default()
        }
    }

    /// Patch that records a clock-out at `at` from `location`.
    pub fn clock_out(at: Timestamp, location: GeoLocation, work_minutes: i32) -> Self {
        Self {
            clock_out_time: Some(at),
            clock_out_location: location.location,
            clock_out_latitude: location.latitude,
            clock_out_longitude: location.longitude,
            work_hours: Some(work_minutes),
            ..Self::default()
        }
    }

    /// Apply this patch to `record` in memory, mirroring the repository's
    /// `COALESCE` semantics.
    pub fn apply_to(&self, record: &mut AttendanceRecord) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *target = value.clone();
            }
        }
        fn set_opt<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                *target = value.clone();
            }
        }

        set_opt(&mut record.clock_in_time, &self.clock_in_time);
        set_opt(&mut record.clock_out_time, &self.clock_out_time);
        set_opt(&mut record.clock_in_location, &self.clock_in_location);
        set_opt(&mut record.clock_in_latitude, &self.clock_in_latitude);
        set_opt(&mut record.clock_in_longitude, &self.clock_in_longitude);
        set_opt(&mut record.clock_out_location, &self.clock_out_location);
        set_opt(&mut record.clock_out_latitude, &self.clock_out_latitude);
        set_opt(&mut record.clock_out_longitude, &self.clock_out_longitude);
        set(&mut record.status, &self.status);
        set_opt(&mut record.work_hours, &self.work_hours);
        set(&mut record.is_modified, &self.is_modified);
        set_opt(&mut record.modification_reason, &self.modification_reason);
    }
}
