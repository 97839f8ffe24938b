//! Repository for the `attendance_records` table.

use presence_core::types::{DbId, WorkDate};
use sqlx::PgPool;

use crate::models::attendance::{AttendanceRecord, CreateAttendanceRecord, UpdateAttendanceRecord};

const COLUMNS: &str = "id, employee_id, work_date, clock_in_time, clock_out_time, \
                       clock_in_location, clock_in_latitude, clock_in_longitude, \
                       clock_out_location, clock_out_latitude, clock_out_longitude, \
                       status, work_hours, is_modified, modification_reason, created_at";

/// Provides day-bucketed attendance reads and writes. Records are never
/// deleted.
pub struct AttendanceRepo;

impl AttendanceRepo {
    /// Insert a new record.
    ///
    /// Fails with a unique violation on `uq_attendance_records_employee_date`
    /// when the employee already has a record for `work_date`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAttendanceRecord,
    ) -> Result<AttendanceRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO attendance_records
                (employee_id, work_date, clock_in_time, clock_in_location,
                 clock_in_latitude, clock_in_longitude, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(input.employee_id)
            .bind(input.work_date)
            .bind(input.clock_in_time)
            .bind(&input.clock_in.location)
            .bind(input.clock_in.latitude)
            .bind(input.clock_in.longitude)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    /// Find a record by internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AttendanceRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attendance_records WHERE id = $1");
        sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the record of `employee_id` for one day bucket.
    pub async fn find_for_day(
        pool: &PgPool,
        employee_id: DbId,
        work_date: WorkDate,
    ) -> Result<Option<AttendanceRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance_records \
             WHERE employee_id = $1 AND work_date = $2"
        );
        sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(employee_id)
            .bind(work_date)
            .fetch_optional(pool)
            .await
    }

    /// List records of `employee_id` with `work_date` in `[start, end]`,
    /// newest day first.
    pub async fn list_between(
        pool: &PgPool,
        employee_id: DbId,
        start: WorkDate,
        end: WorkDate,
    ) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance_records \
             WHERE employee_id = $1 AND work_date >= $2 AND work_date <= $3 \
             ORDER BY work_date DESC"
        );
        sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(employee_id)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// Patch a record. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAttendanceRecord,
    ) -> Result<Option<AttendanceRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE attendance_records SET
                clock_in_time = COALESCE($2, clock_in_time),
                clock_out_time = COALESCE($3, clock_out_time),
                clock_in_location = COALESCE($4, clock_in_location),
                clock_in_latitude = COALESCE($5, clock_in_latitude),
                clock_in_longitude = COALESCE($6, clock_in_longitude),
                clock_out_location = COALESCE($7, clock_out_location),
                clock_out_latitude = COALESCE($8, clock_out_latitude),
                clock_out_longitude = COALESCE($9, clock_out_longitude),
                status = COALESCE($10, status),
                work_hours = COALESCE($11, work_hours),
                is_modified = COALESCE($12, is_modified),
                modification_reason = COALESCE($13, modification_reason)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(id)
            .bind(input.clock_in_time)
            .bind(input.clock_out_time)
            .bind(&input.clock_in_location)
            .bind(input.clock_in_latitude)
            .bind(input.clock_in_longitude)
            .bind(&input.clock_out_location)
            .bind(input.clock_out_latitude)
            .bind(input.clock_out_longitude)
            .bind(&input.status)
            .bind(input.work_hours)
            .bind(input.is_modified)
            .bind(&input.modification_reason)
            .fetch_optional(pool)
            .await
    }
}
