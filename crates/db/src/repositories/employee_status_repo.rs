//! Repository for the `employee_status` table.

use presence_core::types::DbId;
use sqlx::PgPool;

use crate::models::employee_status::{EmployeeStatus, UpsertEmployeeStatus};

const COLUMNS: &str =
    "id, employee_id, status, comment, last_updated, location, latitude, longitude";

/// Provides reads and the single upsert write path for presence status.
pub struct EmployeeStatusRepo;

impl EmployeeStatusRepo {
    /// Find the current status row of an employee.
    pub async fn find_by_employee(
        pool: &PgPool,
        employee_id: DbId,
    ) -> Result<Option<EmployeeStatus>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employee_status WHERE employee_id = $1");
        sqlx::query_as::<_, EmployeeStatus>(&query)
            .bind(employee_id)
            .fetch_optional(pool)
            .await
    }

    /// List every status row ordered by employee.
    pub async fn list(pool: &PgPool) -> Result<Vec<EmployeeStatus>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employee_status ORDER BY employee_id");
        sqlx::query_as::<_, EmployeeStatus>(&query)
            .fetch_all(pool)
            .await
    }

    /// Insert or replace an employee's status.
    ///
    /// Uses `INSERT ... ON CONFLICT (employee_id) DO UPDATE` so there is
    /// never more than one row per employee.
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertEmployeeStatus,
    ) -> Result<EmployeeStatus, sqlx::Error> {
        let query = format!(
            "INSERT INTO employee_status \
                (employee_id, status, comment, last_updated, location, latitude, longitude) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (employee_id) DO UPDATE SET \
                status = EXCLUDED.status, \
                comment = EXCLUDED.comment, \
                last_updated = EXCLUDED.last_updated, \
                location = EXCLUDED.location, \
                latitude = EXCLUDED.latitude, \
                longitude = EXCLUDED.longitude \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EmployeeStatus>(&query)
            .bind(input.employee_id)
            .bind(&input.status)
            .bind(&input.comment)
            .bind(input.last_updated)
            .bind(&input.location.location)
            .bind(input.location.latitude)
            .bind(input.location.longitude)
            .fetch_one(pool)
            .await
    }
}
