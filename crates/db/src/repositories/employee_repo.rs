//! Repository for the `employees` table.

use presence_core::types::DbId;
use sqlx::PgPool;

use crate::models::employee::{CreateEmployee, Employee, UpdateEmployee};

const COLUMNS: &str = "id, first_name, last_name, first_name_ja, last_name_ja, email, \
                       position, position_ja, department_id, profile_image_url, is_active, \
                       created_at";

/// Provides CRUD operations for employees. Employees are never hard-deleted.
pub struct EmployeeRepo;

impl EmployeeRepo {
    /// Insert a new employee, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateEmployee) -> Result<Employee, sqlx::Error> {
        let query = format!(
            "INSERT INTO employees
                (first_name, last_name, first_name_ja, last_name_ja, email,
                 position, position_ja, department_id, profile_image_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.first_name_ja)
            .bind(&input.last_name_ja)
            .bind(&input.email)
            .bind(&input.position)
            .bind(&input.position_ja)
            .bind(input.department_id)
            .bind(&input.profile_image_url)
            .fetch_one(pool)
            .await
    }

    /// Find an employee by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE id = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all employees ordered by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees ORDER BY id");
        sqlx::query_as::<_, Employee>(&query).fetch_all(pool).await
    }

    /// Update an employee. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEmployee,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!(
            "UPDATE employees SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                first_name_ja = COALESCE($4, first_name_ja),
                last_name_ja = COALESCE($5, last_name_ja),
                email = COALESCE($6, email),
                position = COALESCE($7, position),
                position_ja = COALESCE($8, position_ja),
                department_id = COALESCE($9, department_id),
                profile_image_url = COALESCE($10, profile_image_url),
                is_active = COALESCE($11, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.first_name_ja)
            .bind(&input.last_name_ja)
            .bind(&input.email)
            .bind(&input.position)
            .bind(&input.position_ja)
            .bind(input.department_id)
            .bind(&input.profile_image_url)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-deactivate an employee by setting `is_active = false`.
    ///
    /// Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE employees SET is_active = false WHERE id = $1 AND is_active = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
