//! Repository for the `departments` table.

use sqlx::PgPool;

use crate::models::department::{CreateDepartment, Department, DEFAULT_DEPARTMENT_ICON};

const COLUMNS: &str = "id, name, name_ja, icon, created_at";

/// Provides listing and creation of departments.
pub struct DepartmentRepo;

impl DepartmentRepo {
    /// Insert a new department, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDepartment,
    ) -> Result<Department, sqlx::Error> {
        let query = format!(
            "INSERT INTO departments (name, name_ja, icon)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Department>(&query)
            .bind(&input.name)
            .bind(&input.name_ja)
            .bind(input.icon.as_deref().unwrap_or(DEFAULT_DEPARTMENT_ICON))
            .fetch_one(pool)
            .await
    }

    /// List all departments ordered by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<Department>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM departments ORDER BY id");
        sqlx::query_as::<_, Department>(&query).fetch_all(pool).await
    }
}
