//! The narrow persistence interface the presence core talks to.
//!
//! [`PresenceStore`] is object safe so the engines and HTTP state can hold
//! an `Arc<dyn PresenceStore>`. [`PgStore`] is the production
//! implementation backed by the repositories in this crate;
//! [`MemoryStore`](crate::memory::MemoryStore) mirrors its constraints in
//! process.

use async_trait::async_trait;
use presence_core::types::{DbId, WorkDate};

use crate::models::attendance::{AttendanceRecord, CreateAttendanceRecord, UpdateAttendanceRecord};
use crate::models::department::{CreateDepartment, Department};
use crate::models::employee::{CreateEmployee, Employee, UpdateEmployee};
use crate::models::employee_status::{EmployeeStatus, UpsertEmployeeStatus};
use crate::models::user::{CreateUser, User};
use crate::repositories::{
    AttendanceRepo, DepartmentRepo, EmployeeRepo, EmployeeStatusRepo, UserRepo,
};
use crate::DbPool;

/// PostgreSQL SQLSTATE for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL SQLSTATE for foreign key violations.
const FOREIGN_KEY_VIOLATION: &str = "23503";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure reported by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A write collided with a unique constraint.
    #[error("Duplicate value violates unique constraint: {constraint}")]
    Conflict { constraint: String },

    /// A write referenced a row that does not exist.
    #[error("Referenced row does not exist: {constraint}")]
    InvalidReference { constraint: String },

    /// The backend refused the call without reaching the data.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Any other database failure.
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    /// True when this error is a unique violation on `constraint`.
    pub fn is_conflict_on(&self, constraint: &str) -> bool {
        matches!(self, Self::Conflict { constraint: c } if c == constraint)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => return Self::Conflict { constraint },
                Some(FOREIGN_KEY_VIOLATION) => return Self::InvalidReference { constraint },
                _ => {}
            }
        }
        Self::Database(err)
    }
}

/// Convenience alias for store results.
pub type StoreResult<T> = Result<T, StoreError>;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Persistence operations for users, departments, employees, presence
/// statuses and attendance records.
///
/// Implementations own no business rules beyond the unique keys:
/// `users.username`, `employees.email`, one status per employee and one
/// attendance record per `(employee_id, work_date)`.
#[async_trait]
pub trait PresenceStore: Send + Sync {
    /// Verify the backend is reachable.
    async fn health_check(&self) -> StoreResult<()>;

    // --- users ---

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User>;

    // --- departments ---

    /// All departments ordered by id.
    async fn list_departments(&self) -> StoreResult<Vec<Department>>;
    async fn create_department(&self, input: &CreateDepartment) -> StoreResult<Department>;

    // --- employees ---

    /// All employees, active or not, ordered by id.
    async fn list_employees(&self) -> StoreResult<Vec<Employee>>;
    async fn find_employee(&self, id: DbId) -> StoreResult<Option<Employee>>;
    async fn create_employee(&self, input: &CreateEmployee) -> StoreResult<Employee>;
    async fn update_employee(
        &self,
        id: DbId,
        input: &UpdateEmployee,
    ) -> StoreResult<Option<Employee>>;
    /// Returns `true` if an active employee was deactivated.
    async fn deactivate_employee(&self, id: DbId) -> StoreResult<bool>;

    // --- presence status ---

    async fn find_status(&self, employee_id: DbId) -> StoreResult<Option<EmployeeStatus>>;
    /// All status rows ordered by employee id.
    async fn list_statuses(&self) -> StoreResult<Vec<EmployeeStatus>>;
    /// Replace the employee's status row, inserting it on first write.
    async fn upsert_status(&self, input: &UpsertEmployeeStatus) -> StoreResult<EmployeeStatus>;

    // --- attendance ---

    async fn find_attendance(&self, id: DbId) -> StoreResult<Option<AttendanceRecord>>;
    async fn find_attendance_for_day(
        &self,
        employee_id: DbId,
        work_date: WorkDate,
    ) -> StoreResult<Option<AttendanceRecord>>;
    /// Records with `work_date` in `[start, end]`, newest first.
    async fn list_attendance_between(
        &self,
        employee_id: DbId,
        start: WorkDate,
        end: WorkDate,
    ) -> StoreResult<Vec<AttendanceRecord>>;
    /// Insert a record; a second record for the same day is a
    /// [`StoreError::Conflict`] on [`ATTENDANCE_DAY_CONSTRAINT`].
    async fn create_attendance(
        &self,
        input: &CreateAttendanceRecord,
    ) -> StoreResult<AttendanceRecord>;
    async fn update_attendance(
        &self,
        id: DbId,
        input: &UpdateAttendanceRecord,
    ) -> StoreResult<Option<AttendanceRecord>>;
}

/// Unique constraint guarding the attendance day bucket.
pub const ATTENDANCE_DAY_CONSTRAINT: &str = "uq_attendance_records_employee_date";

// ---------------------------------------------------------------------------
// PostgreSQL implementation
// ---------------------------------------------------------------------------

/// [`PresenceStore`] backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PresenceStore for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        crate::health_check(&self.pool).await.map_err(Into::into)
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_username(&self.pool, username).await?)
    }

    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn list_departments(&self) -> StoreResult<Vec<Department>> {
        Ok(DepartmentRepo::list(&self.pool).await?)
    }

    async fn create_department(&self, input: &CreateDepartment) -> StoreResult<Department> {
        Ok(DepartmentRepo::create(&self.pool, input).await?)
    }

    async fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        Ok(EmployeeRepo::list(&self.pool).await?)
    }

    async fn find_employee(&self, id: DbId) -> StoreResult<Option<Employee>> {
        Ok(EmployeeRepo::find_by_id(&self.pool, id).await?)
    }

    async fn create_employee(&self, input: &CreateEmployee) -> StoreResult<Employee> {
        Ok(EmployeeRepo::create(&self.pool, input).await?)
    }

    async fn update_employee(
        &self,
        id: DbId,
        input: &UpdateEmployee,
    ) -> StoreResult<Option<Employee>> {
        Ok(EmployeeRepo::update(&self.pool, id, input).await?)
    }

    async fn deactivate_employee(&self, id: DbId) -> StoreResult<bool> {
        Ok(EmployeeRepo::deactivate(&self.pool, id).await?)
    }

    async fn find_status(&self, employee_id: DbId) -> StoreResult<Option<EmployeeStatus>> {
        Ok(EmployeeStatusRepo::find_by_employee(&self.pool, employee_id).await?)
    }

    async fn list_statuses(&self) -> StoreResult<Vec<EmployeeStatus>> {
        Ok(EmployeeStatusRepo::list(&self.pool).await?)
    }

    async fn upsert_status(&self, input: &UpsertEmployeeStatus) -> StoreResult<EmployeeStatus> {
        Ok(EmployeeStatusRepo::upsert(&self.pool, input).await?)
    }

    async fn find_attendance(&self, id: DbId) -> StoreResult<Option<AttendanceRecord>> {
        Ok(AttendanceRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_attendance_for_day(
        &self,
        employee_id: DbId,
        work_date: WorkDate,
    ) -> StoreResult<Option<AttendanceRecord>> {
        Ok(AttendanceRepo::find_for_day(&self.pool, employee_id, work_date).await?)
    }

    async fn list_attendance_between(
        &self,
        employee_id: DbId,
        start: WorkDate,
        end: WorkDate,
    ) -> StoreResult<Vec<AttendanceRecord>> {
        Ok(AttendanceRepo::list_between(&self.pool, employee_id, start, end).await?)
    }

    async fn create_attendance(
        &self,
        input: &CreateAttendanceRecord,
    ) -> StoreResult<AttendanceRecord> {
        Ok(AttendanceRepo::create(&self.pool, input).await?)
    }

    async fn update_attendance(
        &self,
        id: DbId,
        input: &UpdateAttendanceRecord,
    ) -> StoreResult<Option<AttendanceRecord>> {
        Ok(AttendanceRepo::update(&self.pool, id, input).await?)
    }
}
