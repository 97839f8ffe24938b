//! In-process [`PresenceStore`] used by tests and local tooling.
//!
//! Enforces the same unique keys and foreign keys as the PostgreSQL schema
//! and reports violations with the same constraint names, so engine code
//! sees identical error shapes from either backend.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use presence_core::types::{DbId, WorkDate};
use tokio::sync::RwLock;

use crate::models::attendance::{AttendanceRecord, CreateAttendanceRecord, UpdateAttendanceRecord};
use crate::models::department::{CreateDepartment, Department, DEFAULT_DEPARTMENT_ICON};
use crate::models::employee::{CreateEmployee, Employee, UpdateEmployee};
use crate::models::employee_status::{EmployeeStatus, UpsertEmployeeStatus};
use crate::models::user::{CreateUser, User};
use crate::store::{PresenceStore, StoreError, StoreResult, ATTENDANCE_DAY_CONSTRAINT};

#[derive(Default)]
struct Tables {
    next_id: DbId,
    users: BTreeMap<DbId, User>,
    departments: BTreeMap<DbId, Department>,
    employees: BTreeMap<DbId, Employee>,
    statuses: BTreeMap<DbId, EmployeeStatus>,
    attendance: BTreeMap<DbId, AttendanceRecord>,
}

impl Tables {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn require_department(&self, id: DbId) -> StoreResult<()> {
        if self.departments.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::InvalidReference {
                constraint: "employees_department_id_fkey".into(),
            })
        }
    }

    fn require_employee(&self, id: DbId, constraint: &str) -> StoreResult<()> {
        if self.employees.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::InvalidReference {
                constraint: constraint.into(),
            })
        }
    }

    fn email_taken(&self, email: &str, except: Option<DbId>) -> bool {
        self.employees
            .values()
            .any(|e| e.email == email && Some(e.id) != except)
    }
}

/// Thread-safe in-memory store.
///
/// Writes can be made to fail with [`MemoryStore::set_fail_writes`] to
/// exercise storage-error paths.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When `true`, every write returns [`StoreError::Unavailable`] without
    /// touching the data.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of attendance rows currently stored.
    pub async fn attendance_count(&self) -> usize {
        self.tables.read().await.attendance.len()
    }

    /// Number of status rows currently stored.
    pub async fn status_count(&self) -> usize {
        self.tables.read().await.statuses.len()
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("writes are disabled".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PresenceStore for MemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == input.username) {
            return Err(StoreError::Conflict {
                constraint: "uq_users_username".into(),
            });
        }
        let user = User {
            id: tables.allocate_id(),
            username: input.username.clone(),
            password: input.password.clone(),
            role: input.role.clone(),
            full_name: input.full_name.clone(),
            is_active: true,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn list_departments(&self) -> StoreResult<Vec<Department>> {
        Ok(self.tables.read().await.departments.values().cloned().collect())
    }

    async fn create_department(&self, input: &CreateDepartment) -> StoreResult<Department> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        let department = Department {
            id: tables.allocate_id(),
            name: input.name.clone(),
            name_ja: input.name_ja.clone(),
            icon: input
                .icon
                .clone()
                .unwrap_or_else(|| DEFAULT_DEPARTMENT_ICON.to_string()),
            created_at: Utc::now(),
        };
        tables.departments.insert(department.id, department.clone());
        Ok(department)
    }

    async fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        Ok(self.tables.read().await.employees.values().cloned().collect())
    }

    async fn find_employee(&self, id: DbId) -> StoreResult<Option<Employee>> {
        Ok(self.tables.read().await.employees.get(&id).cloned())
    }

    async fn create_employee(&self, input: &CreateEmployee) -> StoreResult<Employee> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        tables.require_department(input.department_id)?;
        if tables.email_taken(&input.email, None) {
            return Err(StoreError::Conflict {
                constraint: "uq_employees_email".into(),
            });
        }
        let employee = Employee {
            id: tables.allocate_id(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            first_name_ja: input.first_name_ja.clone(),
            last_name_ja: input.last_name_ja.clone(),
            email: input.email.clone(),
            position: input.position.clone(),
            position_ja: input.position_ja.clone(),
            department_id: input.department_id,
            profile_image_url: input.profile_image_url.clone(),
            is_active: true,
            created_at: Utc::now(),
        };
        tables.employees.insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn update_employee(
        &self,
        id: DbId,
        input: &UpdateEmployee,
    ) -> StoreResult<Option<Employee>> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        if let Some(department_id) = input.department_id {
            tables.require_department(department_id)?;
        }
        if let Some(email) = &input.email {
            if tables.email_taken(email, Some(id)) {
                return Err(StoreError::Conflict {
                    constraint: "uq_employees_email".into(),
                });
            }
        }
        let Some(employee) = tables.employees.get_mut(&id) else {
            return Ok(None);
        };
        let text_fields = [
            (&mut employee.first_name, &input.first_name),
            (&mut employee.last_name, &input.last_name),
            (&mut employee.first_name_ja, &input.first_name_ja),
            (&mut employee.last_name_ja, &input.last_name_ja),
            (&mut employee.email, &input.email),
            (&mut employee.position, &input.position),
            (&mut employee.position_ja, &input.position_ja),
        ];
        for (target, value) in text_fields {
            if let Some(value) = value {
                target.clone_from(value);
            }
        }
        if let Some(department_id) = input.department_id {
            employee.department_id = department_id;
        }
        if input.profile_image_url.is_some() {
            employee.profile_image_url.clone_from(&input.profile_image_url);
        }
        if let Some(is_active) = input.is_active {
            employee.is_active = is_active;
        }
        Ok(Some(employee.clone()))
    }

    async fn deactivate_employee(&self, id: DbId) -> StoreResult<bool> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        match tables.employees.get_mut(&id) {
            Some(employee) if employee.is_active => {
                employee.is_active = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn find_status(&self, employee_id: DbId) -> StoreResult<Option<EmployeeStatus>> {
        Ok(self.tables.read().await.statuses.get(&employee_id).cloned())
    }

    async fn list_statuses(&self) -> StoreResult<Vec<EmployeeStatus>> {
        Ok(self.tables.read().await.statuses.values().cloned().collect())
    }

    async fn upsert_status(&self, input: &UpsertEmployeeStatus) -> StoreResult<EmployeeStatus> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        tables.require_employee(input.employee_id, "employee_status_employee_id_fkey")?;
        let id = match tables.statuses.get(&input.employee_id) {
            Some(existing) => existing.id,
            None => tables.allocate_id(),
        };
        let status = EmployeeStatus {
            id,
            employee_id: input.employee_id,
            status: input.status.clone(),
            comment: input.comment.clone(),
            last_updated: input.last_updated,
            location: input.location.location.clone(),
            latitude: input.location.latitude,
            longitude: input.location.longitude,
        };
        tables.statuses.insert(input.employee_id, status.clone());
        Ok(status)
    }

    async fn find_attendance(&self, id: DbId) -> StoreResult<Option<AttendanceRecord>> {
        Ok(self.tables.read().await.attendance.get(&id).cloned())
    }

    async fn find_attendance_for_day(
        &self,
        employee_id: DbId,
        work_date: WorkDate,
    ) -> StoreResult<Option<AttendanceRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .attendance
            .values()
            .find(|r| r.employee_id == employee_id && r.work_date == work_date)
            .cloned())
    }

    async fn list_attendance_between(
        &self,
        employee_id: DbId,
        start: WorkDate,
        end: WorkDate,
    ) -> StoreResult<Vec<AttendanceRecord>> {
        let tables = self.tables.read().await;
        let mut records: Vec<AttendanceRecord> = tables
            .attendance
            .values()
            .filter(|r| r.employee_id == employee_id && r.work_date >= start && r.work_date <= end)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.work_date.cmp(&a.work_date));
        Ok(records)
    }

    async fn create_attendance(
        &self,
        input: &CreateAttendanceRecord,
    ) -> StoreResult<AttendanceRecord> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        tables.require_employee(input.employee_id, "attendance_records_employee_id_fkey")?;
        let duplicate = tables
            .attendance
            .values()
            .any(|r| r.employee_id == input.employee_id && r.work_date == input.work_date);
        if duplicate {
            return Err(StoreError::Conflict {
                constraint: ATTENDANCE_DAY_CONSTRAINT.into(),
            });
        }
        let record = AttendanceRecord {
            id: tables.allocate_id(),
            employee_id: input.employee_id,
            work_date: input.work_date,
            clock_in_time: input.clock_in_time,
            clock_out_time: None,
            clock_in_location: input.clock_in.location.clone(),
            clock_in_latitude: input.clock_in.latitude,
            clock_in_longitude: input.clock_in.longitude,
            clock_out_location: None,
            clock_out_latitude: None,
            clock_out_longitude: None,
            status: input.status.clone(),
            work_hours: None,
            is_modified: false,
            modification_reason: None,
            created_at: Utc::now(),
        };
        tables.attendance.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_attendance(
        &self,
        id: DbId,
        input: &UpdateAttendanceRecord,
    ) -> StoreResult<Option<AttendanceRecord>> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        let Some(record) = tables.attendance.get_mut(&id) else {
            return Ok(None);
        };
        input.apply_to(record);
        Ok(Some(record.clone()))
    }
}
