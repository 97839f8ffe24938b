//! Read-side aggregation and organisation management.
//!
//! Joins departments, employees and statuses into the views the clients
//! render, owns the admin writes on departments and employees, and renders
//! the monthly CSV export.

use std::collections::HashMap;
use std::sync::Arc;

use presence_core::error::CoreError;
use presence_core::export::{render_attendance_csv, ExportEntry};
use presence_core::settings::PresenceSettings;
use presence_core::types::DbId;
use presence_db::models::department::{CreateDepartment, Department};
use presence_db::models::employee::{CreateEmployee, Employee, UpdateEmployee};
use presence_db::models::employee_status::EmployeeStatus;
use presence_db::PresenceStore;
use serde::Serialize;
use validator::Validate;

use crate::attendance::AttendanceEngine;
use crate::error::{validation, EngineResult};

/// An employee with its current status, `null` when none was ever set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeWithStatus {
    #[serde(flatten)]
    pub employee: Employee,
    pub status: Option<EmployeeStatus>,
}

/// A department with its active employees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentWithEmployees {
    #[serde(flatten)]
    pub department: Department,
    pub employees: Vec<EmployeeWithStatus>,
}

/// A single employee with its department and status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: Employee,
    pub department: Option<Department>,
    pub status: Option<EmployeeStatus>,
}

#[derive(Clone)]
pub struct Directory {
    store: Arc<dyn PresenceStore>,
    attendance: AttendanceEngine,
    settings: PresenceSettings,
}

impl Directory {
    pub fn new(
        store: Arc<dyn PresenceStore>,
        attendance: AttendanceEngine,
        settings: PresenceSettings,
    ) -> Self {
        Self {
            store,
            attendance,
            settings,
        }
    }

    /// Every department ordered by id, each with its active employees
    /// ordered by id and their statuses.
    pub async fn get_departments_with_employees(
        &self,
    ) -> EngineResult<Vec<DepartmentWithEmployees>> {
        let departments = self.store.list_departments().await?;
        let employees = self.store.list_employees().await?;
        let mut statuses: HashMap<DbId, EmployeeStatus> = self
            .store
            .list_statuses()
            .await?
            .into_iter()
            .map(|s| (s.employee_id, s))
            .collect();

        let mut by_department: HashMap<DbId, Vec<EmployeeWithStatus>> = HashMap::new();
        for employee in employees.into_iter().filter(|e| e.is_active) {
            let status = statuses.remove(&employee.id);
            by_department
                .entry(employee.department_id)
                .or_default()
                .push(EmployeeWithStatus { employee, status });
        }

        Ok(departments
            .into_iter()
            .map(|department| {
                let mut employees = by_department.remove(&department.id).unwrap_or_default();
                employees.sort_by_key(|e| e.employee.id);
                DepartmentWithEmployees {
                    department,
                    employees,
                }
            })
            .collect())
    }

    /// The employee `id` with its department and status.
    pub async fn get_employee_with_status(&self, id: DbId) -> EngineResult<EmployeeDetail> {
        let employee = self
            .store
            .find_employee(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Employee",
                id,
            })?;
        let status = self.store.find_status(id).await?;
        let department = self
            .store
            .list_departments()
            .await?
            .into_iter()
            .find(|d| d.id == employee.department_id);

        Ok(EmployeeDetail {
            employee,
            department,
            status,
        })
    }

    /// Every employee, active or not, ordered by id.
    pub async fn list_employees(&self) -> EngineResult<Vec<Employee>> {
        Ok(self.store.list_employees().await?)
    }

    pub async fn create_department(&self, input: CreateDepartment) -> EngineResult<Department> {
        input.validate().map_err(validation)?;
        let department = self.store.create_department(&input).await?;
        tracing::info!(department_id = department.id, name = %department.name, "Department created");
        Ok(department)
    }

    pub async fn create_employee(&self, input: CreateEmployee) -> EngineResult<Employee> {
        input.validate().map_err(validation)?;
        let employee = self.store.create_employee(&input).await?;
        tracing::info!(employee_id = employee.id, "Employee created");
        Ok(employee)
    }

    pub async fn update_employee(&self, id: DbId, input: UpdateEmployee) -> EngineResult<Employee> {
        input.validate().map_err(validation)?;
        let employee = self
            .store
            .update_employee(id, &input)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Employee",
                id,
            })?;
        tracing::info!(employee_id = id, "Employee updated");
        Ok(employee)
    }

    /// Soft-deactivate employee `id`. Deactivating twice is a no-op.
    pub async fn deactivate_employee(&self, id: DbId) -> EngineResult<()> {
        if self.store.find_employee(id).await?.is_none() {
            return Err(CoreError::NotFound {
                entity: "Employee",
                id,
            }
            .into());
        }
        if self.store.deactivate_employee(id).await? {
            tracing::info!(employee_id = id, "Employee deactivated");
        }
        Ok(())
    }

    /// Render the `(year, month)` attendance of `employee_id` as CSV in the
    /// configured locale and time zone.
    pub async fn export_monthly_attendance_csv(
        &self,
        employee_id: DbId,
        year: i32,
        month: u32,
    ) -> EngineResult<String> {
        let records = self
            .attendance
            .get_monthly_attendance(employee_id, year, month)
            .await?;
        let entries: Vec<ExportEntry<'_>> = records
            .iter()
            .map(|r| ExportEntry {
                work_date: r.work_date,
                clock_in_time: r.clock_in_time,
                clock_out_time: r.clock_out_time,
                work_minutes: r.work_hours,
                status: &r.status,
                clock_in_location: r.clock_in_location.as_deref(),
                clock_out_location: r.clock_out_location.as_deref(),
            })
            .collect();

        let csv = render_attendance_csv(
            &entries,
            self.settings.export_locale,
            self.settings.timezone,
        )?;
        tracing::debug!(employee_id, year, month, rows = entries.len(), "Attendance exported");
        Ok(csv)
    }
}
