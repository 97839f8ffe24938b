//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod attendance_repo;
pub mod department_repo;
pub mod employee_repo;
pub mod employee_status_repo;
pub mod user_repo;

pub use attendance_repo::AttendanceRepo;
pub use department_repo::DepartmentRepo;
pub use employee_repo::EmployeeRepo;
pub use employee_status_repo::EmployeeStatusRepo;
pub use user_repo::UserRepo;
