//! Presence and attendance services.
//!
//! Each engine validates its input against [`presence_core`] rules, writes
//! through a [`presence_db::PresenceStore`] and, on success, publishes a
//! [`presence_events::PresenceEvent`] to the shared hub. A failed write never
//! publishes.

pub mod attendance;
pub mod clock;
pub mod directory;
pub mod error;
pub mod presence;

pub use attendance::AttendanceEngine;
pub use clock::{system_clock, Clock};
pub use directory::{DepartmentWithEmployees, Directory, EmployeeDetail, EmployeeWithStatus};
pub use error::{EngineError, EngineResult};
pub use presence::PresenceEngine;
