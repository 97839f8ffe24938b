//! Department entity model and DTOs.

use presence_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Icon used when a department is created without one.
pub const DEFAULT_DEPARTMENT_ICON: &str = "building";

/// A row from the `departments` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Department {
    pub id: DbId,
    pub name: String,
    pub name_ja: String,
    pub icon: String,
    pub created_at: Timestamp,
}

/// DTO for creating a new department.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDepartment {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub name_ja: String,
    pub icon: Option<String>,
}
