//! Employee entity model and DTOs.

use presence_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `employees` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Employee {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub first_name_ja: String,
    pub last_name_ja: String,
    pub email: String,
    pub position: String,
    pub position_ja: String,
    pub department_id: DbId,
    pub profile_image_url: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
}

/// DTO for onboarding a new employee.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEmployee {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name_ja: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name_ja: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub position: String,
    #[validate(length(min = 1, max = 100))]
    pub position_ja: String,
    pub department_id: DbId,
    #[validate(url)]
    pub profile_image_url: Option<String>,
}

/// DTO for updating an existing employee. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEmployee {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub first_name_ja: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name_ja: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub position: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub position_ja: Option<String>,
    pub department_id: Option<DbId>,
    #[validate(url)]
    pub profile_image_url: Option<String>,
    pub is_active: Option<bool>,
}
