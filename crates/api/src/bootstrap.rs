//! First-run provisioning of the admin account.

use presence_core::roles::ROLE_ADMIN;
use presence_db::models::user::{CreateUser, User};
use presence_db::PresenceStore;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Create the configured admin account unless a user with that username
/// already exists. Returns the created user, or `None` when it was present.
pub async fn ensure_admin(
    store: &dyn PresenceStore,
    admin: &BootstrapAdmin,
) -> AppResult<Option<User>> {
    if store.find_user_by_username(&admin.username).await?.is_some() {
        tracing::debug!(username = %admin.username, "Bootstrap admin already present");
        return Ok(None);
    }

    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::BadRequest)?;
    let password = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = store
        .create_user(&CreateUser {
            username: admin.username.clone(),
            password,
            role: ROLE_ADMIN.to_string(),
            full_name: None,
        })
        .await?;
    tracing::info!(user_id = user.id, username = %user.username, "Bootstrap admin created");
    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use presence_db::MemoryStore;

    use super::*;
    use crate::auth::password::verify_password;

    fn admin(password: &str) -> BootstrapAdmin {
        BootstrapAdmin {
            username: "root".into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn creates_admin_once() {
        let store = MemoryStore::new();

        let created = ensure_admin(&store, &admin("s3cret-pass")).await.unwrap();
        let user = created.unwrap();
        assert_eq!(user.role, ROLE_ADMIN);
        assert!(verify_password("s3cret-pass", &user.password).unwrap());

        let again = ensure_admin(&store, &admin("other-pass")).await.unwrap();
        assert!(again.is_none());
    }

    #[tokio::test]
    async fn rejects_short_password() {
        let store = MemoryStore::new();
        let err = ensure_admin(&store, &admin("short")).await.unwrap_err();
        assert_matches!(err, AppError::BadRequest(_));
        assert!(store.find_user_by_username("root").await.unwrap().is_none());
    }
}
