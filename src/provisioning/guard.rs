//! Pre-creation uniqueness checks.
//!
//! These only produce an early, descriptive refusal. The store's own unique
//! constraints remain the enforcement under concurrent creation.

use tracing::warn;

use crate::backend::ScimBackend;
use crate::error::{AppError, AppResult};

pub struct ConflictGuard;

impl ConflictGuard {
    pub async fn check_user_name(backend: &dyn ScimBackend, user_name: &str) -> AppResult<()> {
        if backend.find_user_by_username(user_name).await?.is_some() {
            warn!(user_name, "refusing duplicate userName");
            return Err(AppError::Conflict(format!(
                "User with userName '{}' already exists",
                user_name
            )));
        }
        Ok(())
    }

    /// Only non-deleted groups count
    pub async fn check_display_name(
        backend: &dyn ScimBackend,
        display_name: &str,
    ) -> AppResult<()> {
        if backend
            .find_group_by_display_name(display_name)
            .await?
            .is_some()
        {
            warn!(display_name, "refusing duplicate displayName");
            return Err(AppError::Conflict(format!(
                "Group with displayName '{}' already exists",
                display_name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::database::DatabaseBackendConfig;
    use crate::backend::BackendFactory;
    use crate::models::{Group, User};

    #[tokio::test]
    async fn test_user_name_guard() {
        let backend = BackendFactory::create(&DatabaseBackendConfig::memory_sqlite())
            .await
            .unwrap();

        assert!(ConflictGuard::check_user_name(backend.as_ref(), "alice")
            .await
            .is_ok());
        backend.create_user(&User::new("alice")).await.unwrap();
        assert!(matches!(
            ConflictGuard::check_user_name(backend.as_ref(), "alice").await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_display_name_guard_ignores_deleted_groups() {
        let backend = BackendFactory::create(&DatabaseBackendConfig::memory_sqlite())
            .await
            .unwrap();

        let group = backend.create_group(&Group::new("Ops")).await.unwrap();
        assert!(ConflictGuard::check_display_name(backend.as_ref(), "Ops")
            .await
            .is_err());

        backend
            .delete_group(group.id.as_deref().unwrap())
            .await
            .unwrap();
        assert!(ConflictGuard::check_display_name(backend.as_ref(), "Ops")
            .await
            .is_ok());
    }
}
