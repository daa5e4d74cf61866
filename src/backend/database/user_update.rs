use async_trait::async_trait;
use tracing::info;

use super::record::encode_body;
use crate::error::{AppError, AppResult};
use crate::models::{Meta, User};
use crate::provisioning::meta::MetaLifecycle;
use crate::utils::format_scim_datetime;

/// Common trait for user update operations across different database backends
#[async_trait]
pub trait UserUpdater: Send + Sync {
    /// Current stored state, used to carry `created`/`location` forward
    async fn find_user_for_update(&self, id: &str) -> AppResult<Option<User>>;

    /// Execute user update; returns false when no row matched
    async fn execute_user_update(&self, data: PreparedUserUpdateData) -> AppResult<bool>;
}

/// Prepared user data for database update operations
#[derive(Debug, Clone)]
pub struct PreparedUserUpdateData {
    pub user: User,
    pub id: String,
    pub user_name: String,
    pub external_id: Option<String>,
    pub active: bool,
    pub data: String,
    pub updated_at: String,
}

/// Processor for common user update business logic
pub struct UserUpdateProcessor;

impl UserUpdateProcessor {
    /// Prepare a full replacement of `existing_meta`'s user
    pub fn prepare_user_for_update(
        id: &str,
        user: &User,
        existing_meta: &Meta,
    ) -> AppResult<PreparedUserUpdateData> {
        if user.user_name.trim().is_empty() {
            return Err(AppError::InvalidValue("userName is required".to_string()));
        }

        let mut user = user.clone();
        user.id = Some(id.to_string());

        let meta = MetaLifecycle::on_modify(existing_meta);
        let updated_at = format_scim_datetime(meta.last_modified);
        user.meta = Some(meta);

        let data = encode_body(&user)?;

        Ok(PreparedUserUpdateData {
            id: id.to_string(),
            user_name: user.user_name.clone(),
            external_id: user.external_id.clone(),
            active: user.active,
            data,
            updated_at,
            user,
        })
    }

    /// Validate that the user ID is not empty or whitespace
    pub fn validate_user_id(id: &str) -> AppResult<()> {
        if id.trim().is_empty() {
            return Err(AppError::InvalidValue("User ID cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Unified user update operations handler
pub struct UnifiedUserUpdateOps<T: UserUpdater> {
    updater: T,
}

impl<T: UserUpdater> UnifiedUserUpdateOps<T> {
    pub fn new(updater: T) -> Self {
        Self { updater }
    }

    /// Replace the stored user identified by `user.id`
    pub async fn update_user(&self, user: &User) -> AppResult<User> {
        let id = user.id.clone().unwrap_or_default();
        UserUpdateProcessor::validate_user_id(&id)?;

        let existing = self
            .updater
            .find_user_for_update(&id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {}", id)))?;
        let existing_meta = existing
            .meta
            .as_ref()
            .ok_or_else(|| AppError::Internal(format!("User {} has no meta", id)))?;

        let prepared = UserUpdateProcessor::prepare_user_for_update(&id, user, existing_meta)?;
        let updated = prepared.user.clone();

        if !self.updater.execute_user_update(prepared).await? {
            return Err(AppError::NotFound(format!("User {}", id)));
        }

        info!(id = %id, "user updated");
        Ok(updated)
    }
}
