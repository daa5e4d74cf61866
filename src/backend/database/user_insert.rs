use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use super::record::{encode_body, encode_timestamp};
use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::parser::ResourceType;
use crate::provisioning::meta::MetaLifecycle;

/// Prepared user data for database insertion
#[derive(Debug, Clone)]
pub struct PreparedUserData {
    pub user: User,
    pub id: String,
    pub user_name: String,
    pub external_id: Option<String>,
    pub active: bool,
    pub data: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Database-specific adapter for user INSERT operations
#[async_trait]
pub trait UserInserter: Send + Sync {
    /// Execute user insert and return the created user
    async fn execute_user_insert(&self, data: PreparedUserData) -> AppResult<User>;
}

/// Shared business logic for user INSERT operations
pub struct UserInsertProcessor;

impl UserInsertProcessor {
    /// Prepare user data for database insertion
    ///
    /// The identifier is always server-generated; any client-supplied id is
    /// discarded. Meta is stamped here so no insert can skip it.
    pub fn prepare_user_for_insert(user: &User) -> AppResult<PreparedUserData> {
        if user.user_name.trim().is_empty() {
            return Err(AppError::InvalidValue("userName is required".to_string()));
        }

        let mut user = user.clone();
        let id = Uuid::new_v4().to_string();
        user.id = Some(id.clone());

        let meta = MetaLifecycle::on_create(ResourceType::User, &id);
        let (created_at, updated_at) = encode_timestamp(&meta);
        user.meta = Some(meta);

        let data = encode_body(&user)?;

        Ok(PreparedUserData {
            id,
            user_name: user.user_name.clone(),
            external_id: user.external_id.clone(),
            active: user.active,
            data,
            created_at,
            updated_at,
            user,
        })
    }
}

/// Unified user INSERT operations using the adapter pattern
pub struct UnifiedUserInsertOps<T: UserInserter> {
    inserter: T,
}

impl<T: UserInserter> UnifiedUserInsertOps<T> {
    pub fn new(inserter: T) -> Self {
        Self { inserter }
    }

    pub async fn create_user(&self, user: &User) -> AppResult<User> {
        let prepared = UserInsertProcessor::prepare_user_for_insert(user)?;
        let created = self.inserter.execute_user_insert(prepared).await?;
        info!(id = ?created.id, user_name = %created.user_name, "user created");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_user_for_insert() {
        let mut user = User::new("TestUser");
        user.id = Some("client-chosen".to_string());

        let prepared = UserInsertProcessor::prepare_user_for_insert(&user).unwrap();

        assert_ne!(prepared.id, "client-chosen");
        assert!(Uuid::parse_str(&prepared.id).is_ok());
        assert_eq!(prepared.user.id.as_deref(), Some(prepared.id.as_str()));
        // username is stored verbatim
        assert_eq!(prepared.user_name, "TestUser");
        assert_eq!(prepared.created_at, prepared.updated_at);

        let meta = prepared.user.meta.as_ref().unwrap();
        assert_eq!(meta.resource_type, "User");
        assert_eq!(meta.location, format!("/Users/{}", prepared.id));
    }

    #[test]
    fn test_prepare_rejects_blank_username() {
        let user = User::new("   ");
        assert!(matches!(
            UserInsertProcessor::prepare_user_for_insert(&user),
            Err(AppError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_each_insert_gets_a_new_id() {
        let user = User::new("dup");
        let a = UserInsertProcessor::prepare_user_for_insert(&user).unwrap();
        let b = UserInsertProcessor::prepare_user_for_insert(&user).unwrap();
        assert_ne!(a.id, b.id);
    }
}
