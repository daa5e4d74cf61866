use crate::error::AppResult;
use crate::models::{Group, User};
use async_trait::async_trait;
use std::sync::Arc;

pub mod database;

/// Supported database backend types
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseType {
    SQLite,
}

impl DatabaseType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sqlite" => Some(DatabaseType::SQLite),
            _ => None,
        }
    }
}

/// Store lookups a User filter can be dispatched to
#[derive(Debug, Clone, PartialEq)]
pub enum UserPredicate {
    UserName(String),
    ExternalId(String),
    Active(bool),
}

/// Store lookups a Group filter can be dispatched to
#[derive(Debug, Clone, PartialEq)]
pub enum GroupPredicate {
    DisplayName(String),
    ExternalId(String),
}

/// Core backend abstraction for SCIM resources
///
/// Every implementation must enforce `userName` uniqueness and live-group
/// `displayName` uniqueness itself; callers' pre-checks are advisory only.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Connect and initialize the storage backend
    async fn connect(config: &crate::backend::database::DatabaseBackendConfig) -> AppResult<Self>
    where
        Self: Sized;

    /// Check if the storage backend is healthy and accessible
    async fn health_check(&self) -> AppResult<()>;

    /// Create tables and indexes if needed
    async fn init_schema(&self) -> AppResult<()>;

    /// Clean up resources when storage is no longer needed
    async fn cleanup(&self) -> AppResult<()> {
        Ok(())
    }
}

/// User-specific backend operations
#[async_trait]
pub trait UserBackend: Backend {
    /// Assign an identifier, stamp meta and persist
    async fn create_user(&self, user: &User) -> AppResult<User>;

    async fn find_user_by_id(&self, id: &str) -> AppResult<Option<User>>;

    /// Exact, case-sensitive username lookup
    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// All users, newest first
    async fn find_all_users(&self) -> AppResult<Vec<User>>;

    /// Users matching a single equality predicate, newest first
    async fn find_users_by_predicate(&self, predicate: &UserPredicate) -> AppResult<Vec<User>>;

    /// Full replace of the mutable fields of an existing user.
    /// `created` and `location` are carried over and `lastModified` refreshed.
    async fn update_user(&self, user: &User) -> AppResult<User>;

    /// Returns whether a row was removed
    async fn delete_user(&self, id: &str) -> AppResult<bool>;
}

/// Group-specific backend operations
///
/// Deleted groups are retained as tombstones and are invisible to every read.
#[async_trait]
pub trait GroupBackend: Backend {
    async fn create_group(&self, group: &Group) -> AppResult<Group>;

    async fn find_group_by_id(&self, id: &str) -> AppResult<Option<Group>>;

    /// Exact display name lookup among non-deleted groups
    async fn find_group_by_display_name(&self, display_name: &str) -> AppResult<Option<Group>>;

    /// All non-deleted groups, newest first
    async fn find_all_groups(&self) -> AppResult<Vec<Group>>;

    async fn find_groups_by_predicate(&self, predicate: &GroupPredicate)
        -> AppResult<Vec<Group>>;

    async fn update_group(&self, group: &Group) -> AppResult<Group>;

    /// Marks the group deleted; returns whether a live group was affected
    async fn delete_group(&self, id: &str) -> AppResult<bool>;
}

/// Combined backend interface for both users and groups
pub trait ScimBackend: UserBackend + GroupBackend {}

/// Automatic implementation for any type that implements both traits
impl<T> ScimBackend for T where T: UserBackend + GroupBackend {}

/// Factory for creating backend instances
pub struct BackendFactory;

impl BackendFactory {
    /// Create a backend based on configuration
    pub async fn create(
        config: &crate::backend::database::DatabaseBackendConfig,
    ) -> AppResult<Arc<dyn ScimBackend>> {
        let backend = Self::create_backend(config).await?;
        Ok(Arc::from(backend))
    }

    /// Create a backend based on configuration (returns Box)
    pub async fn create_backend(
        config: &crate::backend::database::DatabaseBackendConfig,
    ) -> AppResult<Box<dyn ScimBackend>> {
        match config.database_type {
            DatabaseType::SQLite => {
                let backend =
                    crate::backend::database::sqlite::SqliteBackend::connect(config).await?;
                backend.init_schema().await?;
                Ok(Box::new(backend))
            }
        }
    }
}
