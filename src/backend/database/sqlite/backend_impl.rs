use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

use super::super::config::DatabaseBackendConfig;
use super::{
    SqliteGroupDeleter, SqliteGroupInserter, SqliteGroupReader, SqliteGroupUpdater,
    SqliteUserDeleter, SqliteUserInserter, SqliteUserReader, SqliteUserUpdater,
};
use crate::backend::database::{
    UnifiedGroupDeleteOps, UnifiedGroupInsertOps, UnifiedGroupReadOps, UnifiedGroupUpdateOps,
    UnifiedUserDeleteOps, UnifiedUserInsertOps, UnifiedUserReadOps, UnifiedUserUpdateOps,
};
use crate::backend::{Backend, GroupBackend, GroupPredicate, UserBackend, UserPredicate};
use crate::error::{AppError, AppResult};
use crate::models::{Group, User};

/// SQLite database backend implementation
pub struct SqliteBackend {
    pool: SqlitePool,
    user_insert_ops: UnifiedUserInsertOps<SqliteUserInserter>,
    user_update_ops: UnifiedUserUpdateOps<SqliteUserUpdater>,
    user_delete_ops: UnifiedUserDeleteOps<SqliteUserDeleter>,
    user_read_ops: UnifiedUserReadOps<SqliteUserReader>,
    group_insert_ops: UnifiedGroupInsertOps<SqliteGroupInserter>,
    group_update_ops: UnifiedGroupUpdateOps<SqliteGroupUpdater>,
    group_delete_ops: UnifiedGroupDeleteOps<SqliteGroupDeleter>,
    group_read_ops: UnifiedGroupReadOps<SqliteGroupReader>,
}

impl SqliteBackend {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            user_insert_ops: UnifiedUserInsertOps::new(SqliteUserInserter::new(pool.clone())),
            user_update_ops: UnifiedUserUpdateOps::new(SqliteUserUpdater::new(pool.clone())),
            user_delete_ops: UnifiedUserDeleteOps::new(SqliteUserDeleter::new(pool.clone())),
            user_read_ops: UnifiedUserReadOps::new(SqliteUserReader::new(pool.clone())),
            group_insert_ops: UnifiedGroupInsertOps::new(SqliteGroupInserter::new(pool.clone())),
            group_update_ops: UnifiedGroupUpdateOps::new(SqliteGroupUpdater::new(pool.clone())),
            group_delete_ops: UnifiedGroupDeleteOps::new(SqliteGroupDeleter::new(pool.clone())),
            group_read_ops: UnifiedGroupReadOps::new(SqliteGroupReader::new(pool.clone())),
            pool,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    async fn connect(config: &DatabaseBackendConfig) -> AppResult<Self> {
        config
            .validate()
            .map_err(|e| AppError::Configuration(format!("Invalid backend config: {}", e)))?;

        let options = SqliteConnectOptions::from_str(&config.connection_url)
            .map_err(|e| {
                AppError::Configuration(format!(
                    "Invalid SQLite URL {}: {}",
                    config.connection_url, e
                ))
            })?
            .create_if_missing(true);

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout));
        if config.is_memory_database() {
            // the database lives only as long as its connection
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to SQLite: {}", e)))?;

        Ok(Self::new(pool))
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Health check failed: {}", e)))?;
        Ok(())
    }

    async fn init_schema(&self) -> AppResult<()> {
        super::schema::init_schema(&self.pool).await
    }

    async fn cleanup(&self) -> AppResult<()> {
        self.pool.close().await;
        Ok(())
    }
}

#[async_trait]
impl UserBackend for SqliteBackend {
    async fn create_user(&self, user: &User) -> AppResult<User> {
        self.user_insert_ops.create_user(user).await
    }

    async fn find_user_by_id(&self, id: &str) -> AppResult<Option<User>> {
        self.user_read_ops.find_user_by_id(id).await
    }

    async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.user_read_ops.find_user_by_username(username).await
    }

    async fn find_all_users(&self) -> AppResult<Vec<User>> {
        self.user_read_ops.find_all_users().await
    }

    async fn find_users_by_predicate(&self, predicate: &UserPredicate) -> AppResult<Vec<User>> {
        self.user_read_ops.find_users_by_predicate(predicate).await
    }

    async fn update_user(&self, user: &User) -> AppResult<User> {
        self.user_update_ops.update_user(user).await
    }

    async fn delete_user(&self, id: &str) -> AppResult<bool> {
        self.user_delete_ops.delete_user(id).await
    }
}

#[async_trait]
impl GroupBackend for SqliteBackend {
    async fn create_group(&self, group: &Group) -> AppResult<Group> {
        self.group_insert_ops.create_group(group).await
    }

    async fn find_group_by_id(&self, id: &str) -> AppResult<Option<Group>> {
        self.group_read_ops.find_group_by_id(id).await
    }

    async fn find_group_by_display_name(&self, display_name: &str) -> AppResult<Option<Group>> {
        self.group_read_ops
            .find_group_by_display_name(display_name)
            .await
    }

    async fn find_all_groups(&self) -> AppResult<Vec<Group>> {
        self.group_read_ops.find_all_groups().await
    }

    async fn find_groups_by_predicate(
        &self,
        predicate: &GroupPredicate,
    ) -> AppResult<Vec<Group>> {
        self.group_read_ops.find_groups_by_predicate(predicate).await
    }

    async fn update_group(&self, group: &Group) -> AppResult<Group> {
        self.group_update_ops.update_group(group).await
    }

    async fn delete_group(&self, id: &str) -> AppResult<bool> {
        self.group_delete_ops.delete_group(id).await
    }
}
