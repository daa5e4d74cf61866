use async_trait::async_trait;
use sqlx::SqlitePool;

use super::super::group_delete::GroupDeleter;
use super::schema::GROUPS_TABLE;
use crate::error::{AppError, AppResult};
use crate::utils::current_scim_datetime;

/// SQLite-specific implementation of GroupDeleter
pub struct SqliteGroupDeleter {
    pool: SqlitePool,
}

impl SqliteGroupDeleter {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupDeleter for SqliteGroupDeleter {
    async fn execute_group_delete(&self, id: &str) -> AppResult<bool> {
        let sql = format!(
            "UPDATE {} SET deleted = 1, deleted_at = ?1 WHERE id = ?2 AND deleted = 0",
            GROUPS_TABLE
        );

        let result = sqlx::query(&sql)
            .bind(current_scim_datetime())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete group: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
