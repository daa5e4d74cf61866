use async_trait::async_trait;
use sqlx::SqlitePool;

use super::super::user_delete::UserDeleter;
use super::schema::USERS_TABLE;
use crate::error::{AppError, AppResult};

/// SQLite-specific implementation of UserDeleter
pub struct SqliteUserDeleter {
    pool: SqlitePool,
}

impl SqliteUserDeleter {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDeleter for SqliteUserDeleter {
    async fn execute_user_delete(&self, id: &str) -> AppResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", USERS_TABLE);

        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
