use async_trait::async_trait;
use sqlx::SqlitePool;

use super::super::user_read::{UserReadProcessor, UserReader};
use super::super::user_update::{PreparedUserUpdateData, UserUpdater};
use super::map_database_error;
use super::schema::USERS_TABLE;
use super::SqliteUserReader;
use crate::error::AppResult;
use crate::models::User;
use crate::parser::ResourceType;

/// SQLite-specific implementation of UserUpdater
pub struct SqliteUserUpdater {
    pool: SqlitePool,
    reader: SqliteUserReader,
}

impl SqliteUserUpdater {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            reader: SqliteUserReader::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl UserUpdater for SqliteUserUpdater {
    async fn find_user_for_update(&self, id: &str) -> AppResult<Option<User>> {
        self.reader
            .find_user_record_by_id(id)
            .await?
            .as_ref()
            .map(UserReadProcessor::hydrate)
            .transpose()
    }

    async fn execute_user_update(&self, data: PreparedUserUpdateData) -> AppResult<bool> {
        let sql = format!(
            "UPDATE {} SET user_name = ?1, external_id = ?2, active = ?3, data = ?4, updated_at = ?5 WHERE id = ?6",
            USERS_TABLE
        );

        let result = sqlx::query(&sql)
            .bind(&data.user_name)
            .bind(&data.external_id)
            .bind(data.active)
            .bind(&data.data)
            .bind(&data.updated_at)
            .bind(&data.id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_database_error(e, ResourceType::User))?;

        Ok(result.rows_affected() > 0)
    }
}
