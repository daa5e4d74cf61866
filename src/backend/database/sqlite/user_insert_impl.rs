use async_trait::async_trait;
use sqlx::SqlitePool;

use super::super::user_insert::{PreparedUserData, UserInserter};
use super::map_database_error;
use super::schema::USERS_TABLE;
use crate::error::AppResult;
use crate::models::User;
use crate::parser::ResourceType;

/// SQLite-specific implementation of UserInserter
pub struct SqliteUserInserter {
    pool: SqlitePool,
}

impl SqliteUserInserter {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserInserter for SqliteUserInserter {
    async fn execute_user_insert(&self, data: PreparedUserData) -> AppResult<User> {
        let sql = format!(
            "INSERT INTO {} (id, user_name, external_id, active, data, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            USERS_TABLE
        );

        sqlx::query(&sql)
            .bind(&data.id)
            .bind(&data.user_name)
            .bind(&data.external_id)
            .bind(data.active)
            .bind(&data.data)
            .bind(&data.created_at)
            .bind(&data.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_database_error(e, ResourceType::User))?;

        Ok(data.user)
    }
}
