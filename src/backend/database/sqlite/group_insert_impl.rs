use async_trait::async_trait;
use sqlx::SqlitePool;

use super::super::group_insert::{GroupInserter, PreparedGroupData};
use super::map_database_error;
use super::schema::GROUPS_TABLE;
use crate::error::AppResult;
use crate::models::Group;
use crate::parser::ResourceType;

/// SQLite-specific implementation of GroupInserter
pub struct SqliteGroupInserter {
    pool: SqlitePool,
}

impl SqliteGroupInserter {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupInserter for SqliteGroupInserter {
    async fn execute_group_insert(&self, data: PreparedGroupData) -> AppResult<Group> {
        let sql = format!(
            "INSERT INTO {} (id, display_name, external_id, deleted, data, created_at, updated_at) VALUES (?1, ?2, ?3, 0, ?4, ?5, ?6)",
            GROUPS_TABLE
        );

        sqlx::query(&sql)
            .bind(&data.id)
            .bind(&data.display_name)
            .bind(&data.external_id)
            .bind(&data.data)
            .bind(&data.created_at)
            .bind(&data.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_database_error(e, ResourceType::Group))?;

        Ok(data.group)
    }
}
