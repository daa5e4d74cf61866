use async_trait::async_trait;
use sqlx::SqlitePool;

use super::super::group_read::{GroupReadProcessor, GroupReader};
use super::super::group_update::{GroupUpdater, PreparedGroupUpdateData};
use super::map_database_error;
use super::schema::GROUPS_TABLE;
use super::SqliteGroupReader;
use crate::error::AppResult;
use crate::models::Group;
use crate::parser::ResourceType;

/// SQLite-specific implementation of GroupUpdater
pub struct SqliteGroupUpdater {
    pool: SqlitePool,
    reader: SqliteGroupReader,
}

impl SqliteGroupUpdater {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            reader: SqliteGroupReader::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl GroupUpdater for SqliteGroupUpdater {
    async fn find_group_for_update(&self, id: &str) -> AppResult<Option<Group>> {
        self.reader
            .find_group_record_by_id(id)
            .await?
            .as_ref()
            .map(GroupReadProcessor::hydrate)
            .transpose()
    }

    async fn execute_group_update(&self, data: PreparedGroupUpdateData) -> AppResult<bool> {
        let sql = format!(
            "UPDATE {} SET display_name = ?1, external_id = ?2, data = ?3, updated_at = ?4 WHERE id = ?5 AND deleted = 0",
            GROUPS_TABLE
        );

        let result = sqlx::query(&sql)
            .bind(&data.display_name)
            .bind(&data.external_id)
            .bind(&data.data)
            .bind(&data.updated_at)
            .bind(&data.id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_database_error(e, ResourceType::Group))?;

        Ok(result.rows_affected() > 0)
    }
}
