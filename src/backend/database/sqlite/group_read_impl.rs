use async_trait::async_trait;
use sqlx::SqlitePool;

use super::super::group_read::GroupReader;
use super::super::record::StoredRecord;
use super::schema::GROUPS_TABLE;
use super::{record_from_row, NEWEST_FIRST, RECORD_COLUMNS};
use crate::backend::GroupPredicate;
use crate::error::{AppError, AppResult};

/// SQLite-specific implementation of GroupReader
pub struct SqliteGroupReader {
    pool: SqlitePool,
}

impl SqliteGroupReader {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_optional(&self, column: &str, value: &str) -> AppResult<Option<StoredRecord>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1 AND deleted = 0 LIMIT 1",
            RECORD_COLUMNS, GROUPS_TABLE, column
        );
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to fetch group: {}", e)))?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn fetch_all(&self, column: Option<&str>, value: &str) -> AppResult<Vec<StoredRecord>> {
        let condition = column
            .map(|c| format!("AND {} = ?1", c))
            .unwrap_or_default();
        let sql = format!(
            "SELECT {} FROM {} WHERE deleted = 0 {} {}",
            RECORD_COLUMNS, GROUPS_TABLE, condition, NEWEST_FIRST
        );

        let mut query = sqlx::query(&sql);
        if column.is_some() {
            query = query.bind(value);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to fetch groups: {}", e)))?;

        rows.iter().map(record_from_row).collect()
    }
}

#[async_trait]
impl GroupReader for SqliteGroupReader {
    async fn find_group_record_by_id(&self, id: &str) -> AppResult<Option<StoredRecord>> {
        self.fetch_optional("id", id).await
    }

    async fn find_group_record_by_display_name(
        &self,
        display_name: &str,
    ) -> AppResult<Option<StoredRecord>> {
        self.fetch_optional("display_name", display_name).await
    }

    async fn find_all_group_records(&self) -> AppResult<Vec<StoredRecord>> {
        self.fetch_all(None, "").await
    }

    async fn find_group_records_by_predicate(
        &self,
        predicate: &GroupPredicate,
    ) -> AppResult<Vec<StoredRecord>> {
        match predicate {
            GroupPredicate::DisplayName(value) => self.fetch_all(Some("display_name"), value).await,
            GroupPredicate::ExternalId(value) => self.fetch_all(Some("external_id"), value).await,
        }
    }
}
