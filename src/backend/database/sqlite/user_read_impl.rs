use async_trait::async_trait;
use sqlx::SqlitePool;

use super::super::record::StoredRecord;
use super::super::user_read::UserReader;
use super::schema::USERS_TABLE;
use super::{record_from_row, NEWEST_FIRST, RECORD_COLUMNS};
use crate::backend::UserPredicate;
use crate::error::{AppError, AppResult};

/// SQLite-specific implementation of UserReader
pub struct SqliteUserReader {
    pool: SqlitePool,
}

impl SqliteUserReader {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_optional(&self, column: &str, value: &str) -> AppResult<Option<StoredRecord>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1 LIMIT 1",
            RECORD_COLUMNS, USERS_TABLE, column
        );
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to fetch user: {}", e)))?;

        row.as_ref().map(record_from_row).transpose()
    }
}

#[async_trait]
impl UserReader for SqliteUserReader {
    async fn find_user_record_by_id(&self, id: &str) -> AppResult<Option<StoredRecord>> {
        self.fetch_optional("id", id).await
    }

    async fn find_user_record_by_username(
        &self,
        username: &str,
    ) -> AppResult<Option<StoredRecord>> {
        self.fetch_optional("user_name", username).await
    }

    async fn find_all_user_records(&self) -> AppResult<Vec<StoredRecord>> {
        let sql = format!(
            "SELECT {} FROM {} {}",
            RECORD_COLUMNS, USERS_TABLE, NEWEST_FIRST
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to fetch users: {}", e)))?;

        rows.iter().map(record_from_row).collect()
    }

    async fn find_user_records_by_predicate(
        &self,
        predicate: &UserPredicate,
    ) -> AppResult<Vec<StoredRecord>> {
        let column = match predicate {
            UserPredicate::UserName(_) => "user_name",
            UserPredicate::ExternalId(_) => "external_id",
            UserPredicate::Active(_) => "active",
        };
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1 {}",
            RECORD_COLUMNS, USERS_TABLE, column, NEWEST_FIRST
        );

        let query = sqlx::query(&sql);
        let query = match predicate {
            UserPredicate::UserName(value) | UserPredicate::ExternalId(value) => {
                query.bind(value.as_str())
            }
            UserPredicate::Active(active) => query.bind(*active),
        };

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to search users: {}", e)))?;

        rows.iter().map(record_from_row).collect()
    }
}
