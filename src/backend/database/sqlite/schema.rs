use crate::error::{AppError, AppResult};
use sqlx::SqlitePool;

pub const USERS_TABLE: &str = "scim_users";
pub const GROUPS_TABLE: &str = "scim_groups";

/// Initialize the SQLite schema
///
/// `user_name` carries a plain UNIQUE constraint. Group display names are
/// unique only among live rows, via a partial index over `deleted = 0`.
pub async fn init_schema(pool: &SqlitePool) -> AppResult<()> {
    let users_sql = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id TEXT PRIMARY KEY,
            user_name TEXT NOT NULL UNIQUE,
            external_id TEXT,
            active INTEGER NOT NULL DEFAULT 1,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
        USERS_TABLE
    );

    sqlx::query(&users_sql)
        .execute(pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

    let groups_sql = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id TEXT PRIMARY KEY,
            display_name TEXT NOT NULL,
            external_id TEXT,
            deleted INTEGER NOT NULL DEFAULT 0,
            data TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT
        )
        "#,
        GROUPS_TABLE
    );

    sqlx::query(&groups_sql)
        .execute(pool)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create groups table: {}", e)))?;

    create_indexes(pool).await
}

async fn create_indexes(pool: &SqlitePool) -> AppResult<()> {
    let indexes = [
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{0}_external_id ON {0} (external_id)",
            USERS_TABLE
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{0}_created_at ON {0} (created_at)",
            USERS_TABLE
        ),
        format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_{0}_live_display_name ON {0} (display_name) WHERE deleted = 0",
            GROUPS_TABLE
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{0}_external_id ON {0} (external_id)",
            GROUPS_TABLE
        ),
    ];

    for sql in indexes.iter() {
        sqlx::query(sql)
            .execute(pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to create index: {}", e)))?;
    }

    Ok(())
}
