//! SQLite implementation of the resource store

mod backend_impl;
pub mod group_delete_impl;
pub mod group_insert_impl;
pub mod group_read_impl;
pub mod group_update_impl;
pub mod schema;
pub mod user_delete_impl;
pub mod user_insert_impl;
pub mod user_read_impl;
pub mod user_update_impl;

pub use backend_impl::SqliteBackend;
pub use group_delete_impl::SqliteGroupDeleter;
pub use group_insert_impl::SqliteGroupInserter;
pub use group_read_impl::SqliteGroupReader;
pub use group_update_impl::SqliteGroupUpdater;
pub use user_delete_impl::SqliteUserDeleter;
pub use user_insert_impl::SqliteUserInserter;
pub use user_read_impl::SqliteUserReader;
pub use user_update_impl::SqliteUserUpdater;

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::warn;

use super::record::StoredRecord;
use crate::error::AppError;
use crate::parser::ResourceType;

/// Columns every reader selects, in `StoredRecord` order
pub(crate) const RECORD_COLUMNS: &str = "id, data, created_at, updated_at";

/// Newest first; rowid breaks ties within one millisecond
pub(crate) const NEWEST_FIRST: &str = "ORDER BY created_at DESC, rowid DESC";

pub(crate) fn record_from_row(row: &SqliteRow) -> Result<StoredRecord, AppError> {
    let column = |name: &str| -> Result<String, AppError> {
        row.try_get::<String, _>(name)
            .map_err(|e| AppError::Database(format!("Failed to read column {}: {}", name, e)))
    };

    Ok(StoredRecord {
        id: column("id")?,
        data: column("data")?,
        created_at: column("created_at")?,
        updated_at: column("updated_at")?,
    })
}

/// Map a write failure to `AppError`
///
/// Unique constraint violations are the store's authoritative duplicate check
/// and surface as `Conflict`.
pub fn map_database_error(error: sqlx::Error, resource_type: ResourceType) -> AppError {
    if let sqlx::Error::Database(db_error) = &error {
        let message = db_error.message();
        if db_error.is_unique_violation() || message.contains("UNIQUE constraint failed") {
            let attribute = if message.contains("user_name") {
                "userName"
            } else if message.contains("display_name") {
                "displayName"
            } else {
                "id"
            };
            warn!(%resource_type, attribute, "unique constraint rejected write");
            return AppError::Conflict(format!(
                "{} with the same {} already exists",
                resource_type, attribute
            ));
        }
    }

    AppError::Database(format!("Failed to write {}: {}", resource_type, error))
}
