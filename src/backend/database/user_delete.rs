use async_trait::async_trait;
use tracing::info;

use crate::error::AppResult;

/// Database-specific adapter for user DELETE operations
#[async_trait]
pub trait UserDeleter: Send + Sync {
    /// Returns true when a row was removed
    async fn execute_user_delete(&self, id: &str) -> AppResult<bool>;
}

/// Unified user DELETE operations
///
/// Deleting an unknown id is not an error; the caller just gets `false`.
pub struct UnifiedUserDeleteOps<T: UserDeleter> {
    deleter: T,
}

impl<T: UserDeleter> UnifiedUserDeleteOps<T> {
    pub fn new(deleter: T) -> Self {
        Self { deleter }
    }

    pub async fn delete_user(&self, id: &str) -> AppResult<bool> {
        if id.trim().is_empty() {
            return Ok(false);
        }

        let deleted = self.deleter.execute_user_delete(id).await?;
        if deleted {
            info!(id, "user deleted");
        }
        Ok(deleted)
    }
}
