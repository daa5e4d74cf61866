use async_trait::async_trait;
use tracing::info;

use crate::error::AppResult;

/// Database-specific adapter for group DELETE operations
///
/// Groups are logically deleted so their display name becomes reusable while
/// the row itself is retained.
#[async_trait]
pub trait GroupDeleter: Send + Sync {
    /// Returns true when a live group was marked deleted
    async fn execute_group_delete(&self, id: &str) -> AppResult<bool>;
}

pub struct UnifiedGroupDeleteOps<T: GroupDeleter> {
    deleter: T,
}

impl<T: GroupDeleter> UnifiedGroupDeleteOps<T> {
    pub fn new(deleter: T) -> Self {
        Self { deleter }
    }

    pub async fn delete_group(&self, id: &str) -> AppResult<bool> {
        if id.trim().is_empty() {
            return Ok(false);
        }

        let deleted = self.deleter.execute_group_delete(id).await?;
        if deleted {
            info!(id, "group deleted");
        }
        Ok(deleted)
    }
}
