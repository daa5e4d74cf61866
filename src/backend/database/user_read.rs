//! User read operations

use async_trait::async_trait;
use tracing::debug;

use super::record::StoredRecord;
use crate::backend::UserPredicate;
use crate::error::AppResult;
use crate::models::User;
use crate::parser::ResourceType;

/// Trait for user read operations
///
/// Sequences are returned newest first.
#[async_trait]
pub trait UserReader: Send + Sync {
    async fn find_user_record_by_id(&self, id: &str) -> AppResult<Option<StoredRecord>>;

    async fn find_user_record_by_username(&self, username: &str)
        -> AppResult<Option<StoredRecord>>;

    async fn find_all_user_records(&self) -> AppResult<Vec<StoredRecord>>;

    async fn find_user_records_by_predicate(
        &self,
        predicate: &UserPredicate,
    ) -> AppResult<Vec<StoredRecord>>;
}

pub struct UserReadProcessor;

impl UserReadProcessor {
    /// Rebuild a user from its stored row
    pub fn hydrate(record: &StoredRecord) -> AppResult<User> {
        let mut user: User = record.body()?;
        user.id = Some(record.id.clone());
        user.meta = Some(record.meta(ResourceType::User)?);
        Ok(user)
    }

    pub fn hydrate_all(records: &[StoredRecord]) -> AppResult<Vec<User>> {
        records.iter().map(Self::hydrate).collect()
    }
}

/// Unified user read operations
pub struct UnifiedUserReadOps<T: UserReader> {
    reader: T,
}

impl<T: UserReader> UnifiedUserReadOps<T> {
    pub fn new(reader: T) -> Self {
        Self { reader }
    }

    pub async fn find_user_by_id(&self, id: &str) -> AppResult<Option<User>> {
        debug!(id, "looking up user by id");
        self.reader
            .find_user_record_by_id(id)
            .await?
            .as_ref()
            .map(UserReadProcessor::hydrate)
            .transpose()
    }

    pub async fn find_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        debug!(username, "looking up user by userName");
        self.reader
            .find_user_record_by_username(username)
            .await?
            .as_ref()
            .map(UserReadProcessor::hydrate)
            .transpose()
    }

    pub async fn find_all_users(&self) -> AppResult<Vec<User>> {
        let records = self.reader.find_all_user_records().await?;
        UserReadProcessor::hydrate_all(&records)
    }

    pub async fn find_users_by_predicate(&self, predicate: &UserPredicate) -> AppResult<Vec<User>> {
        debug!(?predicate, "searching users");
        let records = self.reader.find_user_records_by_predicate(predicate).await?;
        UserReadProcessor::hydrate_all(&records)
    }
}
