//! Group read operations

use async_trait::async_trait;
use tracing::debug;

use super::record::StoredRecord;
use crate::backend::GroupPredicate;
use crate::error::AppResult;
use crate::models::Group;
use crate::parser::ResourceType;

/// Trait for group read operations
///
/// Implementations never return logically deleted groups.
#[async_trait]
pub trait GroupReader: Send + Sync {
    async fn find_group_record_by_id(&self, id: &str) -> AppResult<Option<StoredRecord>>;

    async fn find_group_record_by_display_name(
        &self,
        display_name: &str,
    ) -> AppResult<Option<StoredRecord>>;

    async fn find_all_group_records(&self) -> AppResult<Vec<StoredRecord>>;

    async fn find_group_records_by_predicate(
        &self,
        predicate: &GroupPredicate,
    ) -> AppResult<Vec<StoredRecord>>;
}

pub struct GroupReadProcessor;

impl GroupReadProcessor {
    pub fn hydrate(record: &StoredRecord) -> AppResult<Group> {
        let mut group: Group = record.body()?;
        group.id = Some(record.id.clone());
        group.meta = Some(record.meta(ResourceType::Group)?);
        Ok(group)
    }

    pub fn hydrate_all(records: &[StoredRecord]) -> AppResult<Vec<Group>> {
        records.iter().map(Self::hydrate).collect()
    }
}

/// Unified group read operations
pub struct UnifiedGroupReadOps<T: GroupReader> {
    reader: T,
}

impl<T: GroupReader> UnifiedGroupReadOps<T> {
    pub fn new(reader: T) -> Self {
        Self { reader }
    }

    pub async fn find_group_by_id(&self, id: &str) -> AppResult<Option<Group>> {
        debug!(id, "looking up group by id");
        self.reader
            .find_group_record_by_id(id)
            .await?
            .as_ref()
            .map(GroupReadProcessor::hydrate)
            .transpose()
    }

    pub async fn find_group_by_display_name(&self, display_name: &str) -> AppResult<Option<Group>> {
        debug!(display_name, "looking up group by displayName");
        self.reader
            .find_group_record_by_display_name(display_name)
            .await?
            .as_ref()
            .map(GroupReadProcessor::hydrate)
            .transpose()
    }

    pub async fn find_all_groups(&self) -> AppResult<Vec<Group>> {
        let records = self.reader.find_all_group_records().await?;
        GroupReadProcessor::hydrate_all(&records)
    }

    pub async fn find_groups_by_predicate(
        &self,
        predicate: &GroupPredicate,
    ) -> AppResult<Vec<Group>> {
        debug!(?predicate, "searching groups");
        let records = self.reader.find_group_records_by_predicate(predicate).await?;
        GroupReadProcessor::hydrate_all(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hydrate_keeps_member_order() {
        let record = StoredRecord {
            id: "g1".to_string(),
            data: r#"{"displayName":"Ops","members":[{"value":"c"},{"value":"a"},{"value":"b"}]}"#
                .to_string(),
            created_at: "2025-01-01T00:00:00.000Z".to_string(),
            updated_at: "2025-01-01T00:00:00.000Z".to_string(),
        };
        let group = GroupReadProcessor::hydrate(&record).unwrap();
        let values: Vec<&str> = group.members.iter().map(|m| m.value.as_str()).collect();
        assert_eq!(values, vec!["c", "a", "b"]);
        assert_eq!(group.meta.unwrap().location, "/Groups/g1");
    }
}
