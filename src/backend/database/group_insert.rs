use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use super::record::{encode_body, encode_timestamp};
use crate::error::{AppError, AppResult};
use crate::models::Group;
use crate::parser::ResourceType;
use crate::provisioning::meta::MetaLifecycle;

/// Prepared group data for database insertion
#[derive(Debug, Clone)]
pub struct PreparedGroupData {
    pub group: Group,
    pub id: String,
    pub display_name: String,
    pub external_id: Option<String>,
    pub data: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Database-specific adapter for group INSERT operations
#[async_trait]
pub trait GroupInserter: Send + Sync {
    async fn execute_group_insert(&self, data: PreparedGroupData) -> AppResult<Group>;
}

/// Shared business logic for group INSERT operations
pub struct GroupInsertProcessor;

impl GroupInsertProcessor {
    pub fn prepare_group_for_insert(group: &Group) -> AppResult<PreparedGroupData> {
        if group.display_name.trim().is_empty() {
            return Err(AppError::InvalidValue("displayName is required".to_string()));
        }

        let mut group = group.clone();
        let id = Uuid::new_v4().to_string();
        group.id = Some(id.clone());

        let meta = MetaLifecycle::on_create(ResourceType::Group, &id);
        let (created_at, updated_at) = encode_timestamp(&meta);
        group.meta = Some(meta);

        let data = encode_body(&group)?;

        Ok(PreparedGroupData {
            id,
            display_name: group.display_name.clone(),
            external_id: group.external_id.clone(),
            data,
            created_at,
            updated_at,
            group,
        })
    }
}

/// Unified group INSERT operations using the adapter pattern
pub struct UnifiedGroupInsertOps<T: GroupInserter> {
    inserter: T,
}

impl<T: GroupInserter> UnifiedGroupInsertOps<T> {
    pub fn new(inserter: T) -> Self {
        Self { inserter }
    }

    pub async fn create_group(&self, group: &Group) -> AppResult<Group> {
        let prepared = GroupInsertProcessor::prepare_group_for_insert(group)?;
        let created = self.inserter.execute_group_insert(prepared).await?;
        info!(id = ?created.id, display_name = %created.display_name, "group created");
        Ok(created)
    }
}
