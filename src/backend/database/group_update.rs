use async_trait::async_trait;
use tracing::info;

use super::record::encode_body;
use crate::error::{AppError, AppResult};
use crate::models::{Group, Meta};
use crate::provisioning::meta::MetaLifecycle;
use crate::utils::format_scim_datetime;

/// Common trait for group update operations across different database backends
#[async_trait]
pub trait GroupUpdater: Send + Sync {
    async fn find_group_for_update(&self, id: &str) -> AppResult<Option<Group>>;

    /// Execute group update; returns false when no live row matched
    async fn execute_group_update(&self, data: PreparedGroupUpdateData) -> AppResult<bool>;
}

#[derive(Debug, Clone)]
pub struct PreparedGroupUpdateData {
    pub group: Group,
    pub id: String,
    pub display_name: String,
    pub external_id: Option<String>,
    pub data: String,
    pub updated_at: String,
}

/// Processor for common group update business logic
pub struct GroupUpdateProcessor;

impl GroupUpdateProcessor {
    pub fn prepare_group_for_update(
        id: &str,
        group: &Group,
        existing_meta: &Meta,
    ) -> AppResult<PreparedGroupUpdateData> {
        if group.display_name.trim().is_empty() {
            return Err(AppError::InvalidValue("displayName is required".to_string()));
        }

        let mut group = group.clone();
        group.id = Some(id.to_string());

        let meta = MetaLifecycle::on_modify(existing_meta);
        let updated_at = format_scim_datetime(meta.last_modified);
        group.meta = Some(meta);

        let data = encode_body(&group)?;

        Ok(PreparedGroupUpdateData {
            id: id.to_string(),
            display_name: group.display_name.clone(),
            external_id: group.external_id.clone(),
            data,
            updated_at,
            group,
        })
    }

    pub fn validate_group_id(id: &str) -> AppResult<()> {
        if id.trim().is_empty() {
            return Err(AppError::InvalidValue("Group ID cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Unified group update operations handler
pub struct UnifiedGroupUpdateOps<T: GroupUpdater> {
    updater: T,
}

impl<T: GroupUpdater> UnifiedGroupUpdateOps<T> {
    pub fn new(updater: T) -> Self {
        Self { updater }
    }

    pub async fn update_group(&self, group: &Group) -> AppResult<Group> {
        let id = group.id.clone().unwrap_or_default();
        GroupUpdateProcessor::validate_group_id(&id)?;

        let existing = self
            .updater
            .find_group_for_update(&id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group {}", id)))?;
        let existing_meta = existing
            .meta
            .as_ref()
            .ok_or_else(|| AppError::Internal(format!("Group {} has no meta", id)))?;

        let prepared = GroupUpdateProcessor::prepare_group_for_update(&id, group, existing_meta)?;
        let updated = prepared.group.clone();

        if !self.updater.execute_group_update(prepared).await? {
            return Err(AppError::NotFound(format!("Group {}", id)));
        }

        info!(id = %id, "group updated");
        Ok(updated)
    }
}
