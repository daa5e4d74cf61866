use std::sync::Arc;
use tracing::info;

use super::assembler::{AttributeFilter, ResourceAssembler};
use super::filter::FilterEvaluator;
use super::guard::ConflictGuard;
use super::patch::PatchEngine;
use crate::backend::ScimBackend;
use crate::error::{AppError, AppResult};
use crate::models::{Group, ScimListResponse, ScimPatchOp};
use crate::schema::validate_group;

/// The logical Group operations exposed to the transport layer
#[derive(Clone)]
pub struct GroupProvisioning {
    backend: Arc<dyn ScimBackend>,
    assembler: ResourceAssembler,
}

impl GroupProvisioning {
    pub fn new(backend: Arc<dyn ScimBackend>, assembler: ResourceAssembler) -> Self {
        Self { backend, assembler }
    }

    pub async fn create(&self, mut group: Group) -> AppResult<Group> {
        validate_group(&group)?;
        ConflictGuard::check_display_name(self.backend.as_ref(), &group.display_name).await?;

        group.id = None;
        let created = self.backend.create_group(&group).await?;
        info!(id = ?created.id, display_name = %created.display_name, members = created.members.len(), "provisioned group");
        Ok(created)
    }

    pub async fn get(&self, id: &str) -> AppResult<Group> {
        self.backend
            .find_group_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group {}", id)))
    }

    pub async fn list(
        &self,
        filter: Option<&str>,
        attributes: &AttributeFilter,
    ) -> AppResult<ScimListResponse> {
        let groups = FilterEvaluator::groups(self.backend.as_ref(), filter).await?;
        self.assembler.group_list(&groups, attributes)
    }

    pub async fn patch(&self, id: &str, patch: &ScimPatchOp) -> AppResult<Group> {
        let existing = self.get(id).await?;
        let patched = PatchEngine::apply_to_group(&existing, patch)?;
        validate_group(&patched)?;

        let updated = self.backend.update_group(&patched).await?;
        info!(id, operations = patch.operations.len(), members = updated.members.len(), "patched group");
        Ok(updated)
    }

    pub async fn replace(&self, id: &str, mut group: Group) -> AppResult<Group> {
        validate_group(&group)?;
        group.id = Some(id.to_string());

        let updated = self.backend.update_group(&group).await?;
        info!(id, "replaced group");
        Ok(updated)
    }

    /// Logical delete; succeeds whether or not the group existed
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let removed = self.backend.delete_group(id).await?;
        info!(id, removed, "deleted group");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::database::DatabaseBackendConfig;
    use crate::backend::BackendFactory;
    use crate::models::{Member, ScimPatchOperation};
    use serde_json::json;

    async fn provisioning() -> GroupProvisioning {
        let backend = BackendFactory::create(&DatabaseBackendConfig::memory_sqlite())
            .await
            .unwrap();
        GroupProvisioning::new(backend, ResourceAssembler::new("/scim/v2"))
    }

    #[tokio::test]
    async fn test_member_removal_is_persisted() {
        let groups = provisioning().await;
        let mut group = Group::new("Engineering");
        group.members = vec![Member::new("A"), Member::new("B"), Member::new("C")];
        let id = groups.create(group).await.unwrap().id.unwrap();

        groups
            .patch(
                &id,
                &ScimPatchOp::new(vec![ScimPatchOperation {
                    op: "remove".to_string(),
                    path: Some("members".to_string()),
                    value: Some(json!([{"value": "B"}])),
                }]),
            )
            .await
            .unwrap();

        let members: Vec<String> = groups
            .get(&id)
            .await
            .unwrap()
            .members
            .into_iter()
            .map(|m| m.value)
            .collect();
        assert_eq!(members, vec!["A", "C"]);
    }

    #[tokio::test]
    async fn test_display_name_reusable_after_delete() {
        let groups = provisioning().await;
        let id = groups.create(Group::new("Sales")).await.unwrap().id.unwrap();
        assert!(matches!(
            groups.create(Group::new("Sales")).await,
            Err(AppError::Conflict(_))
        ));

        groups.delete(&id).await.unwrap();
        groups.delete(&id).await.unwrap();
        assert!(matches!(groups.get(&id).await, Err(AppError::NotFound(_))));
        assert!(groups.create(Group::new("Sales")).await.is_ok());
    }

    #[tokio::test]
    async fn test_rename_into_taken_name_conflicts() {
        let groups = provisioning().await;
        groups.create(Group::new("Taken")).await.unwrap();
        let id = groups.create(Group::new("Free")).await.unwrap().id.unwrap();

        let result = groups
            .patch(
                &id,
                &ScimPatchOp::new(vec![ScimPatchOperation {
                    op: "replace".to_string(),
                    path: Some("displayName".to_string()),
                    value: Some(json!("Taken")),
                }]),
            )
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_list_excludes_members() {
        let groups = provisioning().await;
        let mut group = Group::new("Ops");
        group.members = vec![Member::new("u1")];
        groups.create(group).await.unwrap();

        let list = groups
            .list(
                Some(r#"displayName eq "Ops""#),
                &AttributeFilter::excluding(&["members"]),
            )
            .await
            .unwrap();
        assert_eq!(list.total_results, 1);
        assert!(list.resources[0].get("members").is_none());
        assert!(list.resources[0]["meta"]["location"]
            .as_str()
            .unwrap()
            .starts_with("/scim/v2/Groups/"));
    }
}
