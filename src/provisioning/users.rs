use std::sync::Arc;
use tracing::info;

use super::assembler::{AttributeFilter, ResourceAssembler};
use super::filter::FilterEvaluator;
use super::guard::ConflictGuard;
use super::patch::PatchEngine;
use crate::backend::ScimBackend;
use crate::error::{AppError, AppResult};
use crate::models::{ScimListResponse, ScimPatchOp, User};
use crate::schema::validate_user;

/// The logical User operations exposed to the transport layer
#[derive(Clone)]
pub struct UserProvisioning {
    backend: Arc<dyn ScimBackend>,
    assembler: ResourceAssembler,
}

impl UserProvisioning {
    pub fn new(backend: Arc<dyn ScimBackend>, assembler: ResourceAssembler) -> Self {
        Self { backend, assembler }
    }

    /// Client-supplied id and meta are discarded; the store assigns both
    pub async fn create(&self, mut user: User) -> AppResult<User> {
        validate_user(&user)?;
        ConflictGuard::check_user_name(self.backend.as_ref(), &user.user_name).await?;

        user.id = None;
        let created = self.backend.create_user(&user).await?;
        info!(id = ?created.id, user_name = %created.user_name, "provisioned user");
        Ok(created)
    }

    pub async fn get(&self, id: &str) -> AppResult<User> {
        self.backend
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {}", id)))
    }

    pub async fn list(
        &self,
        filter: Option<&str>,
        attributes: &AttributeFilter,
    ) -> AppResult<ScimListResponse> {
        let users = FilterEvaluator::users(self.backend.as_ref(), filter).await?;
        self.assembler.user_list(&users, attributes)
    }

    /// Applies every operation or none of them
    pub async fn patch(&self, id: &str, patch: &ScimPatchOp) -> AppResult<User> {
        let existing = self.get(id).await?;
        let patched = PatchEngine::apply_to_user(&existing, patch)?;
        validate_user(&patched)?;

        let updated = self.backend.update_user(&patched).await?;
        info!(id, operations = patch.operations.len(), "patched user");
        Ok(updated)
    }

    /// Full replace; the path id wins over any id in the body
    pub async fn replace(&self, id: &str, mut user: User) -> AppResult<User> {
        validate_user(&user)?;
        user.id = Some(id.to_string());

        let updated = self.backend.update_user(&user).await?;
        info!(id, "replaced user");
        Ok(updated)
    }

    /// Succeeds whether or not the user existed
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let removed = self.backend.delete_user(id).await?;
        info!(id, removed, "deleted user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::database::DatabaseBackendConfig;
    use crate::backend::BackendFactory;
    use crate::models::{Name, ScimPatchOperation};
    use serde_json::json;

    async fn provisioning() -> UserProvisioning {
        let backend = BackendFactory::create(&DatabaseBackendConfig::memory_sqlite())
            .await
            .unwrap();
        UserProvisioning::new(backend, ResourceAssembler::new("/scim/v2"))
    }

    fn replace(path: &str, value: serde_json::Value) -> ScimPatchOperation {
        ScimPatchOperation {
            op: "replace".to_string(),
            path: Some(path.to_string()),
            value: Some(value),
        }
    }

    #[tokio::test]
    async fn test_lifecycle() {
        let users = provisioning().await;

        let created = users.create(User::new("alice")).await.unwrap();
        let id = created.id.clone().unwrap();
        assert!(matches!(
            users.create(User::new("alice")).await,
            Err(AppError::Conflict(_))
        ));

        let patched = users
            .patch(&id, &ScimPatchOp::new(vec![replace("active", json!(false))]))
            .await
            .unwrap();
        let fetched = users.get(&id).await.unwrap();
        assert!(!fetched.active);
        let meta = fetched.meta.clone().unwrap();
        assert!(meta.last_modified > meta.created);
        assert_eq!(fetched, patched);

        users.delete(&id).await.unwrap();
        users.delete(&id).await.unwrap();
        assert!(matches!(users.get(&id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_failed_patch_is_not_persisted() {
        let users = provisioning().await;
        let created = users.create(User::new("bob")).await.unwrap();
        let id = created.id.clone().unwrap();

        let result = users
            .patch(
                &id,
                &ScimPatchOp::new(vec![
                    replace("userName", json!("robert")),
                    replace("nickName", json!("bobby")),
                ]),
            )
            .await;
        assert!(matches!(result, Err(AppError::UnsupportedPath(_))));
        assert_eq!(users.get(&id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_patch_missing_user() {
        let users = provisioning().await;
        let result = users
            .patch("nope", &ScimPatchOp::new(vec![replace("active", json!(true))]))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_replace_uses_path_id() {
        let users = provisioning().await;
        let mut original = User::new("carol");
        original.name = Some(Name {
            given_name: Some("Carol".to_string()),
            family_name: None,
        });
        let created = users.create(original).await.unwrap();
        let id = created.id.unwrap();

        let mut replacement = User::new("carol");
        replacement.id = Some("ignored".to_string());
        let replaced = users.replace(&id, replacement).await.unwrap();
        assert_eq!(replaced.id.as_deref(), Some(id.as_str()));
        assert!(replaced.name.is_none());

        assert!(matches!(
            users.replace("missing", User::new("dave")).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_with_filter() {
        let users = provisioning().await;
        users.create(User::new("bob")).await.unwrap();
        users.create(User::new("bobby")).await.unwrap();

        let list = users
            .list(Some(r#"userName eq "bob""#), &AttributeFilter::default())
            .await
            .unwrap();
        assert_eq!(list.total_results, 1);
        assert_eq!(list.resources[0]["userName"], "bob");

        let all = users.list(None, &AttributeFilter::default()).await.unwrap();
        assert_eq!(all.total_results, 2);
        assert_eq!(all.resources[0]["userName"], "bobby");

        assert!(matches!(
            users.list(Some("userName sw bob"), &AttributeFilter::default()).await,
            Err(AppError::MalformedFilter(_))
        ));
    }
}
