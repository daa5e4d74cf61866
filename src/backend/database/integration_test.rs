//! Store contract tests against an in-memory SQLite backend

use std::time::Duration;

use super::{DatabaseBackendConfig, SqliteBackend};
use crate::backend::{Backend, GroupBackend, GroupPredicate, UserBackend, UserPredicate};
use crate::error::AppError;
use crate::models::{Email, Group, Member, Name, User};

async fn backend() -> SqliteBackend {
    let backend = SqliteBackend::connect(&DatabaseBackendConfig::memory_sqlite())
        .await
        .unwrap();
    backend.init_schema().await.unwrap();
    backend
}

fn sample_user(user_name: &str) -> User {
    let mut user = User::new(user_name);
    user.external_id = Some(format!("ext-{}", user_name));
    user.name = Some(Name {
        given_name: Some("Given".to_string()),
        family_name: Some("Family".to_string()),
    });
    user.emails = Some(vec![
        Email {
            value: format!("{}@example.com", user_name),
            type_: Some("work".to_string()),
            primary: Some(true),
        },
        Email {
            value: format!("{}@home.example", user_name),
            type_: Some("home".to_string()),
            primary: None,
        },
    ]);
    user
}

#[tokio::test]
async fn test_create_then_get_round_trips() {
    let backend = backend().await;
    let created = backend.create_user(&sample_user("alice")).await.unwrap();
    let id = created.id.clone().unwrap();

    let fetched = backend.find_user_by_id(&id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_duplicate_username_is_rejected_by_store() {
    let backend = backend().await;
    backend.create_user(&User::new("alice")).await.unwrap();

    let result = backend.create_user(&User::new("alice")).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(backend.find_all_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_find_all_is_newest_first() {
    let backend = backend().await;
    for name in ["first", "second", "third"] {
        backend.create_user(&User::new(name)).await.unwrap();
    }

    let names: Vec<String> = backend
        .find_all_users()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.user_name)
        .collect();
    assert_eq!(names, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_username_lookup_is_exact() {
    let backend = backend().await;
    backend.create_user(&User::new("bob")).await.unwrap();
    backend.create_user(&User::new("bobby")).await.unwrap();

    let found = backend.find_user_by_username("bob").await.unwrap().unwrap();
    assert_eq!(found.user_name, "bob");
    assert!(backend.find_user_by_username("bo").await.unwrap().is_none());
    assert!(backend.find_user_by_username("BOB").await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_users_by_predicate() {
    let backend = backend().await;
    let mut inactive = sample_user("carol");
    inactive.active = false;
    backend.create_user(&inactive).await.unwrap();
    backend.create_user(&sample_user("dave")).await.unwrap();

    let by_active = backend
        .find_users_by_predicate(&UserPredicate::Active(false))
        .await
        .unwrap();
    assert_eq!(by_active.len(), 1);
    assert_eq!(by_active[0].user_name, "carol");

    let by_external = backend
        .find_users_by_predicate(&UserPredicate::ExternalId("ext-dave".to_string()))
        .await
        .unwrap();
    assert_eq!(by_external.len(), 1);
    assert_eq!(by_external[0].user_name, "dave");
}

#[tokio::test]
async fn test_update_replaces_and_refreshes_meta() {
    let backend = backend().await;
    let created = backend.create_user(&sample_user("erin")).await.unwrap();
    let created_meta = created.meta.clone().unwrap();

    let mut replacement = User::new("erin");
    replacement.id = created.id.clone();
    let updated = backend.update_user(&replacement).await.unwrap();

    // full replace, not merge
    assert!(updated.emails.is_none());
    let meta = updated.meta.clone().unwrap();
    assert_eq!(meta.created, created_meta.created);
    assert_eq!(meta.location, created_meta.location);
    assert!(meta.last_modified > created_meta.last_modified);

    let fetched = backend
        .find_user_by_id(created.id.as_deref().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn test_update_requires_existing_user() {
    let backend = backend().await;
    let mut ghost = User::new("ghost");
    ghost.id = Some("missing".to_string());

    assert!(matches!(
        backend.update_user(&ghost).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_update_into_taken_username_conflicts() {
    let backend = backend().await;
    backend.create_user(&User::new("taken")).await.unwrap();
    let mut other = backend.create_user(&User::new("other")).await.unwrap();

    other.user_name = "taken".to_string();
    assert!(matches!(
        backend.update_user(&other).await,
        Err(AppError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_delete_user_is_idempotent() {
    let backend = backend().await;
    let created = backend.create_user(&User::new("frank")).await.unwrap();
    let id = created.id.unwrap();

    assert!(backend.delete_user(&id).await.unwrap());
    assert!(!backend.delete_user(&id).await.unwrap());
    assert!(backend.find_user_by_id(&id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_group_round_trip_preserves_member_order() {
    let backend = backend().await;
    let mut group = Group::new("Engineering");
    group.members = vec![Member::new("c"), Member::new("a"), Member::new("b")];

    let created = backend.create_group(&group).await.unwrap();
    let fetched = backend
        .find_group_by_id(created.id.as_deref().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.members[0].value, "c");
}

#[tokio::test]
async fn test_deleted_group_is_hidden_and_name_reusable() {
    let backend = backend().await;
    let first = backend.create_group(&Group::new("Sales")).await.unwrap();
    let first_id = first.id.unwrap();

    assert!(matches!(
        backend.create_group(&Group::new("Sales")).await,
        Err(AppError::Conflict(_))
    ));

    assert!(backend.delete_group(&first_id).await.unwrap());
    assert!(!backend.delete_group(&first_id).await.unwrap());
    assert!(backend.find_group_by_id(&first_id).await.unwrap().is_none());
    assert!(backend
        .find_group_by_display_name("Sales")
        .await
        .unwrap()
        .is_none());

    let second = backend.create_group(&Group::new("Sales")).await.unwrap();
    assert_ne!(second.id.as_deref(), Some(first_id.as_str()));
    assert_eq!(backend.find_all_groups().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_deleted_group_cannot_be_updated() {
    let backend = backend().await;
    let group = backend.create_group(&Group::new("Temp")).await.unwrap();
    backend
        .delete_group(group.id.as_deref().unwrap())
        .await
        .unwrap();

    assert!(matches!(
        backend.update_group(&group).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_find_groups_by_predicate() {
    let backend = backend().await;
    let mut group = Group::new("Support");
    group.external_id = Some("ext-support".to_string());
    backend.create_group(&group).await.unwrap();
    backend.create_group(&Group::new("Support Tier 2")).await.unwrap();

    let by_name = backend
        .find_groups_by_predicate(&GroupPredicate::DisplayName("Support".to_string()))
        .await
        .unwrap();
    assert_eq!(by_name.len(), 1);

    let by_external = backend
        .find_groups_by_predicate(&GroupPredicate::ExternalId("ext-support".to_string()))
        .await
        .unwrap();
    assert_eq!(by_external[0].display_name, "Support");
}

#[tokio::test]
async fn test_file_backed_database_persists_across_connections() {
    let path = std::env::temp_dir().join(format!("scim-store-{}.db", uuid::Uuid::new_v4()));
    let url = format!("sqlite:{}", path.display());

    let id = {
        let backend = SqliteBackend::connect(&DatabaseBackendConfig::sqlite(url.clone()))
            .await
            .unwrap();
        backend.init_schema().await.unwrap();
        let created = backend.create_user(&User::new("persisted")).await.unwrap();
        backend.cleanup().await.unwrap();
        created.id.unwrap()
    };

    let backend = SqliteBackend::connect(&DatabaseBackendConfig::sqlite(url))
        .await
        .unwrap();
    backend.init_schema().await.unwrap();
    let found = backend.find_user_by_id(&id).await.unwrap();
    assert_eq!(found.map(|u| u.user_name), Some("persisted".to_string()));

    backend.cleanup().await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    let _ = std::fs::remove_file(path);
}
