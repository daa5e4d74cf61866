#![allow(dead_code)]

use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;

use scim_provisioning::backend::database::DatabaseBackendConfig;
use scim_provisioning::backend::BackendFactory;
use scim_provisioning::config::{AppConfig, AuthConfig, AuthType, BasicAuthConfig};
use scim_provisioning::provisioning::ScimProvisioning;
use scim_provisioning::startup::build_router;

pub const BASE: &str = "/scim/v2";

/// Router over a fresh in-memory database
pub async fn setup_test_app(app_config: AppConfig) -> Result<Router, Box<dyn std::error::Error>> {
    let backend = BackendFactory::create(&DatabaseBackendConfig::memory_sqlite()).await?;
    let provisioning = Arc::new(ScimProvisioning::new(backend, &app_config.base_path()?));
    Ok(build_router(provisioning, Arc::new(app_config)))
}

/// Unauthenticated config served under `/scim/v2`
pub fn create_test_app_config() -> AppConfig {
    AppConfig::default_config()
}

pub fn create_bearer_app_config(token: &str) -> AppConfig {
    let mut config = AppConfig::default_config();
    config.scim.auth = AuthConfig {
        auth_type: AuthType::Bearer,
        token: Some(token.to_string()),
        basic: None,
    };
    config
}

pub fn create_basic_app_config(username: &str, password: &str) -> AppConfig {
    let mut config = AppConfig::default_config();
    config.scim.auth = AuthConfig {
        auth_type: AuthType::Basic,
        token: None,
        basic: Some(BasicAuthConfig {
            username: username.to_string(),
            password: password.to_string(),
        }),
    };
    config
}

pub fn users_url() -> String {
    format!("{}/Users", BASE)
}

pub fn groups_url() -> String {
    format!("{}/Groups", BASE)
}

pub fn create_test_user_json(username: &str, given_name: &str, family_name: &str) -> Value {
    json!({
        "schemas": ["urn:ietf:params:scim:schemas:core:2.0:User"],
        "userName": username,
        "name": {
            "givenName": given_name,
            "familyName": family_name
        },
        "emails": [{
            "value": format!("{}@example.com", username),
            "type": "work",
            "primary": true
        }],
        "active": true
    })
}

pub fn create_test_group_json(display_name: &str, member_ids: &[&str]) -> Value {
    let members: Vec<Value> = member_ids
        .iter()
        .map(|id| json!({"value": id, "type": "User"}))
        .collect();
    json!({
        "schemas": ["urn:ietf:params:scim:schemas:core:2.0:Group"],
        "displayName": display_name,
        "members": members
    })
}

pub fn patch_body(operations: Value) -> Value {
    json!({
        "schemas": ["urn:ietf:params:scim:api:messages:2.0:PatchOp"],
        "Operations": operations
    })
}
