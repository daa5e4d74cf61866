use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::Value;
use std::collections::HashMap;

use super::{attribute_filter, created, ok, parse_body, AppState, HandlerResult};
use crate::error::AppError;
use crate::extractors::ScimJson;
use crate::models::{ScimPatchOp, User};
use crate::provisioning::AttributeFilter;

pub async fn create_user(
    State((scim, _)): State<AppState>,
    ScimJson(payload): ScimJson<Value>,
) -> HandlerResult {
    let user: User = parse_body(payload, "user")?;
    let created_user = scim.users.create(user).await.map_err(|e| e.to_response())?;
    let body = scim
        .assembler
        .user(&created_user, &AttributeFilter::default())
        .map_err(|e| e.to_response())?;
    created(body)
}

pub async fn get_user(
    State((scim, _)): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> HandlerResult {
    let user = scim.users.get(&id).await.map_err(|e| e.to_response())?;
    let body = scim
        .assembler
        .user(&user, &attribute_filter(&params))
        .map_err(|e| e.to_response())?;
    ok(body)
}

pub async fn search_users(
    State((scim, _)): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> HandlerResult {
    let list = scim
        .users
        .list(params.get("filter").map(String::as_str), &attribute_filter(&params))
        .await
        .map_err(|e| e.to_response())?;
    let body = serde_json::to_value(list).map_err(|e| AppError::from(e).to_response())?;
    ok(body)
}

pub async fn update_user(
    State((scim, _)): State<AppState>,
    Path(id): Path<String>,
    ScimJson(payload): ScimJson<Value>,
) -> HandlerResult {
    let user: User = parse_body(payload, "user")?;
    let updated = scim.users.replace(&id, user).await.map_err(|e| e.to_response())?;
    let body = scim
        .assembler
        .user(&updated, &AttributeFilter::default())
        .map_err(|e| e.to_response())?;
    ok(body)
}

pub async fn patch_user(
    State((scim, _)): State<AppState>,
    Path(id): Path<String>,
    ScimJson(patch): ScimJson<ScimPatchOp>,
) -> HandlerResult {
    let updated = scim.users.patch(&id, &patch).await.map_err(|e| e.to_response())?;
    let body = scim
        .assembler
        .user(&updated, &AttributeFilter::default())
        .map_err(|e| e.to_response())?;
    ok(body)
}

/// Always 204, whether or not the user existed
pub async fn delete_user(
    State((scim, _)): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, super::ScimErrorResponse> {
    scim.users.delete(&id).await.map_err(|e| e.to_response())?;
    Ok(StatusCode::NO_CONTENT)
}
