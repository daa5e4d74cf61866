use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::Value;
use std::collections::HashMap;

use super::{attribute_filter, created, ok, parse_body, AppState, HandlerResult};
use crate::error::AppError;
use crate::extractors::ScimJson;
use crate::models::{Group, ScimPatchOp};
use crate::provisioning::AttributeFilter;

pub async fn create_group(
    State((scim, _)): State<AppState>,
    ScimJson(payload): ScimJson<Value>,
) -> HandlerResult {
    let group: Group = parse_body(payload, "group")?;
    let created_group = scim.groups.create(group).await.map_err(|e| e.to_response())?;
    let body = scim
        .assembler
        .group(&created_group, &AttributeFilter::default())
        .map_err(|e| e.to_response())?;
    created(body)
}

pub async fn get_group(
    State((scim, _)): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> HandlerResult {
    let group = scim.groups.get(&id).await.map_err(|e| e.to_response())?;
    let body = scim
        .assembler
        .group(&group, &attribute_filter(&params))
        .map_err(|e| e.to_response())?;
    ok(body)
}

pub async fn search_groups(
    State((scim, _)): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> HandlerResult {
    let list = scim
        .groups
        .list(params.get("filter").map(String::as_str), &attribute_filter(&params))
        .await
        .map_err(|e| e.to_response())?;
    let body = serde_json::to_value(list).map_err(|e| AppError::from(e).to_response())?;
    ok(body)
}

pub async fn update_group(
    State((scim, _)): State<AppState>,
    Path(id): Path<String>,
    ScimJson(payload): ScimJson<Value>,
) -> HandlerResult {
    let group: Group = parse_body(payload, "group")?;
    let updated = scim.groups.replace(&id, group).await.map_err(|e| e.to_response())?;
    let body = scim
        .assembler
        .group(&updated, &AttributeFilter::default())
        .map_err(|e| e.to_response())?;
    ok(body)
}

pub async fn patch_group(
    State((scim, _)): State<AppState>,
    Path(id): Path<String>,
    ScimJson(patch): ScimJson<ScimPatchOp>,
) -> HandlerResult {
    let updated = scim.groups.patch(&id, &patch).await.map_err(|e| e.to_response())?;
    let body = scim
        .assembler
        .group(&updated, &AttributeFilter::default())
        .map_err(|e| e.to_response())?;
    ok(body)
}

/// Always 204; the group is only marked deleted
pub async fn delete_group(
    State((scim, _)): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, super::ScimErrorResponse> {
    scim.groups.delete(&id).await.map_err(|e| e.to_response())?;
    Ok(StatusCode::NO_CONTENT)
}
