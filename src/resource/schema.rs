use axum::extract::State;
use serde_json::Value;

use super::{ok, AppState, HandlerResult};
use crate::error::AppError;
use crate::provisioning::ResourceAssembler;
use crate::schema::get_all_schemas;

/// `/Schemas`: User, Group and EnterpriseUser in a list envelope
pub async fn schemas(State((scim, _)): State<AppState>) -> HandlerResult {
    let resources: Vec<Value> = get_all_schemas()
        .into_iter()
        .map(|schema| schema.to_resource(scim.assembler.base_path()))
        .collect();

    let body = serde_json::to_value(ResourceAssembler::list(resources))
        .map_err(|e| AppError::from(e).to_response())?;
    ok(body)
}
