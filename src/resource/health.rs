use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use super::{AppState, ScimErrorResponse};
use crate::error::scim_error_response;

pub async fn health(State((scim, _)): State<AppState>) -> Result<Json<Value>, ScimErrorResponse> {
    match scim.backend().health_check().await {
        Ok(()) => Ok(Json(json!({"status": "ok"}))),
        Err(e) => {
            tracing::error!("health check failed: {}", e);
            Err(scim_error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "",
                "storage backend unavailable",
            ))
        }
    }
}
