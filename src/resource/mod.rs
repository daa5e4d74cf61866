use axum::{
    http::{header, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::extractors::scim_response;
use crate::provisioning::{AttributeFilter, ScimProvisioning};

pub mod group;
pub mod health;
pub mod schema;
pub mod user;

pub type AppState = (Arc<ScimProvisioning>, Arc<AppConfig>);

pub type ScimErrorResponse = (StatusCode, Json<Value>);
pub type HandlerResult = Result<Response, ScimErrorResponse>;

/// Decode a request body into a resource; shape errors are client errors
fn parse_body<T: DeserializeOwned>(payload: Value, resource_type: &str) -> Result<T, ScimErrorResponse> {
    serde_json::from_value(payload).map_err(|e| {
        AppError::InvalidValue(format!("Invalid {} data: {}", resource_type, e)).to_response()
    })
}

fn attribute_filter(params: &HashMap<String, String>) -> AttributeFilter {
    AttributeFilter::from_params(
        params.get("attributes").map(String::as_str),
        params.get("excludedAttributes").map(String::as_str),
    )
}

/// 201 with a Location header taken from the envelope's meta.location
fn created(body: Value) -> HandlerResult {
    let location = body["meta"]["location"]
        .as_str()
        .ok_or_else(|| AppError::Internal("created resource has no location".to_string()).to_response())
        .and_then(|location| {
            HeaderValue::from_str(location).map_err(|_| {
                AppError::Internal(format!("invalid location header {}", location)).to_response()
            })
        })?;

    let mut response = scim_response(StatusCode::CREATED, body);
    response.headers_mut().insert(header::LOCATION, location);
    Ok(response)
}

fn ok(body: Value) -> HandlerResult {
    Ok(scim_response(StatusCode::OK, body))
}
