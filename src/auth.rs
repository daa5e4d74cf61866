use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose, Engine as _};
use std::sync::Arc;
use tracing::warn;

use crate::config::{AppConfig, AuthConfig, AuthType};
use crate::error::scim_error_response;

/// Authentication middleware for SCIM endpoints
pub async fn auth_middleware(
    State(app_config): State<Arc<AppConfig>>,
    request: Request,
    next: Next,
) -> Response {
    // non-SCIM endpoints stay open
    let path = request.uri().path();
    if path == "/" || path == "/health" {
        return next.run(request).await;
    }

    let auth = &app_config.scim.auth;
    if authenticate(auth, request.headers()) {
        return next.run(request).await;
    }

    warn!(path, auth_type = ?auth.auth_type, "rejected unauthenticated request");
    unauthorized(auth.auth_type)
}

fn unauthorized(auth_type: AuthType) -> Response {
    let mut response =
        scim_error_response(StatusCode::UNAUTHORIZED, "", "Authentication required").into_response();
    let challenge = match auth_type {
        AuthType::Basic => "Basic realm=\"SCIM\"",
        _ => "Bearer",
    };
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(challenge));
    response
}

/// Whether the request's Authorization header satisfies `auth`
pub fn authenticate(auth: &AuthConfig, headers: &HeaderMap) -> bool {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match auth.auth_type {
        AuthType::Unauthenticated => true,
        AuthType::Bearer => match (auth_header, auth.token.as_deref()) {
            (Some(value), Some(expected)) => value
                .strip_prefix("Bearer ")
                .map_or(false, |provided| provided == expected),
            _ => false,
        },
        AuthType::Basic => match (auth_header, auth.basic.as_ref()) {
            (Some(value), Some(basic)) => decode_basic(value).map_or(false, |(user, pass)| {
                user == basic.username && pass == basic.password
            }),
            _ => false,
        },
    }
}

fn decode_basic(value: &str) -> Option<(String, String)> {
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = general_purpose::STANDARD.decode(encoded.trim()).ok()?;
    let credentials = String::from_utf8(decoded).ok()?;
    let (user, pass) = credentials.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}
