use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::scim_error_response;

pub const SCIM_CONTENT_TYPE: &str = "application/scim+json; charset=utf-8";

/// JSON body extractor accepting both application/json and application/scim+json
/// (RFC 7644 section 3.1)
pub struct ScimJson<T>(pub T);

impl<T, S> FromRequest<S> for ScimJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ScimJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(content_type) = req.headers().get(header::CONTENT_TYPE) {
            let media_type = content_type
                .to_str()
                .map_err(|_| ScimJsonRejection::InvalidContentType)?
                .split(';')
                .next()
                .unwrap_or("")
                .trim()
                .to_ascii_lowercase();

            if media_type != "application/json" && media_type != "application/scim+json" {
                return Err(ScimJsonRejection::InvalidContentType);
            }
        }

        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| ScimJson(value))
            .map_err(ScimJsonRejection::JsonRejection)
    }
}

#[derive(Debug)]
pub enum ScimJsonRejection {
    InvalidContentType,
    JsonRejection(JsonRejection),
}

impl IntoResponse for ScimJsonRejection {
    fn into_response(self) -> Response {
        let detail = match self {
            ScimJsonRejection::InvalidContentType => {
                "Content-Type must be application/json or application/scim+json".to_string()
            }
            ScimJsonRejection::JsonRejection(rejection) => format!("Invalid JSON: {}", rejection),
        };
        scim_error_response(StatusCode::BAD_REQUEST, "invalidSyntax", &detail).into_response()
    }
}

/// Wraps a handler result so it goes out as `application/scim+json`
pub fn scim_response(status: StatusCode, body: serde_json::Value) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(SCIM_CONTENT_TYPE),
    );
    response
}
