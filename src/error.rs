use axum::{http::StatusCode, Json};
use serde_json::json;
use std::fmt;
use tracing::error;

#[derive(Debug)]
pub enum AppError {
    /// A unique attribute is already taken
    Conflict(String),
    NotFound(String),
    MalformedFilter(String),
    UnsupportedPath(String),
    UnsupportedOperation(String),
    /// A nested patch path whose parent object does not exist
    NoTarget(String),
    InvalidValue(String),
    Database(String),
    Serialization(serde_json::Error),
    Configuration(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Conflict(e) => write!(f, "Conflict: {}", e),
            AppError::NotFound(e) => write!(f, "Not found: {}", e),
            AppError::MalformedFilter(e) => write!(f, "Malformed filter: {}", e),
            AppError::UnsupportedPath(e) => write!(f, "Unsupported patch path: {}", e),
            AppError::UnsupportedOperation(e) => write!(f, "Unsupported patch operation: {}", e),
            AppError::NoTarget(e) => write!(f, "No target: {}", e),
            AppError::InvalidValue(e) => write!(f, "Invalid value: {}", e),
            AppError::Database(e) => write!(f, "Database error: {}", e),
            AppError::Serialization(e) => write!(f, "Serialization error: {}", e),
            AppError::Configuration(e) => write!(f, "Configuration error: {}", e),
            AppError::Internal(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

// SCIM 2.0 standard error response helper
pub fn scim_error_response(
    status_code: StatusCode,
    scim_type: &str,
    detail: &str,
) -> (StatusCode, Json<serde_json::Value>) {
    let status_str = status_code.as_u16().to_string();
    let mut body = json!({
        "schemas": ["urn:ietf:params:scim:api:messages:2.0:Error"],
        "detail": detail,
        "status": status_str,
    });
    if !scim_type.is_empty() {
        body["scimType"] = json!(scim_type);
    }
    (status_code, Json(body))
}

impl AppError {
    /// HTTP status and SCIM `scimType` for this error
    pub fn status_and_scim_type(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Conflict(_) => (StatusCode::CONFLICT, "uniqueness"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ""),
            AppError::MalformedFilter(_) => (StatusCode::BAD_REQUEST, "invalidFilter"),
            AppError::UnsupportedPath(_) => (StatusCode::BAD_REQUEST, "invalidPath"),
            AppError::UnsupportedOperation(_) => (StatusCode::BAD_REQUEST, "invalidSyntax"),
            AppError::NoTarget(_) => (StatusCode::BAD_REQUEST, "noTarget"),
            AppError::InvalidValue(_) => (StatusCode::BAD_REQUEST, "invalidValue"),
            AppError::Database(_)
            | AppError::Serialization(_)
            | AppError::Configuration(_)
            | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, ""),
        }
    }

    pub fn to_response(&self) -> (StatusCode, Json<serde_json::Value>) {
        let (status, scim_type) = self.status_and_scim_type();
        if status.is_server_error() {
            error!("{}", self);
        }
        scim_error_response(status, scim_type, &self.to_string())
    }
}
