//! Row encoding shared by every database adapter.
//!
//! The resource body is stored as JSON text without `id` and `meta`; both are
//! rebuilt from their dedicated columns on the way back out.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::Meta;
use crate::parser::ResourceType;
use crate::utils::{format_scim_datetime, parse_scim_datetime};

/// Raw columns of one resource row
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub id: String,
    pub data: String,
    pub created_at: String,
    pub updated_at: String,
}

impl StoredRecord {
    pub fn meta(&self, resource_type: ResourceType) -> AppResult<Meta> {
        let created = parse_scim_datetime(&self.created_at)
            .map_err(|e| AppError::Database(format!("Corrupt created_at for {}: {}", self.id, e)))?;
        let last_modified = parse_scim_datetime(&self.updated_at)
            .map_err(|e| AppError::Database(format!("Corrupt updated_at for {}: {}", self.id, e)))?;

        Ok(Meta {
            resource_type: resource_type.to_string(),
            created,
            last_modified,
            location: resource_type.location(&self.id),
        })
    }

    pub fn body<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_str(&self.data).map_err(AppError::Serialization)
    }
}

/// Serialize a resource body for the `data` column
pub fn encode_body<T: Serialize>(resource: &T) -> AppResult<String> {
    let mut value = serde_json::to_value(resource).map_err(AppError::Serialization)?;
    if let Some(object) = value.as_object_mut() {
        object.remove("id");
        object.remove("meta");
    }
    serde_json::to_string(&value).map_err(AppError::Serialization)
}

/// Column representation of a timestamp
pub fn encode_timestamp(meta: &Meta) -> (String, String) {
    (
        format_scim_datetime(meta.created),
        format_scim_datetime(meta.last_modified),
    )
}
