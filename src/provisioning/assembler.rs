//! Resource Assembler: single-resource and list envelopes.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::models::{Group, ScimListResponse, User, LIST_RESPONSE_SCHEMA};
use crate::parser::ResourceType;
use crate::schema::{find_attribute, schema_for, Returned};

pub const DEFAULT_START_INDEX: i64 = 1;
pub const DEFAULT_ITEMS_PER_PAGE: i64 = 20;

/// Keys present in every envelope regardless of the request
const ENVELOPE_KEYS: [&str; 3] = ["id", "schemas", "meta"];

/// `attributes` / `excludedAttributes` query parameters (RFC 7644 section 3.4.2.5),
/// applied to top-level attributes only
#[derive(Debug, Clone, Default)]
pub struct AttributeFilter {
    pub attributes: Option<Vec<String>>,
    pub excluded_attributes: Option<Vec<String>>,
}

fn split_attribute_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl AttributeFilter {
    pub fn from_params(attributes: Option<&str>, excluded_attributes: Option<&str>) -> Self {
        Self {
            attributes: attributes.map(split_attribute_list),
            excluded_attributes: excluded_attributes.map(split_attribute_list),
        }
    }

    pub fn excluding(attributes: &[&str]) -> Self {
        Self {
            attributes: None,
            excluded_attributes: Some(attributes.iter().map(|a| a.to_string()).collect()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_none() && self.excluded_attributes.is_none()
    }

    fn always_returned(key: &str, resource_type: ResourceType) -> bool {
        ENVELOPE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
            || find_attribute(schema_for(resource_type), key)
                .map_or(false, |attr| attr.returned == Returned::Always)
    }

    fn listed(list: &[String], key: &str) -> bool {
        list.iter().any(|name| name.eq_ignore_ascii_case(key))
    }

    /// Drops suppressed keys from an envelope. Attributes that are always
    /// returned survive both parameters.
    pub fn apply_to_resource(&self, resource: Value, resource_type: ResourceType) -> Value {
        let object = match resource {
            Value::Object(object) if !self.is_empty() => object,
            other => return other,
        };

        let kept: Map<String, Value> = object
            .into_iter()
            .filter(|(key, _)| {
                if Self::always_returned(key, resource_type) {
                    return true;
                }
                if let Some(ref included) = self.attributes {
                    return Self::listed(included, key);
                }
                !self
                    .excluded_attributes
                    .as_deref()
                    .map_or(false, |excluded| Self::listed(excluded, key))
            })
            .collect();

        Value::Object(kept)
    }
}

/// Shapes stored resources into outbound SCIM documents
#[derive(Debug, Clone, Default)]
pub struct ResourceAssembler {
    base_path: String,
}

impl ResourceAssembler {
    /// `base_path` is the route prefix, e.g. `/scim/v2`; an empty prefix serves from the root
    pub fn new(base_path: impl Into<String>) -> Self {
        let base_path: String = base_path.into();
        Self {
            base_path: base_path.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Externally visible location for a stored `/<Users|Groups>/<id>` location
    pub fn location_of(&self, stored_location: &str) -> String {
        format!("{}{}", self.base_path, stored_location)
    }

    pub fn user(&self, user: &User, filter: &AttributeFilter) -> AppResult<Value> {
        self.envelope(user, user.schemas(), ResourceType::User, filter)
    }

    pub fn group(&self, group: &Group, filter: &AttributeFilter) -> AppResult<Value> {
        self.envelope(group, group.schemas(), ResourceType::Group, filter)
    }

    pub fn user_list(&self, users: &[User], filter: &AttributeFilter) -> AppResult<ScimListResponse> {
        let resources = users
            .iter()
            .map(|user| self.user(user, filter))
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Self::list(resources))
    }

    pub fn group_list(&self, groups: &[Group], filter: &AttributeFilter) -> AppResult<ScimListResponse> {
        let resources = groups
            .iter()
            .map(|group| self.group(group, filter))
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Self::list(resources))
    }

    /// List envelope with the default paging values; every match is returned
    pub fn list(resources: Vec<Value>) -> ScimListResponse {
        ScimListResponse {
            schemas: vec![LIST_RESPONSE_SCHEMA.to_string()],
            total_results: resources.len() as i64,
            start_index: DEFAULT_START_INDEX,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            resources,
        }
    }

    fn envelope<T: Serialize>(
        &self,
        resource: &T,
        schemas: Vec<String>,
        resource_type: ResourceType,
        filter: &AttributeFilter,
    ) -> AppResult<Value> {
        let mut value = serde_json::to_value(resource)?;
        let object = value.as_object_mut().ok_or_else(|| {
            AppError::Internal(format!("{} did not serialize to an object", resource_type))
        })?;

        object.insert("schemas".to_string(), Value::from(schemas));

        if let Some(Value::Object(meta)) = object.get_mut("meta") {
            if let Some(Value::String(location)) = meta.get_mut("location") {
                *location = self.location_of(location);
            }
        }

        Ok(filter.apply_to_resource(value, resource_type))
    }
}
