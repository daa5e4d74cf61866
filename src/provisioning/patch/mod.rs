//! Patch operation engine.
//!
//! Each resource type owns a dispatch table keyed by (op, path). Operations
//! run in order against a scratch copy; the caller only receives the result
//! when every operation succeeded, so a failed request never leaks partial
//! state into the store.

mod group;
mod user;

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::{Group, ScimPatchOp, ScimPatchOperation, User};
use crate::parser::{PatchOpKind, PatchPath, ResourceType};

pub use group::GROUP_PATCH_TABLE;
pub use user::USER_PATCH_TABLE;

/// Typed mutation applied for one (op, path) pair
pub type Setter<R> = fn(&mut R, &Value) -> AppResult<()>;

pub struct PatchTable<R> {
    resource_type: ResourceType,
    handlers: HashMap<(PatchOpKind, String), Setter<R>>,
}

impl<R: Clone> PatchTable<R> {
    pub fn new(resource_type: ResourceType) -> Self {
        Self {
            resource_type,
            handlers: HashMap::new(),
        }
    }

    /// Register a handler. Paths match case-insensitively.
    ///
    /// Panics on a duplicate registration; tables are built once at startup.
    pub fn register(mut self, op: PatchOpKind, path: &str, setter: Setter<R>) -> Self {
        let key = (op, path.to_ascii_lowercase());
        assert!(
            !self.handlers.contains_key(&key),
            "duplicate {} handler for {} path {}",
            op,
            self.resource_type,
            path
        );
        self.handlers.insert(key, setter);
        self
    }

    fn handler(&self, op: PatchOpKind, path: &PatchPath) -> Option<&Setter<R>> {
        self.handlers.get(&(op, path.as_str().to_ascii_lowercase()))
    }

    #[cfg(test)]
    pub(crate) fn supports(&self, op: PatchOpKind, path: &str) -> bool {
        self.handler(op, &PatchPath::parse(path)).is_some()
    }

    /// Apply `operations` in order to a copy of `resource`
    pub fn apply(&self, resource: &R, operations: &[ScimPatchOperation]) -> AppResult<R> {
        let mut scratch = resource.clone();

        for (index, operation) in operations.iter().enumerate() {
            let op: PatchOpKind = operation.op.parse()?;
            let path = operation
                .path
                .as_deref()
                .map(PatchPath::parse)
                .ok_or_else(|| {
                    AppError::UnsupportedPath(format!("{} operation without a path", op))
                })?;

            let setter = self.handler(op, &path).ok_or_else(|| {
                AppError::UnsupportedPath(format!(
                    "{} does not support {} on '{}'",
                    self.resource_type, op, path
                ))
            })?;

            debug!(index, %op, %path, resource_type = %self.resource_type, "applying patch operation");
            setter(&mut scratch, operation.value.as_ref().unwrap_or(&Value::Null))?;
        }

        Ok(scratch)
    }
}

pub struct PatchEngine;

impl PatchEngine {
    pub fn apply_to_user(user: &User, patch: &ScimPatchOp) -> AppResult<User> {
        USER_PATCH_TABLE.apply(user, &patch.operations)
    }

    pub fn apply_to_group(group: &Group, patch: &ScimPatchOp) -> AppResult<Group> {
        GROUP_PATCH_TABLE.apply(group, &patch.operations)
    }
}

pub(crate) fn string_value(path: &str, value: &Value) -> AppResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(AppError::InvalidValue(format!(
            "{} expects a string value",
            path
        ))),
    }
}

pub(crate) fn required_string(path: &str, value: &Value) -> AppResult<String> {
    let s = string_value(path, value)?;
    if s.trim().is_empty() {
        return Err(AppError::InvalidValue(format!("{} cannot be empty", path)));
    }
    Ok(s)
}

pub(crate) fn optional_string(path: &str, value: &Value) -> AppResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        other => string_value(path, other).map(Some),
    }
}

/// JSON booleans pass through; strings are true only for "true"
pub(crate) fn bool_value(path: &str, value: &Value) -> AppResult<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => Ok(s.eq_ignore_ascii_case("true")),
        _ => Err(AppError::InvalidValue(format!(
            "{} expects a boolean value",
            path
        ))),
    }
}

pub(crate) fn typed<T: DeserializeOwned>(path: &str, value: &Value) -> AppResult<T> {
    serde_json::from_value(value.clone())
        .map_err(|e| AppError::InvalidValue(format!("{}: {}", path, e)))
}

pub(crate) fn optional_typed<T: DeserializeOwned>(path: &str, value: &Value) -> AppResult<Option<T>> {
    match value {
        Value::Null => Ok(None),
        other => typed(path, other).map(Some),
    }
}

/// Accepts an array or a single element
pub(crate) fn typed_list<T: DeserializeOwned>(path: &str, value: &Value) -> AppResult<Vec<T>> {
    match value {
        Value::Array(_) => typed(path, value),
        Value::Object(_) => typed(path, value).map(|single| vec![single]),
        _ => Err(AppError::InvalidValue(format!(
            "{} expects an array of objects",
            path
        ))),
    }
}

pub(crate) fn optional_list<T: DeserializeOwned>(
    path: &str,
    value: &Value,
) -> AppResult<Option<Vec<T>>> {
    match value {
        Value::Null => Ok(None),
        other => typed_list(path, other).map(Some),
    }
}

/// Unset means absent or an empty list
pub(crate) fn is_unset<T>(list: &Option<Vec<T>>) -> bool {
    list.as_ref().map_or(true, |items| items.is_empty())
}
