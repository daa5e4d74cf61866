use lazy_static::lazy_static;
use serde_json::Value;

use super::{optional_string, required_string, typed_list, PatchTable};
use crate::error::{AppError, AppResult};
use crate::models::{Group, Member};
use crate::parser::{PatchOpKind, ResourceType};

lazy_static! {
    pub static ref GROUP_PATCH_TABLE: PatchTable<Group> = group_patch_table();
}

fn group_patch_table() -> PatchTable<Group> {
    use PatchOpKind::{Add, Remove, Replace};

    PatchTable::new(ResourceType::Group)
        .register(Replace, "displayName", replace_display_name)
        .register(Replace, "externalId", replace_external_id)
        .register(Replace, "members", replace_members)
        .register(Add, "externalId", add_external_id)
        .register(Add, "members", add_members)
        .register(Remove, "members", remove_members)
}

fn members(value: &Value) -> AppResult<Vec<Member>> {
    match value {
        Value::Null => Ok(Vec::new()),
        other => typed_list("members", other),
    }
}

fn replace_display_name(group: &mut Group, value: &Value) -> AppResult<()> {
    group.display_name = required_string("displayName", value)?;
    Ok(())
}

fn replace_external_id(group: &mut Group, value: &Value) -> AppResult<()> {
    group.external_id = optional_string("externalId", value)?;
    Ok(())
}

fn replace_members(group: &mut Group, value: &Value) -> AppResult<()> {
    group.members = members(value)?;
    Ok(())
}

fn add_external_id(group: &mut Group, value: &Value) -> AppResult<()> {
    if group.external_id.is_none() {
        group.external_id = optional_string("externalId", value)?;
    }
    Ok(())
}

fn add_members(group: &mut Group, value: &Value) -> AppResult<()> {
    group.members.extend(members(value)?);
    Ok(())
}

/// Drops every member whose value matches, keeping the order of the rest
fn remove_members(group: &mut Group, value: &Value) -> AppResult<()> {
    if value.is_null() {
        return Err(AppError::InvalidValue(
            "remove members requires the members to remove".to_string(),
        ));
    }
    let doomed: Vec<String> = typed_list::<Member>("members", value)?
        .into_iter()
        .map(|m| m.value)
        .collect();
    group.members.retain(|m| !doomed.contains(&m.value));
    Ok(())
}
