use lazy_static::lazy_static;
use serde_json::Value;

use super::{
    bool_value, is_unset, optional_list, optional_string, optional_typed, required_string,
    typed, PatchTable,
};
use crate::error::{AppError, AppResult};
use crate::models::{EnterpriseExtension, Manager, Name, User};
use crate::parser::{PatchOpKind, ResourceType};

lazy_static! {
    pub static ref USER_PATCH_TABLE: PatchTable<User> = user_patch_table();
}

fn user_patch_table() -> PatchTable<User> {
    use PatchOpKind::{Add, Replace};

    PatchTable::new(ResourceType::User)
        .register(Replace, "userName", replace_user_name)
        .register(Replace, "externalId", replace_external_id)
        .register(Replace, "active", replace_active)
        .register(Replace, "name", replace_name)
        .register(Replace, "name/givenName", replace_given_name)
        .register(Replace, "name/familyName", replace_family_name)
        .register(Replace, "emails", replace_emails)
        .register(Replace, "phoneNumbers", replace_phone_numbers)
        .register(Replace, "addresses", replace_addresses)
        .register(Replace, "enterpriseExtension", replace_enterprise)
        .register(Replace, "enterpriseExtension/employeeNumber", replace_employee_number)
        .register(Replace, "enterpriseExtension/costCenter", replace_cost_center)
        .register(Replace, "enterpriseExtension/organization", replace_organization)
        .register(Replace, "enterpriseExtension/division", replace_division)
        .register(Replace, "enterpriseExtension/department", replace_department)
        .register(Replace, "enterpriseExtension/manager", replace_manager)
        .register(Add, "externalId", add_external_id)
        .register(Add, "name", add_name)
        .register(Add, "emails", add_emails)
        .register(Add, "phoneNumbers", add_phone_numbers)
        .register(Add, "addresses", add_addresses)
        .register(Add, "enterpriseExtension", add_enterprise)
}

fn replace_user_name(user: &mut User, value: &Value) -> AppResult<()> {
    user.user_name = required_string("userName", value)?;
    Ok(())
}

fn replace_external_id(user: &mut User, value: &Value) -> AppResult<()> {
    user.external_id = optional_string("externalId", value)?;
    Ok(())
}

fn replace_active(user: &mut User, value: &Value) -> AppResult<()> {
    user.active = bool_value("active", value)?;
    Ok(())
}

fn replace_name(user: &mut User, value: &Value) -> AppResult<()> {
    user.name = optional_typed("name", value)?;
    Ok(())
}

fn existing_name(user: &mut User) -> AppResult<&mut Name> {
    user.name
        .as_mut()
        .ok_or_else(|| AppError::NoTarget("user has no name to modify".to_string()))
}

fn replace_given_name(user: &mut User, value: &Value) -> AppResult<()> {
    existing_name(user)?.given_name = optional_string("name.givenName", value)?;
    Ok(())
}

fn replace_family_name(user: &mut User, value: &Value) -> AppResult<()> {
    existing_name(user)?.family_name = optional_string("name.familyName", value)?;
    Ok(())
}

fn replace_emails(user: &mut User, value: &Value) -> AppResult<()> {
    user.emails = optional_list("emails", value)?;
    Ok(())
}

fn replace_phone_numbers(user: &mut User, value: &Value) -> AppResult<()> {
    user.phone_numbers = optional_list("phoneNumbers", value)?;
    Ok(())
}

fn replace_addresses(user: &mut User, value: &Value) -> AppResult<()> {
    user.addresses = optional_list("addresses", value)?;
    Ok(())
}

fn replace_enterprise(user: &mut User, value: &Value) -> AppResult<()> {
    user.enterprise_extension = optional_typed("enterpriseExtension", value)?;
    Ok(())
}

// sub-attribute writes create the extension on demand
fn enterprise(user: &mut User) -> &mut EnterpriseExtension {
    user.enterprise_extension
        .get_or_insert_with(EnterpriseExtension::default)
}

fn replace_employee_number(user: &mut User, value: &Value) -> AppResult<()> {
    let employee_number = optional_string("employeeNumber", value)?;
    enterprise(user).employee_number = employee_number;
    Ok(())
}

fn replace_cost_center(user: &mut User, value: &Value) -> AppResult<()> {
    let cost_center = optional_string("costCenter", value)?;
    enterprise(user).cost_center = cost_center;
    Ok(())
}

fn replace_organization(user: &mut User, value: &Value) -> AppResult<()> {
    let organization = optional_string("organization", value)?;
    enterprise(user).organization = organization;
    Ok(())
}

fn replace_division(user: &mut User, value: &Value) -> AppResult<()> {
    let division = optional_string("division", value)?;
    enterprise(user).division = division;
    Ok(())
}

fn replace_department(user: &mut User, value: &Value) -> AppResult<()> {
    let department = optional_string("department", value)?;
    enterprise(user).department = department;
    Ok(())
}

/// A bare string is taken as the manager's id
fn replace_manager(user: &mut User, value: &Value) -> AppResult<()> {
    let manager = match value {
        Value::Null => None,
        Value::String(id) => Some(Manager {
            value: Some(id.clone()),
            ..Manager::default()
        }),
        other => Some(typed::<Manager>("manager", other)?),
    };
    enterprise(user).manager = manager;
    Ok(())
}

fn add_external_id(user: &mut User, value: &Value) -> AppResult<()> {
    if user.external_id.is_none() {
        user.external_id = optional_string("externalId", value)?;
    }
    Ok(())
}

fn add_name(user: &mut User, value: &Value) -> AppResult<()> {
    if user.name.is_none() {
        user.name = optional_typed("name", value)?;
    }
    Ok(())
}

fn add_emails(user: &mut User, value: &Value) -> AppResult<()> {
    if is_unset(&user.emails) {
        user.emails = optional_list("emails", value)?;
    }
    Ok(())
}

fn add_phone_numbers(user: &mut User, value: &Value) -> AppResult<()> {
    if is_unset(&user.phone_numbers) {
        user.phone_numbers = optional_list("phoneNumbers", value)?;
    }
    Ok(())
}

fn add_addresses(user: &mut User, value: &Value) -> AppResult<()> {
    if is_unset(&user.addresses) {
        user.addresses = optional_list("addresses", value)?;
    }
    Ok(())
}

fn add_enterprise(user: &mut User, value: &Value) -> AppResult<()> {
    if user.enterprise_extension.is_none() {
        user.enterprise_extension = optional_typed("enterpriseExtension", value)?;
    }
    Ok(())
}
