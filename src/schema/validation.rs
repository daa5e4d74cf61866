use crate::error::{AppError, AppResult};
use crate::models::{Group, User};

/// At most one element of a multi-valued attribute may be primary
pub fn validate_primary_constraint<T>(
    attribute: &str,
    values: Option<&[T]>,
    is_primary: impl Fn(&T) -> bool,
) -> AppResult<()> {
    let primary_count = values
        .unwrap_or_default()
        .iter()
        .filter(|v| is_primary(v))
        .count();

    if primary_count > 1 {
        return Err(AppError::InvalidValue(format!(
            "At most one element of {} can have primary=true",
            attribute
        )));
    }

    Ok(())
}

pub fn validate_user(user: &User) -> AppResult<()> {
    if user.user_name.trim().is_empty() {
        return Err(AppError::InvalidValue("userName is required".to_string()));
    }

    validate_primary_constraint("emails", user.emails.as_deref(), |e| {
        e.primary == Some(true)
    })?;
    validate_primary_constraint("phoneNumbers", user.phone_numbers.as_deref(), |p| {
        p.primary == Some(true)
    })?;
    validate_primary_constraint("addresses", user.addresses.as_deref(), |a| {
        a.primary == Some(true)
    })?;

    Ok(())
}

pub fn validate_group(group: &Group) -> AppResult<()> {
    if group.display_name.trim().is_empty() {
        return Err(AppError::InvalidValue("displayName is required".to_string()));
    }

    if let Some(member) = group.members.iter().find(|m| m.value.trim().is_empty()) {
        return Err(AppError::InvalidValue(format!(
            "member value is required (display: {})",
            member.display.as_deref().unwrap_or("-")
        )));
    }

    Ok(())
}
