//! Resolves a filter string against the store.
//!
//! Attributes outside the recognized set resolve to an empty result for both
//! resource types rather than an error.

use tracing::debug;

use crate::backend::{GroupPredicate, ScimBackend, UserPredicate};
use crate::error::AppResult;
use crate::models::{Group, User};
use crate::parser::{parse_filter, FilterExpression};

/// Target of a User filter
#[derive(Debug, Clone, PartialEq)]
pub enum UserLookup {
    Id(String),
    Predicate(UserPredicate),
    Unrecognized,
}

/// Target of a Group filter
#[derive(Debug, Clone, PartialEq)]
pub enum GroupLookup {
    Id(String),
    Predicate(GroupPredicate),
    Unrecognized,
}

impl UserLookup {
    pub fn from_expression(expr: &FilterExpression) -> Self {
        if expr.attribute_is("userName") {
            UserLookup::Predicate(UserPredicate::UserName(expr.value.clone()))
        } else if expr.attribute_is("externalId") {
            UserLookup::Predicate(UserPredicate::ExternalId(expr.value.clone()))
        } else if expr.attribute_is("active") {
            UserLookup::Predicate(UserPredicate::Active(expr.value_as_bool()))
        } else if expr.attribute_is("id") {
            UserLookup::Id(expr.value.clone())
        } else {
            UserLookup::Unrecognized
        }
    }
}

impl GroupLookup {
    pub fn from_expression(expr: &FilterExpression) -> Self {
        if expr.attribute_is("displayName") {
            GroupLookup::Predicate(GroupPredicate::DisplayName(expr.value.clone()))
        } else if expr.attribute_is("externalId") {
            GroupLookup::Predicate(GroupPredicate::ExternalId(expr.value.clone()))
        } else if expr.attribute_is("id") {
            GroupLookup::Id(expr.value.clone())
        } else {
            GroupLookup::Unrecognized
        }
    }
}

pub struct FilterEvaluator;

impl FilterEvaluator {
    /// Absent filter returns every user, newest first
    pub async fn users(backend: &dyn ScimBackend, filter: Option<&str>) -> AppResult<Vec<User>> {
        let Some(filter) = filter else {
            return backend.find_all_users().await;
        };

        let expr = parse_filter(filter)?;
        match UserLookup::from_expression(&expr) {
            UserLookup::Id(id) => Ok(backend.find_user_by_id(&id).await?.into_iter().collect()),
            UserLookup::Predicate(predicate) => backend.find_users_by_predicate(&predicate).await,
            UserLookup::Unrecognized => {
                debug!(attribute = %expr.attribute, "unrecognized user filter attribute");
                Ok(Vec::new())
            }
        }
    }

    /// Absent filter returns every live group, newest first
    pub async fn groups(backend: &dyn ScimBackend, filter: Option<&str>) -> AppResult<Vec<Group>> {
        let Some(filter) = filter else {
            return backend.find_all_groups().await;
        };

        let expr = parse_filter(filter)?;
        match GroupLookup::from_expression(&expr) {
            GroupLookup::Id(id) => Ok(backend.find_group_by_id(&id).await?.into_iter().collect()),
            GroupLookup::Predicate(predicate) => {
                backend.find_groups_by_predicate(&predicate).await
            }
            GroupLookup::Unrecognized => {
                debug!(attribute = %expr.attribute, "unrecognized group filter attribute");
                Ok(Vec::new())
            }
        }
    }
}
