//! Meta block lifecycle.
//!
//! Store processors call into this module as part of every create and update,
//! so no write path can persist a resource with stale bookkeeping.

use chrono::{DateTime, Duration, Utc};

use crate::models::Meta;
use crate::parser::ResourceType;
use crate::utils::now_millis;

pub struct MetaLifecycle;

impl MetaLifecycle {
    /// Fresh meta for a resource that is being created now
    pub fn on_create(resource_type: ResourceType, id: &str) -> Meta {
        Self::on_create_at(resource_type, id, now_millis())
    }

    pub fn on_create_at(resource_type: ResourceType, id: &str, now: DateTime<Utc>) -> Meta {
        Meta {
            resource_type: resource_type.to_string(),
            created: now,
            last_modified: now,
            location: resource_type.location(id),
        }
    }

    /// Meta for a mutation of an existing resource
    pub fn on_modify(existing: &Meta) -> Meta {
        Self::on_modify_at(existing, now_millis())
    }

    /// `lastModified` always moves forward, by at least one millisecond.
    pub fn on_modify_at(existing: &Meta, now: DateTime<Utc>) -> Meta {
        let floor = existing.last_modified + Duration::milliseconds(1);
        Meta {
            resource_type: existing.resource_type.clone(),
            created: existing.created,
            last_modified: now.max(floor),
            location: existing.location.clone(),
        }
    }
}
