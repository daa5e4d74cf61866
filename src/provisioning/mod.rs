//! Resource lifecycle engine: the six logical operations per resource type
//! and the components they are built from.

pub mod assembler;
pub mod filter;
pub mod groups;
pub mod guard;
pub mod meta;
pub mod patch;
pub mod users;

use std::sync::Arc;

use crate::backend::ScimBackend;

pub use assembler::{AttributeFilter, ResourceAssembler};
pub use groups::GroupProvisioning;
pub use users::UserProvisioning;

/// Entry point shared by all request handlers
#[derive(Clone)]
pub struct ScimProvisioning {
    pub users: UserProvisioning,
    pub groups: GroupProvisioning,
    pub assembler: ResourceAssembler,
    backend: Arc<dyn ScimBackend>,
}

impl ScimProvisioning {
    pub fn new(backend: Arc<dyn ScimBackend>, base_path: &str) -> Self {
        let assembler = ResourceAssembler::new(base_path);
        Self {
            users: UserProvisioning::new(backend.clone(), assembler.clone()),
            groups: GroupProvisioning::new(backend.clone(), assembler.clone()),
            assembler,
            backend,
        }
    }

    pub fn backend(&self) -> &Arc<dyn ScimBackend> {
        &self.backend
    }
}
