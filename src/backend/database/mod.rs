//! Database-backed resource store
//!
//! ```text
//! Unified*Ops (shared preparation: ids, meta, encoding)
//!     ↓
//! *Inserter / *Reader / *Updater / *Deleter adapters
//!     └── sqlite/
//! ```

pub mod config;
pub mod group_delete;
pub mod group_insert;
pub mod group_read;
pub mod group_update;
pub mod record;
pub mod sqlite;
pub mod user_delete;
pub mod user_insert;
pub mod user_read;
pub mod user_update;

#[cfg(test)]
mod integration_test;

pub use config::DatabaseBackendConfig;

pub use user_insert::UnifiedUserInsertOps;

pub use group_insert::UnifiedGroupInsertOps;

pub use user_delete::UnifiedUserDeleteOps;

pub use group_delete::UnifiedGroupDeleteOps;

pub use user_update::UnifiedUserUpdateOps;

pub use group_update::UnifiedGroupUpdateOps;

pub use user_read::UnifiedUserReadOps;

pub use group_read::UnifiedGroupReadOps;

pub use sqlite::{
    SqliteBackend, SqliteGroupDeleter, SqliteGroupInserter, SqliteGroupReader,
    SqliteGroupUpdater, SqliteUserDeleter, SqliteUserInserter, SqliteUserReader,
    SqliteUserUpdater,
};
