pub mod definitions;
pub mod validation;

pub use definitions::{find_attribute, get_all_schemas, schema_for, Returned, SchemaDefinition};
pub use validation::{validate_group, validate_user};
