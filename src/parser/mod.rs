pub mod filter_parser;
pub mod patch_parser;
pub mod resource_type;

pub use filter_parser::{parse_filter, FilterExpression};
pub use patch_parser::{PatchOpKind, PatchPath};
pub use resource_type::ResourceType;
