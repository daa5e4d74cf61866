use std::fmt;

use crate::models::{GROUP_SCHEMA, USER_SCHEMA};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    User,
    Group,
}

impl ResourceType {
    /// Core schema URI of the resource type
    pub fn schema_uri(&self) -> &'static str {
        match self {
            ResourceType::User => USER_SCHEMA,
            ResourceType::Group => GROUP_SCHEMA,
        }
    }

    /// Plural endpoint segment, e.g. `Users`
    pub fn endpoint(&self) -> &'static str {
        match self {
            ResourceType::User => "Users",
            ResourceType::Group => "Groups",
        }
    }

    /// Relative resource location: `/<endpoint>/<id>`
    pub fn location(&self, id: &str) -> String {
        format!("/{}/{}", self.endpoint(), id)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceType::User => write!(f, "User"),
            ResourceType::Group => write!(f, "Group"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location() {
        assert_eq!(ResourceType::User.location("abc"), "/Users/abc");
        assert_eq!(ResourceType::Group.location("g1"), "/Groups/g1");
    }

    #[test]
    fn test_display() {
        assert_eq!(ResourceType::Group.to_string(), "Group");
        assert_eq!(ResourceType::User.schema_uri(), USER_SCHEMA);
    }
}
