//! SCIM 2.0 schema knowledge
//!
//! Attribute definitions for the resources this service stores. They back the
//! `/Schemas` endpoint and tell the assembler which attributes can never be
//! suppressed.

use crate::models::{ENTERPRISE_USER_SCHEMA as ENTERPRISE_URI, GROUP_SCHEMA as GROUP_URI, USER_SCHEMA as USER_URI};
use crate::parser::ResourceType;
use lazy_static::lazy_static;
use serde::Serialize;
use serde_json::{json, Value};

pub const SCHEMA_RESOURCE_SCHEMA: &str = "urn:ietf:params:scim:schemas:core:2.0:Schema";

/// Attribute type in SCIM
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeType {
    String,
    Boolean,
    DateTime,
    Reference,
    Complex,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Mutability {
    ReadOnly,
    ReadWrite,
    Immutable,
}

/// When an attribute is returned
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Returned {
    Always,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Uniqueness {
    None,
    Server,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    pub multi_valued: bool,
    pub required: bool,
    pub case_exact: bool,
    pub mutability: Mutability,
    pub returned: Returned,
    pub uniqueness: Uniqueness,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_attributes: Vec<AttributeDefinition>,
}

impl AttributeDefinition {
    fn new(name: &'static str, attr_type: AttributeType) -> Self {
        Self {
            name,
            attr_type,
            multi_valued: false,
            required: false,
            case_exact: false,
            mutability: Mutability::ReadWrite,
            returned: Returned::Default,
            uniqueness: Uniqueness::None,
            sub_attributes: vec![],
        }
    }

    fn string(name: &'static str) -> Self {
        Self::new(name, AttributeType::String)
    }

    fn complex(name: &'static str, sub_attributes: Vec<AttributeDefinition>) -> Self {
        Self {
            sub_attributes,
            ..Self::new(name, AttributeType::Complex)
        }
    }

    fn multi(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn case_exact(mut self) -> Self {
        self.case_exact = true;
        self
    }

    fn unique(mut self) -> Self {
        self.uniqueness = Uniqueness::Server;
        self
    }

    fn read_only(mut self) -> Self {
        self.mutability = Mutability::ReadOnly;
        self
    }

    fn always(mut self) -> Self {
        self.returned = Returned::Always;
        self
    }
}

#[derive(Debug, Clone)]
pub struct SchemaDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub attributes: Vec<AttributeDefinition>,
}

impl SchemaDefinition {
    /// Schema resource representation served from `/Schemas`
    pub fn to_resource(&self, base_path: &str) -> Value {
        json!({
            "schemas": [SCHEMA_RESOURCE_SCHEMA],
            "id": self.id,
            "name": self.name,
            "description": self.description,
            "attributes": self.attributes,
            "meta": {
                "resourceType": "Schema",
                "location": format!("{}/Schemas/{}", base_path, self.id),
            }
        })
    }
}

fn id_attribute() -> AttributeDefinition {
    AttributeDefinition::string("id")
        .required()
        .case_exact()
        .read_only()
        .always()
        .unique()
}

fn typed_value_attributes() -> Vec<AttributeDefinition> {
    vec![
        AttributeDefinition::string("value"),
        AttributeDefinition::string("type"),
        AttributeDefinition::new("primary", AttributeType::Boolean),
    ]
}

lazy_static! {
    pub static ref USER_SCHEMA: SchemaDefinition = SchemaDefinition {
        id: USER_URI,
        name: "User",
        description: "User Account",
        attributes: vec![
            id_attribute(),
            AttributeDefinition::string("externalId").case_exact(),
            AttributeDefinition::string("userName").required().case_exact().unique(),
            AttributeDefinition::complex(
                "name",
                vec![
                    AttributeDefinition::string("givenName"),
                    AttributeDefinition::string("familyName"),
                ],
            ),
            AttributeDefinition::complex("emails", typed_value_attributes()).multi(),
            AttributeDefinition::complex("phoneNumbers", typed_value_attributes()).multi(),
            AttributeDefinition::complex(
                "addresses",
                vec![
                    AttributeDefinition::string("streetAddress"),
                    AttributeDefinition::string("locality"),
                    AttributeDefinition::string("region"),
                    AttributeDefinition::string("postalCode"),
                    AttributeDefinition::string("country"),
                    AttributeDefinition::string("type"),
                    AttributeDefinition::new("primary", AttributeType::Boolean),
                ],
            )
            .multi(),
            AttributeDefinition::new("active", AttributeType::Boolean),
        ],
    };

    pub static ref GROUP_SCHEMA: SchemaDefinition = SchemaDefinition {
        id: GROUP_URI,
        name: "Group",
        description: "Group",
        attributes: vec![
            id_attribute(),
            AttributeDefinition::string("externalId").case_exact(),
            AttributeDefinition::string("displayName").required().unique(),
            AttributeDefinition::complex(
                "members",
                vec![
                    AttributeDefinition::string("value").case_exact().required(),
                    AttributeDefinition::new("$ref", AttributeType::Reference),
                    AttributeDefinition::string("type"),
                    AttributeDefinition::string("display"),
                ],
            )
            .multi(),
        ],
    };

    pub static ref ENTERPRISE_USER_SCHEMA: SchemaDefinition = SchemaDefinition {
        id: ENTERPRISE_URI,
        name: "EnterpriseUser",
        description: "Enterprise User",
        attributes: vec![
            AttributeDefinition::string("employeeNumber"),
            AttributeDefinition::string("costCenter"),
            AttributeDefinition::string("organization"),
            AttributeDefinition::string("division"),
            AttributeDefinition::string("department"),
            AttributeDefinition::complex(
                "manager",
                vec![
                    AttributeDefinition::string("value"),
                    AttributeDefinition::new("$ref", AttributeType::Reference),
                    AttributeDefinition::string("displayName").read_only(),
                ],
            ),
        ],
    };
}

/// Schemas in the order `/Schemas` lists them
pub fn get_all_schemas() -> Vec<&'static SchemaDefinition> {
    vec![&*USER_SCHEMA, &*GROUP_SCHEMA, &*ENTERPRISE_USER_SCHEMA]
}

pub fn schema_for(resource_type: ResourceType) -> &'static SchemaDefinition {
    match resource_type {
        ResourceType::User => &*USER_SCHEMA,
        ResourceType::Group => &*GROUP_SCHEMA,
    }
}

/// Find attribute definition by dotted path, case-insensitively
pub fn find_attribute<'a>(
    schema: &'a SchemaDefinition,
    attr_path: &str,
) -> Option<&'a AttributeDefinition> {
    let mut current_attrs = &schema.attributes;
    let mut result = None;

    for part in attr_path.split('.') {
        let attr = current_attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(part))?;
        current_attrs = &attr.sub_attributes;
        result = Some(attr);
    }

    result
}
