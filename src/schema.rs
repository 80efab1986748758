//! Schema types and structures
//!
//! Mirrors the registry's `Schema` resource: a qualified name of the form
//! `projects/{project}/schemas/{id}[@{revision}]`, a type tag and the raw
//! definition text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

const PROJECTS_PREFIX: &str = "projects/";
const SCHEMAS_SEGMENT: &str = "/schemas/";

/// Type of schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaType {
    /// Apache Avro schema (`.avsc`)
    Avro,
    /// Protocol Buffer schema (`.proto`)
    ProtocolBuffer,
    /// Missing or unrecognised type
    #[default]
    #[serde(rename = "TYPE_UNSPECIFIED", other)]
    Unspecified,
}

impl SchemaType {
    /// Get the file extension for this schema type
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            SchemaType::Avro => Some("avsc"),
            SchemaType::ProtocolBuffer => Some("proto"),
            SchemaType::Unspecified => None,
        }
    }

    /// Registry wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Avro => "AVRO",
            SchemaType::ProtocolBuffer => "PROTOCOL_BUFFER",
            SchemaType::Unspecified => "TYPE_UNSPECIFIED",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaType {
    type Err = SchemaError;

    /// Parse a user-supplied type filter. Only concrete types are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVRO" => Ok(SchemaType::Avro),
            "PROTOCOL_BUFFER" => Ok(SchemaType::ProtocolBuffer),
            _ => Err(SchemaError::InvalidSchemaType(s.to_string())),
        }
    }
}

/// A schema resource as returned by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Qualified name (`projects/{project}/schemas/{id}[@{revision}]`)
    pub name: String,
    /// Type of schema
    #[serde(rename = "type", default)]
    pub schema_type: SchemaType,
    /// Raw definition text; empty for BASIC listings
    #[serde(default)]
    pub definition: String,
    /// Revision id, when the registry reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_id: Option<String>,
}

impl Schema {
    /// Create a new schema
    pub fn new(
        name: impl Into<String>,
        schema_type: SchemaType,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            schema_type,
            definition: definition.into(),
            revision_id: None,
        }
    }

    /// Schema id without the `projects/.../schemas/` prefix or `@revision` suffix
    pub fn short_name(&self) -> &str {
        short_name(&self.name)
    }

    /// Project id from the qualified name, if the name is qualified
    pub fn project(&self) -> Option<&str> {
        self.name
            .strip_prefix(PROJECTS_PREFIX)
            .and_then(|rest| rest.split_once('/'))
            .map(|(project, _)| project)
    }

    /// Raw definition bytes
    pub fn payload(&self) -> &[u8] {
        self.definition.as_bytes()
    }
}

/// Strip the `projects/.../schemas/` prefix and any `@revision` suffix
pub fn short_name(name: &str) -> &str {
    let id = name
        .rsplit_once(SCHEMAS_SEGMENT)
        .map(|(_, id)| id)
        .unwrap_or(name);
    id.split_once('@').map(|(base, _)| base).unwrap_or(id)
}

/// Qualified schema name builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaName {
    project: String,
    schema: String,
}

impl SchemaName {
    pub fn new(project: impl Into<String>, schema: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            schema: schema.into(),
        }
    }
}

impl fmt::Display for SchemaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}{}", PROJECTS_PREFIX, self.project, SCHEMAS_SEGMENT, self.schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_strips_prefix_and_revision() {
        assert_eq!(short_name("projects/test-project/schemas/1234@1234"), "1234");
        assert_eq!(short_name("projects/test-project/schemas/acb"), "acb");
        assert_eq!(short_name("test"), "test");
        assert_eq!(short_name("an-avro-schema-name@f81ba5ff"), "an-avro-schema-name");
    }

    #[test]
    fn test_project_from_name() {
        let schema = Schema::new("projects/test-project/schemas/1234", SchemaType::Avro, "");
        assert_eq!(schema.project(), Some("test-project"));

        let bare = Schema::new("1234", SchemaType::Avro, "");
        assert_eq!(bare.project(), None);
    }

    #[test]
    fn test_schema_name_display() {
        let name = SchemaName::new("test", "acb");
        assert_eq!(name.to_string(), "projects/test/schemas/acb");
    }

    #[test]
    fn test_type_parsing() {
        assert_eq!("AVRO".parse::<SchemaType>().unwrap(), SchemaType::Avro);
        assert_eq!("protocol_buffer".parse::<SchemaType>().unwrap(), SchemaType::ProtocolBuffer);
        assert!("TYPE_UNSPECIFIED".parse::<SchemaType>().is_err());
        assert!("json".parse::<SchemaType>().is_err());
    }

    #[test]
    fn test_deserialize_registry_resource() {
        let json = r#"{
            "name": "projects/p/schemas/s",
            "type": "PROTOCOL_BUFFER",
            "definition": "syntax = \"proto3\";",
            "revisionId": "f81ba5ff",
            "revisionCreateTime": "2024-01-01T00:00:00Z"
        }"#;
        let schema: Schema = serde_json::from_str(json).unwrap();
        assert_eq!(schema.schema_type, SchemaType::ProtocolBuffer);
        assert_eq!(schema.revision_id.as_deref(), Some("f81ba5ff"));
        assert_eq!(schema.short_name(), "s");
    }

    #[test]
    fn test_deserialize_unknown_type() {
        let schema: Schema =
            serde_json::from_str(r#"{"name": "projects/p/schemas/s", "type": "JSON"}"#).unwrap();
        assert_eq!(schema.schema_type, SchemaType::Unspecified);
        assert!(schema.definition.is_empty());
    }
}
