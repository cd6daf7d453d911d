//! JSON Schema node types
//!
//! Only the vocabulary the analyzer classifies on is modelled. Unknown
//! keywords are ignored, and a property that does not deserialize as a
//! schema object is kept as [`SchemaNode::Invalid`] so that one bad property
//! cannot take the whole document down with it.

use collection_schema_model::ExclusiveBound;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A node in a generated JSON Schema document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSchemaProperty {
    /// Type name, or list of type names
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSpec>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<SchemaNode>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<SchemaNode>>,

    /// Array items schema, or positional schemas for tuples
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<ItemsSpec>,

    /// Object properties, in declaration order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaNode>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,

    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub const_value: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<ExclusiveBound>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<ExclusiveBound>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    /// Local JSON pointer to another schema (`#/definitions/...`)
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl JsonSchemaProperty {
    /// Alternatives from `anyOf`, falling back to `oneOf`
    pub fn alternatives(&self) -> Option<&[SchemaNode]> {
        self.any_of.as_deref().or(self.one_of.as_deref())
    }

    /// Whether `name` is in this object's `required` list
    pub fn is_required(&self, name: &str) -> bool {
        self.required
            .as_ref()
            .map(|required| required.iter().any(|r| r == name))
            .unwrap_or(false)
    }

    /// Whether the schema declares exactly the given type
    pub fn has_type(&self, name: &str) -> bool {
        match &self.schema_type {
            Some(TypeSpec::Single(t)) => t == name,
            _ => false,
        }
    }

    /// Whether the schema only admits `null`
    pub fn is_null(&self) -> bool {
        self.has_type("null")
            || matches!(&self.schema_type, Some(TypeSpec::Multiple(types)) if types.iter().all(|t| t == "null"))
    }

    /// Property with the given name, if the schema has one
    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties.as_ref()?.get(name)
    }

    /// Whether the schema carries any object properties
    pub fn has_properties(&self) -> bool {
        self.properties.as_ref().map_or(false, |p| !p.is_empty())
    }
}

/// A property value: a schema object, a boolean schema, or something else
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaNode {
    /// `true` accepts anything, `false` accepts nothing
    Bool(bool),
    Schema(Box<JsonSchemaProperty>),
    /// Not a schema; classified as a malformed property
    Invalid(serde_json::Value),
}

impl SchemaNode {
    pub fn as_schema(&self) -> Option<&JsonSchemaProperty> {
        match self {
            SchemaNode::Schema(schema) => Some(schema),
            _ => None,
        }
    }
}

/// `type` keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    Single(String),
    Multiple(Vec<String>),
}

/// `items` keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemsSpec {
    /// Draft-07 tuple form: one schema per position
    Tuple(Vec<SchemaNode>),
    Single(Box<SchemaNode>),
}

/// `additionalProperties` keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<SchemaNode>),
}
