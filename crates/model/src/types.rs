//! Field types and constraints

use serde::{Deserialize, Serialize};

use crate::field::SchemaField;

/// Semantic type of a form field.
///
/// `Union` and `Unknown` are the fallback arms: shapes that cannot be
/// classified more precisely land there instead of failing the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,

    /// Closed set of allowed values
    Enum { values: Vec<String> },

    /// Single fixed value
    Literal { value: serde_json::Value },

    /// Homogeneous list
    Array { items: Box<FieldType> },

    /// Fixed-length, positionally typed list
    Tuple { items: Vec<FieldType> },

    /// Open map whose keys are not known statically
    Record { values: Box<FieldType> },

    /// Element shape of an array of objects, flattened relative to the element
    Object { fields: Vec<SchemaField> },

    /// Entry of another collection
    Reference,

    /// List of entries of another collection
    ArrayReference,

    /// Image path. Only ever produced by the merger.
    Image,

    /// Alternatives that could not be narrowed
    Union { variants: Vec<FieldType> },

    Unknown,
}

impl FieldType {
    /// Short human readable name, used in logs and CLI listings
    pub fn name(&self) -> String {
        match self {
            FieldType::String => "string".to_string(),
            FieldType::Number => "number".to_string(),
            FieldType::Boolean => "boolean".to_string(),
            FieldType::Date => "date".to_string(),
            FieldType::Enum { .. } => "enum".to_string(),
            FieldType::Literal { .. } => "literal".to_string(),
            FieldType::Array { items } => format!("array<{}>", items.name()),
            FieldType::Tuple { items } => {
                let names: Vec<String> = items.iter().map(|t| t.name()).collect();
                format!("tuple<{}>", names.join(", "))
            }
            FieldType::Record { values } => format!("record<{}>", values.name()),
            FieldType::Object { .. } => "object".to_string(),
            FieldType::Reference => "reference".to_string(),
            FieldType::ArrayReference => "array<reference>".to_string(),
            FieldType::Image => "image".to_string(),
            FieldType::Union { .. } => "union".to_string(),
            FieldType::Unknown => "unknown".to_string(),
        }
    }

    /// Whether this is one of the two reference-shaped types
    pub fn is_reference(&self) -> bool {
        matches!(self, FieldType::Reference | FieldType::ArrayReference)
    }

    /// Scalar types that can appear as array items or record values directly
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            FieldType::String
                | FieldType::Number
                | FieldType::Boolean
                | FieldType::Date
                | FieldType::Enum { .. }
                | FieldType::Literal { .. }
        )
    }
}

/// Exclusive numeric bound.
///
/// Draft-04 schemas use a boolean flag next to `minimum`/`maximum`; later
/// drafts carry the bound itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExclusiveBound {
    Flag(bool),
    Value(f64),
}

/// Validation constraints copied from the schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConstraints {
    /// Minimum length for strings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    /// Maximum length for strings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    /// Minimum value for numbers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    /// Maximum value for numbers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<ExclusiveBound>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<ExclusiveBound>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,

    /// Set when the schema type was `integer`
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub integer: bool,

    /// Format (e.g., "email", "uri", "date-time")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Pattern for strings (regex)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
}

impl FieldConstraints {
    /// True when no constraint is set
    pub fn is_empty(&self) -> bool {
        *self == FieldConstraints::default()
    }
}
