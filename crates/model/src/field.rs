//! Schema fields and the complete per-collection schema

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::path;
use crate::types::{FieldConstraints, FieldType};

/// One form field of a collection entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    /// Dot-path name (e.g. `metadata.category`)
    pub name: String,

    /// Resolved semantic type
    pub field_type: FieldType,

    /// Whether the enclosing object lists this field as required
    pub required: bool,

    /// Whether a `null` alternative was unwrapped
    #[serde(default)]
    pub nullable: bool,

    /// Validation constraints
    #[serde(default)]
    pub constraints: FieldConstraints,

    /// Description from the schema
    pub description: Option<String>,

    /// Default value from the schema
    pub default: Option<serde_json::Value>,

    /// Whether the field was produced by flattening a nested object
    pub is_nested: bool,

    /// Path of the flattened parent object
    pub parent_path: Option<String>,

    /// Target collection of a reference field
    pub reference_collection: Option<String>,

    /// Position in the output
    pub order: usize,
}

impl SchemaField {
    /// Create a field with no constraints or metadata.
    ///
    /// Nesting is derived from the name: `seo.title` gets `parent_path = seo`.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        let parent_path = path::parent(&name).map(|p| p.to_string());

        Self {
            is_nested: parent_path.is_some(),
            parent_path,
            name,
            field_type,
            required: false,
            nullable: false,
            constraints: FieldConstraints::default(),
            description: None,
            default: None,
            reference_collection: None,
            order: 0,
        }
    }

    /// Builder-style setter for `required`
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Last segment of the name
    pub fn leaf_name(&self) -> &str {
        path::leaf(&self.name)
    }

    pub fn is_reference(&self) -> bool {
        self.field_type.is_reference()
    }
}

/// Ordered, type-resolved field model for one collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteSchema {
    /// Collection name
    pub collection_name: String,

    /// Fields in declaration order
    pub fields: Vec<SchemaField>,
}

impl CompleteSchema {
    pub fn new(collection_name: impl Into<String>, fields: Vec<SchemaField>) -> Self {
        Self {
            collection_name: collection_name.into(),
            fields,
        }
    }

    /// Look up a field by its full dot-path name
    pub fn get(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Fields flattened out of the object at `parent`
    pub fn children_of<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = &'a SchemaField> {
        self.fields
            .iter()
            .filter(move |f| f.parent_path.as_deref() == Some(parent))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check the structural invariants of the model.
    ///
    /// Returns one message per violation; an empty list means the schema is
    /// consistent.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        let mut seen = HashSet::new();

        for (index, field) in self.fields.iter().enumerate() {
            if !seen.insert(field.name.as_str()) {
                violations.push(format!("duplicate field name '{}'", field.name));
            }

            if field.order != index {
                violations.push(format!(
                    "field '{}' has order {} at position {}",
                    field.name, field.order, index
                ));
            }

            if let Some(parent) = &field.parent_path {
                if !path::is_descendant(&field.name, parent) {
                    violations.push(format!(
                        "field '{}' is not below its parent '{}'",
                        field.name, parent
                    ));
                }
            }

            if field.reference_collection.is_some() && !field.is_reference() {
                violations.push(format!(
                    "field '{}' of type {} carries a reference collection",
                    field.name,
                    field.field_type.name()
                ));
            }
        }

        violations
    }
}
