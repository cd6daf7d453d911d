//! Generated schema documents and `$ref` resolution

use collection_schema_model::{SchemaError, SchemaResult};
use serde::Deserialize;
use tracing::{debug, trace};

use crate::types::JsonSchemaProperty;

/// Maximum number of `$ref` hops followed for a single lookup
pub(crate) const MAX_REF_HOPS: usize = 16;

/// Resolves local `$ref` pointers to schema nodes
pub trait RefResolver {
    /// Resolve a reference such as `#/definitions/blog/properties/author`
    fn resolve(&self, reference: &str) -> Option<JsonSchemaProperty>;
}

/// Resolver for schemas that were loaded without their document
pub struct NoDefinitions;

impl RefResolver for NoDefinitions {
    fn resolve(&self, _reference: &str) -> Option<JsonSchemaProperty> {
        None
    }
}

/// A parsed JSON Schema document for one collection
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    raw: serde_json::Value,
}

impl SchemaDocument {
    /// Parse a document from JSON text
    pub fn parse(content: &str) -> SchemaResult<Self> {
        let raw: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| SchemaError::MalformedDocument(e.to_string()))?;

        Self::from_value(raw)
    }

    /// Wrap an already parsed JSON value
    pub fn from_value(raw: serde_json::Value) -> SchemaResult<Self> {
        if !raw.is_object() {
            return Err(SchemaError::MalformedDocument(
                "schema root is not an object".to_string(),
            ));
        }

        Ok(Self { raw })
    }

    /// Raw JSON of the document
    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }

    /// Names of the schemas under `definitions` (or `$defs`)
    pub fn definition_names(&self) -> Vec<String> {
        self.definitions()
            .map(|defs| defs.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn definitions(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.raw
            .get("definitions")
            .or_else(|| self.raw.get("$defs"))
            .and_then(|d| d.as_object())
    }

    /// Locate the root object schema of a collection entry.
    ///
    /// The host framework emits `{"$ref": "#/definitions/<name>", "definitions": {...}}`;
    /// a bare object schema at the root is accepted as well.
    pub fn entry_schema(&self, collection: Option<&str>) -> SchemaResult<JsonSchemaProperty> {
        if let Some(reference) = self.raw.get("$ref").and_then(|r| r.as_str()) {
            debug!("Following root reference {}", reference);
            return self.follow(reference);
        }

        if self.raw.get("properties").is_some() {
            return Self::deserialize(&self.raw);
        }

        if let Some(defs) = self.definitions() {
            if let Some(entry) = collection.and_then(|name| defs.get(name)) {
                return Self::deserialize(entry);
            }

            if defs.len() == 1 {
                if let Some(entry) = defs.values().next() {
                    return Self::deserialize(entry);
                }
            }
        }

        Err(SchemaError::MalformedDocument(match collection {
            Some(name) => format!("no entry schema found for collection '{name}'"),
            None => "no entry schema found".to_string(),
        }))
    }

    /// Follow a chain of references to a schema that is not itself a `$ref`
    fn follow(&self, reference: &str) -> SchemaResult<JsonSchemaProperty> {
        let mut current = reference.to_string();

        for _ in 0..MAX_REF_HOPS {
            let target = self.lookup(&current).ok_or_else(|| {
                SchemaError::MalformedDocument(format!("unresolvable reference '{current}'"))
            })?;

            match target.get("$ref").and_then(|r| r.as_str()) {
                Some(next) => current = next.to_string(),
                None => return Self::deserialize(target),
            }
        }

        Err(SchemaError::MalformedDocument(format!(
            "reference chain starting at '{reference}' is too long"
        )))
    }

    fn lookup(&self, reference: &str) -> Option<&serde_json::Value> {
        let pointer = reference.strip_prefix('#')?;
        if pointer.is_empty() {
            return Some(&self.raw);
        }
        self.raw.pointer(pointer)
    }

    fn deserialize(value: &serde_json::Value) -> SchemaResult<JsonSchemaProperty> {
        JsonSchemaProperty::deserialize(value)
            .map_err(|e| SchemaError::MalformedDocument(format!("invalid entry schema: {e}")))
    }
}

impl RefResolver for SchemaDocument {
    fn resolve(&self, reference: &str) -> Option<JsonSchemaProperty> {
        trace!("Resolving {}", reference);
        let target = self.lookup(reference)?;
        JsonSchemaProperty::deserialize(target).ok()
    }
}
