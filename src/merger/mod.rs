//! Overlay of scanner annotations onto analyzed fields

use collection_schema_model::{CompleteSchema, FieldType, SchemaError, SchemaField};
use collection_schema_scanner::Annotations;
use tracing::{debug, info};

/// Produces the canonical field model of one collection.
///
/// Field order always comes from the analyzer; annotations only change
/// fields in place.
pub struct SchemaMerger {
    collection: String,
}

impl SchemaMerger {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Apply reference targets and image intent to analyzed fields
    pub fn merge(&self, fields: Vec<SchemaField>, annotations: &Annotations) -> CompleteSchema {
        let fields: Vec<SchemaField> = fields
            .into_iter()
            .enumerate()
            .map(|(order, field)| {
                let mut field = self.annotate(field, annotations);
                field.order = order;
                field
            })
            .collect();

        debug!(
            "Merged {} fields for collection {}",
            fields.len(),
            self.collection
        );

        CompleteSchema::new(self.collection.clone(), fields)
    }

    /// Build a minimal schema from annotations alone.
    ///
    /// Used when the generated JSON Schema is unusable: every field the
    /// scanner saw becomes an optional string, and image fields are then
    /// recognized as usual.
    pub fn merge_fallback(&self, annotations: &Annotations) -> CompleteSchema {
        let mut names: Vec<&str> = annotations.fields.iter().map(String::as_str).collect();

        let extra = annotations
            .references
            .iter()
            .map(|r| r.field_path.as_str())
            .chain(annotations.images.iter().map(String::as_str));
        for name in extra {
            if !names.contains(&name) {
                names.push(name);
            }
        }

        let fields = names.into_iter().map(minimal_field).collect();

        info!(
            "Built source-only schema for collection {} from {} scanned fields",
            self.collection,
            annotations.fields.len()
        );

        self.merge(fields, annotations)
    }

    fn annotate(&self, mut field: SchemaField, annotations: &Annotations) -> SchemaField {
        if field.is_reference() {
            match annotations.reference_for(&field.name) {
                Some(mapping) => {
                    let is_array = field.field_type == FieldType::ArrayReference;
                    if mapping.is_array != is_array {
                        debug!(
                            "Reference shape of {} disagrees with its source declaration; keeping {}",
                            field.name,
                            field.field_type.name()
                        );
                    }
                    field.reference_collection = Some(mapping.collection_name.clone());
                }
                None => {
                    debug!("{}", SchemaError::AmbiguousReference(field.name.clone()));
                    field.reference_collection = None;
                }
            }
        } else {
            field.reference_collection = None;
        }

        if field.field_type == FieldType::String && annotations.is_image(&field.name) {
            field.field_type = FieldType::Image;
        }

        field
    }
}

fn minimal_field(name: &str) -> SchemaField {
    let mut field = SchemaField::new(name, FieldType::String);
    // Scanner names are object keys and may contain dots; they are never nested
    field.is_nested = false;
    field.parent_path = None;
    field
}
