//! Annotation types produced by the scanner

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A field that points at another collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceMapping {
    /// Top-level field name
    pub field_path: String,

    /// Referenced collection
    pub collection_name: String,

    /// Whether the field holds a list of references
    pub is_array: bool,
}

/// Field names recognized as image fields
pub type ImageAnnotationSet = BTreeSet<String>;

/// Everything the scanner recovered from one schema source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    /// Reference fields, in source order
    pub references: Vec<ReferenceMapping>,

    /// Image fields
    pub images: ImageAnnotationSet,

    /// Every top-level field name seen, in source order
    pub fields: Vec<String>,
}

impl Annotations {
    /// Reference mapping for an exact field name
    pub fn reference_for(&self, field_path: &str) -> Option<&ReferenceMapping> {
        self.references.iter().find(|r| r.field_path == field_path)
    }

    pub fn is_image(&self, field_path: &str) -> bool {
        self.images.contains(field_path)
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty() && self.images.is_empty() && self.fields.is_empty()
    }
}
