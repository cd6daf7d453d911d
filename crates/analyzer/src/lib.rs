//! JSON Schema analysis for content collections
//!
//! Walks the JSON Schema the host framework generates for a collection and
//! classifies every property into a semantic field type, flattening closed
//! nested objects into dot-path fields.

pub mod config;
pub mod document;
pub mod parser;
pub mod types;

pub use config::AnalyzerConfig;
pub use document::{NoDefinitions, RefResolver, SchemaDocument};
pub use parser::{Analysis, SchemaAnalyzer};
pub use types::{AdditionalProperties, ItemsSpec, JsonSchemaProperty, SchemaNode, TypeSpec};
