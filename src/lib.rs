//! Collection Schema Resolution Library
//!
//! Turns the JSON Schema a content framework generates for a collection,
//! together with the collection's schema source, into one ordered list of
//! form fields. Reference targets and image fields, which the JSON Schema
//! loses, are recovered from the source.

pub mod cli;
pub mod config;
pub mod merger;
pub mod utils;

pub use collection_schema_analyzer::{Analysis, AnalyzerConfig, SchemaAnalyzer, SchemaDocument};
pub use collection_schema_model::{
    CompleteSchema, FieldConstraints, FieldType, SchemaError, SchemaField, SchemaResult,
};
pub use collection_schema_scanner::{Annotations, ReferenceMapping, ScannerConfig, SourceScanner};
pub use config::{OutputConfig, OutputFormat, ResolverConfig};
pub use merger::SchemaMerger;

use anyhow::Result;
use tracing::{debug, info, warn};

/// Coordinates analysis, scanning and merging for one request at a time.
///
/// Holds no per-request state; a single resolver can serve any number of
/// collections, from any thread.
pub struct SchemaResolver {
    analyzer: SchemaAnalyzer,
    scanner: SourceScanner,
}

impl SchemaResolver {
    /// Create a resolver from validated configuration
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            analyzer: SchemaAnalyzer::with_config(config.analyzer.clone()),
            scanner: SourceScanner::with_config(config.scanner.clone())?,
        })
    }

    pub fn analyzer(&self) -> &SchemaAnalyzer {
        &self.analyzer
    }

    pub fn scanner(&self) -> &SourceScanner {
        &self.scanner
    }

    /// Resolve the complete schema of `collection`.
    ///
    /// `source` may be a whole config file; the collection's own
    /// `defineCollection(...)` block, or the schema variable it names, is
    /// scanned when it can be found. This never fails: when the JSON Schema
    /// is missing or unusable the schema is built from the source alone and
    /// the result is marked as degraded.
    pub fn resolve(&self, collection: &str, schema_json: Option<&str>, source: &str) -> Resolution {
        let cache_key = utils::cache_key(collection, schema_json, source);

        let scoped = match self.scanner.schema_source(source, collection) {
            Some(block) => {
                debug!("Scanning schema declaration of {}", collection);
                block
            }
            None => source,
        };

        let mut annotations = self.scanner.extract_annotations(scoped);
        if annotations.fields.is_empty() && scoped.len() < source.len() {
            debug!(
                "No fields declared in the schema of {}; scanning the whole source",
                collection
            );
            annotations = self.scanner.extract_annotations(source);
        }
        let merger = SchemaMerger::new(collection);

        match self.analyze(collection, schema_json) {
            Ok(analysis) => {
                let schema = merger.merge(analysis.fields, &annotations);
                info!(
                    "Resolved {} fields for collection {}",
                    schema.len(),
                    collection
                );

                Resolution {
                    schema,
                    mode: ResolutionMode::Full,
                    issues: analysis.issues,
                    cache_key,
                }
            }
            Err(e) => {
                warn!(
                    "Falling back to source-only schema for collection {}: {}",
                    collection, e
                );

                Resolution {
                    schema: merger.merge_fallback(&annotations),
                    mode: ResolutionMode::SourceOnly,
                    issues: vec![e],
                    cache_key,
                }
            }
        }
    }

    fn analyze(&self, collection: &str, schema_json: Option<&str>) -> SchemaResult<Analysis> {
        let text = schema_json.ok_or_else(|| {
            SchemaError::MalformedDocument("no JSON schema available".to_string())
        })?;

        let document = SchemaDocument::parse(text)?;
        self.analyzer.analyze_document(&document, Some(collection))
    }
}

/// How a schema was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionMode {
    /// JSON Schema analyzed and annotated from source
    Full,

    /// JSON Schema unusable; fields come from the source scan only
    SourceOnly,
}

/// Result of resolving one collection
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Fields ready for rendering
    pub schema: CompleteSchema,

    pub mode: ResolutionMode,

    /// Problems absorbed while resolving
    pub issues: Vec<SchemaError>,

    /// SHA-256 of the inputs, for callers that cache resolutions
    pub cache_key: String,
}

impl Resolution {
    pub fn is_degraded(&self) -> bool {
        self.mode == ResolutionMode::SourceOnly
    }

    /// User-facing warning for a degraded load
    pub fn warning(&self) -> Option<String> {
        if !self.is_degraded() {
            return None;
        }

        let reason = self
            .issues
            .iter()
            .find(|issue| issue.is_document_level())
            .map(|issue| issue.to_string())
            .unwrap_or_else(|| "schema unavailable".to_string());

        Some(format!(
            "Schema for collection '{}' could not be loaded ({}); showing fields detected in source",
            self.schema.collection_name, reason
        ))
    }
}

/// Application error types
#[derive(thiserror::Error, Debug)]
pub enum CollectionSchemaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// Result type for the main application
pub type CollectionSchemaResult<T> = std::result::Result<T, CollectionSchemaError>;
