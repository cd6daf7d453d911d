//! Error taxonomy for schema resolution

/// Problems encountered while resolving a collection schema.
///
/// None of these abort a resolution on their own. Property-level errors are
/// absorbed where they happen, and a malformed document switches the caller
/// into source-only mode.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Malformed property at '{0}'")]
    MalformedProperty(String),

    #[error("Malformed schema document: {0}")]
    MalformedDocument(String),

    #[error("No reference annotation for '{0}'")]
    AmbiguousReference(String),
}

impl SchemaError {
    /// Whether this error concerns the whole document rather than one field
    pub fn is_document_level(&self) -> bool {
        matches!(self, SchemaError::MalformedDocument(_))
    }

    /// Field path the error is attached to, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            SchemaError::MalformedProperty(path) | SchemaError::AmbiguousReference(path) => {
                Some(path)
            }
            SchemaError::MalformedDocument(_) => None,
        }
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
