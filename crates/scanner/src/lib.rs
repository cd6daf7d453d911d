//! Source scanning for content collection schemas
//!
//! The compiled JSON Schema forgets which collection a reference points at
//! and which strings are images. Both facts are still visible in the schema
//! source, and this crate recovers them with a shallow pattern scan.

pub mod config;
pub mod scanner;
pub mod source;
pub mod types;

pub use config::ScannerConfig;
pub use scanner::{extract_annotations, SourceScanner};
pub use types::{Annotations, ImageAnnotationSet, ReferenceMapping};
