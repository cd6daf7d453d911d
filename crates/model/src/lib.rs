//! Canonical field model for content collection schemas
//!
//! The analyzer, the source scanner and the merger all speak in terms of the
//! types defined here. Everything is plain data: cheap to clone, serializable,
//! and safe to hand across threads.

pub mod error;
pub mod field;
pub mod path;
pub mod types;

pub use error::{SchemaError, SchemaResult};
pub use field::{CompleteSchema, SchemaField};
pub use types::{ExclusiveBound, FieldConstraints, FieldType};
