//! Configuration types for the scanner

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Scanner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Helpers that declare a reference to another collection
    pub reference_helpers: Vec<String>,

    /// Helpers that declare an image field
    pub image_helpers: Vec<String>,

    /// Calls that wrap a reference into a list (e.g. `z.array`)
    pub array_wrappers: Vec<String>,

    /// Only accept matches at the top level of the schema object
    pub top_level_only: bool,
}

impl ScannerConfig {
    pub fn validate(&self) -> Result<()> {
        for (kind, names) in [
            ("reference_helpers", &self.reference_helpers),
            ("image_helpers", &self.image_helpers),
            ("array_wrappers", &self.array_wrappers),
        ] {
            if names.is_empty() {
                return Err(anyhow!("{} cannot be empty", kind));
            }

            if let Some(bad) = names.iter().find(|n| !is_call_path(n)) {
                return Err(anyhow!("Invalid entry in {}: '{}'", kind, bad));
            }
        }

        Ok(())
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            reference_helpers: vec!["reference".to_string()],
            image_helpers: vec!["image".to_string()],
            array_wrappers: vec!["z.array".to_string()],
            top_level_only: true,
        }
    }
}

/// Identifier, optionally qualified (`z.array`)
fn is_call_path(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$')
                && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        })
}
