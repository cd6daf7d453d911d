//! Configuration types for the analyzer

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Analyzer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Top-level properties that never become fields
    pub ignored_properties: Vec<String>,

    /// Maximum nesting depth of flattened objects
    pub max_depth: usize,

    /// Formats that mark a string (or unix-time integer) alternative as a date
    pub date_formats: Vec<String>,

    /// Classify a lone `{"type": "string", "format": "date-time"}` as a date
    pub plain_date_strings: bool,
}

impl AnalyzerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(anyhow!("max_depth must be at least 1"));
        }

        if self.date_formats.iter().any(|f| f.trim().is_empty()) {
            return Err(anyhow!("date_formats cannot contain empty entries"));
        }

        Ok(())
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored_properties.iter().any(|p| p == name)
    }

    pub fn is_date_format(&self, format: &str) -> bool {
        self.date_formats.iter().any(|f| f == format)
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            ignored_properties: vec!["$schema".to_string()],
            max_depth: 16,
            date_formats: vec![
                "date-time".to_string(),
                "date".to_string(),
                "unix-time".to_string(),
            ],
            plain_date_strings: true,
        }
    }
}
