//! Output rendering configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::CollectionSchemaResult;

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Serialization format for resolved schemas
    pub format: OutputFormat,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl OutputConfig {
    pub fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Serialize `value` in the configured format
    pub fn render<T: Serialize>(&self, value: &T) -> CollectionSchemaResult<String> {
        let rendered = match self.format {
            OutputFormat::Json if self.pretty => serde_json::to_string_pretty(value)?,
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
        };

        Ok(rendered)
    }

    /// File extension of the configured format
    pub fn extension(&self) -> &'static str {
        match self.format {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }

    /// Render `value` to `<dir>/<name>.<ext>`, creating `dir` if needed
    pub fn write_to_dir<T: Serialize>(
        &self,
        value: &T,
        dir: &Path,
        name: &str,
    ) -> CollectionSchemaResult<PathBuf> {
        let rendered = self.render(value)?;
        std::fs::create_dir_all(dir)?;

        let path = dir.join(format!(
            "{}.{}",
            crate::utils::sanitize_filename(name),
            self.extension()
        ));
        std::fs::write(&path, rendered)?;

        Ok(path)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            pretty: true,
        }
    }
}

/// Serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(anyhow::anyhow!("Unsupported output format: {}", other)),
        }
    }
}
