//! Main configuration structure and implementation

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::OutputConfig;
use collection_schema_analyzer::AnalyzerConfig;
use collection_schema_scanner::ScannerConfig;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Configuration version
    pub version: String,

    /// JSON Schema analysis settings
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Source scanning settings
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

impl ResolverConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: ResolverConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.version != "1.0" {
            return Err(anyhow!(
                "Unsupported configuration version: {}",
                self.version
            ));
        }

        self.analyzer.validate()?;
        self.scanner.validate()?;
        self.output.validate()?;

        Ok(())
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            analyzer: AnalyzerConfig::default(),
            scanner: ScannerConfig::default(),
            output: OutputConfig::default(),
        }
    }
}
