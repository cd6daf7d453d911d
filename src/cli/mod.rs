//! CLI command implementations

use anyhow::Result;
use clap::{ArgMatches, Command};

pub mod commands;

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Create the CLI application
    pub fn app() -> Command {
        Command::new("collection-schema")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Resolve content collection schemas into ordered form fields")
            .subcommand_negates_reqs(true)
            .subcommand(commands::resolve::command())
            .subcommand(commands::analyze::command())
            .subcommand(commands::scan::command())
            .subcommand(commands::init::command())
            .subcommand(commands::validate::command())
            .subcommand(commands::info::command())
    }

    /// Run the CLI application
    pub async fn run(matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("resolve", sub_matches)) => commands::resolve::run(sub_matches).await,
            Some(("analyze", sub_matches)) => commands::analyze::run(sub_matches).await,
            Some(("scan", sub_matches)) => commands::scan::run(sub_matches).await,
            Some(("init", sub_matches)) => commands::init::run(sub_matches).await,
            Some(("validate", sub_matches)) => commands::validate::run(sub_matches).await,
            Some(("info", sub_matches)) => commands::info::run(sub_matches).await,
            _ => {
                // No subcommand provided, show help
                let _ = Self::app().print_help();
                Ok(())
            }
        }
    }
}

/// Common CLI utilities
pub mod utils {
    use anyhow::{anyhow, Result};
    use std::path::PathBuf;
    use tracing::debug;

    use crate::ResolverConfig;

    /// Default config file names looked up in the working directory
    pub const DEFAULT_CONFIG_FILES: [&str; 2] = [".collection-schema.yaml", ".collection-schema.yml"];

    /// Get configuration file path from arguments or the default locations.
    ///
    /// Returns `None` when no file exists anywhere; callers then use
    /// built-in defaults.
    pub fn get_config_path(matches: &clap::ArgMatches) -> Result<Option<PathBuf>> {
        if let Some(config_path) = matches.get_one::<String>("config") {
            let path = PathBuf::from(config_path);
            if !path.exists() {
                return Err(anyhow!("Configuration file not found: {:?}", path));
            }
            return Ok(Some(path));
        }

        for name in DEFAULT_CONFIG_FILES {
            let path = PathBuf::from(name);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Ok(dir) = crate::utils::get_config_dir() {
            let path = dir.join("config.yaml");
            if path.exists() {
                return Ok(Some(path));
            }
        }

        Ok(None)
    }

    /// Load configuration from file, falling back to defaults
    pub fn load_config(matches: &clap::ArgMatches) -> Result<ResolverConfig> {
        match get_config_path(matches)? {
            Some(path) => {
                debug!("Loading configuration from {:?}", path);
                ResolverConfig::from_file(&path)
            }
            None => {
                debug!("No configuration file found, using defaults");
                Ok(ResolverConfig::default())
            }
        }
    }

    /// Read a required input file
    pub async fn read_input(path: &str) -> Result<String> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read {}: {}", path, e))
    }

    /// Create a resolver instance
    pub fn create_resolver(config: &ResolverConfig) -> Result<crate::SchemaResolver> {
        crate::SchemaResolver::new(config)
    }
}
