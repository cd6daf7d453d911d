//! Validate command implementation

use crate::cli::utils;
use anyhow::Result;
use clap::{ArgMatches, Command};
use tracing::info;

pub fn command() -> Command {
    Command::new("validate")
        .about("Validate configuration file")
        .arg(
            clap::Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file path")
                .value_name("FILE"),
        )
}

pub async fn run(matches: &ArgMatches) -> Result<()> {
    info!("Validating configuration file");

    match utils::get_config_path(matches)? {
        Some(path) => println!("Configuration file: {}", path.display()),
        None => println!("No configuration file found, checking built-in defaults"),
    }

    let config = utils::load_config(matches)?;

    println!("Configuration file is valid!");
    println!("Version: {}", config.version);
    println!(
        "Reference helpers: {}",
        config.scanner.reference_helpers.join(", ")
    );
    println!("Image helpers: {}", config.scanner.image_helpers.join(", "));
    println!("Array wrappers: {}", config.scanner.array_wrappers.join(", "));
    println!("Max nesting depth: {}", config.analyzer.max_depth);
    println!("Output format: {:?}", config.output.format);

    Ok(())
}
